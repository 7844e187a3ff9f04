//! Test doubles for the remote console, pacer and surface

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::reconcile::Pacer;
use crate::remote::{RemoteChannel, RemoteError};
use crate::surface::{MessageId, NotificationSurface, SurfaceError};

#[derive(Default)]
struct Script {
    sent: Vec<String>,
    failing: HashSet<String>,
    replies: HashMap<String, String>,
}

/// Records every command; fails or answers the ones it is told to.
#[derive(Clone, Default)]
pub struct ScriptedChannel {
    script: Arc<Mutex<Script>>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, command: &str) {
        self.script.lock().unwrap().failing.insert(command.to_string());
    }

    pub fn reply_to(&self, command: &str, reply: &str) {
        self.script
            .lock()
            .unwrap()
            .replies
            .insert(command.to_string(), reply.to_string());
    }

    pub fn sent(&self) -> Vec<String> {
        self.script.lock().unwrap().sent.clone()
    }

    /// A pacer that writes [`PAUSE`] into this channel's log.
    pub fn marking_pacer(&self) -> MarkingPacer {
        MarkingPacer {
            script: self.script.clone(),
        }
    }
}

#[async_trait::async_trait]
impl RemoteChannel for ScriptedChannel {
    async fn send(&self, command: &str) -> Result<String, RemoteError> {
        let mut script = self.script.lock().unwrap();
        script.sent.push(command.to_string());
        if script.failing.contains(command) {
            return Err(RemoteError::Channel("connection reset".to_string()));
        }
        Ok(script.replies.get(command).cloned().unwrap_or_default())
    }
}

/// Counts pauses without sleeping.
#[derive(Clone, Default)]
pub struct CountingPacer {
    pauses: Arc<AtomicUsize>,
}

impl CountingPacer {
    pub fn pauses(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Pacer for CountingPacer {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}

/// Log entry for a pause between commands
pub const PAUSE: &str = "<pause>";

/// Interleaves pauses with the commands of a [`ScriptedChannel`].
#[derive(Clone)]
pub struct MarkingPacer {
    script: Arc<Mutex<Script>>,
}

#[async_trait::async_trait]
impl Pacer for MarkingPacer {
    async fn pause(&self) {
        self.script.lock().unwrap().sent.push(PAUSE.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Reply(String),
    Post(MessageId, String),
    Edit(MessageId, String),
}

#[derive(Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl NotificationSurface for RecordingSurface {
    async fn reply(&self, text: &str) -> Result<(), SurfaceError> {
        self.events.lock().unwrap().push(SurfaceEvent::Reply(text.to_string()));
        Ok(())
    }

    async fn post(&self, text: &str) -> Result<MessageId, SurfaceError> {
        let mut events = self.events.lock().unwrap();
        let posted = events
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Post(..)))
            .count();
        let id = MessageId(posted as u64);
        events.push(SurfaceEvent::Post(id, text.to_string()));
        Ok(id)
    }

    async fn edit(&self, id: MessageId, text: &str) -> Result<(), SurfaceError> {
        self.events.lock().unwrap().push(SurfaceEvent::Edit(id, text.to_string()));
        Ok(())
    }
}
