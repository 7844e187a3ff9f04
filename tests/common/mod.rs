//! Shared doubles for integration tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use whitelist_bridge::reconcile::Pacer;
use whitelist_bridge::remote::{RemoteChannel, RemoteError};
use whitelist_bridge::surface::{MessageId, NotificationSurface, SurfaceError};

/// Console that records commands and fails the ones listed.
#[derive(Clone, Default)]
pub struct FakeConsole {
    sent: Arc<Mutex<Vec<String>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl FakeConsole {
    pub fn fail_on(&self, command: &str) {
        self.failing.lock().unwrap().insert(command.to_string());
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RemoteChannel for FakeConsole {
    async fn send(&self, command: &str) -> Result<String, RemoteError> {
        self.sent.lock().unwrap().push(command.to_string());
        if self.failing.lock().unwrap().contains(command) {
            Err(RemoteError::Channel("broken pipe".to_string()))
        } else {
            Ok(String::new())
        }
    }
}

/// Console that takes a while to answer and tracks overlapping commands.
#[derive(Clone)]
pub struct SlowConsole {
    delay: Duration,
    sent: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl SlowConsole {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            sent: Arc::default(),
            in_flight: Arc::default(),
            peak: Arc::default(),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// Most commands ever in flight at once
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RemoteChannel for SlowConsole {
    async fn send(&self, command: &str) -> Result<String, RemoteError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.sent.lock().unwrap().push(command.to_string());

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(String::new())
    }
}

pub struct NoPause;

#[async_trait::async_trait]
impl Pacer for NoPause {
    async fn pause(&self) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Reply(String),
    Progress(String),
}

/// Surface that keeps everything it was asked to show.
#[derive(Default)]
pub struct CapturedSurface {
    shown: Mutex<Vec<Shown>>,
    next_id: AtomicU64,
}

impl CapturedSurface {
    pub fn shown(&self) -> Vec<Shown> {
        self.shown.lock().unwrap().clone()
    }

    pub fn replies(&self) -> Vec<String> {
        self.shown()
            .into_iter()
            .filter_map(|s| match s {
                Shown::Reply(text) => Some(text),
                Shown::Progress(_) => None,
            })
            .collect()
    }

    pub fn progress(&self) -> Vec<String> {
        self.shown()
            .into_iter()
            .filter_map(|s| match s {
                Shown::Progress(text) => Some(text),
                Shown::Reply(_) => None,
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl NotificationSurface for CapturedSurface {
    async fn reply(&self, text: &str) -> Result<(), SurfaceError> {
        self.shown.lock().unwrap().push(Shown::Reply(text.to_string()));
        Ok(())
    }

    async fn post(&self, text: &str) -> Result<MessageId, SurfaceError> {
        self.shown.lock().unwrap().push(Shown::Progress(text.to_string()));
        Ok(MessageId(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    async fn edit(&self, _id: MessageId, text: &str) -> Result<(), SurfaceError> {
        self.shown.lock().unwrap().push(Shown::Progress(text.to_string()));
        Ok(())
    }
}
