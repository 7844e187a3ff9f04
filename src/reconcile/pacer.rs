//! Pacing between remote commands

use std::time::Duration;

/// One scheduling step of a paced run.
///
/// The run loop calls [`Pacer::pause`] before every bulk command, so the
/// server console never sees back-to-back requests.
#[async_trait::async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Sleeps a fixed interval on the tokio timer.
#[derive(Debug, Clone, Copy)]
pub struct IntervalPacer {
    interval: Duration,
}

impl IntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

#[async_trait::async_trait]
impl Pacer for IntervalPacer {
    async fn pause(&self) {
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_interval_pacer_sleeps() {
        let pacer = IntervalPacer::new(Duration::from_millis(20));
        let start = Instant::now();
        pacer.pause().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
