use std::time::Duration;

use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

/// Repeating local timer that feeds a message into a channel.
///
/// Armed and disarmed only through [`set_running`](Self::set_running). The
/// background task is aborted when the ticker is dropped.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Arm or disarm. Must be called from within a tokio runtime.
    pub fn set_running<M>(&mut self, running: bool, tx: &UnboundedSender<M>, message: M)
    where
        M: Clone + Send + 'static,
    {
        if !running {
            self.disarm();
            return;
        }
        if self.is_armed() {
            return;
        }

        let period = self.period;
        let tx = tx.clone();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(message.clone()).is_err() {
                    break;
                }
            }
        }));
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.disarm();
    }
}
