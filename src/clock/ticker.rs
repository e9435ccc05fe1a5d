use std::time::Duration;

use log::debug;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockMessage {
    Tick,
}

/// Cooperative periodic ticker.
///
/// Ticks are delivered as messages to the single owner of the capture state;
/// the ticker never touches that state itself. While paused it stays idle,
/// and it exits once the controller is dropped or the receiver goes away.
pub struct ClockTicker {
    running: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl ClockTicker {
    pub fn start(period: Duration, running: bool, ticks: mpsc::Sender<ClockMessage>) -> Self {
        let (running_tx, running_rx) = watch::channel(running);
        let handle = tokio::spawn(run_ticker(period, running_rx, ticks));
        Self {
            running: running_tx,
            handle,
        }
    }

    pub fn set_running(&self, running: bool) {
        self.running.send_replace(running);
    }

    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    pub async fn shutdown(self) {
        drop(self.running);
        if let Err(e) = self.handle.await {
            debug!("Clock ticker ended abnormally: {e}");
        }
    }
}

async fn run_ticker(
    period: Duration,
    mut running: watch::Receiver<bool>,
    ticks: mpsc::Sender<ClockMessage>,
) {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            changed = running.changed() => {
                if changed.is_err() {
                    break;
                }
                if *running.borrow_and_update() {
                    interval.reset();
                }
            }
            _ = interval.tick() => {
                if !*running.borrow() {
                    continue;
                }
                if ticks.send(ClockMessage::Tick).await.is_err() {
                    break;
                }
            }
        }
    }

    debug!("Clock ticker stopped");
}
