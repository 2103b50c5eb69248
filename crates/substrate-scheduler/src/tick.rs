//! The scheduler's cooperative tick loop (`spec.md` §5): wakes on a fixed
//! base period, asks the job table which jobs are due, and forwards their
//! names into the caller's single-writer inbox.

use std::sync::Arc;

use substrate_core::constants::INBOX_CAPACITY;
use tokio::sync::mpsc;

use crate::scheduler::Scheduler;

/// Spawn the tick loop. Returns the receiving end of a bounded channel of
/// due job names; the facade's event loop owns draining it. Dropping the
/// receiver stops the loop on its next tick.
pub fn spawn_tick_loop(scheduler: Arc<Scheduler>, tick_period: std::time::Duration) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(INBOX_CAPACITY);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick_period);
        loop {
            interval.tick().await;
            let now = chrono::Utc::now();
            for name in scheduler.due_jobs(now) {
                if tx.send(name).await.is_err() {
                    return;
                }
            }
        }
    });
    rx
}
