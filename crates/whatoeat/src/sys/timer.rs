use crate::events::AppEvent;
use async_channel::Sender;
use std::time::Duration;

/// Queues `event` behind everything already pending.
pub fn defer(tx: &Sender<AppEvent>, event: AppEvent) {
    if let Err(e) = tx.try_send(event) {
        log::warn!("Dropped deferred event: {}", e);
    }
}

pub fn schedule(tx: &Sender<AppEvent>, delay: Duration, event: AppEvent) {
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let _ = tx.send(event).await;
    });
}
