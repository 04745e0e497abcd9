// src/engine/slot.rs

//! Single-capacity completion signal between the router and a rebuild cycle.

use tokio::sync::mpsc;
use tracing::warn;

/// Capacity-1 slot the router waits on after handing a Write event to the
/// pipeline.
#[derive(Debug)]
pub struct CompletionSlot {
    tx: mpsc::Sender<()>,
    rx: mpsc::Receiver<()>,
}

impl Default for CompletionSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionSlot {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(1);
        Self { tx, rx }
    }

    /// Hand out the ticket for one rebuild cycle.
    pub fn ticket(&self) -> CycleTicket {
        CycleTicket {
            tx: Some(self.tx.clone()),
        }
    }

    /// Wait until the outstanding ticket has been released.
    pub async fn wait(&mut self) {
        // The slot keeps its own sender, so `recv` never sees a closed channel.
        let _ = self.rx.recv().await;
    }
}

/// Releases the completion slot exactly once: explicitly through
/// [`CycleTicket::release`] or, failing that, when dropped.
#[derive(Debug)]
#[must_use = "dropping a ticket releases the slot immediately"]
pub struct CycleTicket {
    tx: Option<mpsc::Sender<()>>,
}

impl CycleTicket {
    pub fn release(mut self) {
        self.signal();
    }

    fn signal(&mut self) {
        if let Some(tx) = self.tx.take() {
            if let Err(err) = tx.try_send(()) {
                warn!(error = %err, "completion slot already full");
            }
        }
    }
}

impl Drop for CycleTicket {
    fn drop(&mut self) {
        self.signal();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn explicit_release_unblocks_wait() {
        let mut slot = CompletionSlot::new();
        slot.ticket().release();
        timeout(Duration::from_secs(1), slot.wait())
            .await
            .expect("wait should return after release");
    }

    #[tokio::test]
    async fn dropped_ticket_releases_once() {
        let mut slot = CompletionSlot::new();
        let ticket = slot.ticket();
        tokio::spawn(async move {
            drop(ticket);
        });
        timeout(Duration::from_secs(1), slot.wait())
            .await
            .expect("drop should release the slot");

        // Nothing else was released.
        assert!(timeout(Duration::from_millis(50), slot.wait()).await.is_err());
    }

    #[tokio::test]
    async fn release_then_drop_signals_once() {
        let mut slot = CompletionSlot::new();
        let ticket = slot.ticket();
        ticket.release();
        slot.wait().await;
        assert!(timeout(Duration::from_millis(50), slot.wait()).await.is_err());
    }
}
