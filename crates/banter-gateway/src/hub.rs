use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::debug;
use uuid::Uuid;

/// The opaque signal delivered to every live connection. It carries no
/// payload: receivers re-query the message log with their own last-seen
/// cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refresh;

/// Registry of live notification connections. Cloneable; the map behind
/// the `Arc` is the only shared mutable state in the core.
#[derive(Clone)]
pub struct NotificationHub {
    inner: Arc<HubInner>,
}

struct HubInner {
    /// conn_id -> sender half of that connection's signal channel.
    connections: RwLock<HashMap<Uuid, mpsc::UnboundedSender<Refresh>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HubInner {
                connections: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Add a live connection. Returns its id and the receiving end the
    /// connection task forwards to its socket.
    pub async fn register(&self) -> (Uuid, mpsc::UnboundedReceiver<Refresh>) {
        let conn_id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.connections.write().await.insert(conn_id, tx);
        debug!("Connection {} registered", conn_id);
        (conn_id, rx)
    }

    /// Remove a connection. A no-op when it is already gone.
    pub async fn unregister(&self, conn_id: Uuid) {
        self.inner.connections.write().await.remove(&conn_id);
    }

    /// Fan the refresh signal out to every registered connection. A
    /// failed send means the receiver is gone: that connection is pruned
    /// and delivery to the rest continues. Nothing is reported back to
    /// the publisher.
    pub async fn broadcast(&self) {
        let mut connections = self.inner.connections.write().await;
        connections.retain(|conn_id, tx| {
            let alive = tx.send(Refresh).is_ok();
            if !alive {
                debug!("Connection {} gone, pruned during broadcast", conn_id);
            }
            alive
        });
        debug!("Broadcast refresh to {} connections", connections.len());
    }

    pub async fn connection_count(&self) -> usize {
        self.inner.connections.read().await.len()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn broadcast_reaches_every_registered_connection() {
        let hub = NotificationHub::new();
        let (_, mut rx1) = hub.register().await;
        let (_, mut rx2) = hub.register().await;
        let (_, mut rx3) = hub.register().await;

        hub.broadcast().await;

        assert_eq!(rx1.try_recv(), Ok(Refresh));
        assert_eq!(rx2.try_recv(), Ok(Refresh));
        assert_eq!(rx3.try_recv(), Ok(Refresh));
    }

    #[tokio::test]
    async fn one_broadcast_means_one_signal() {
        let hub = NotificationHub::new();
        let (_, mut rx) = hub.register().await;

        hub.broadcast().await;

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn dead_connection_is_pruned_and_others_still_receive() {
        let hub = NotificationHub::new();
        let (_, rx_dead) = hub.register().await;
        let (_, mut rx_alive) = hub.register().await;

        drop(rx_dead);
        hub.broadcast().await;

        assert_eq!(rx_alive.try_recv(), Ok(Refresh));
        assert_eq!(hub.connection_count().await, 1);
    }

    #[tokio::test]
    async fn unregister_is_idempotent() {
        let hub = NotificationHub::new();
        let (conn_id, _rx) = hub.register().await;

        hub.unregister(conn_id).await;
        hub.unregister(conn_id).await;
        hub.unregister(Uuid::new_v4()).await;

        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn concurrent_register_and_broadcast_do_not_deadlock() {
        let hub = NotificationHub::new();
        let (_, mut rx) = hub.register().await;

        let h1 = {
            let hub = hub.clone();
            tokio::spawn(async move {
                for _ in 0..100 {
                    hub.broadcast().await;
                }
            })
        };
        let h2 = {
            let hub = hub.clone();
            tokio::spawn(async move {
                for _ in 0..100 {
                    let (conn_id, rx) = hub.register().await;
                    drop(rx);
                    hub.unregister(conn_id).await;
                }
            })
        };

        h1.await.unwrap();
        h2.await.unwrap();

        // The long-lived connection saw every broadcast that ran.
        let mut received = 0;
        while rx.try_recv().is_ok() {
            received += 1;
        }
        assert_eq!(received, 100);
    }
}
