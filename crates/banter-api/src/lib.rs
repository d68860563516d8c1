pub mod auth;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod notifications;
pub mod routes;

use std::sync::Arc;

use banter_auth::gate::SessionGate;
use banter_gateway::hub::NotificationHub;
use banter_store::Database;
use banter_store::blob::FsBlobStore;
use banter_store::log::MessageLog;

/// Concrete log type the handlers work with.
pub type ChatLog = MessageLog<Database, FsBlobStore>;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub gate: SessionGate,
    pub store: Arc<Database>,
    pub log: ChatLog,
    pub hub: NotificationHub,
}
