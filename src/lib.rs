pub mod completion;
pub mod config;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod rest;
pub mod storage;

use std::sync::Arc;

use completion::CompletionClient;
use config::Config;
use storage::Storage;

/// Shared application state passed to every request handler.
///
/// Holds only immutable configuration and the completion client — there is
/// no cross-request mutable state. Each storage operation opens its own
/// database connection.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub storage: Storage,
    pub completion: Arc<dyn CompletionClient>,
    pub started_at: std::time::Instant,
}
