//! Database Setup
//!
//! Opens the task database for the current target.

use std::rc::Rc;

use doc_store::{DocumentStore, MemoryStore};

use crate::config::AppConfig;

/// Open the configured database
///
/// In the browser this is localStorage; when that is unavailable, or off
/// the web, tasks live in memory for the session.
pub fn open_database(config: &AppConfig) -> Rc<dyn DocumentStore> {
    #[cfg(target_arch = "wasm32")]
    {
        match doc_store::LocalStorageStore::open(config.db_name.as_str()) {
            Ok(db) => {
                log::info!("[Db] Opened {} in localStorage", config.db_name);
                return Rc::new(db);
            }
            Err(e) => log::error!("[Db] Falling back to in-memory store: {}", e),
        }
    }
    Rc::new(MemoryStore::in_memory(config.db_name.as_str()))
}
