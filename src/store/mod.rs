//! Widget storage
//!
//! One `WidgetStore` implementation is bound at startup and injected into
//! the service. Backend-specific code lives in submodules (memory,
//! sqlite); both sit behind the same contract.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::error::Result;
use crate::widget::{StagedWidget, Widget, WidgetDraft};

/// Storage contract for widget records.
///
/// Operations on a single key are atomic. `save_batch` applies its entries
/// independently and in order, so a reader running between two entries
/// sees the earlier ones already committed.
pub trait WidgetStore: Send + Sync {
    /// Look up a widget by id.
    fn get(&self, id: i64) -> Result<Option<Widget>>;

    /// The widget occupying a stacking index, if any.
    fn get_by_z(&self, z: i64) -> Result<Option<Widget>>;

    /// Remove a widget. `NotFound` when the id has no record.
    fn delete(&self, id: i64) -> Result<()>;

    /// Snapshot of every stored widget, in no particular order. The caller
    /// owns the copy and never observes later mutations through it.
    fn list_all(&self) -> Result<Vec<Widget>>;

    /// Apply staged writes in order: allocate an id for each entry that
    /// lacks one, stamp `last_modification`, and upsert the record under
    /// its id. Returns every committed record keyed by id.
    fn save_batch(&self, staged: Vec<StagedWidget>) -> Result<HashMap<i64, Widget>>;

    /// Required-field and range checks for a submission.
    fn validate(&self, draft: &WidgetDraft) -> Result<()> {
        draft.validate()
    }

    /// Remove every widget. Already-issued ids are never handed out again.
    fn clear(&self) -> Result<()>;
}

/// Bind the backend named by `config`. Chosen once; the service holds the
/// result for the process lifetime.
pub fn open(config: &Config) -> Result<Arc<dyn WidgetStore>> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Sqlite => Ok(Arc::new(SqliteStore::open(&config.db_path)?)),
    }
}
