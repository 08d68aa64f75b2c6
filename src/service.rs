//! Widget operations facade
//!
//! The surface a transport adapter calls into. Owns the store bound at
//! startup; placement, paging, and filtering all run synchronously on the
//! caller's thread, and reads work over snapshots taken at call time.

use std::sync::Arc;

use tracing::info;

use crate::area::Area;
use crate::config::Config;
use crate::error::{Result, WidgetError};
use crate::ordering;
use crate::paging::{paginate, Page, PageRequest};
use crate::store::{self, WidgetStore};
use crate::widget::{Widget, WidgetDraft};

/// Entry point for widget operations, bound to one storage backend.
#[derive(Clone)]
pub struct WidgetService {
    store: Arc<dyn WidgetStore>,
}

impl WidgetService {
    /// Service over an explicit store instance.
    pub fn new(store: Arc<dyn WidgetStore>) -> Self {
        Self { store }
    }

    /// Service over the backend named in `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        info!(backend = config.backend.as_str(), "binding widget store");
        Ok(Self::new(store::open(config)?))
    }

    /// Find a widget by id.
    pub fn find_by_id(&self, id: i64) -> Result<Widget> {
        self.store.get(id)?.ok_or(WidgetError::NotFound)
    }

    /// The widget at a stacking index, if any.
    pub fn find_by_z(&self, z: i64) -> Result<Option<Widget>> {
        self.store.get_by_z(z)
    }

    /// List widgets. `None` behaves as an unpaged request.
    pub fn find_all(&self, request: Option<&PageRequest>) -> Result<Page<Widget>> {
        Ok(paginate(self.store.list_all()?, request))
    }

    /// Validate and save a widget, rearranging the stacking order as
    /// needed. A draft without z lands on top of everything.
    pub fn save(&self, draft: &WidgetDraft) -> Result<Widget> {
        self.store.validate(draft)?;
        ordering::place(&*self.store, draft)
    }

    /// Replace all fields of the widget at `id`, keeping its id, and
    /// re-place it in the stacking order. An unknown id falls back to a
    /// plain save under a fresh id rather than failing.
    pub fn update(&self, draft: &WidgetDraft, id: i64) -> Result<Widget> {
        match self.store.get(id)? {
            Some(existing) => {
                let replacement = WidgetDraft {
                    id: Some(existing.id),
                    ..draft.clone()
                };
                self.save(&replacement)
            }
            None => self.save(draft),
        }
    }

    /// Delete a widget by id.
    pub fn delete_by_id(&self, id: i64) -> Result<()> {
        self.store.delete(id)
    }

    /// Widgets lying fully inside `area`, paged like `find_all`.
    pub fn filter_by_area(&self, area: Area, request: Option<&PageRequest>) -> Result<Page<Widget>> {
        let inside = self
            .store
            .list_all()?
            .into_iter()
            .filter(|w| area.contains(w))
            .collect();
        Ok(paginate(inside, request))
    }
}
