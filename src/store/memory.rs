//! In-memory widget storage
//!
//! A concurrent map keyed by id plus an atomic id counter. Reads copy
//! records out, so snapshots never tear; writes replace whole records
//! under their key.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use dashmap::DashMap;

use crate::error::{Result, WidgetError};
use crate::widget::{StagedWidget, Widget};

use super::WidgetStore;

/// Widget store backed by a process-local concurrent map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    widgets: DashMap<i64, Widget>,
    /// Ids handed out so far. First allocation returns 1; values are never
    /// reused, even after deletes.
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl WidgetStore for MemoryStore {
    fn get(&self, id: i64) -> Result<Option<Widget>> {
        Ok(self.widgets.get(&id).map(|w| w.value().clone()))
    }

    fn get_by_z(&self, z: i64) -> Result<Option<Widget>> {
        Ok(self
            .widgets
            .iter()
            .find(|w| w.value().z == z)
            .map(|w| w.value().clone()))
    }

    fn delete(&self, id: i64) -> Result<()> {
        self.widgets
            .remove(&id)
            .map(|_| ())
            .ok_or(WidgetError::NotFound)
    }

    fn list_all(&self) -> Result<Vec<Widget>> {
        Ok(self.widgets.iter().map(|w| w.value().clone()).collect())
    }

    fn save_batch(&self, staged: Vec<StagedWidget>) -> Result<HashMap<i64, Widget>> {
        let mut committed = HashMap::with_capacity(staged.len());
        for entry in staged {
            let id = match entry.id {
                Some(id) => id,
                None => self.allocate_id(),
            };
            let widget = Widget {
                id,
                x: entry.x,
                y: entry.y,
                z: entry.z,
                width: entry.width,
                height: entry.height,
                last_modification: Utc::now(),
            };
            self.widgets.insert(id, widget.clone());
            committed.insert(id, widget);
        }
        Ok(committed)
    }

    fn clear(&self) -> Result<()> {
        self.widgets.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staged(z: i64) -> StagedWidget {
        StagedWidget {
            id: None,
            x: 1,
            y: 2,
            z,
            width: 10.0,
            height: 20.0,
        }
    }

    #[test]
    fn test_ids_start_at_one_and_increase() -> Result<()> {
        let store = MemoryStore::new();
        let first = store.save_batch(vec![staged(1)])?;
        let second = store.save_batch(vec![staged(2)])?;
        assert!(first.contains_key(&1));
        assert!(second.contains_key(&2));
        Ok(())
    }

    #[test]
    fn test_ids_not_reused_after_delete() -> Result<()> {
        let store = MemoryStore::new();
        store.save_batch(vec![staged(1)])?;
        store.delete(1)?;
        let committed = store.save_batch(vec![staged(1)])?;
        assert!(committed.contains_key(&2));
        assert!(store.get(1)?.is_none());
        Ok(())
    }

    #[test]
    fn test_upsert_replaces_record_under_id() -> Result<()> {
        let store = MemoryStore::new();
        store.save_batch(vec![staged(5)])?;
        let moved = StagedWidget {
            id: Some(1),
            x: 99,
            ..staged(6)
        };
        store.save_batch(vec![moved])?;

        let widget = store.get(1)?.ok_or(WidgetError::NotFound)?;
        assert_eq!(widget.x, 99);
        assert_eq!(widget.z, 6);
        assert_eq!(store.list_all()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_get_by_z_finds_occupant() -> Result<()> {
        let store = MemoryStore::new();
        store.save_batch(vec![staged(3), staged(7)])?;
        let widget = store.get_by_z(7)?.ok_or(WidgetError::NotFound)?;
        assert_eq!(widget.z, 7);
        assert!(store.get_by_z(4)?.is_none());
        Ok(())
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(store.delete(42), Err(WidgetError::NotFound)));
    }

    #[test]
    fn test_snapshot_does_not_track_later_writes() -> Result<()> {
        let store = MemoryStore::new();
        store.save_batch(vec![staged(1)])?;
        let snapshot = store.list_all()?;
        store.save_batch(vec![staged(2)])?;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.list_all()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_clear_keeps_id_counter() -> Result<()> {
        let store = MemoryStore::new();
        store.save_batch(vec![staged(1), staged(2)])?;
        store.clear()?;
        assert!(store.list_all()?.is_empty());
        let committed = store.save_batch(vec![staged(1)])?;
        assert!(committed.contains_key(&3));
        Ok(())
    }
}
