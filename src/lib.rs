//! widgetplane - z-ordered widget board core
//!
//! Widgets are rectangles on an unbounded plane, each holding a unique
//! stacking index. Saving into an occupied slot shifts the occupants up
//! until a gap absorbs the chain; listings page, sort, and filter by area.
//! Storage is in-memory or SQLite behind one contract, bound at startup.

pub mod area;
pub mod config;
pub mod error;
pub mod ordering;
pub mod paging;
pub mod service;
pub mod store;
pub mod widget;

pub use area::Area;
pub use config::{Config, StoreBackend};
pub use error::{FieldError, Result, ValidationErrors, WidgetError};
pub use paging::{Page, PageRequest, SortDirection, SortField, SortOrder, DEFAULT_PAGE_SIZE};
pub use service::WidgetService;
pub use store::{MemoryStore, SqliteStore, WidgetStore};
pub use widget::{StagedWidget, Widget, WidgetDraft};
