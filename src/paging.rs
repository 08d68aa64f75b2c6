//! Paging and sorting for widget listings
//!
//! Slices an in-memory snapshot into one page, optionally sorted by a
//! single recognized field. Works over plain vectors so full listings and
//! area-filtered listings go through the same path.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::widget::Widget;

/// Page size when a caller lists without an explicit request.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sortable widget fields, declared in resolution precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Id,
    X,
    Y,
    Z,
    Width,
    Height,
    LastModification,
}

impl SortField {
    /// When a request names several fields, the first of these present in
    /// the request wins and the rest are ignored.
    pub const PRECEDENCE: [SortField; 7] = [
        SortField::Id,
        SortField::X,
        SortField::Y,
        SortField::Z,
        SortField::Width,
        SortField::Height,
        SortField::LastModification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::X => "x",
            SortField::Y => "y",
            SortField::Z => "z",
            SortField::Width => "width",
            SortField::Height => "height",
            SortField::LastModification => "lastModification",
        }
    }

    /// Parse a field name as it appears on the wire. Unrecognized names
    /// yield `None`; callers treat that as no usable sort.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "id" => Some(SortField::Id),
            "x" => Some(SortField::X),
            "y" => Some(SortField::Y),
            "z" => Some(SortField::Z),
            "width" => Some(SortField::Width),
            "height" => Some(SortField::Height),
            "lastModification" => Some(SortField::LastModification),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// One requested ordering: a field and a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    /// The single order honored for a request. Requests naming several
    /// fields resolve by field precedence; an empty request falls back to
    /// ascending z.
    pub fn resolve(orders: &[SortOrder]) -> SortOrder {
        SortField::PRECEDENCE
            .iter()
            .find_map(|field| orders.iter().find(|o| o.field == *field))
            .copied()
            .unwrap_or_else(|| SortOrder::ascending(SortField::Z))
    }

    /// Total order over widgets for this field and direction. Dimension
    /// fields compare via `total_cmp`, so NaN sorts after every number
    /// ascending instead of poisoning the sort.
    pub fn compare(&self, a: &Widget, b: &Widget) -> Ordering {
        let ord = match self.field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::X => a.x.cmp(&b.x),
            SortField::Y => a.y.cmp(&b.y),
            SortField::Z => a.z.cmp(&b.z),
            SortField::Width => a.width.total_cmp(&b.width),
            SortField::Height => a.height.total_cmp(&b.height),
            SortField::LastModification => a.last_modification.cmp(&b.last_modification),
        };
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// How to slice and order a listing. `size: None` marks the request
/// unpaged: the whole input comes back as one page, still sorted if a
/// sort was given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index.
    #[serde(default)]
    pub page: usize,
    pub size: Option<usize>,
    #[serde(default)]
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    /// Everything in one page, identity order.
    pub fn unpaged() -> Self {
        Self::default()
    }

    pub fn of(page: usize, size: usize) -> Self {
        Self {
            page,
            size: Some(size),
            sort: Vec::new(),
        }
    }

    /// Append a sort order.
    pub fn sorted_by(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort.push(SortOrder { field, direction });
        self
    }

    pub fn is_unpaged(&self) -> bool {
        self.size.is_none()
    }

    /// The listing default: first page of ten, foreground first.
    pub fn default_listing() -> Self {
        Self::of(0, DEFAULT_PAGE_SIZE).sorted_by(SortField::Z, SortDirection::Descending)
    }
}

/// One slice of a listing plus the size of the whole input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Items in the full (filtered) input, not this slice.
    pub total: usize,
    /// Zero-based index of this page.
    pub page: usize,
    /// Effective page size used for slicing.
    pub size: usize,
}

impl<T> Page<T> {
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.size.max(1))
    }
}

/// Slice `items` according to `request`. `None` and unpaged requests both
/// return everything as one page. A page index past the end clamps to an
/// empty slice; nothing here fails.
pub fn paginate(mut items: Vec<Widget>, request: Option<&PageRequest>) -> Page<Widget> {
    let total = items.len();
    let (page, size) = match request {
        Some(PageRequest {
            page,
            size: Some(size),
            ..
        }) => (*page, *size),
        _ => (0, total.max(1)),
    };

    if let Some(request) = request {
        if !request.sort.is_empty() {
            let order = SortOrder::resolve(&request.sort);
            items.sort_by(|a, b| order.compare(a, b));
        }
    }

    let start = page.saturating_mul(size).min(total);
    let mut content = items.split_off(start);
    content.truncate(size);

    Page {
        content,
        total,
        page,
        size,
    }
}
