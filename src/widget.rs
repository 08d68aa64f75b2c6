//! Widget entity and validation
//!
//! A widget is a rectangle on an unbounded plane: `x`/`y` locate its
//! center, `width`/`height` size it, and `z` is its stacking index.
//! Greater z means closer to the foreground, and no two stored widgets
//! ever share a z.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result, ValidationErrors, WidgetError};

/// A stored widget. Every field is concrete: the store only holds records
/// with an id, a full position, and a stacking index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: i64,
    pub x: i64,
    pub y: i64,
    /// Stacking index, unique across the store.
    pub z: i64,
    pub width: f32,
    pub height: f32,
    /// Stamped by the store on every create or update.
    pub last_modification: DateTime<Utc>,
}

/// A client-submitted widget. Fields are optional so one validation pass
/// can report everything that is missing. An unset `id` means create; an
/// unset `z` means place on top of everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub x: Option<i64>,
    pub y: Option<i64>,
    pub z: Option<i64>,
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl WidgetDraft {
    /// Draft with the required fields set and `z` left for the ordering
    /// engine to fill.
    pub fn new(x: i64, y: i64, width: f32, height: f32) -> Self {
        Self {
            id: None,
            x: Some(x),
            y: Some(y),
            z: None,
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_z(mut self, z: i64) -> Self {
        self.z = Some(z);
        self
    }

    /// Required-field and non-negativity checks. `id` and `z` stay
    /// optional; `width`/`height` must be present and >= 0.
    pub fn validate(&self) -> Result<()> {
        self.checked().map(|_| ())
    }

    /// Stage this draft for a batch write at a concrete stacking index.
    /// Fails with the full validation report when required fields are
    /// missing or out of range.
    pub(crate) fn stage(&self, z: i64) -> Result<StagedWidget> {
        let (x, y, width, height) = self.checked()?;
        Ok(StagedWidget {
            id: self.id,
            x,
            y,
            z,
            width,
            height,
        })
    }

    fn checked(&self) -> Result<(i64, i64, f32, f32)> {
        let mut errors = Vec::new();
        if self.x.is_none() {
            errors.push(FieldError::missing("x"));
        }
        if self.y.is_none() {
            errors.push(FieldError::missing("y"));
        }
        match self.width {
            None => errors.push(FieldError::missing("width")),
            Some(w) if w < 0.0 => errors.push(FieldError::negative("width")),
            _ => {}
        }
        match self.height {
            None => errors.push(FieldError::missing("height")),
            Some(h) if h < 0.0 => errors.push(FieldError::negative("height")),
            _ => {}
        }

        match (self.x, self.y, self.width, self.height) {
            (Some(x), Some(y), Some(width), Some(height)) if errors.is_empty() => {
                Ok((x, y, width, height))
            }
            _ => Err(WidgetError::Validation(ValidationErrors(errors))),
        }
    }
}

impl From<&Widget> for WidgetDraft {
    fn from(widget: &Widget) -> Self {
        Self {
            id: Some(widget.id),
            x: Some(widget.x),
            y: Some(widget.y),
            z: Some(widget.z),
            width: Some(widget.width),
            height: Some(widget.height),
        }
    }
}

/// A validated widget queued for a batch write. The store allocates an id
/// when `id` is unset and stamps `last_modification` at apply time.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedWidget {
    pub id: Option<i64>,
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub width: f32,
    pub height: f32,
}

impl StagedWidget {
    /// Stage an existing record at a new stacking index, everything else
    /// unchanged.
    pub fn shifted(widget: &Widget, z: i64) -> Self {
        Self {
            id: Some(widget.id),
            x: widget.x,
            y: widget.y,
            z,
            width: widget.width,
            height: widget.height,
        }
    }
}
