//! Stacking-order placement
//!
//! Gives every saved widget a collision-free z. An occupied target slot
//! displaces its occupant one step up, which may displace the next, until
//! the chain hits a gap. The displaced copies plus the incoming widget
//! form one batch write, displaced records first, incoming last.

use tracing::debug;

use crate::error::{Result, WidgetError};
use crate::paging::{paginate, PageRequest, SortDirection, SortField};
use crate::store::WidgetStore;
use crate::widget::{StagedWidget, Widget, WidgetDraft};

/// Place a draft: fill an unset z with the next top slot, stage the shift
/// chain, commit the batch, and read the committed record back.
pub fn place(store: &dyn WidgetStore, draft: &WidgetDraft) -> Result<Widget> {
    let z = match draft.z {
        Some(z) => z,
        None => next_top_z(store)?,
    };
    let incoming = draft.stage(z)?;

    let mut batch = shift_chain(store, &incoming)?;
    if !batch.is_empty() {
        debug!(z, displaced = batch.len(), "placement shifts occupants up");
    }
    batch.push(incoming);
    store.save_batch(batch)?;

    // Read back what now occupies the slot. Missing only if a concurrent
    // placement raced this one out of it.
    store.get_by_z(z)?.ok_or(WidgetError::NotFound)
}

/// The slot above everything currently stored: highest z plus one, or 1 on
/// an empty store. Computed as a single-element page sorted by z
/// descending, so one code path answers "what is on top".
fn next_top_z(store: &dyn WidgetStore) -> Result<i64> {
    let request = PageRequest::of(0, 1).sorted_by(SortField::Z, SortDirection::Descending);
    let top = paginate(store.list_all()?, Some(&request));
    Ok(top.content.first().map_or(1, |w| w.z + 1))
}

/// Walk upward from the incoming widget's slot, staging a one-step shift
/// for every occupant in the way. A slot already held by the widget being
/// placed counts as free, so re-saving at the same z never displaces
/// anything. The walk ends at the first gap; a fully dense run costs one
/// probe per stored widget.
fn shift_chain(store: &dyn WidgetStore, incoming: &StagedWidget) -> Result<Vec<StagedWidget>> {
    let mut moves = Vec::new();
    let mut slot = incoming.z;

    while let Some(occupant) = store.get_by_z(slot)? {
        if incoming.id == Some(occupant.id) {
            break;
        }
        slot = occupant.z + 1;
        moves.push(StagedWidget::shifted(&occupant, slot));
    }

    Ok(moves)
}
