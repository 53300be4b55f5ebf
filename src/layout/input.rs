/// Input adapters
///
/// Two interaction models drive the same arrangement primitives:
/// - the click-modifier model: mouse button plus ctrl/shift on a layout cell
/// - the grid model: drag-and-drop between sidebar and grid, plus per-cell
///   remove and resize buttons
///
/// Adapters only translate events; every mutation goes through
/// [`super::arrange`].
use tracing::debug;

use super::arrange;
use crate::state::data::{Dimension, Photograph};

/// Mouse button of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left click
    Primary,
    /// Right click
    Secondary,
}

/// Modifier keys held during a pointer event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

/// A click on a photograph in the layout preview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn plain(button: PointerButton) -> Self {
        Self {
            button,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(button: PointerButton, modifiers: Modifiers) -> Self {
        Self { button, modifiers }
    }
}

/// Primitive an event resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add(String),
    Remove(String),
    Reorder { from: usize, to: usize },
    Resize { id: String, dimension: Dimension, delta: i8 },
    /// Swap with the photograph `offset` orders away
    Swap { id: String, offset: i32 },
}

impl Action {
    /// Apply this action to a photograph set
    pub fn apply(&self, photos: &[Photograph]) -> Vec<Photograph> {
        match self {
            Action::Add(id) => arrange::add_to_layout(photos, id),
            Action::Remove(id) => arrange::remove_from_layout(photos, id),
            Action::Reorder { from, to } => arrange::reorder(photos, *from, *to),
            Action::Resize { id, dimension, delta } => {
                arrange::resize(photos, id, *dimension, *delta)
            }
            Action::Swap { id, offset } => arrange::swap_with_neighbour(photos, id, *offset),
        }
    }
}

/// Map a click on a layout cell to a primitive
///
/// Checked in this order: ctrl + left removes, any shift click resizes the
/// width, anything else swaps with the next (left) or previous (right)
/// photograph.
pub fn pointer_action(id: &str, event: PointerEvent) -> Action {
    let id = id.to_string();

    match (event.button, event.modifiers) {
        (PointerButton::Primary, Modifiers { ctrl: true, .. }) => Action::Remove(id),
        (PointerButton::Primary, Modifiers { shift: true, .. }) => Action::Resize {
            id,
            dimension: Dimension::Width,
            delta: 1,
        },
        (PointerButton::Secondary, Modifiers { shift: true, .. }) => Action::Resize {
            id,
            dimension: Dimension::Width,
            delta: -1,
        },
        (PointerButton::Primary, _) => Action::Swap { id, offset: 1 },
        (PointerButton::Secondary, _) => Action::Swap { id, offset: -1 },
    }
}

/// Apply a click on a layout cell
pub fn apply_pointer(photos: &[Photograph], id: &str, event: PointerEvent) -> Vec<Photograph> {
    let action = pointer_action(id, event);
    debug!(?event, ?action, "pointer event");
    action.apply(photos)
}

/// Apply a click on a photograph in the available list
pub fn apply_available_selected(photos: &[Photograph], id: &str) -> Vec<Photograph> {
    Action::Add(id.to_string()).apply(photos)
}

/// Where a drag started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragSource {
    /// A photograph from the available sidebar
    Available(String),
    /// A photograph already in the grid
    Grid(String),
}

/// Where a drag ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// On top of a grid cell
    Grid(String),
    /// Empty grid area after the last cell
    GridEnd,
    /// Back onto the available sidebar
    Sidebar,
}

/// Events from the drag-and-drop grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    DragEnd {
        source: DragSource,
        target: Option<DropTarget>,
    },
    Remove(String),
    Resize {
        id: String,
        dimension: Dimension,
        delta: i8,
    },
}

/// Map a grid event to the primitives it performs, in order
///
/// Needs the current set because drop targets are resolved to selected-view
/// indices.
pub fn grid_actions(photos: &[Photograph], event: &GridEvent) -> Vec<Action> {
    match event {
        GridEvent::Remove(id) => vec![Action::Remove(id.clone())],
        GridEvent::Resize { id, dimension, delta } => vec![Action::Resize {
            id: id.clone(),
            dimension: *dimension,
            delta: *delta,
        }],
        GridEvent::DragEnd { source, target } => drag_actions(photos, source, target.as_ref()),
    }
}

fn drag_actions(photos: &[Photograph], source: &DragSource, target: Option<&DropTarget>) -> Vec<Action> {
    let target = match target {
        Some(target) => target,
        None => return Vec::new(),
    };
    let last = arrange::selected(photos).len();

    match (source, target) {
        (DragSource::Available(_), DropTarget::Sidebar) => Vec::new(),
        (DragSource::Available(id), DropTarget::GridEnd) => vec![Action::Add(id.clone())],
        (DragSource::Available(id), DropTarget::Grid(over)) => {
            let mut actions = vec![Action::Add(id.clone())];
            // The added photograph lands at index `last`; move it onto the drop cell
            if let Some(to) = arrange::selected_index(photos, over) {
                actions.push(Action::Reorder { from: last, to });
            }
            actions
        }
        (DragSource::Grid(id), DropTarget::Sidebar) => vec![Action::Remove(id.clone())],
        (DragSource::Grid(id), DropTarget::GridEnd) => match arrange::selected_index(photos, id) {
            Some(from) => vec![Action::Reorder { from, to: last.saturating_sub(1) }],
            None => Vec::new(),
        },
        (DragSource::Grid(id), DropTarget::Grid(over)) => {
            match (arrange::selected_index(photos, id), arrange::selected_index(photos, over)) {
                (Some(from), Some(to)) => vec![Action::Reorder { from, to }],
                _ => Vec::new(),
            }
        }
    }
}

/// Apply a grid event
pub fn apply_grid(photos: &[Photograph], event: &GridEvent) -> Vec<Photograph> {
    let actions = grid_actions(photos, event);
    debug!(?event, ?actions, "grid event");

    actions
        .iter()
        .fold(photos.to_vec(), |current, action| action.apply(&current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::arrange::tests::{layout_of, photo};

    fn pairs(items: &[(&str, u32)]) -> Vec<(String, u32)> {
        items.iter().map(|(id, o)| (id.to_string(), *o)).collect()
    }

    fn ctrl() -> Modifiers {
        Modifiers { ctrl: true, shift: false }
    }

    fn shift() -> Modifiers {
        Modifiers { ctrl: false, shift: true }
    }

    #[test]
    fn test_plain_primary_swaps_with_next() {
        let photos = vec![photo("a", Some(1)), photo("b", Some(2))];

        let result = apply_pointer(&photos, "a", PointerEvent::plain(PointerButton::Primary));
        assert_eq!(layout_of(&result), pairs(&[("b", 1), ("a", 2)]));

        let last = apply_pointer(&photos, "b", PointerEvent::plain(PointerButton::Primary));
        assert_eq!(last, photos);
    }

    #[test]
    fn test_plain_secondary_swaps_with_previous() {
        let photos = vec![photo("a", Some(1)), photo("b", Some(2)), photo("c", Some(3))];

        let result = apply_pointer(&photos, "c", PointerEvent::plain(PointerButton::Secondary));
        assert_eq!(layout_of(&result), pairs(&[("a", 1), ("c", 2), ("b", 3)]));

        let first = apply_pointer(&photos, "a", PointerEvent::plain(PointerButton::Secondary));
        assert_eq!(first, photos);
    }

    #[test]
    fn test_swap_matches_reorder() {
        let photos = vec![photo("a", Some(1)), photo("b", Some(2)), photo("c", Some(3))];

        let via_pointer = apply_pointer(&photos, "b", PointerEvent::plain(PointerButton::Primary));
        let via_reorder = arrange::reorder(&photos, 1, 2);

        assert_eq!(via_pointer, via_reorder);
    }

    #[test]
    fn test_ctrl_primary_removes() {
        let photos = vec![photo("a", Some(1)), photo("b", Some(2)), photo("c", Some(3))];

        let result = apply_pointer(&photos, "b", PointerEvent::with_modifiers(PointerButton::Primary, ctrl()));

        assert_eq!(result, arrange::remove_from_layout(&photos, "b"));
        assert_eq!(layout_of(&result), pairs(&[("a", 1), ("c", 2)]));
    }

    #[test]
    fn test_ctrl_secondary_falls_through_to_swap() {
        let action = pointer_action("b", PointerEvent::with_modifiers(PointerButton::Secondary, ctrl()));
        assert_eq!(action, Action::Swap { id: "b".to_string(), offset: -1 });
    }

    #[test]
    fn test_shift_clicks_resize_width() {
        let photos = vec![photo("a", Some(1))];

        let grown = apply_pointer(&photos, "a", PointerEvent::with_modifiers(PointerButton::Primary, shift()));
        assert_eq!(grown[0].layout.unwrap().width, Some(2));

        let shrunk = apply_pointer(&grown, "a", PointerEvent::with_modifiers(PointerButton::Secondary, shift()));
        assert_eq!(shrunk, photos);

        let floor = apply_pointer(&photos, "a", PointerEvent::with_modifiers(PointerButton::Secondary, shift()));
        assert_eq!(floor, photos);
    }

    #[test]
    fn test_available_selection_adds() {
        let photos = vec![photo("a", Some(1)), photo("x", None)];
        let result = apply_available_selected(&photos, "x");
        assert_eq!(layout_of(&result), pairs(&[("a", 1), ("x", 2)]));
    }

    #[test]
    fn test_drag_available_onto_cell_inserts_there() {
        let photos = vec![photo("a", Some(1)), photo("b", Some(2)), photo("x", None)];
        let event = GridEvent::DragEnd {
            source: DragSource::Available("x".to_string()),
            target: Some(DropTarget::Grid("a".to_string())),
        };

        let result = apply_grid(&photos, &event);

        assert_eq!(layout_of(&result), pairs(&[("x", 1), ("a", 2), ("b", 3)]));
    }

    #[test]
    fn test_drag_available_to_grid_end_appends() {
        let photos = vec![photo("a", Some(1)), photo("x", None)];
        let event = GridEvent::DragEnd {
            source: DragSource::Available("x".to_string()),
            target: Some(DropTarget::GridEnd),
        };

        let result = apply_grid(&photos, &event);

        assert_eq!(layout_of(&result), pairs(&[("a", 1), ("x", 2)]));
    }

    #[test]
    fn test_drag_within_grid_reorders() {
        let photos = vec![photo("a", Some(1)), photo("b", Some(2)), photo("c", Some(3)), photo("d", Some(4))];
        let event = GridEvent::DragEnd {
            source: DragSource::Grid("a".to_string()),
            target: Some(DropTarget::Grid("c".to_string())),
        };

        let result = apply_grid(&photos, &event);

        assert_eq!(result, arrange::reorder(&photos, 0, 2));
        assert_eq!(layout_of(&result), pairs(&[("b", 1), ("c", 2), ("a", 3), ("d", 4)]));

        let to_end = GridEvent::DragEnd {
            source: DragSource::Grid("b".to_string()),
            target: Some(DropTarget::GridEnd),
        };
        assert_eq!(
            layout_of(&apply_grid(&photos, &to_end)),
            pairs(&[("a", 1), ("c", 2), ("d", 3), ("b", 4)])
        );
    }

    #[test]
    fn test_drag_to_sidebar_removes() {
        let photos = vec![photo("a", Some(1)), photo("b", Some(2))];
        let event = GridEvent::DragEnd {
            source: DragSource::Grid("a".to_string()),
            target: Some(DropTarget::Sidebar),
        };

        let result = apply_grid(&photos, &event);

        assert_eq!(layout_of(&result), pairs(&[("b", 1)]));
    }

    #[test]
    fn test_drop_outside_is_noop() {
        let photos = vec![photo("a", Some(1)), photo("x", None)];

        for source in [DragSource::Available("x".to_string()), DragSource::Grid("a".to_string())] {
            let event = GridEvent::DragEnd { source, target: None };
            assert_eq!(apply_grid(&photos, &event), photos);
        }

        let back = GridEvent::DragEnd {
            source: DragSource::Available("x".to_string()),
            target: Some(DropTarget::Sidebar),
        };
        assert_eq!(apply_grid(&photos, &back), photos);
    }

    #[test]
    fn test_grid_buttons() {
        let photos = vec![photo("a", Some(1)), photo("b", Some(2))];

        let taller = apply_grid(
            &photos,
            &GridEvent::Resize { id: "b".to_string(), dimension: Dimension::Height, delta: 1 },
        );
        assert_eq!(taller[1].layout.unwrap().height, Some(2));

        let removed = apply_grid(&taller, &GridEvent::Remove("a".to_string()));
        assert_eq!(layout_of(&removed), pairs(&[("b", 1)]));
    }
}
