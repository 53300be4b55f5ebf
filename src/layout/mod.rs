/// Layout arrangement module
///
/// This module handles:
/// - Copy-on-write arrangement of the photograph set (arrange.rs)
/// - Translating pointer and grid input into arrangement actions (input.rs)

pub mod arrange;
pub mod input;

pub use input::{DragSource, DropTarget, GridEvent, Modifiers, PointerButton, PointerEvent};
