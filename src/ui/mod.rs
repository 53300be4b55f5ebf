/// User interface module
///
/// - `grid.rs` - the layout grid (selected photographs, sized by span)
/// - `sidebar.rs` - photographs not yet in the layout

pub mod grid;
pub mod sidebar;
