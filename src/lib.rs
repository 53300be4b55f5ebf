//! Layout editor for a photography static site.
//!
//! Photographs are arranged into an ordered grid of 1-3 unit spans and
//! saved as a sparse `id -> placement` mapping.
//!
//! - [`state`] - data model, persistence gateway, editing session
//! - [`layout`] - arrangement algorithm and input adapters

pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod state;

pub use error::{LayoutError, Result};
