/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The persistence gateway trait (gateway.rs)
/// - SQLite catalog and its async gateway (library.rs)
/// - In-memory gateway (memory.rs)
/// - The layout editing session (session.rs)

pub mod data;
pub mod gateway;
pub mod library;
pub mod memory;
pub mod session;

pub use data::{Dimension, LayoutMapping, Photograph, Placement};
pub use gateway::LayoutGateway;
pub use session::{LayoutSession, SessionState};
