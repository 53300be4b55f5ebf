/// Persistence gateway
///
/// The layout session never talks to storage directly. It loads the full
/// photograph set and saves the sparse layout mapping through this trait.
/// Implementations: [`super::library::LibraryGateway`] (SQLite catalog) and
/// [`super::memory::MemoryGateway`] (in-process, used by tests).
use async_trait::async_trait;

use super::data::{LayoutMapping, Photograph};
use crate::error::Result;

#[async_trait]
pub trait LayoutGateway: Send + Sync {
    /// Load every photograph, placed or not
    async fn load_all_photographs(&self) -> Result<Vec<Photograph>>;

    /// Replace the stored layout with `mapping`
    ///
    /// All or nothing: on error the previously stored layout is kept.
    async fn save_layout(&self, mapping: LayoutMapping) -> Result<()>;

    /// Ask for the public site to be regenerated
    async fn request_rebuild(&self) -> Result<()>;
}
