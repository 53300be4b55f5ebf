/// In-process gateway
///
/// Holds photographs in memory and applies saved layouts to them the way
/// the site API does. Load and save failures can be switched on to exercise
/// the session's error paths.
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::data::{LayoutMapping, Photograph};
use super::gateway::LayoutGateway;
use crate::error::{LayoutError, Result};

#[derive(Debug, Default)]
pub struct MemoryGateway {
    pub photographs: Mutex<Vec<Photograph>>,
    /// Every mapping passed to `save_layout`, successful or not
    pub saved: Mutex<Vec<LayoutMapping>>,
    pub rebuild_calls: AtomicU64,
    pub fail_load: AtomicBool,
    pub fail_save: AtomicBool,
}

impl MemoryGateway {
    pub fn new(photographs: Vec<Photograph>) -> Self {
        Self {
            photographs: Mutex::new(photographs),
            ..Self::default()
        }
    }

    pub fn set_fail_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::Relaxed);
    }

    pub fn set_fail_save(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::Relaxed);
    }

    /// Most recent mapping passed to `save_layout`
    pub async fn last_saved(&self) -> Option<LayoutMapping> {
        self.saved.lock().await.last().cloned()
    }
}

#[async_trait]
impl LayoutGateway for MemoryGateway {
    async fn load_all_photographs(&self) -> Result<Vec<Photograph>> {
        if self.fail_load.load(Ordering::Relaxed) {
            return Err(LayoutError::Unavailable("photograph listing".to_string()));
        }
        Ok(self.photographs.lock().await.clone())
    }

    async fn save_layout(&self, mapping: LayoutMapping) -> Result<()> {
        self.saved.lock().await.push(mapping.clone());

        if self.fail_save.load(Ordering::Relaxed) {
            return Err(LayoutError::Unavailable("layout endpoint".to_string()));
        }

        let mut photographs = self.photographs.lock().await;
        if let Some(unknown) = mapping.keys().find(|id| !photographs.iter().any(|p| &p.id == *id)) {
            return Err(LayoutError::UnknownPhotograph(unknown.clone()));
        }

        for photograph in photographs.iter_mut() {
            photograph.layout = mapping.get(&photograph.id).copied();
        }
        Ok(())
    }

    async fn request_rebuild(&self) -> Result<()> {
        self.rebuild_calls.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
