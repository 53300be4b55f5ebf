/// Layout session controller
///
/// Owns the working copy of every photograph for one editing session and
/// routes user actions through the arrangement functions. Available and
/// selected views are derived on each call, never stored.
///
/// Lifecycle: `Loading` until the initial load completes, then
/// `Ready { saving, error }`. Loading and saving are split into a begin and
/// a finish step so a message-driven UI can run the gateway call as a
/// background task; [`LayoutSession::load`] and [`LayoutSession::save`]
/// wrap both steps for direct use.
use std::fmt::Display;

use tracing::{debug, info, warn};

use super::data::{self, Dimension, LayoutMapping, Photograph, PhotographUpdate};
use super::gateway::LayoutGateway;
use crate::error::{LayoutError, Result};
use crate::layout::arrange;
use crate::layout::input::{self, GridEvent, PointerEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Ready {
        saving: bool,
        error: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct LayoutSession {
    photographs: Vec<Photograph>,
    state: SessionState,
}

impl Default for LayoutSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutSession {
    /// New session waiting for its photographs
    pub fn new() -> Self {
        Self {
            photographs: Vec::new(),
            state: SessionState::Loading,
        }
    }

    /// Create a session and load it from `gateway`
    pub async fn load(gateway: &dyn LayoutGateway) -> Self {
        let mut session = Self::new();
        session.finish_load(gateway.load_all_photographs().await);
        session
    }

    /// Complete the initial load
    ///
    /// On failure the session is ready with no photographs and the error set.
    /// Stored layouts that break the ordering invariants are repaired.
    pub fn finish_load<E: Display>(&mut self, result: std::result::Result<Vec<Photograph>, E>) {
        match result {
            Ok(photographs) => {
                let normalized = arrange::normalize(&photographs);
                if normalized != photographs {
                    warn!("stored layout had gaps or out-of-range spans; renumbered");
                }
                info!(
                    total = normalized.len(),
                    placed = arrange::selected(&normalized).len(),
                    "photographs loaded"
                );
                self.photographs = normalized;
                self.state = SessionState::Ready { saving: false, error: None };
            }
            Err(e) => {
                warn!(error = %e, "loading photographs failed");
                self.photographs = Vec::new();
                self.state = SessionState::Ready {
                    saving: false,
                    error: Some(e.to_string()),
                };
            }
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.state, SessionState::Ready { saving: true, .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Ready { error, .. } => error.as_deref(),
            SessionState::Loading => None,
        }
    }

    /// The full working set
    pub fn photographs(&self) -> &[Photograph] {
        &self.photographs
    }

    /// Photographs not in the layout
    pub fn available(&self) -> Vec<&Photograph> {
        arrange::available(&self.photographs)
    }

    /// Photographs in the layout, by order
    pub fn selected(&self) -> Vec<&Photograph> {
        arrange::selected(&self.photographs)
    }

    /// Edits are accepted only when loaded and not saving
    fn apply<F>(&mut self, action: &str, f: F)
    where
        F: FnOnce(&[Photograph]) -> Vec<Photograph>,
    {
        if !matches!(self.state, SessionState::Ready { saving: false, .. }) {
            debug!(action, "edit ignored while loading or saving");
            return;
        }
        self.photographs = f(&self.photographs);
    }

    pub fn add(&mut self, id: &str) {
        self.apply("add", |photos| arrange::add_to_layout(photos, id));
    }

    pub fn remove(&mut self, id: &str) {
        self.apply("remove", |photos| arrange::remove_from_layout(photos, id));
    }

    pub fn reorder(&mut self, old_index: usize, new_index: usize) {
        self.apply("reorder", |photos| arrange::reorder(photos, old_index, new_index));
    }

    pub fn resize(&mut self, id: &str, dimension: Dimension, delta: i8) {
        self.apply("resize", |photos| arrange::resize(photos, id, dimension, delta));
    }

    /// Click on a layout cell (click-modifier model)
    pub fn pointer(&mut self, id: &str, event: PointerEvent) {
        self.apply("pointer", |photos| input::apply_pointer(photos, id, event));
    }

    /// Click on a photograph in the available list
    pub fn available_selected(&mut self, id: &str) {
        self.apply("available", |photos| input::apply_available_selected(photos, id));
    }

    /// Drag-and-drop or cell button on the grid
    pub fn grid(&mut self, event: &GridEvent) {
        self.apply("grid", |photos| input::apply_grid(photos, event));
    }

    /// Append photographs the session has not seen yet, as available
    ///
    /// Used after an import so new files show up without discarding unsaved
    /// edits. Returns how many were added.
    pub fn merge_new(&mut self, loaded: Vec<Photograph>) -> usize {
        if self.is_loading() {
            return 0;
        }

        let fresh: Vec<Photograph> = loaded
            .into_iter()
            .filter(|p| !self.photographs.iter().any(|known| known.id == p.id))
            .map(|p| Photograph { layout: None, ..p })
            .collect();

        let count = fresh.len();
        self.photographs.extend(fresh);
        count
    }

    /// Mirror metadata already written to the catalog
    ///
    /// Placement is left alone, so unsaved layout edits survive. Returns
    /// false when the photograph is not in the working set.
    pub fn update_details(&mut self, id: &str, update: &PhotographUpdate) -> bool {
        match self.photographs.iter_mut().find(|p| p.id == id) {
            Some(photograph) => {
                photograph.title = update.title.clone();
                photograph.capture_time = update.capture_time;
                true
            }
            None => {
                debug!(id, "details update for unknown photograph");
                false
            }
        }
    }

    /// Sparse placement mapping of the current working set
    pub fn layout_mapping(&self) -> LayoutMapping {
        data::layout_mapping(&self.photographs)
    }

    /// Start a save: mark the session as saving and return what to persist
    ///
    /// A second save while one is in flight is rejected with
    /// `LayoutError::SaveInProgress` and leaves the session untouched.
    pub fn begin_save(&mut self) -> Result<LayoutMapping> {
        match self.state {
            SessionState::Loading => Err(LayoutError::NotReady),
            SessionState::Ready { saving: true, .. } => Err(LayoutError::SaveInProgress),
            SessionState::Ready { saving: false, .. } => {
                let mapping = self.layout_mapping();
                self.state = SessionState::Ready { saving: true, error: None };
                debug!(placed = mapping.len(), "save started");
                Ok(mapping)
            }
        }
    }

    /// Complete a save; the working set is kept either way
    pub fn finish_save<E: Display>(&mut self, result: std::result::Result<(), E>) {
        if !self.is_saving() {
            debug!("save completion without a save in flight");
            return;
        }

        let error = match result {
            Ok(()) => {
                info!("layout saved");
                None
            }
            Err(e) => {
                warn!(error = %e, "saving layout failed");
                Some(e.to_string())
            }
        };
        self.state = SessionState::Ready { saving: false, error };
    }

    /// Persist the current layout through `gateway`
    pub async fn save(&mut self, gateway: &dyn LayoutGateway) -> Result<()> {
        let mapping = self.begin_save()?;
        let outcome = gateway.save_layout(mapping).await;
        self.finish_save(outcome.as_ref().map(|_| ()));
        outcome
    }
}
