//! Boat search results grid.
//!
//! DESIGN
//! ======
//! The active type filter is the grid's only query input. `search_boats`
//! pushes each new value onto a filter queue; the effect task spawned by
//! `mount` drains that queue and runs one query task per change, so a new
//! filter never waits behind an older query. Results land in a typed
//! `QueryResult` container.
//!
//! Every query carries a generation number, drawn when the filter is
//! written (or when `refresh` starts). Only the newest generation may
//! write the cached result, so a slow stale response that settles after a
//! newer one is discarded instead of overwriting fresh data. Each query
//! still settles its own loading cycle.
//!
//! Loading is never returned to the host. It is observable only through
//! `loading` / `doneloading` events.
//!
//! ERROR HANDLING
//! ==============
//! Query failures clear the cached list and keep a display message. Save
//! failures show an error toast, clear loading, and skip the refresh. The
//! edit buffer is emptied on both save paths so a possibly inconsistent
//! draft is never resubmitted.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::bus::{BoatSelected, MessageBus};
use crate::error::ErrorCode;
use crate::events::{
    ComponentEvent, ERROR_TITLE, EventSink, MESSAGE_CONTACT_ADMIN, MESSAGE_SHIP_IT, SUCCESS_TITLE, Toast,
};
use crate::model::{ALL_TYPES_VALUE, BoatRecord, COLUMNS, Column, DraftValue, RecordInput};
use crate::services::{BoatQueryService, BoatUpdateService, ServiceError, error_display_message};

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

// =============================================================================
// TYPES
// =============================================================================

/// Current state of the record query.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum QueryResult {
    /// No query has settled yet.
    #[default]
    Loading,
    Data(Vec<BoatRecord>),
    /// The query failed; holds the display message.
    Error(String),
}

impl QueryResult {
    /// Records to render. Empty while loading or after an error.
    #[must_use]
    pub fn records(&self) -> &[BoatRecord] {
        match self {
            Self::Data(records) => records.as_slice(),
            Self::Loading | Self::Error(_) => &[],
        }
    }
}

/// Result of committing a batch of drafts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { count: usize },
    /// At least one row failed. The user sees a single error toast.
    Failed { failed_ids: Vec<String> },
}

/// Services the grid reads from and writes to.
#[derive(Clone)]
pub struct GridServices {
    pub query: Arc<dyn BoatQueryService>,
    pub update: Arc<dyn BoatUpdateService>,
}

#[derive(Default)]
struct GridState {
    boat_type_id: String,
    boats: QueryResult,
    error: Option<String>,
    save_error: Option<ServiceError>,
    selected_boat_id: Option<String>,
    draft_values: Vec<DraftValue>,
    generation: u64,
}

// =============================================================================
// GRID
// =============================================================================

pub struct ResultsGrid {
    services: GridServices,
    events: Arc<dyn EventSink>,
    bus: Arc<dyn MessageBus>,
    channel: String,
    filter_tx: mpsc::UnboundedSender<FilterChange>,
    state: Mutex<GridState>,
}

/// A filter value tagged with the generation drawn when it was set.
#[derive(Debug)]
struct FilterChange {
    generation: u64,
    boat_type_id: String,
}

impl ResultsGrid {
    /// Create the grid and spawn its query effect. The initial query runs
    /// with the "all types" filter.
    ///
    /// The effect task ends once the grid is dropped.
    pub fn mount(
        services: GridServices,
        events: Arc<dyn EventSink>,
        bus: Arc<dyn MessageBus>,
        channel: impl Into<String>,
    ) -> (Arc<Self>, JoinHandle<()>) {
        let (filter_tx, filter_rx) = mpsc::unbounded_channel();
        let initial = FilterChange { generation: 1, boat_type_id: ALL_TYPES_VALUE.to_owned() };
        let grid = Arc::new(Self {
            services,
            events,
            bus,
            channel: channel.into(),
            filter_tx,
            state: Mutex::new(GridState { generation: initial.generation, ..GridState::default() }),
        });

        // The receiver is still held here, so this only fails if it was dropped.
        if grid.filter_tx.send(initial).is_err() {
            warn!("query effect unavailable; initial query skipped");
        }
        let effect = spawn_query_effect(Arc::downgrade(&grid), filter_rx);
        (grid, effect)
    }

    fn lock(&self) -> MutexGuard<'_, GridState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify_loading(&self, is_loading: bool) {
        self.events.dispatch(ComponentEvent::for_loading(is_loading));
    }

    // =========================================================================
    // PUBLIC ENTRY POINTS
    // =========================================================================

    /// Set the type filter. Emits `loading` now and `doneloading` once the
    /// resulting query settles. Re-selecting the current filter issues no
    /// query and settles immediately.
    pub fn search_boats(&self, boat_type_id: impl Into<String>) {
        let boat_type_id = boat_type_id.into();
        self.notify_loading(true);

        // Generation is drawn in the same step that writes the filter, so
        // query order follows filter order regardless of task scheduling.
        let generation = {
            let mut state = self.lock();
            if state.boat_type_id == boat_type_id {
                None
            } else {
                state.boat_type_id.clone_from(&boat_type_id);
                state.generation += 1;
                Some(state.generation)
            }
        };

        let Some(generation) = generation else {
            debug!(%boat_type_id, "filter unchanged; no query issued");
            self.notify_loading(false);
            return;
        };

        if self.filter_tx.send(FilterChange { generation, boat_type_id }).is_err() {
            warn!("query effect stopped; filter change ignored");
            self.notify_loading(false);
        }
    }

    /// Re-fetch the current filter's records and wait for them.
    pub async fn refresh(&self) {
        self.notify_loading(true);
        let (generation, boat_type_id) = {
            let mut state = self.lock();
            state.generation += 1;
            (state.generation, state.boat_type_id.clone())
        };
        self.run_query(generation, boat_type_id).await;
        self.notify_loading(false);
    }

    /// Store the selected row and publish it on the message bus.
    pub fn update_selected_tile(&self, boat_id: impl Into<String>) {
        let boat_id = boat_id.into();
        self.lock().selected_boat_id = Some(boat_id.clone());
        self.send_message_service(&boat_id);
    }

    fn send_message_service(&self, boat_id: &str) {
        let payload = BoatSelected { record_id: boat_id.to_owned() }.to_payload();
        debug!(channel = %self.channel, %boat_id, "publishing boat selection");
        self.bus.publish(&self.channel, payload);
    }

    // =========================================================================
    // EDIT BUFFER
    // =========================================================================

    /// Record an edit. Edits to the same row merge, later values winning.
    pub fn stage_draft(&self, draft: DraftValue) {
        let mut state = self.lock();
        let drafts = &mut state.draft_values;
        match drafts.iter().position(|d| d.id == draft.id) {
            Some(i) => drafts[i].merge(draft),
            None => drafts.push(draft),
        }
    }

    /// Commit the staged edit buffer.
    pub async fn save_drafts(&self) -> SaveOutcome {
        let drafts = self.lock().draft_values.clone();
        self.handle_save(drafts).await
    }

    /// Persist a batch of drafts, one concurrent update per row.
    ///
    /// All rows saved: success toast, then `refresh`. Any row failed: error
    /// toast, loading cleared, no refresh. The edit buffer ends empty.
    pub async fn handle_save(&self, draft_values: Vec<DraftValue>) -> SaveOutcome {
        self.notify_loading(true);

        let inputs: Vec<RecordInput> = draft_values.into_iter().map(RecordInput::from).collect();
        let ids: Vec<String> = inputs.iter().map(|input| input.id.clone()).collect();
        let update = Arc::clone(&self.services.update);
        let results = join_all(inputs.into_iter().map(|input| {
            let update = Arc::clone(&update);
            async move { update.update_record(input).await }
        }))
        .await;

        let mut failed_ids = Vec::new();
        let mut first_error = None;
        for (id, result) in ids.iter().zip(results) {
            if let Err(e) = result {
                warn!(record_id = %id, error = %e, code = e.error_code(), "record update failed");
                failed_ids.push(id.clone());
                first_error.get_or_insert(e);
            }
        }

        let outcome = match first_error {
            None => {
                info!(count = ids.len(), "drafts saved");
                self.events.dispatch(ComponentEvent::ShowToast(Toast::success(SUCCESS_TITLE, MESSAGE_SHIP_IT)));
                self.lock().draft_values.clear();
                self.refresh().await;
                SaveOutcome::Saved { count: ids.len() }
            }
            Some(e) => {
                info!(failed = failed_ids.len(), total = ids.len(), "draft save failed");
                self.events.dispatch(ComponentEvent::ShowToast(Toast::error(ERROR_TITLE, MESSAGE_CONTACT_ADMIN)));
                self.lock().save_error = Some(e);
                self.notify_loading(false);
                SaveOutcome::Failed { failed_ids }
            }
        };

        self.lock().draft_values.clear();
        outcome
    }

    // =========================================================================
    // QUERY
    // =========================================================================

    /// Issue one query and apply its result if `generation` is still the newest.
    async fn run_query(&self, generation: u64, boat_type_id: String) {
        debug!(%boat_type_id, generation, "querying boats");

        let result = self.services.query.get_boats(&boat_type_id).await;

        let mut state = self.lock();
        if generation != state.generation {
            debug!(%boat_type_id, generation, latest = state.generation, "discarding stale query result");
            return;
        }
        match result {
            Ok(records) => {
                info!(%boat_type_id, count = records.len(), "boats loaded");
                state.boats = QueryResult::Data(records);
                state.error = None;
            }
            Err(e) => {
                let message = error_display_message(&e);
                warn!(%boat_type_id, error = %e, code = e.error_code(), "boat query failed");
                state.boats = QueryResult::Error(message.clone());
                state.error = Some(message);
            }
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn columns(&self) -> &'static [Column] {
        &COLUMNS
    }

    #[must_use]
    pub fn boats(&self) -> QueryResult {
        self.lock().boats.clone()
    }

    #[must_use]
    pub fn boat_type_id(&self) -> String {
        self.lock().boat_type_id.clone()
    }

    /// Display message of the last failed query.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    #[must_use]
    pub fn save_error(&self) -> Option<ServiceError> {
        self.lock().save_error.clone()
    }

    #[must_use]
    pub fn selected_boat_id(&self) -> Option<String> {
        self.lock().selected_boat_id.clone()
    }

    #[must_use]
    pub fn draft_values(&self) -> Vec<DraftValue> {
        self.lock().draft_values.clone()
    }
}

// =============================================================================
// QUERY EFFECT
// =============================================================================

/// One query task per filter change, each settling its own loading cycle.
/// The initial mount query has no matching `loading`, only `doneloading`.
fn spawn_query_effect(grid: Weak<ResultsGrid>, mut filter_rx: mpsc::UnboundedReceiver<FilterChange>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(FilterChange { generation, boat_type_id }) = filter_rx.recv().await {
            let Some(grid) = grid.upgrade() else {
                break;
            };
            tokio::spawn(async move {
                grid.run_query(generation, boat_type_id).await;
                grid.notify_loading(false);
            });
        }
        debug!("query effect stopped");
    })
}
