//! Boat type filter form.
//!
//! DESIGN
//! ======
//! Loads the category list once per mount and exposes it as dropdown
//! options with "All Types" first. A selection change is stored and
//! announced to the host as a `search` event; the form never talks to the
//! results grid directly.
//!
//! ERROR HANDLING
//! ==============
//! A failed lookup clears the options and keeps the error. There is no
//! retry; a host that wants one re-mounts the form.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::ErrorCode;
use crate::events::{ComponentEvent, EventSink};
use crate::model::{CategoryOption, build_search_options};
use crate::services::{BoatTypeService, ServiceError};

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

pub struct TypeFilterForm {
    events: Arc<dyn EventSink>,
    search_options: Option<Vec<CategoryOption>>,
    selected_boat_type_id: String,
    error: Option<ServiceError>,
}

impl TypeFilterForm {
    #[must_use]
    pub fn new(events: Arc<dyn EventSink>) -> Self {
        Self { events, search_options: None, selected_boat_type_id: String::new(), error: None }
    }

    /// Create the form and run its one-time category load.
    pub async fn mount(types: &dyn BoatTypeService, events: Arc<dyn EventSink>) -> Self {
        let mut form = Self::new(events);
        form.load_boat_types(types).await;
        form
    }

    /// Fetch categories and rebuild the option set.
    async fn load_boat_types(&mut self, types: &dyn BoatTypeService) {
        match types.get_boat_types().await {
            Ok(list) => {
                info!(count = list.len(), "boat types loaded");
                self.search_options = Some(build_search_options(&list));
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "boat type lookup failed");
                self.search_options = None;
                self.error = Some(e);
            }
        }
    }

    /// Store the new selection and announce it to the host.
    pub fn handle_search_option_change(&mut self, value: impl Into<String>) {
        self.selected_boat_type_id = value.into();
        self.events.dispatch(ComponentEvent::Search { boat_type_id: self.selected_boat_type_id.clone() });
    }

    /// Current options, empty when the lookup failed or has not run.
    #[must_use]
    pub fn search_options(&self) -> &[CategoryOption] {
        self.search_options.as_deref().unwrap_or(&[])
    }

    #[must_use]
    pub fn selected_boat_type_id(&self) -> &str {
        &self.selected_boat_type_id
    }

    #[must_use]
    pub fn error(&self) -> Option<&ServiceError> {
        self.error.as_ref()
    }
}
