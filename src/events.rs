//! Composed events flowing from components to their host.
//!
//! DESIGN
//! ======
//! Components never call back into the host directly. They dispatch a
//! `ComponentEvent` through an `EventSink`, synchronously and without a
//! return value. Toasts travel the same path so a host wires one sink and
//! decides how to render spinners and notifications.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

pub const SUCCESS_TITLE: &str = "Success";
pub const MESSAGE_SHIP_IT: &str = "Ship it!";
pub const ERROR_TITLE: &str = "Error";
pub const MESSAGE_CONTACT_ADMIN: &str = "Contact System Admin!";

/// Visual style of a toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    Success,
    Error,
}

/// Transient user-visible notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub variant: ToastVariant,
}

impl Toast {
    #[must_use]
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { title: title.into(), message: message.into(), variant: ToastVariant::Success }
    }

    #[must_use]
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self { title: title.into(), message: message.into(), variant: ToastVariant::Error }
    }
}

/// Event dispatched from a component to whatever container hosts it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ComponentEvent {
    /// The filter form's selection changed.
    Search {
        #[serde(rename = "boatTypeId")]
        boat_type_id: String,
    },
    Loading,
    #[serde(rename = "doneloading")]
    DoneLoading,
    #[serde(rename = "showtoast")]
    ShowToast(Toast),
}

impl ComponentEvent {
    /// Event name as a host would register a listener for it.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Search { .. } => "search",
            Self::Loading => "loading",
            Self::DoneLoading => "doneloading",
            Self::ShowToast(_) => "showtoast",
        }
    }

    /// Map a loading flag to the matching notification.
    #[must_use]
    pub fn for_loading(is_loading: bool) -> Self {
        if is_loading { Self::Loading } else { Self::DoneLoading }
    }
}

/// Host-side receiver of component events. Fire-and-forget.
pub trait EventSink: Send + Sync {
    fn dispatch(&self, event: ComponentEvent);
}

impl EventSink for mpsc::UnboundedSender<ComponentEvent> {
    fn dispatch(&self, event: ComponentEvent) {
        if self.send(event).is_err() {
            debug!("event sink closed; dropping event");
        }
    }
}

/// Sink for hosts that do not listen.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn dispatch(&self, _event: ComponentEvent) {}
}
