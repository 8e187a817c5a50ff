use std::sync::Arc;

use boatsearch::bus::{BoatSelected, InProcessBus, MessageBus};
use boatsearch::config::AppConfig;
use boatsearch::events::ComponentEvent;
use boatsearch::form::TypeFilterForm;
use boatsearch::grid::{GridServices, ResultsGrid};
use boatsearch::services::http::HttpBoatDataService;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Host container: loads the filter form, applies the type given as the
/// first argument (empty for all types), prints the matching boats as JSON,
/// and selects the first one.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    let service = match HttpBoatDataService::new(&config) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            error!(error = %e, "data service init failed");
            std::process::exit(1);
        }
    };

    let bus = Arc::new(InProcessBus::new(config.subscriber_capacity));
    let mut selections = bus.subscribe(&config.message_channel);
    tokio::spawn(async move {
        while let Some(payload) = selections.receiver.recv().await {
            if let Some(selected) = BoatSelected::from_payload(&payload) {
                info!(record_id = %selected.record_id, "boat selected");
            }
        }
    });

    let (events_tx, mut events) = mpsc::unbounded_channel();
    let events_tx = Arc::new(events_tx);

    let mut form = TypeFilterForm::mount(service.as_ref(), events_tx.clone()).await;
    for option in form.search_options() {
        info!(label = %option.label, value = %option.value, "search option");
    }

    let services = GridServices { query: service.clone(), update: service };
    let (grid, _effect) = ResultsGrid::mount(services, events_tx, bus, config.message_channel.clone());

    form.handle_search_option_change(std::env::args().nth(1).unwrap_or_default());

    // The mount query settles without a matching `loading`.
    let mut pending: i32 = 1;
    while pending > 0 {
        let Some(event) = events.recv().await else {
            break;
        };
        match event {
            ComponentEvent::Search { boat_type_id } => grid.search_boats(boat_type_id),
            ComponentEvent::Loading => pending += 1,
            ComponentEvent::DoneLoading => pending -= 1,
            ComponentEvent::ShowToast(toast) => info!(title = %toast.title, message = %toast.message, "toast"),
        }
    }

    if let Some(message) = grid.error() {
        error!(%message, "boat query failed");
        std::process::exit(1);
    }

    let boats = grid.boats();
    match serde_json::to_string_pretty(boats.records()) {
        Ok(json) => println!("{json}"),
        Err(e) => error!(error = %e, "failed to render boats"),
    }

    if let Some(first) = boats.records().first() {
        grid.update_selected_tile(first.id.clone());
        tokio::task::yield_now().await;
    }
}
