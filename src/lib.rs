//! Boat search view-models: a type filter form and an editable results
//! grid, coordinated through composed host events and a shared message bus.
//!
//! ARCHITECTURE
//! ============
//! `TypeFilterForm` emits `search` events. The host forwards the selected
//! type to `ResultsGrid::search_boats`, which re-queries the record service
//! and publishes row selections on the bus. Persistence, query execution,
//! and authentication are owned by the remote data service behind the
//! traits in `services`.

pub mod bus;
pub mod config;
pub mod error;
pub mod events;
pub mod form;
pub mod grid;
pub mod model;
pub mod services;
