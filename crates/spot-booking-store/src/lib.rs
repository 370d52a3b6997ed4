//! Store and request handling for the spot booking service.
//!
//! The [database] holds every event and spot behind a single lock, the
//! [service] answers queries and reservations against it.

#![allow(rustdoc::private_intra_doc_links)]
use std::sync::Arc;

use spot_booking_core::{Config, LoadError};
use tracing::info;

mod database;
mod service;

pub use database::Store;
pub use service::Service;

/// Entrypoint of the service
///
/// Loads the snapshot named by `config` and constructs the service that the
/// surrounding infrastructure feeds requests to. A snapshot that cannot be
/// loaded is reported to the caller.
pub fn launch(config: &Config) -> Result<Service, LoadError> {
    let store = Store::open(&config.data)?;
    info!(
        events = store.list_events().len(),
        "loaded snapshot from {}",
        config.data.display()
    );
    Ok(Service::new(Arc::new(store)))
}
