//! 🏗 Infrastructure shared by the spot booking service: the data model,
//! errors, and the request abstraction used by every transport.
#![warn(missing_docs)]

mod error;
mod model;
mod request;

use std::path::PathBuf;

pub use error::{LoadError, ReservationError};
pub use model::{Dataset, Event, ReservePayload, Spot, SpotStatus};
pub use request::{RawRequest, Request, RequestHandler, RequestKind};

/// Configuration of the spot booking service
#[derive(Clone, Debug)]
pub struct Config {
    /// Path of the JSON snapshot holding all events and spots
    pub data: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: PathBuf::from("data.json"),
        }
    }
}
