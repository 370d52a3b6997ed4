use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to load the snapshot at startup
#[derive(Debug, Error)]
pub enum LoadError {
    /// The data file could not be opened
    #[error("Failed to open data file {}: {source}", .path.display())]
    Open {
        /// Path that was tried
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// The data source could not be read to the end
    #[error("Failed to read data file: {0}")]
    Read(#[from] io::Error),
    /// The data source is not a valid snapshot
    #[error("Failed to parse data file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reasons a reservation is refused
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum ReservationError {
    /// No spot with that name exists for the event
    #[error("Spot not found")]
    NotFound,
    /// The first spot matching the name is not available
    #[error("Spot already reserved")]
    AlreadyReserved,
}
