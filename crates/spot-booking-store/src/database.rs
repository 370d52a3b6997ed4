//! Implementation of the in-memory store for events and spots

use std::fs::File;
use std::io::Read;
use std::path::Path;

use parking_lot::Mutex;
use spot_booking_core::{Dataset, Event, LoadError, ReservationError, Spot, SpotStatus};

/// Implementation of the in-memory store for events and spots
///
/// Every access, reads included, takes the same lock for its whole duration.
/// Callers only ever receive clones, never references into the store.
#[derive(Debug, Default)]
pub struct Store {
    data: Mutex<Dataset>,
}

impl Store {
    /// Create a new [`Store`] holding `data`.
    pub fn new(data: Dataset) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }

    /// Create a new [`Store`] from a JSON snapshot.
    pub fn from_reader<R: Read>(source: R) -> Result<Self, LoadError> {
        Ok(Self::new(parse(source)?))
    }

    /// Create a new [`Store`] from the JSON snapshot at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_owned(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Replace the contents with the JSON snapshot read from `source`.
    ///
    /// On failure the previous contents are left untouched.
    pub fn load<R: Read>(&self, source: R) -> Result<(), LoadError> {
        let data = parse(source)?;
        *self.data.lock() = data;
        Ok(())
    }

    /// Get a copy of all events in load order.
    pub fn list_events(&self) -> Vec<Event> {
        self.data.lock().events.clone()
    }

    /// Get the first event with the given `id`.
    pub fn find_event(&self, id: i64) -> Option<Event> {
        let data = self.data.lock();
        data.events.iter().find(|event| event.id == id).cloned()
    }

    /// Get copies of all spots belonging to `event_id` in load order.
    ///
    /// The event itself is not looked up, so an unknown event simply yields
    /// no spots.
    pub fn list_spots_for_event(&self, event_id: i64) -> Vec<Spot> {
        let data = self.data.lock();
        data.spots
            .iter()
            .filter(|spot| spot.event_id == event_id)
            .cloned()
            .collect()
    }

    /// Reserve the spot called `name` of the event `event_id`.
    ///
    /// Only the first spot matching both event and name is considered. If it
    /// is not available the reservation fails, even if a later spot with the
    /// same name would be.
    pub fn reserve_spot(&self, event_id: i64, name: &str) -> Result<Spot, ReservationError> {
        let mut data = self.data.lock();
        let spot = data
            .spots
            .iter_mut()
            .find(|spot| spot.event_id == event_id && spot.name == name)
            .ok_or(ReservationError::NotFound)?;

        if !spot.status.is_available() {
            return Err(ReservationError::AlreadyReserved);
        }
        spot.status = SpotStatus::Reserved;
        Ok(spot.clone())
    }
}

fn parse<R: Read>(mut source: R) -> Result<Dataset, LoadError> {
    let mut buf = Vec::new();
    source.read_to_end(&mut buf)?;
    Ok(serde_json::from_slice(&buf)?)
}
