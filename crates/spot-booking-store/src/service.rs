//! Implementation of the request handling service
use std::sync::Arc;

use spot_booking_core::{Request, RequestHandler, RequestKind, ReservationError, ReservePayload};
use tracing::{debug, info, warn};

use crate::database::Store;

/// Answers queries and reservations against a shared [`Store`]
///
/// The service is the only component mutating the store after it has been
/// loaded.
#[derive(Clone, Debug)]
pub struct Service {
    store: Arc<Store>,
}

impl Service {
    /// Create a new [`Service`] operating on `store`
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Get the store this service operates on
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    fn get_event(&self, rq: Request) {
        let Some((rq, event_id)) = event_id(rq) else {
            return;
        };
        match self.store.find_event(event_id) {
            Some(event) => rq.respond_with_json(&event),
            None => rq.respond_with_not_found(),
        }
    }

    fn list_event_spots(&self, rq: Request) {
        let Some((rq, event_id)) = event_id(rq) else {
            return;
        };
        let spots = self.store.list_spots_for_event(event_id);
        if spots.is_empty() {
            rq.respond_with_not_found();
        } else {
            rq.respond_with_json(&spots);
        }
    }

    fn reserve(&self, rq: Request) {
        let Some((mut rq, event_id)) = event_id(rq) else {
            return;
        };
        let payload = match rq.read_bytes() {
            Ok(body) => ReservePayload::from_slice(&body),
            Err(err) => {
                warn!(request = %rq.request_id(), "failed to read request body: {err}");
                rq.respond_with_err("Invalid request payload");
                return;
            }
        };
        let Ok(payload) = payload else {
            warn!(request = %rq.request_id(), "malformed reservation payload");
            rq.respond_with_err("Invalid request payload");
            return;
        };

        match self.store.reserve_spot(event_id, &payload.name) {
            Ok(spot) => {
                info!(
                    request = %rq.request_id(),
                    event = event_id,
                    spot = spot.id,
                    "reserved spot {:?}",
                    spot.name,
                );
                rq.respond_with_json(&spot);
            }
            Err(err @ ReservationError::AlreadyReserved) => {
                warn!(request = %rq.request_id(), event = event_id, "{err}: {:?}", payload.name);
                rq.respond_with_err(err.to_string());
            }
            Err(err @ ReservationError::NotFound) => {
                debug!(request = %rq.request_id(), event = event_id, "{err}: {:?}", payload.name);
                rq.respond_with_status(404, err.to_string());
            }
        }
    }
}

impl RequestHandler for Service {
    fn handle(&self, rq: Request) {
        debug!(request = %rq.request_id(), kind = ?rq.kind(), "handling {}", rq.url());

        match rq.kind() {
            RequestKind::ListEvents => {
                let events = self.store.list_events();
                rq.respond_with_json(&events);
            }
            RequestKind::GetEvent => self.get_event(rq),
            RequestKind::ListEventSpots => self.list_event_spots(rq),
            RequestKind::ReserveSpot => self.reserve(rq),
        }
    }

    fn shutdown(self) {
        // nothing to do
    }
}

/// Parse the event id of `rq`, answering with `400` if it is invalid
fn event_id(rq: Request) -> Option<(Request, i64)> {
    match rq.event_id() {
        Some(id) => Some((rq, id)),
        None => {
            rq.respond_with_err("Invalid event ID");
            None
        }
    }
}
