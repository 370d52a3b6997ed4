use std::io;

use serde::Serialize;
use uuid::Uuid;

/// Kind of the request
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum RequestKind {
    /// List every event in load order
    ListEvents,

    /// Retrieve a single event by the id in the path
    GetEvent,

    /// List the spots of the event whose id is in the path
    ///
    /// An event without spots is answered like an unknown event.
    ListEventSpots,

    /// Reserve the spot named in the JSON body for the event in the path
    ///
    /// The response carries the updated spot.
    ReserveSpot,
}

/// Request received by a transport
pub struct Request {
    kind: RequestKind,
    id: Uuid,
    event_id: Option<String>,
    raw: Box<dyn RawRequest + Send>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("event_id", &self.event_id)
            .field("raw", &format_args!(".."))
            .finish()
    }
}

/// Interface for handling requests
pub trait RequestHandler {
    /// Handle a single request
    ///
    /// This method may be called concurrently from different threads.
    fn handle(&self, request: Request);

    /// Shut the service down
    ///
    /// Returns once no further requests will be processed.
    fn shutdown(self);
}

/// A raw request, implemented by the transport
pub trait RawRequest {
    /// Get the URL
    fn url(&self) -> &str;

    /// Read the request body as bytes
    fn read_bytes(&mut self) -> io::Result<Vec<u8>>;

    /// Respond with `200 OK` and an encoded JSON document
    fn respond_with_json(self: Box<Self>, json: Vec<u8>, request_id: Uuid);
    /// Respond with an error status and a plain text message
    fn respond_with_err(self: Box<Self>, status: u16, err: String, request_id: Uuid);
}

impl Request {
    /// Get the request's kind
    #[inline]
    pub fn kind(&self) -> &RequestKind {
        &self.kind
    }

    /// Get the id used to correlate this request in logs and responses
    ///
    /// If the client did not send an `X-Request-Id` header, it is randomly
    /// generated.
    #[inline]
    pub fn request_id(&self) -> Uuid {
        self.id
    }

    /// Get the event id from the request path
    ///
    /// Returns [`None`] if the path segment is missing or not a decimal
    /// integer.
    pub fn event_id(&self) -> Option<i64> {
        self.event_id.as_deref()?.parse().ok()
    }

    /// Get the request URL
    #[inline]
    pub fn url(&self) -> &str {
        self.raw.url()
    }

    /// Read the payload as bytes
    ///
    /// This method has side effects and should be called only once per
    /// request.
    #[inline]
    pub fn read_bytes(&mut self) -> io::Result<Vec<u8>> {
        self.raw.read_bytes()
    }

    /// Respond with `value` encoded as JSON
    ///
    /// If encoding fails, the client receives `500` instead. This method
    /// blocks until the response has been sent.
    pub fn respond_with_json<T: Serialize + ?Sized>(self, value: &T) {
        match serde_json::to_vec(value) {
            Ok(json) => self.raw.respond_with_json(json, self.id),
            Err(err) => {
                tracing::error!(request = %self.id, "failed to encode response: {err}");
                self.respond_with_server_err("Failed to encode response");
            }
        }
    }

    /// Respond with `400 Bad Request`
    #[inline]
    pub fn respond_with_err(self, err: impl Into<String>) {
        self.raw.respond_with_err(400, err.into(), self.id);
    }

    /// Respond with `404 Not Found`
    #[inline]
    pub fn respond_with_not_found(self) {
        self.respond_with_status(404, "404 page not found");
    }

    /// Respond with `500 Internal Server Error`
    #[inline]
    pub fn respond_with_server_err(self, err: impl Into<String>) {
        self.respond_with_status(500, err);
    }

    /// Respond with an arbitrary error status
    #[inline]
    pub fn respond_with_status(self, status: u16, err: impl Into<String>) {
        self.raw.respond_with_err(status, err.into(), self.id);
    }

    /// Create a new request from a [`RawRequest`]
    ///
    /// `event_id` is the unparsed id segment of the path, if the route has
    /// one.
    #[inline]
    pub fn from_raw(
        kind: RequestKind,
        id: Uuid,
        event_id: Option<String>,
        raw: Box<dyn RawRequest + Send>,
    ) -> Self {
        Self {
            kind,
            id,
            event_id,
            raw,
        }
    }
}
