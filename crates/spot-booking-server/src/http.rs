//! 🏗 HTTP request implementation

use std::io;
use std::io::Read;

use spot_booking_core::RequestKind;
use tiny_http::{Header, Method, Response};
use tracing::error;
use uuid::Uuid;

const ROUTES: &str = "🦀 could not find the service you are looking for!

Valid requests are:
  GET  /events
  GET  /events/{id}
  GET  /events/{id}/spots
  POST /event/{id}/reserve";

struct HTTPRequest(tiny_http::Request);

impl spot_booking_core::RawRequest for HTTPRequest {
    fn url(&self) -> &str {
        self.0.url()
    }

    fn read_bytes(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.0.body_length().unwrap_or(0));
        self.0.as_reader().read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn respond_with_json(self: Box<Self>, json: Vec<u8>, request_id: Uuid) {
        let mut res = Response::from_data(json).with_status_code(200);
        res.add_header(Header::from_bytes(b"Content-Type", b"application/json").unwrap());
        self.respond(res, request_id)
    }

    fn respond_with_err(self: Box<Self>, status: u16, err: String, request_id: Uuid) {
        let mut res = Response::from_string(err + "\n").with_status_code(status);
        res.add_header(
            Header::from_bytes(b"Content-Type", b"text/plain; charset=utf-8").unwrap(),
        );
        self.respond(res, request_id)
    }
}

impl HTTPRequest {
    /// Add HTTP headers (CORS, X-Request-Id) to `res` and send it
    fn respond<R: Read>(self, mut res: Response<R>, request_id: Uuid) {
        add_response_cors_headers(&mut res);

        let id = request_id.hyphenated().to_string();
        if let Ok(hdr) = Header::from_bytes(b"X-Request-Id", id) {
            res.add_header(hdr);
        }

        if let Err(err) = self.0.respond(res) {
            error!(request = %request_id, "HTTP response failed: {err}");
        }
    }
}

/// Outcome of matching a method and path against the known routes
#[derive(Clone, PartialEq, Eq, Debug)]
enum Route {
    /// A request for the service, with the raw id segment if the route has one
    Service(RequestKind, Option<String>),
    /// CORS preflight
    Preflight,
    /// Known prefix, but the rest of the path has the wrong shape
    Invalid,
    MethodNotAllowed,
    NotFound,
}

/// Match `method` and `url` against the known routes
///
/// The query string does not take part in routing.
fn route(method: &Method, url: &str) -> Route {
    let path = url.split(['?', '#']).next().unwrap_or_default();

    if *method == Method::Options {
        return Route::Preflight;
    }

    let (expected, kind, id) = if path == "/events" {
        (Method::Get, RequestKind::ListEvents, None)
    } else if let Some(rest) = path.strip_prefix("/events/") {
        let parts: Vec<&str> = rest.split('/').collect();
        match parts[..] {
            [id] => (Method::Get, RequestKind::GetEvent, Some(id)),
            [id, "spots"] => (Method::Get, RequestKind::ListEventSpots, Some(id)),
            _ => return Route::Invalid,
        }
    } else if let Some(rest) = path.strip_prefix("/event/") {
        let parts: Vec<&str> = rest.split('/').collect();
        match parts[..] {
            [id, "reserve", ..] => (Method::Post, RequestKind::ReserveSpot, Some(id)),
            _ => return Route::Invalid,
        }
    } else {
        return Route::NotFound;
    };

    if *method == expected {
        Route::Service(kind, id.map(str::to_owned))
    } else {
        Route::MethodNotAllowed
    }
}

/// Parse the given HTTP request
///
/// If [`None`] is returned, the request was already answered with a
/// corresponding error message.
pub fn parse(rq: tiny_http::Request) -> Option<spot_booking_core::Request> {
    let request_id = rq
        .headers()
        .iter()
        .find(|hdr| hdr.field.equiv("x-request-id"))
        .and_then(|hdr| Uuid::parse_str(hdr.value.as_str()).ok())
        .unwrap_or_else(Uuid::new_v4);

    let (kind, id) = match route(rq.method(), rq.url()) {
        Route::Service(kind, id) => (kind, id),
        Route::Preflight => {
            HTTPRequest(rq).respond(Response::empty(204), request_id);
            return None;
        }
        Route::Invalid => {
            let res = Response::from_string("Invalid request\n").with_status_code(400);
            HTTPRequest(rq).respond(res, request_id);
            return None;
        }
        Route::MethodNotAllowed => {
            HTTPRequest(rq).respond(Response::empty(405), request_id);
            return None;
        }
        Route::NotFound => {
            let res = Response::from_string(ROUTES).with_status_code(404);
            HTTPRequest(rq).respond(res, request_id);
            return None;
        }
    };

    Some(spot_booking_core::Request::from_raw(
        kind,
        request_id,
        id,
        Box::new(HTTPRequest(rq)),
    ))
}

/// Add CORS headers to `res`
fn add_response_cors_headers<R: Read>(res: &mut Response<R>) {
    res.add_header(Header::from_bytes(b"Access-Control-Request-Method", b"*").unwrap());
    res.add_header(Header::from_bytes(b"Access-Control-Allow-Origin", b"*").unwrap());
    res.add_header(Header::from_bytes(b"Access-Control-Allow-Headers", b"*").unwrap());
    res.add_header(Header::from_bytes(b"Access-Control-Expose-Headers", b"*").unwrap());
}
