//! Mock API implementation directly using the `spot-booking-store` crate

use std::sync::Arc;

use spot_booking_core::{RawRequest, Request, RequestHandler, RequestKind};
use spot_booking_store::Service;
use tokio::sync::oneshot;
use tokio::task::{self, JoinHandle};
use uuid::Uuid;

use super::{Api, RequestMsg, Response};

pub struct MockService {
    service: Arc<Service>,
    join_handles: Vec<JoinHandle<()>>,
}

struct MockRawRequest {
    url: String,
    payload: Option<Vec<u8>>,
    response_channel: oneshot::Sender<Response>,
}

pub async fn start(threads: u16, service: Service) -> (MockService, Api) {
    let service = Arc::new(service);

    let it = (0..threads).map(|_| {
        let (sender, receiver) = flume::bounded::<RequestMsg>(65536);
        let service = service.clone();
        let handle = task::spawn_blocking(move || {
            let service = &*service;
            for msg in receiver.into_iter() {
                let raw = Box::new(MockRawRequest {
                    url: url(msg.kind, msg.event_id.as_deref()),
                    payload: msg.payload,
                    response_channel: msg.response_channel,
                });
                service.handle(Request::from_raw(
                    msg.kind,
                    msg.request_id,
                    msg.event_id,
                    raw,
                ))
            }
        });
        (sender, handle)
    });
    let (senders, join_handles) = it.unzip();

    let mock_service = MockService {
        service,
        join_handles,
    };
    (mock_service, Api::new(senders))
}

impl MockService {
    pub async fn shutdown(self) {
        for handle in self.join_handles {
            handle.await.unwrap()
        }
        task::spawn_blocking(move || Arc::into_inner(self.service).unwrap().shutdown())
            .await
            .unwrap();
    }
}

fn url(kind: RequestKind, id: Option<&str>) -> String {
    let id = id.unwrap_or_default();
    match kind {
        RequestKind::ListEvents => "/events".to_owned(),
        RequestKind::GetEvent => format!("/events/{id}"),
        RequestKind::ListEventSpots => format!("/events/{id}/spots"),
        RequestKind::ReserveSpot => format!("/event/{id}/reserve"),
    }
}

impl MockRawRequest {
    fn respond(self, status: u16, body: Vec<u8>, request_id: Uuid) {
        let response = Response {
            status,
            body,
            request_id,
        };
        if self.response_channel.send(response).is_err() {
            tracing::debug!(request = %request_id, "{} answered after the caller left", self.url);
        }
    }
}

impl RawRequest for MockRawRequest {
    fn url(&self) -> &str {
        &self.url
    }

    fn read_bytes(&mut self) -> std::io::Result<Vec<u8>> {
        Ok(self.payload.take().unwrap_or_default())
    }

    fn respond_with_json(self: Box<Self>, json: Vec<u8>, request_id: Uuid) {
        self.respond(200, json, request_id)
    }

    fn respond_with_err(self: Box<Self>, status: u16, err: String, request_id: Uuid) {
        self.respond(status, err.into_bytes(), request_id)
    }
}
