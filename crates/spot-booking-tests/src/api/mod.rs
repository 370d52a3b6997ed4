use std::fmt::Display;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use eyre::Result;
use flume::Sender;
use nanorand::Rng;
use serde::de::DeserializeOwned;
use spot_booking_core::{Event, RequestKind, Spot};
use thiserror::Error;
use tokio::sync::oneshot;
use uuid::Uuid;

pub mod mock;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Error {status}: {msg}")]
pub struct ApiError {
    pub status: u16,
    pub msg: String,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
struct Response {
    status: u16,
    body: Vec<u8>,
    request_id: Uuid,
}

impl Response {
    fn into_api_response<T: DeserializeOwned>(self) -> Result<ApiResponse<T>> {
        let result = if self.status == 200 {
            Ok(serde_json::from_slice(&self.body)?)
        } else {
            Err(ApiError {
                status: self.status,
                msg: String::from_utf8_lossy(&self.body).trim().to_owned(),
            })
        };
        Ok(ApiResponse {
            request_id: self.request_id,
            result,
        })
    }
}

struct RequestMsg {
    kind: RequestKind,
    event_id: Option<String>,
    payload: Option<Vec<u8>>,
    request_id: Uuid,
    response_channel: oneshot::Sender<Response>,
}

pub struct Api {
    /// One channel per handler thread
    channels: Arc<Vec<Sender<RequestMsg>>>,

    /// Index of the channel the next clone will use
    next_index: Arc<AtomicUsize>,

    my_channel: Sender<RequestMsg>,
}

impl Api {
    fn new(channels: Vec<Sender<RequestMsg>>) -> Self {
        let my_channel = channels[0].clone();
        Self {
            channels: Arc::new(channels),
            next_index: Arc::new(AtomicUsize::new(1)),
            my_channel,
        }
    }
}

/// Each clone sends its requests to the next handler thread
impl Clone for Api {
    fn clone(&self) -> Self {
        let my_index = self.next_index.fetch_add(1, Ordering::Relaxed) % self.channels.len();
        Self {
            channels: self.channels.clone(),
            next_index: self.next_index.clone(),
            my_channel: self.channels[my_index].clone(),
        }
    }
}

impl Api {
    async fn make_request(
        &self,
        kind: RequestKind,
        event_id: Option<String>,
        payload: Option<Vec<u8>>,
    ) -> Result<Response> {
        let (sender, receiver) = oneshot::channel();
        let mut bytes = [0u8; 16];
        nanorand::tls_rng().fill(&mut bytes);
        let msg = RequestMsg {
            kind,
            event_id,
            payload,
            request_id: uuid::Builder::from_random_bytes(bytes).into_uuid(),
            response_channel: sender,
        };
        self.my_channel.send_async(msg).await?;
        Ok(receiver.await?)
    }

    pub async fn list_events(&self) -> Result<ApiResponse<Vec<Event>>> {
        let response = self.make_request(RequestKind::ListEvents, None, None);
        response.await?.into_api_response()
    }

    /// `id` is sent verbatim, so it may also be something that is not a number
    pub async fn get_event(&self, id: impl Display) -> Result<ApiResponse<Event>> {
        let response = self.make_request(RequestKind::GetEvent, Some(id.to_string()), None);
        response.await?.into_api_response()
    }

    pub async fn list_event_spots(&self, id: impl Display) -> Result<ApiResponse<Vec<Spot>>> {
        let response = self.make_request(RequestKind::ListEventSpots, Some(id.to_string()), None);
        response.await?.into_api_response()
    }

    pub async fn reserve_spot(&self, id: impl Display, name: &str) -> Result<ApiResponse<Spot>> {
        let body = serde_json::to_vec(&serde_json::json!({ "name": name }))?;
        self.reserve_spot_raw(id, body).await
    }

    /// Send a reservation with an arbitrary body
    pub async fn reserve_spot_raw(
        &self,
        id: impl Display,
        body: impl Into<Vec<u8>>,
    ) -> Result<ApiResponse<Spot>> {
        let kind = RequestKind::ReserveSpot;
        let response = self.make_request(kind, Some(id.to_string()), Some(body.into()));
        response.await?.into_api_response()
    }
}

pub struct ApiResponse<T> {
    pub request_id: Uuid,
    pub result: ApiResult<T>,
}

impl<T> ApiResponse<T> {
    /// Status code the service answered with
    pub fn status(&self) -> u16 {
        match &self.result {
            Ok(_) => 200,
            Err(err) => err.status,
        }
    }
}
