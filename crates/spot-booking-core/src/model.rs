use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A bookable occasion
///
/// Events are created when the snapshot is loaded and never change afterwards.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    /// Identifier, unique within the snapshot
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    /// Display name
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Organizing party
    #[serde(deserialize_with = "null_as_default")]
    pub organization: String,
    /// Date of the event, kept as the snapshot spells it
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    /// Price as an opaque integer amount
    #[serde(deserialize_with = "null_as_default")]
    pub price: i64,
    /// Age or content rating
    #[serde(deserialize_with = "null_as_default")]
    pub rating: String,
    /// Link to a cover image
    #[serde(deserialize_with = "null_as_default")]
    pub image_url: String,
    /// Creation timestamp, kept as the snapshot spells it
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    /// Venue
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
}

/// Reservation state of a [`Spot`]
///
/// Any status string other than `available` or `reserved` is preserved as
/// [`SpotStatus::Other`] and is never reservable.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpotStatus {
    /// The spot can be reserved
    Available,
    /// The spot has been taken
    Reserved,
    /// Unrecognized status text from the snapshot
    Other(String),
}

impl SpotStatus {
    /// Whether a reservation may claim this spot
    #[inline]
    pub fn is_available(&self) -> bool {
        matches!(self, SpotStatus::Available)
    }

    /// The wire spelling of this status
    pub fn as_str(&self) -> &str {
        match self {
            SpotStatus::Available => "available",
            SpotStatus::Reserved => "reserved",
            SpotStatus::Other(s) => s,
        }
    }
}

/// A spot without a status is not reservable
impl Default for SpotStatus {
    fn default() -> Self {
        SpotStatus::Other(String::new())
    }
}

impl From<String> for SpotStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "available" => SpotStatus::Available,
            "reserved" => SpotStatus::Reserved,
            _ => SpotStatus::Other(s),
        }
    }
}

impl From<SpotStatus> for String {
    fn from(status: SpotStatus) -> Self {
        match status {
            SpotStatus::Other(s) => s,
            status => status.as_str().to_owned(),
        }
    }
}

impl fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reservable seat or slot of an event
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Spot {
    /// Identifier, unique within the snapshot
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    /// Name clients reserve the spot by
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Current reservation state, the only field that changes at runtime
    #[serde(deserialize_with = "null_as_default")]
    pub status: SpotStatus,
    /// Event this spot belongs to
    #[serde(deserialize_with = "null_as_default")]
    pub event_id: i64,
}

/// The full snapshot of events and spots
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    /// All events in load order
    #[serde(deserialize_with = "null_as_default")]
    pub events: Vec<Event>,
    /// All spots in load order
    #[serde(deserialize_with = "null_as_default")]
    pub spots: Vec<Spot>,
}

/// Body of a reservation request
///
/// Only `name` is used for matching, any other fields are ignored.
#[derive(Clone, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReservePayload {
    /// Name of the spot to reserve
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

impl ReservePayload {
    /// Parse a reservation body
    ///
    /// The body must start with a JSON object or `null`; anything after that
    /// first value is ignored. `null` yields an empty name.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        let mut values = serde_json::Deserializer::from_slice(body)
            .into_iter::<Option<serde_json::Map<String, serde_json::Value>>>();
        match values.next() {
            Some(object) => match object? {
                Some(object) => serde_json::from_value(serde_json::Value::Object(object)),
                None => Ok(Self::default()),
            },
            None => Err(serde::de::Error::custom("empty request body")),
        }
    }
}

/// Deserialize `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_round_trip() {
        let spot: Spot =
            serde_json::from_str(r#"{"id":3,"name":"B2","status":"broken","event_id":1}"#)
                .unwrap();
        assert_eq!(spot.status, SpotStatus::Other("broken".into()));
        assert!(!spot.status.is_available());

        let json = serde_json::to_value(&spot).unwrap();
        assert_eq!(json["status"], "broken");
        assert_eq!(json["event_id"], 1);

        let spot: Spot = serde_json::from_str(r#"{"id":4,"name":"B3","event_id":1}"#).unwrap();
        assert!(!spot.status.is_available());
    }

    #[test]
    fn event_uses_snake_case_fields() {
        let event: Event = serde_json::from_str(
            r#"{"id":7,"name":"Show","price":120,"image_url":"http://x/y.png","created_at":"2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(event.id, 7);
        assert_eq!(event.price, 120);
        assert_eq!(event.image_url, "http://x/y.png");
        assert_eq!(event.organization, "");
    }

    #[test]
    fn payload_ignores_other_fields() {
        let payload =
            ReservePayload::from_slice(br#"{"name":"A1","event_id":99,"status":"x"}"#).unwrap();
        assert_eq!(payload.name, "A1");
        assert!(ReservePayload::from_slice(b"not json").is_err());
        assert!(ReservePayload::from_slice(br#"{"name":5}"#).is_err());
        assert!(ReservePayload::from_slice(br#"["A1"]"#).is_err());
        assert!(ReservePayload::from_slice(b"").is_err());
    }

    #[test]
    fn null_payload_means_no_name() {
        assert_eq!(
            ReservePayload::from_slice(b"null").unwrap(),
            ReservePayload::default()
        );
        assert_eq!(
            ReservePayload::from_slice(br#"{"name":null}"#).unwrap().name,
            ""
        );
    }

    #[test]
    fn payload_reads_only_the_first_value() {
        let payload = ReservePayload::from_slice(br#"{"name":"A1"} x"#).unwrap();
        assert_eq!(payload.name, "A1");
        let payload = ReservePayload::from_slice(b"{\"name\":\"A2\"}\n{\"name\":\"A3\"}").unwrap();
        assert_eq!(payload.name, "A2");
    }

    #[test]
    fn null_fields_load_as_defaults() {
        let data: Dataset = serde_json::from_str(
            r#"{
                "events": [{"id": 1, "name": null, "price": null, "location": null}],
                "spots": [{"id": 2, "name": "A1", "status": null, "event_id": 1}]
            }"#,
        )
        .unwrap();
        assert_eq!(data.events[0].name, "");
        assert_eq!(data.events[0].price, 0);
        assert_eq!(data.spots[0].status, SpotStatus::default());
        assert!(!data.spots[0].status.is_available());

        let empty: Dataset = serde_json::from_str(r#"{"events": null, "spots": null}"#).unwrap();
        assert!(empty.events.is_empty() && empty.spots.is_empty());
    }
}
