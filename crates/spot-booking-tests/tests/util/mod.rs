use spot_booking_core::{Dataset, Event, Spot, SpotStatus};

/// One event with an available spot `A1` and a reserved spot `A2`
#[allow(unused)]
pub const SCENARIO: &str = r#"{
    "events": [
        {
            "id": 1,
            "name": "Rust Conf",
            "organization": "Crabs United",
            "date": "2025-09-10T09:00:00",
            "price": 150,
            "rating": "L",
            "image_url": "http://example.com/rustconf.png",
            "created_at": "2025-01-01T00:00:00",
            "location": "Main Hall"
        },
        {
            "id": 2,
            "name": "Empty Room",
            "organization": "Nobody",
            "date": "2025-10-01T20:00:00",
            "price": 0,
            "rating": "L",
            "image_url": "",
            "created_at": "2025-01-02T00:00:00",
            "location": "Basement"
        }
    ],
    "spots": [
        { "id": 10, "name": "A1", "status": "available", "event_id": 1 },
        { "id": 11, "name": "A2", "status": "reserved", "event_id": 1 }
    ]
}"#;

/// `events` events with `spots` available spots each, named `S0`, `S1`, ...
#[allow(unused)]
pub fn venue(events: i64, spots: i64) -> Dataset {
    let events: Vec<Event> = (1..=events)
        .map(|id| Event {
            id,
            name: format!("Event {id}"),
            price: 10 * id,
            ..Default::default()
        })
        .collect();
    let spots = events
        .iter()
        .flat_map(|event| {
            (0..spots).map(move |i| Spot {
                id: event.id * 1_000 + i,
                name: format!("S{i}"),
                status: SpotStatus::Available,
                event_id: event.id,
            })
        })
        .collect();
    Dataset { events, spots }
}
