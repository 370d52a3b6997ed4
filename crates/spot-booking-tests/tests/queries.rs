use std::collections::HashSet;

use eyre::Result;
use spot_booking_core::SpotStatus;
use spot_booking_tests::TestCtxBuilder;
use util::SCENARIO;

mod util;

#[tokio::test]
#[ntest::timeout(10_000)]
async fn test_list_events_in_load_order() -> Result<()> {
    let ctx = TestCtxBuilder::new().with_snapshot(SCENARIO)?.build().await?;

    let events = ctx.api.list_events().await?.result?;
    let ids: Vec<i64> = events.iter().map(|event| event.id).collect();
    assert_eq!(ids, [1, 2]);
    assert_eq!(events[0].organization, "Crabs United");
    assert_eq!(events[0].image_url, "http://example.com/rustconf.png");
    assert_eq!(events[0].price, 150);

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn test_list_events_empty_dataset() -> Result<()> {
    let ctx = TestCtxBuilder::new().build().await?;

    let events = ctx.api.list_events().await?.result?;
    assert!(events.is_empty(), "An empty dataset lists no events.");

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn test_get_event() -> Result<()> {
    let ctx = TestCtxBuilder::new().with_snapshot(SCENARIO)?.build().await?;

    let event = ctx.api.get_event(2).await?.result?;
    assert_eq!(event.name, "Empty Room");
    assert_eq!(event.location, "Basement");

    let missing = ctx.api.get_event(99).await?;
    assert_eq!(missing.status(), 404, "An unknown event must not be found.");

    for id in ["abc", "", "1.5"] {
        let invalid = ctx.api.get_event(id).await?;
        assert_eq!(invalid.status(), 400, "Event id {id:?} must be rejected.");
        assert_eq!(invalid.result.unwrap_err().msg, "Invalid event ID");
    }

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn test_list_event_spots() -> Result<()> {
    let ctx = TestCtxBuilder::new().with_snapshot(SCENARIO)?.build().await?;

    let spots = ctx.api.list_event_spots(1).await?.result?;
    let names: Vec<&str> = spots.iter().map(|spot| spot.name.as_str()).collect();
    assert_eq!(names, ["A1", "A2"]);
    assert_eq!(spots[0].status, SpotStatus::Available);
    assert_eq!(spots[1].status, SpotStatus::Reserved);

    // An existing event without spots looks exactly like an unknown one
    assert_eq!(ctx.api.list_event_spots(2).await?.status(), 404);
    assert_eq!(ctx.api.list_event_spots(99).await?.status(), 404);

    let invalid = ctx.api.list_event_spots("x").await?;
    assert_eq!(invalid.status(), 400);

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn test_spots_without_event_are_listed() -> Result<()> {
    let ctx = TestCtxBuilder::new()
        .with_snapshot(
            r#"{"events": [], "spots": [{"id": 1, "name": "X", "status": "available", "event_id": 7}]}"#,
        )?
        .build()
        .await?;

    assert_eq!(ctx.api.get_event(7).await?.status(), 404);
    let spots = ctx.api.list_event_spots(7).await?.result?;
    assert_eq!(spots.len(), 1);

    ctx.finish().await;
    Ok(())
}

#[tokio::test]
#[ntest::timeout(10_000)]
async fn test_every_response_carries_its_own_request_id() -> Result<()> {
    let ctx = TestCtxBuilder::new()
        .with_snapshot(SCENARIO)?
        .with_worker_threads(3)
        .build()
        .await?;

    let mut ids = HashSet::new();
    for _ in 0..4 {
        ids.insert(ctx.api.list_events().await?.request_id);
    }
    ids.insert(ctx.api.get_event(1).await?.request_id);
    ids.insert(ctx.api.get_event("x").await?.request_id);
    ids.insert(ctx.api.list_event_spots(42).await?.request_id);
    ids.insert(ctx.api.reserve_spot(1, "nope").await?.request_id);

    assert_eq!(ids.len(), 8, "Request ids must not repeat.");
    assert!(!ids.contains(&uuid::Uuid::nil()));

    ctx.finish().await;
    Ok(())
}
