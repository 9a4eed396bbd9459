//! Dispatching requests through a fully wired router.

use alpinebits::prelude::*;
use alpinebits::router::capability::names;
use alpinebits::validation::rules::{v2022_10, ClosingSeason};
use std::sync::Arc;

const CLOSING_SEASONS: ContextKey<Vec<ClosingSeason>> = ContextKey::new("test.closing_seasons");
const STORED: ContextKey<usize> = ContextKey::new("test.stored");

fn store_step() -> impl Middleware {
    from_fn("store", |ctx, next| {
        Box::pin(async move {
            let count = ctx.get_or_err(&CLOSING_SEASONS)?.len();
            ctx.put(&STORED, count);
            next.run(ctx).await
        })
    })
}

fn router() -> Arc<Router> {
    Arc::new(
        Router::builder()
            .version(Version::V_2022_10)
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(Chain::single(HandshakingMiddleware::new()))
            .supports_action(Action::FREE_ROOMS_HOTEL_INV_COUNT_NOTIF)
            .with_capabilities([
                names::FREE_ROOMS_ACCEPT_ROOMS,
                names::FREE_ROOMS_ACCEPT_CLOSING_SEASONS,
            ])
            .using(
                Chain::builder()
                    .step(ValidationMiddleware::without_context(
                        CLOSING_SEASONS,
                        "OTA_HotelInvCountNotifRQ",
                        v2022_10::closing_seasons_overlap_validator(),
                    ))
                    .step(store_step())
                    .build(),
            )
            .version(Version::V_2024_10)
            .supports_action(Action::HANDSHAKING)
            .without_capabilities()
            .using(Chain::single(HandshakingMiddleware::new()))
            .build()
            .unwrap(),
    )
}

fn strict() -> DispatchConfig {
    DispatchConfig {
        capture_errors: false,
        ..DispatchConfig::default()
    }
}

#[tokio::test]
async fn handshake_through_dispatcher() {
    let dispatcher = Dispatcher::new(router()).with_config(strict());
    let echo_data = r#"{"versions":[{"version":"2022-10","actions":[{"action":"action_OTA_HotelInvCountNotif","supports":["OTA_HotelInvCountNotif_accept_rooms","OTA_HotelInvCountNotif_accept_deltas"]}]}]}"#;

    let mut ctx = Context::new();
    ctx.put(&HandshakingContextKey::PING_REQUEST, PingRequest::new(echo_data));
    dispatcher
        .dispatch("2022-10", "OTA_Ping:Handshaking", &mut ctx)
        .await
        .unwrap();

    let response = ctx.get_or_err(&HandshakingContextKey::PING_RESPONSE).unwrap();
    assert_eq!(response.echo_data, echo_data);

    let warning: serde_json::Value = serde_json::from_str(&response.warning).unwrap();
    assert_eq!(
        warning,
        serde_json::json!({
            "versions": [{
                "version": "2022-10",
                "actions": [{
                    "action": "action_OTA_HotelInvCountNotif",
                    "supports": ["OTA_HotelInvCountNotif_accept_rooms"]
                }]
            }]
        })
    );
}

#[tokio::test]
async fn dispatcher_seeds_request_keys() {
    let dispatcher = Dispatcher::new(router()).with_config(strict());

    let mut ctx = Context::new();
    ctx.put(&CLOSING_SEASONS, vec![ClosingSeason::new("2022-12-24", "2022-12-26")]);
    dispatcher
        .dispatch("2022-10", "OTA_HotelInvCountNotif:FreeRooms", &mut ctx)
        .await
        .unwrap();

    assert_eq!(
        ctx.get(&RequestContextKey::REQUEST_VERSION),
        Some(&Version::V_2022_10)
    );
    assert_eq!(
        ctx.get(&RequestContextKey::REQUEST_ACTION).map(String::as_str),
        Some("OTA_HotelInvCountNotif:FreeRooms")
    );
    assert!(ctx.contains(&RouterContextKey::ROUTER));
    assert_eq!(ctx.get(&STORED), Some(&1));
}

#[tokio::test]
async fn unknown_action_is_routing_error() {
    let dispatcher = Dispatcher::new(router()).with_config(strict());

    let mut ctx = Context::new();
    let err = dispatcher
        .dispatch("2024-10", "OTA_HotelInvCountNotif:FreeRooms", &mut ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, AlpineBitsError::NoRoute { .. }));
}

#[tokio::test]
async fn disabled_version_rejected_before_routing() {
    let config = DispatchConfig {
        enabled_versions: vec![Version::V_2024_10],
        ..strict()
    };
    let dispatcher = Dispatcher::new(router()).with_config(config);

    let mut ctx = Context::new();
    let err = dispatcher
        .dispatch("2022-10", "OTA_Ping:Handshaking", &mut ctx)
        .await
        .unwrap_err();
    assert!(matches!(err, AlpineBitsError::UnsupportedVersion { ref version } if version == "2022-10"));
    assert!(!ctx.contains(&RequestContextKey::REQUEST_VERSION));
}

#[tokio::test]
async fn captured_validation_error() {
    let dispatcher = Dispatcher::new(router());
    assert!(dispatcher.config().capture_errors);

    let mut ctx = Context::new();
    ctx.put(
        &CLOSING_SEASONS,
        vec![
            ClosingSeason::new("2022-11-01", "2022-11-30"),
            ClosingSeason::new("2022-11-15", "2022-12-15"),
        ],
    );
    dispatcher
        .dispatch("2022-10", "OTA_HotelInvCountNotif:FreeRooms", &mut ctx)
        .await
        .unwrap();

    let captured = ctx.get_or_err(&CAPTURED_ERROR).unwrap();
    assert_eq!(captured.category, ErrorCategory::Validation);
    assert_eq!(captured.status_code, 400);
    assert!(captured
        .message
        .contains("OTA_HotelInvCountNotifRQ->StatusApplicationControl[1]"));
    assert!(!ctx.contains(&STORED));
}

#[tokio::test]
async fn captured_routing_error() {
    let dispatcher = Dispatcher::new(router());

    let mut ctx = Context::new();
    dispatcher
        .dispatch("2024-10", "OTA_Read:GuestRequests", &mut ctx)
        .await
        .unwrap();

    let captured = ctx.get_or_err(&CAPTURED_ERROR).unwrap();
    assert_eq!(captured.category, ErrorCategory::Routing);
}

#[tokio::test]
async fn captured_internal_error_is_masked() {
    let dispatcher = Dispatcher::new(router());

    // Document never written: a wiring defect, not a client error.
    let mut ctx = Context::new();
    dispatcher
        .dispatch("2022-10", "OTA_HotelInvCountNotif:FreeRooms", &mut ctx)
        .await
        .unwrap();

    let captured = ctx.get_or_err(&CAPTURED_ERROR).unwrap();
    assert_eq!(captured.category, ErrorCategory::MissingPrerequisite);
    assert_eq!(captured.status_code, 500);
    assert_eq!(captured.message, "Internal error");
}

#[tokio::test]
async fn concurrent_dispatches_share_router() {
    let dispatcher = Arc::new(Dispatcher::new(router()).with_config(strict()));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                let mut ctx = Context::new();
                let seasons = (0..i % 4)
                    .map(|m| ClosingSeason::new(format!("2023-0{}-01", m + 1), format!("2023-0{}-10", m + 1)))
                    .collect::<Vec<_>>();
                let expected = seasons.len();
                ctx.put(&CLOSING_SEASONS, seasons);
                dispatcher
                    .dispatch("2022-10", "OTA_HotelInvCountNotif:FreeRooms", &mut ctx)
                    .await
                    .map(|()| (ctx.get(&STORED).copied(), expected))
            })
        })
        .collect();

    for handle in handles {
        let (stored, expected) = handle.await.unwrap().unwrap();
        assert_eq!(stored, Some(expected));
    }
}
