//! REST backend tests against an in-process stub API
//!
//! ```bash
//! cargo test -p roomfinder-backend --test rest_test
//! ```

mod common;

use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{Value, json};

use common::{Hits, serve};
use roomfinder_backend::{
    BackendError, CreateBookingRequest, MarketplaceBackend, MobileMoneyProvider, PaymentStatus,
    PropertySearchParams, RestBackend,
};

fn property_json(id: &str, city: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Appartement {id}"),
        "propertyType": "apartment",
        "city": city,
        "pricePerNight": 25000,
        "maxGuests": 4,
        "images": [],
        "amenities": ["wifi"]
    })
}

fn booking_request() -> CreateBookingRequest {
    CreateBookingRequest {
        property_id: "p1".into(),
        check_in: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        check_out: NaiveDate::from_ymd_opt(2025, 8, 3).unwrap(),
        guests: 2,
        special_requests: None,
        payment_method: MobileMoneyProvider::Mtn,
        phone: "237670000000".into(),
    }
}

// ============ Envelopes ============

#[tokio::test]
async fn test_rest_search_properties_paginated() {
    let app = Router::new().route(
        "/api/properties",
        get(|Query(q): Query<HashMap<String, String>>| async move {
            assert_eq!(q.get("city").map(String::as_str), Some("Douala"));
            assert_eq!(q.get("page").map(String::as_str), Some("2"));
            assert_eq!(q.get("limit").map(String::as_str), Some("2"));
            Json(json!({
                "success": true,
                "data": [property_json("p3", "Douala"), property_json("p4", "Douala")],
                "pagination": {"page": 2, "limit": 2, "total": 5}
            }))
        }),
    );
    let base = serve(app).await;
    let backend = RestBackend::new(format!("{base}/api")).unwrap();

    let params = PropertySearchParams {
        page: 2,
        page_size: 2,
        city: Some("Douala".into()),
        ..Default::default()
    };
    let page = backend.search_properties(&params).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, "p3");
    assert_eq!(page.total_count, 5);
    assert!(page.has_more);
}

#[tokio::test]
async fn test_rest_success_false_is_rejected() {
    let app = Router::new().route(
        "/api/properties/{id}",
        get(|| async {
            Json(json!({"success": false, "message": "Listing suspended"}))
        }),
    );
    let base = serve(app).await;
    let backend = RestBackend::new(format!("{base}/api")).unwrap();

    let err = backend.get_property("p9").await.unwrap_err();
    assert!(
        matches!(&err, BackendError::Rejected { message, .. } if message == "Listing suspended"),
        "{err:?}"
    );
}

#[tokio::test]
async fn test_rest_not_found_carries_resource() {
    let app = Router::new().route(
        "/api/bookings/{id}",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({"success": false, "message": "Booking not found"})),
            )
        }),
    );
    let base = serve(app).await;
    let backend = RestBackend::new(format!("{base}/api")).unwrap();

    let err = backend.get_booking("bk_404").await.unwrap_err();
    assert_eq!(err.to_string(), "[rest] booking 'bk_404' not found");
}

#[tokio::test]
async fn test_rest_validation_error_names_field() {
    let app = Router::new().route(
        "/api/bookings",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "success": false,
                    "message": "Validation failed",
                    "errors": [{"field": "phone", "message": "Invalid phone number"}]
                })),
            )
        }),
    );
    let base = serve(app).await;
    let backend = RestBackend::new(format!("{base}/api")).unwrap();

    let err = backend.create_booking(&booking_request()).await.unwrap_err();
    assert!(
        matches!(&err, BackendError::InvalidParameter { param, .. } if param == "phone"),
        "{err:?}"
    );
}

// ============ Auth ============

#[tokio::test]
async fn test_rest_bearer_token_sent() {
    let app = Router::new().route(
        "/api/auth/me",
        get(|headers: HeaderMap| async move {
            match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                Some("Bearer tok_123") => (
                    StatusCode::OK,
                    Json(json!({
                        "success": true,
                        "data": {"id": "u1", "fullName": "Ngono Marie", "email": "marie@example.cm", "role": "host"}
                    })),
                ),
                _ => (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"success": false, "message": "Not authorized, no token"})),
                ),
            }
        }),
    );
    let base = serve(app).await;
    let backend = RestBackend::new(format!("{base}/api")).unwrap();

    let err = backend.current_user().await.unwrap_err();
    assert!(matches!(err, BackendError::Unauthorized { .. }), "{err:?}");

    backend.set_auth_token(Some("tok_123".into()));
    let user = backend.current_user().await.unwrap();
    assert_eq!(user.full_name, "Ngono Marie");

    backend.set_auth_token(None);
    assert!(backend.current_user().await.is_err());
}

// ============ Transient failures ============

#[tokio::test]
async fn test_rest_gateway_error_fails_after_one_request() {
    let hits = Hits::default();
    let handler_hits = hits.clone();
    let app = Router::new().route(
        "/api/bookings/{id}/verify-payment",
        get(move |Path(id): Path<String>| {
            let hits = handler_hits.clone();
            async move {
                if hits.hit() == 1 {
                    (StatusCode::SERVICE_UNAVAILABLE, Json(json!({})))
                } else {
                    (
                        StatusCode::OK,
                        Json(json!({"success": true, "data": {"bookingId": id, "paymentStatus": "SUCCESSFUL"}})),
                    )
                }
            }
        }),
    );
    let base = serve(app).await;
    let backend = RestBackend::builder(format!("{base}/api"))
        .auth_token("tok_123")
        .build()
        .unwrap();

    let err = backend.verify_payment("bk_1").await.unwrap_err();
    assert!(matches!(err, BackendError::NetworkError { .. }), "{err:?}");
    assert_eq!(hits.count(), 1);

    // a second call is the caller's decision, and goes out as one request
    let verification = backend.verify_payment("bk_1").await.unwrap();
    assert_eq!(verification.payment_status, PaymentStatus::Successful);
    assert_eq!(hits.count(), 2);
}

#[tokio::test]
async fn test_rest_search_rate_limited_not_resent() {
    let hits = Hits::default();
    let handler_hits = hits.clone();
    let app = Router::new().route(
        "/api/properties",
        get(move || {
            let hits = handler_hits.clone();
            async move {
                hits.hit();
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    [("retry-after", "1")],
                    Json(json!({"success": false, "message": "Too many requests"})),
                )
            }
        }),
    );
    let base = serve(app).await;
    let backend = RestBackend::new(format!("{base}/api")).unwrap();

    let err = backend
        .search_properties(&PropertySearchParams::default())
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            BackendError::RateLimited {
                retry_after: Some(1),
                ..
            }
        ),
        "{err:?}"
    );
    assert_eq!(hits.count(), 1);
}

#[tokio::test]
async fn test_rest_booking_creation_sent_once() {
    let hits = Hits::default();
    let handler_hits = hits.clone();
    let app = Router::new().route(
        "/api/bookings",
        post(move || {
            let hits = handler_hits.clone();
            async move {
                hits.hit();
                (StatusCode::BAD_GATEWAY, Json(json!({})))
            }
        }),
    );
    let base = serve(app).await;
    let backend = RestBackend::new(format!("{base}/api")).unwrap();

    let err = backend.create_booking(&booking_request()).await.unwrap_err();
    assert!(matches!(err, BackendError::NetworkError { .. }), "{err:?}");
    assert_eq!(hits.count(), 1);
}

#[tokio::test]
async fn test_rest_create_booking_body() {
    let app = Router::new().route(
        "/api/bookings",
        post(|Json(body): Json<Value>| async move {
            assert_eq!(body["propertyId"], "p1");
            assert_eq!(body["checkIn"], "2025-08-01");
            assert_eq!(body["paymentMethod"], "MTN");
            assert_eq!(body["phone"], "237670000000");
            (
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "message": "Booking created, confirm the payment on your phone",
                    "data": {
                        "_id": "bk_77", "propertyId": "p1",
                        "checkIn": "2025-08-01", "checkOut": "2025-08-03",
                        "guests": 2, "status": "PENDING", "paymentStatus": "PENDING",
                        "totalAmount": 52500, "serviceFee": 2500
                    }
                })),
            )
        }),
    );
    let base = serve(app).await;
    let backend = RestBackend::new(format!("{base}/api")).unwrap();

    let booking = backend.create_booking(&booking_request()).await.unwrap();
    assert_eq!(booking.id, "bk_77");
    assert_eq!(booking.payment_status, PaymentStatus::Pending);
    assert_eq!(booking.service_fee, Some(2500.0));
}

// ============ Capabilities ============

#[tokio::test]
async fn test_rest_favorites_unsupported() {
    let backend = RestBackend::new("http://127.0.0.1:9/api").unwrap();
    let err = backend.list_favorites("u1").await.unwrap_err();
    assert!(matches!(err, BackendError::Unsupported { .. }), "{err:?}");
}
