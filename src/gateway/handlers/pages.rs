//! Booking flow pages
//!
//! Thin wrappers: read the step query, call the services directly and
//! render with [`crate::booking::pages`].

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use super::super::state::AppState;
use crate::booking::pages;
use crate::booking::{BookingQuery, BookingStep};
use crate::orders::CreateOrder;

pub async fn root() -> Redirect {
    Redirect::to(BookingStep::Book.path())
}

pub async fn book(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookingQuery>,
) -> Html<String> {
    let date = query.date.as_deref().filter(|d| !d.is_empty());
    let Some(date) = date else {
        return Html(pages::book_page(None, &[], None));
    };

    match state.availability.for_date(Some(date)).await {
        Ok(zones) => Html(pages::book_page(Some(date), &zones, None)),
        Err(e) => Html(pages::book_page(Some(date), &[], Some(&e.to_string()))),
    }
}

pub async fn schedule(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookingQuery>,
) -> Html<String> {
    Html(pages::schedule_page(
        query.selection(),
        &state.booking.calendar_url,
    ))
}

pub async fn review(Query(query): Query<BookingQuery>) -> Html<String> {
    Html(pages::review_page(query.selection(), None))
}

/// Confirm on the review page: create the order, then show the total and
/// the checkout link.
pub async fn review_submit(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookingQuery>,
) -> Response {
    let Some(selection) = query.selection() else {
        return (
            StatusCode::BAD_REQUEST,
            Html(pages::review_page(None, None)),
        )
            .into_response();
    };

    let cmd = CreateOrder {
        zone_id: selection.zone_id,
        pickup_date: selection.date,
        is_express: selection.express,
        notes: None,
        user_id: None,
    };

    match state.orders.create_order(cmd).await {
        Ok(created) => Html(pages::order_placed_page(
            &created,
            state.booking.checkout_url.as_deref(),
        ))
        .into_response(),
        Err(e) => {
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (
                status,
                Html(pages::review_page(Some(selection), Some(&e.to_string()))),
            )
                .into_response()
        }
    }
}

pub async fn success() -> Html<String> {
    Html(pages::success_page())
}

pub async fn cancel() -> Html<String> {
    Html(pages::cancel_page())
}
