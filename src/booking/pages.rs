//! Server-rendered booking pages. Plain HTML, no scripts.

use std::fmt::Write;

use super::flow::{BookingSelection, BookingStep};
use crate::availability::ZoneAvailability;
use crate::orders::CreatedOrder;
use crate::pricing::{BASE_PRICE, OVERFLOW_SURCHARGE};

pub const INVALID_BOOKING: &str = "Invalid booking data. Please start over.";

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `1300` -> `$13.00`
pub fn format_cents(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{} - Laundry Loop</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape(title),
        body
    )
}

/// Step 1: date picker, then zones for the chosen date.
pub fn book_page(date: Option<&str>, zones: &[ZoneAvailability], error: Option<&str>) -> String {
    let date_value = date.map(escape).unwrap_or_default();
    let mut body = String::new();
    body.push_str("<h1>Book Laundry Pickup</h1>\n");
    let _ = write!(
        body,
        "<form method=\"get\" action=\"{}\">\n<label>Select pickup date: \
         <input type=\"date\" name=\"date\" value=\"{}\"></label>\n\
         <button type=\"submit\">Show zones</button>\n</form>\n",
        BookingStep::Book.path(),
        date_value
    );

    if let Some(error) = error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", escape(error));
    }

    if date.is_some() && error.is_none() {
        body.push_str("<h2>Available Zones</h2>\n");
        if zones.is_empty() {
            body.push_str("<p>No zones available for this date.</p>\n");
        } else {
            let _ = write!(
                body,
                "<form method=\"get\" action=\"{}\">\n\
                 <input type=\"hidden\" name=\"date\" value=\"{}\">\n<ul>\n",
                BookingStep::Schedule.path(),
                date_value
            );
            for zone in zones {
                let load = if zone.is_available {
                    format!("{} spots left", zone.available_slots)
                } else {
                    "Full (overflow)".to_string()
                };
                let mut price = format!("Base: {}", format_cents(BASE_PRICE));
                if !zone.is_available {
                    let _ = write!(
                        price,
                        " (overflow {})",
                        format_cents(BASE_PRICE + OVERFLOW_SURCHARGE)
                    );
                }
                let _ = writeln!(
                    body,
                    "<li><label><input type=\"radio\" name=\"zoneId\" value=\"{}\" required> \
                     {} - {} <small>{}</small></label></li>",
                    zone.zone.id,
                    escape(&zone.zone.name),
                    load,
                    price
                );
            }
            body.push_str(
                "</ul>\n<label><input type=\"checkbox\" name=\"express\" value=\"1\"> \
                 Express pickup (extra fee)</label>\n\
                 <button type=\"submit\">Next: Schedule Time</button>\n</form>\n",
            );
        }
    }

    layout("Book", &body)
}

/// Step 2: external scheduler embed.
pub fn schedule_page(selection: Option<BookingSelection>, calendar_base: &str) -> String {
    let Some(selection) = selection else {
        return layout("Schedule", &format!("<p>{}</p>\n", INVALID_BOOKING));
    };

    let mut body = String::from("<h1>Schedule Your Pickup Time</h1>\n");
    match selection.calendar_url(calendar_base) {
        Some(url) => {
            let _ = writeln!(
                body,
                "<iframe src=\"{}\" style=\"width:100%;height:700px;border:none\" \
                 allow=\"camera; microphone; fullscreen\"></iframe>",
                escape(url.as_str())
            );
        }
        None => body.push_str("<p>Scheduler is not configured.</p>\n"),
    }
    let _ = writeln!(
        body,
        "<p><a href=\"{}\">Next: Review</a></p>",
        escape(&selection.step_url(BookingStep::Review))
    );
    layout("Schedule", &body)
}

/// Step 3: summary with a confirm button posting back to `/review`.
pub fn review_page(selection: Option<BookingSelection>, error: Option<&str>) -> String {
    let Some(selection) = selection else {
        return layout("Review", &format!("<p>{}</p>\n", INVALID_BOOKING));
    };

    let mut body = String::from("<h1>Review Your Order</h1>\n");
    let _ = write!(
        body,
        "<p>Zone: {}</p>\n<p>Date: {}</p>\n<p>Express: {}</p>\n",
        selection.zone_id,
        selection.date.format("%Y-%m-%d"),
        if selection.express { "Yes" } else { "No" }
    );
    if let Some(error) = error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", escape(error));
    }
    let _ = write!(
        body,
        "<form method=\"post\" action=\"{}\">\n\
         <button type=\"submit\">Confirm &amp; Pay</button>\n</form>\n",
        escape(&selection.step_url(BookingStep::Review))
    );
    layout("Review", &body)
}

/// Shown after the order is created, before payment.
pub fn order_placed_page(created: &CreatedOrder, checkout_url: Option<&str>) -> String {
    let mut body = String::from("<h1>Order Created</h1>\n");
    let _ = write!(
        body,
        "<p>Order: {}</p>\n<p>Total: {}</p>\n",
        created.order.id,
        format_cents(created.price_cents)
    );
    if created.overflow {
        body.push_str("<p>This zone is full for the day; an overflow surcharge applies.</p>\n");
    }
    if let Some(checkout) = checkout_url {
        let _ = writeln!(
            body,
            "<p><a href=\"{}\">Continue to payment</a></p>",
            escape(checkout)
        );
    }
    layout("Order Created", &body)
}

pub fn success_page() -> String {
    layout(
        "Thank you",
        "<h1>Thank you!</h1>\n<p>Your order was successful. We'll see you on pickup day.</p>\n",
    )
}

pub fn cancel_page() -> String {
    layout(
        "Order Cancelled",
        &format!(
            "<h1>Order Cancelled</h1>\n<p>Your payment was cancelled. You can try booking again.</p>\n\
             <p><a href=\"{}\">Book again</a></p>\n",
            BookingStep::Book.path()
        ),
    )
}
