//! Email templates.

use std::fmt::Write as _;

use attar::{address::parse_delivery_address, money::format_amount};

use crate::notifications::models::{Notification, NotificationKind};

/// A rendered email ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

/// Render the subject and HTML body for a notification.
#[must_use]
pub fn render(notification: &Notification) -> RenderedEmail {
    let short_order = notification
        .order
        .to_string()
        .chars()
        .take(8)
        .collect::<String>();

    let (subject, heading, intro) = match notification.kind {
        NotificationKind::Confirmation => (
            format!("Order confirmed #{short_order}"),
            "Thank you for your order",
            "We have received your payment and are preparing your order.",
        ),
        NotificationKind::Delivery => (
            format!("Order delivered #{short_order}"),
            "Your order has been delivered",
            "We hope you enjoy your fragrance.",
        ),
    };

    let greeting = notification
        .recipient_name
        .as_deref()
        .map_or_else(|| "Hello,".to_string(), |name| format!("Hello {},", escape(name)));

    let mut rows = String::new();

    for line in &notification.lines {
        // Infallible: writing into a String.
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&line.name),
            line.quantity,
            format_amount(line.line_total()),
        );
    }

    let address = parse_delivery_address(&notification.delivery_address).address;

    let html = format!(
        "<html><body>\
         <h1>{heading}</h1>\
         <p>{greeting}</p>\
         <p>{intro}</p>\
         <p>Order number: {order}</p>\
         <table>\
         <thead><tr><th>Item</th><th>Qty</th><th>Price</th></tr></thead>\
         <tbody>{rows}</tbody>\
         </table>\
         <p><strong>Total: {total}</strong></p>\
         <p>Delivery address: {address}</p>\
         </body></html>",
        order = notification.order,
        total = format_amount(notification.total),
        address = escape(&address),
    );

    RenderedEmail { subject, html }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }

    escaped
}
