//! Orders

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Paid and awaiting dispatch. Every order starts here.
    #[default]
    Processing,

    /// Handed to the courier.
    Dispatched,

    /// Received by the customer.
    Delivered,

    /// Sent back by the customer.
    Returned,
}

impl OrderStatus {
    /// Every status, in fulfilment order.
    pub const ALL: [Self; 4] = [
        Self::Processing,
        Self::Dispatched,
        Self::Delivered,
        Self::Returned,
    ];

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Dispatched => "dispatched",
            Self::Delivered => "delivered",
            Self::Returned => "returned",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unrecognised order status string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// A status change as recorded by storage.
///
/// Any status may move to any other; side effects depend only on the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub previous: OrderStatus,
    pub current: OrderStatus,
}

impl StatusTransition {
    #[must_use]
    pub const fn new(previous: OrderStatus, current: OrderStatus) -> Self {
        Self { previous, current }
    }

    /// Entering `delivered` from any other status deducts stock and sends the
    /// delivery email.
    #[must_use]
    pub const fn triggers_delivery(&self) -> bool {
        matches!(self.current, OrderStatus::Delivered)
            && !matches!(self.previous, OrderStatus::Delivered)
    }

    /// Entering `returned` from any other status appends a note to the order.
    #[must_use]
    pub const fn triggers_return_note(&self) -> bool {
        matches!(self.current, OrderStatus::Returned)
            && !matches!(self.previous, OrderStatus::Returned)
    }

    /// Whether the status did not change.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.previous == self.current
    }
}

/// Note appended to an order when it is marked returned.
#[must_use]
pub fn return_note(at: Timestamp) -> String {
    format!("Returned on {}", at.strftime("%Y-%m-%d"))
}

/// Append a line to an order's notes.
#[must_use]
pub fn append_note(existing: Option<&str>, note: &str) -> String {
    match existing.map(str::trim_end).filter(|notes| !notes.is_empty()) {
        Some(notes) => format!("{notes}\n{note}"),
        None => note.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn statuses_round_trip_through_strings() -> TestResult {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>()?, status);
        }

        assert!("shipped".parse::<OrderStatus>().is_err());

        Ok(())
    }

    #[test]
    fn delivery_side_effects_only_fire_on_entry() {
        use OrderStatus::{Delivered, Dispatched, Processing, Returned};

        assert!(StatusTransition::new(Processing, Delivered).triggers_delivery());
        assert!(StatusTransition::new(Dispatched, Delivered).triggers_delivery());
        assert!(StatusTransition::new(Returned, Delivered).triggers_delivery());
        assert!(!StatusTransition::new(Delivered, Delivered).triggers_delivery());
        assert!(!StatusTransition::new(Processing, Dispatched).triggers_delivery());
    }

    #[test]
    fn return_note_only_fires_on_entry() {
        use OrderStatus::{Delivered, Returned};

        assert!(StatusTransition::new(Delivered, Returned).triggers_return_note());
        assert!(!StatusTransition::new(Returned, Returned).triggers_return_note());
        assert!(!StatusTransition::new(Returned, Delivered).triggers_return_note());
    }

    #[test]
    fn notes_are_appended_on_new_lines() -> TestResult {
        let at: Timestamp = "2025-03-04T10:00:00Z".parse()?;
        let note = return_note(at);

        assert_eq!(note, "Returned on 2025-03-04");
        assert_eq!(append_note(None, &note), note);
        assert_eq!(append_note(Some(""), &note), note);
        assert_eq!(
            append_note(Some("Leave at reception"), &note),
            "Leave at reception\nReturned on 2025-03-04"
        );

        Ok(())
    }

    #[test]
    fn serialises_as_snake_case() -> TestResult {
        assert_eq!(serde_json::to_string(&OrderStatus::Delivered)?, "\"delivered\"");

        Ok(())
    }
}
