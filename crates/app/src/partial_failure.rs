//! Partial failures
//!
//! Side effects that run after the primary write has committed. A failure in
//! one of them is logged and reported here instead of undoing that write.

use std::fmt;

use serde::Serialize;
use tracing::warn;

/// The follow-up step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStep {
    ClearCart,
    CompletePendingCheckout,
    ConfirmationEmail,
    MarkEmailSent,
    InventoryDecrement,
    DeliveryEmail,
    MarkDeliveryEmailSent,
    ReturnNote,
}

impl FailureStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ClearCart => "clear_cart",
            Self::CompletePendingCheckout => "complete_pending_checkout",
            Self::ConfirmationEmail => "confirmation_email",
            Self::MarkEmailSent => "mark_email_sent",
            Self::InventoryDecrement => "inventory_decrement",
            Self::DeliveryEmail => "delivery_email",
            Self::MarkDeliveryEmailSent => "mark_delivery_email_sent",
            Self::ReturnNote => "return_note",
        }
    }
}

impl fmt::Display for FailureStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialFailure {
    pub step: FailureStep,
    pub message: String,
}

impl PartialFailure {
    /// Build a warning from a failed step and log it.
    pub fn record(step: FailureStep, error: &dyn std::error::Error) -> Self {
        let message = error.to_string();

        warn!(step = %step, error = %message, "follow-up step failed");

        Self { step, message }
    }

    /// Build a warning from a plain message and log it.
    pub fn note(step: FailureStep, message: impl Into<String>) -> Self {
        let message = message.into();

        warn!(step = %step, error = %message, "follow-up step skipped");

        Self { step, message }
    }
}
