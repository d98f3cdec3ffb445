//! Purchasers

use serde::{Deserialize, Serialize};

use crate::{
    address::{ContactDetails, parse_delivery_address},
    ids::UserUuid,
};

/// Who is paying for a checkout.
///
/// Resolved once when the payment session is created and carried unchanged
/// through verification and order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Purchaser {
    /// Anonymous shopper identified only by the contact details they entered.
    Guest {
        /// Contact name, if given.
        name: Option<String>,

        /// Contact email, if given.
        email: Option<String>,

        /// Contact phone, if given.
        phone: Option<String>,
    },

    /// Signed-in customer.
    Registered {
        /// Account identifier.
        user: UserUuid,

        /// Account email, when known at resolution time.
        #[serde(default)]
        email: Option<String>,

        /// Account display name, when known at resolution time.
        #[serde(default)]
        name: Option<String>,
    },
}

impl Purchaser {
    /// Build a guest purchaser from the contact segments of an encoded
    /// delivery address.
    #[must_use]
    pub fn guest_from_address(delivery_address: &str) -> Self {
        Self::from(parse_delivery_address(delivery_address).contact)
    }

    /// A registered purchaser with no known contact details.
    #[must_use]
    pub const fn registered(user: UserUuid) -> Self {
        Self::Registered {
            user,
            email: None,
            name: None,
        }
    }

    /// The registered user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<UserUuid> {
        match self {
            Self::Registered { user, .. } => Some(*user),
            Self::Guest { .. } => None,
        }
    }

    /// Whether this is a guest checkout.
    #[must_use]
    pub const fn is_guest(&self) -> bool {
        matches!(self, Self::Guest { .. })
    }

    /// Email to send order notifications to.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Guest { email, .. } | Self::Registered { email, .. } => email.as_deref(),
        }
    }

    /// Name to address notifications to.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Guest { name, .. } | Self::Registered { name, .. } => name.as_deref(),
        }
    }

    /// Contact phone, only ever captured for guests.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        match self {
            Self::Guest { phone, .. } => phone.as_deref(),
            Self::Registered { .. } => None,
        }
    }
}

impl From<ContactDetails> for Purchaser {
    fn from(contact: ContactDetails) -> Self {
        Self::Guest {
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn guest_contact_comes_from_address_segments() {
        let purchaser =
            Purchaser::guest_from_address("Building X, Dubai | Contact: Jane | Phone: +971501234567");

        assert!(purchaser.is_guest());
        assert_eq!(purchaser.name(), Some("Jane"));
        assert_eq!(purchaser.phone(), Some("+971501234567"));
        assert_eq!(purchaser.email(), None);
        assert_eq!(purchaser.user(), None);
    }

    #[test]
    fn registered_purchaser_exposes_user() {
        let user = UserUuid::new();
        let purchaser = Purchaser::registered(user);

        assert!(!purchaser.is_guest());
        assert_eq!(purchaser.user(), Some(user));
        assert_eq!(purchaser.phone(), None);
    }

    #[test]
    fn serialises_with_kind_tag() -> TestResult {
        let purchaser = Purchaser::Guest {
            name: Some("Jane".to_string()),
            email: None,
            phone: None,
        };

        let json = serde_json::to_value(&purchaser)?;

        assert_eq!(json["kind"], "guest");
        assert_eq!(serde_json::from_value::<Purchaser>(json)?, purchaser);

        Ok(())
    }
}
