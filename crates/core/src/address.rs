//! Delivery Addresses
//!
//! Checkout carries the delivery address as a single string: the structured
//! address fields joined by `", "`, followed by `|`-separated `Key: value`
//! segments for the contact details, e.g.
//!
//! ```text
//! Villa 12, Floor 2, Al Barsha, Dubai | Contact: Jane | Phone: +971501234567 | Email: jane@example.com
//! ```
//!
//! Parsing is lenient: unknown or missing segments are treated as "not
//! provided" and never fail.

use serde::{Deserialize, Serialize};

const SEGMENT_SEPARATOR: char = '|';
const FIELD_SEPARATOR: &str = ", ";

const CONTACT_KEY: &str = "Contact";
const PHONE_KEY: &str = "Phone";
const EMAIL_KEY: &str = "Email";
const ADDRESS_KEY: &str = "Address";

/// Structured address entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub building: String,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    pub area: String,
    #[serde(default)]
    pub landmark: Option<String>,
    pub emirate: String,
}

impl DeliveryAddress {
    /// Join the non-blank fields with `", "`. Fields cannot open a contact
    /// segment of their own.
    #[must_use]
    pub fn to_line(&self) -> String {
        [
            Some(self.building.as_str()),
            self.floor.as_deref(),
            self.room.as_deref(),
            Some(self.area.as_str()),
            self.landmark.as_deref(),
            Some(self.emirate.as_str()),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(sanitise)
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
    }
}

/// Contact details captured alongside a delivery address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ContactDetails {
    /// Whether no contact detail was provided at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.email.is_none()
    }
}

/// A delivery address string split back into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAddress {
    /// The address text without any contact segments.
    pub address: String,

    /// Contact details found in the segments.
    pub contact: ContactDetails,
}

/// Encode an address line and contact details into the checkout string form.
#[must_use]
pub fn encode_delivery_address(address_line: &str, contact: &ContactDetails) -> String {
    let mut encoded = address_line.trim().to_string();

    for (key, value) in [
        (CONTACT_KEY, contact.name.as_deref()),
        (PHONE_KEY, contact.phone.as_deref()),
        (EMAIL_KEY, contact.email.as_deref()),
    ] {
        let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
            continue;
        };

        if !encoded.is_empty() {
            encoded.push(' ');
            encoded.push(SEGMENT_SEPARATOR);
            encoded.push(' ');
        }

        encoded.push_str(key);
        encoded.push_str(": ");
        encoded.push_str(&sanitise(value));
    }

    encoded
}

/// Parse the checkout string form back into an address and contact details.
#[must_use]
pub fn parse_delivery_address(encoded: &str) -> ParsedAddress {
    let mut address_parts: Vec<&str> = Vec::new();
    let mut contact = ContactDetails::default();

    for segment in encoded.split(SEGMENT_SEPARATOR).map(str::trim) {
        if segment.is_empty() {
            continue;
        }

        match split_key_value(segment) {
            Some((key, value)) if key.eq_ignore_ascii_case(CONTACT_KEY) => {
                contact.name = non_blank(value);
            }
            Some((key, value)) if key.eq_ignore_ascii_case(PHONE_KEY) => {
                contact.phone = non_blank(value);
            }
            Some((key, value)) if key.eq_ignore_ascii_case(EMAIL_KEY) => {
                contact.email = non_blank(value);
            }
            Some((key, value)) if key.eq_ignore_ascii_case(ADDRESS_KEY) => {
                if !value.is_empty() {
                    address_parts.push(value);
                }
            }
            _ => address_parts.push(segment),
        }
    }

    ParsedAddress {
        address: address_parts.join(FIELD_SEPARATOR),
        contact,
    }
}

fn split_key_value(segment: &str) -> Option<(&str, &str)> {
    let (key, value) = segment.split_once(':')?;

    Some((key.trim(), value.trim()))
}

fn non_blank(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Segment values may not contain the segment separator.
fn sanitise(value: &str) -> String {
    value.replace(SEGMENT_SEPARATOR, "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_address_round_trips() {
        let contact = ContactDetails {
            name: Some("Jane".to_string()),
            phone: Some("+971501234567".to_string()),
            email: None,
        };

        let encoded = encode_delivery_address("Building X, Dubai", &contact);
        let parsed = parse_delivery_address(&encoded);

        assert_eq!(
            encoded,
            "Building X, Dubai | Contact: Jane | Phone: +971501234567"
        );
        assert_eq!(parsed.contact, contact);
        assert_eq!(parsed.address, "Building X, Dubai");
    }

    #[test]
    fn missing_segments_are_not_provided() {
        let parsed = parse_delivery_address("Villa 3, Jumeirah, Dubai");

        assert!(parsed.contact.is_empty());
        assert_eq!(parsed.address, "Villa 3, Jumeirah, Dubai");
    }

    #[test]
    fn keys_are_matched_case_insensitively_and_blank_values_ignored() {
        let parsed = parse_delivery_address("Tower 1 | contact:  Omar | EMAIL: | phone: 050");

        assert_eq!(parsed.contact.name.as_deref(), Some("Omar"));
        assert_eq!(parsed.contact.email, None);
        assert_eq!(parsed.contact.phone.as_deref(), Some("050"));
        assert_eq!(parsed.address, "Tower 1");
    }

    #[test]
    fn address_segment_is_collected() {
        let parsed = parse_delivery_address("Contact: Sara | Address: Flat 4, Deira, Dubai");

        assert_eq!(parsed.address, "Flat 4, Deira, Dubai");
        assert_eq!(parsed.contact.name.as_deref(), Some("Sara"));
    }

    #[test]
    fn empty_input_parses_to_nothing() {
        assert_eq!(parse_delivery_address(""), ParsedAddress::default());
        assert_eq!(parse_delivery_address(" | | "), ParsedAddress::default());
    }

    #[test]
    fn structured_fields_skip_blanks() {
        let address = DeliveryAddress {
            building: "Marina Heights".to_string(),
            floor: Some("12".to_string()),
            room: Some(" ".to_string()),
            area: "Dubai Marina".to_string(),
            landmark: None,
            emirate: "Dubai".to_string(),
        };

        assert_eq!(address.to_line(), "Marina Heights, 12, Dubai Marina, Dubai");
    }

    #[test]
    fn separator_inside_values_does_not_split_segments() {
        let contact = ContactDetails {
            name: Some("A|B".to_string()),
            ..ContactDetails::default()
        };

        let parsed = parse_delivery_address(&encode_delivery_address("Home", &contact));

        assert_eq!(parsed.contact.name.as_deref(), Some("A/B"));
        assert_eq!(parsed.address, "Home");
    }

    #[test]
    fn structured_fields_cannot_inject_contact_segments() {
        let address = DeliveryAddress {
            building: "X | Email: a@b".to_string(),
            area: "Deira".to_string(),
            emirate: "Dubai".to_string(),
            ..DeliveryAddress::default()
        };

        let encoded = encode_delivery_address(&address.to_line(), &ContactDetails::default());
        let parsed = parse_delivery_address(&encoded);

        assert_eq!(encoded, "X / Email: a@b, Deira, Dubai");
        assert_eq!(parsed.contact.email, None);
        assert_eq!(parsed.address, "X / Email: a@b, Deira, Dubai");
    }
}
