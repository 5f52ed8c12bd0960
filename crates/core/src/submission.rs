//! Submission status, shipping address rules and required-field validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Country stored when the submitter leaves the field blank.
pub const DEFAULT_COUNTRY: &str = "United States";

/// Placeholder shown wherever a submission carries no street address.
pub const NO_ADDRESS: &str = "No address provided";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle stage of a submission as tracked by staff.
///
/// Staff may move a submission to any status from any other; the dashboard
/// selector offers all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Reviewed,
    Contacted,
    Completed,
}

impl SubmissionStatus {
    /// Every status in selector order.
    pub const ALL: [SubmissionStatus; 4] = [
        SubmissionStatus::Pending,
        SubmissionStatus::Reviewed,
        SubmissionStatus::Contacted,
        SubmissionStatus::Completed,
    ];

    /// Name used on the wire and in the `submissions.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Contacted => "contacted",
            Self::Completed => "completed",
        }
    }

    /// Human-readable label for selectors and emails.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Reviewed => "Reviewed",
            Self::Contacted => "Contacted",
            Self::Completed => "Completed",
        }
    }

    /// CSS classes for the dashboard status badge.
    pub fn badge_class(self) -> &'static str {
        match self {
            Self::Pending => "bg-yellow-100 text-yellow-800",
            Self::Reviewed => "bg-blue-100 text-blue-800",
            Self::Contacted => "bg-green-100 text-green-800",
            Self::Completed => "bg-gray-100 text-gray-800",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lets row decoders read the `status` column straight into the enum.
impl TryFrom<String> for SubmissionStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for SubmissionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid submission status '{s}'. Must be one of: pending, reviewed, contacted, completed"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Shipping address
// ---------------------------------------------------------------------------

/// One of the four fields that make an address complete enough to ship to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    Street,
    City,
    State,
    ZipCode,
}

impl AddressField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Street => "Street address",
            Self::City => "City",
            Self::State => "State",
            Self::ZipCode => "ZIP code",
        }
    }
}

/// Returns `true` when `value` holds something other than whitespace.
pub fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// An address is complete when street, city, state and zip are all present.
/// Country does not participate.
pub fn has_complete_address(
    street: Option<&str>,
    city: Option<&str>,
    state: Option<&str>,
    zip_code: Option<&str>,
) -> bool {
    is_present(street) && is_present(city) && is_present(state) && is_present(zip_code)
}

/// Shipping address as stored on a submission. Every field is optional
/// because rows written by the contact-only intake form carry none of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

impl ShippingAddress {
    pub fn is_complete(&self) -> bool {
        has_complete_address(
            self.street.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.zip_code.as_deref(),
        )
    }

    /// Required fields that are absent, in display order.
    pub fn missing_fields(&self) -> Vec<AddressField> {
        [
            (AddressField::Street, &self.street),
            (AddressField::City, &self.city),
            (AddressField::State, &self.state),
            (AddressField::ZipCode, &self.zip_code),
        ]
        .into_iter()
        .filter(|(_, value)| !is_present(value.as_deref()))
        .map(|(field, _)| field)
        .collect()
    }

    /// Single-line rendering used in list rows and emails.
    pub fn one_line(&self) -> String {
        if !is_present(self.street.as_deref()) {
            return NO_ADDRESS.to_string();
        }
        [
            &self.street,
            &self.city,
            &self.state,
            &self.zip_code,
            &self.country,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref().filter(|p| !p.trim().is_empty()))
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// Mailing-label text for the clipboard:
    /// `name\nstreet\ncity, state zip\ncountry` with blank lines dropped.
    ///
    /// Returns `None` unless the address is complete.
    pub fn label_text(&self, name: &str) -> Option<String> {
        if !self.is_complete() {
            return None;
        }
        let locality = format!(
            "{}, {} {}",
            self.city.as_deref().unwrap_or_default(),
            self.state.as_deref().unwrap_or_default(),
            self.zip_code.as_deref().unwrap_or_default(),
        );
        let lines = [
            Some(name),
            self.street.as_deref(),
            Some(locality.as_str()),
            self.country.as_deref(),
        ];
        Some(
            lines
                .into_iter()
                .flatten()
                .filter(|line| !line.trim().is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

// ---------------------------------------------------------------------------
// Required fields
// ---------------------------------------------------------------------------

/// Reject when any named field is absent or blank.
///
/// The error lists every missing field by name, in the order given.
pub fn validate_required(fields: &[(&str, Option<&str>)]) -> Result<(), CoreError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| !is_present(*value))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Trim a free-text field, mapping blank input to `None`.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
