//! Custom-field gating of the booking action.
//!
//! The booking form's fields are externally configured; when nothing is
//! configured the widget shows an email-address field and a name field. The
//! gate is a pure predicate re-evaluated on every field edit or selection
//! change, and it never errors — broken configuration degrades to "booking
//! disabled".

use serde::{Deserialize, Serialize};

use crate::selection::SelectionState;

/// A single booking-form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub key: String,
    pub label: String,
    pub required: bool,
    #[serde(default)]
    pub value: String,
}

impl CustomField {
    pub fn new(key: &str, label: &str, required: bool) -> Self {
        CustomField {
            key: key.to_string(),
            label: label.to_string(),
            required,
            value: String::new(),
        }
    }
}

/// The default field pair shown when no fields are configured. Only the
/// name field is required — filling it alone enables booking.
pub fn default_fields() -> Vec<CustomField> {
    vec![
        CustomField::new("email", "Email Address", false),
        CustomField::new("name", "Your Name", true),
    ]
}

/// Whether booking is currently enabled.
///
/// True iff an option is selected and every required field holds a
/// non-whitespace value. Unselected is always false, regardless of field
/// values.
pub fn can_book(fields: &[CustomField], selection: &SelectionState) -> bool {
    selection.is_selected()
        && fields
            .iter()
            .filter(|field| field.required)
            .all(|field| !field.value.trim().is_empty())
}
