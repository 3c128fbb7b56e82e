//! Add-vehicle form draft and validation
//!
//! Validation is pure: it is recomputed from the draft whenever it is
//! needed and never cached. What the user *sees* is tracked separately:
//! a field shows its error only once it has been touched (blurred or a
//! submit was attempted), and editing a field hides its error again until
//! the next blur.

use crate::api::VehicleCreate;
use std::collections::HashSet;
use std::fmt;

/// Shortest accepted VIN
pub const VIN_MIN_LEN: usize = 5;
/// Longest accepted VIN
pub const VIN_MAX_LEN: usize = 17;
/// Shortest accepted manufacturer name
pub const MAKE_MIN_LEN: usize = 2;
/// Shortest accepted description
pub const DESCRIPTION_MIN_LEN: usize = 10;

/// Form input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Vin,
    Make,
    Model,
    Description,
    ImageUrls,
}

impl Field {
    /// All fields in tab order
    pub const ALL: [Field; 5] = [
        Field::Vin,
        Field::Make,
        Field::Model,
        Field::Description,
        Field::ImageUrls,
    ];

    /// Fields subject to validation
    pub const VALIDATED: [Field; 4] = [Field::Vin, Field::Make, Field::Model, Field::Description];

    /// Label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            Self::Vin => "VIN",
            Self::Make => "Manufacturer",
            Self::Model => "Model",
            Self::Description => "Description",
            Self::ImageUrls => "Image URLs",
        }
    }

    /// Next field in tab order, wrapping
    pub fn next(self) -> Field {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous field in tab order, wrapping
    pub fn previous(self) -> Field {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-field validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub vin: Option<&'static str>,
    pub make: Option<&'static str>,
    pub model: Option<&'static str>,
    pub description: Option<&'static str>,
}

impl FieldErrors {
    /// Error for a field
    pub fn get(&self, field: Field) -> Option<&'static str> {
        match field {
            Field::Vin => self.vin,
            Field::Make => self.make,
            Field::Model => self.model,
            Field::Description => self.description,
            Field::ImageUrls => None,
        }
    }

    fn set(&mut self, field: Field, error: Option<&'static str>) {
        match field {
            Field::Vin => self.vin = error,
            Field::Make => self.make = error,
            Field::Model => self.model = error,
            Field::Description => self.description = error,
            Field::ImageUrls => {}
        }
    }

    /// True when no field has an error
    pub fn is_empty(&self) -> bool {
        Field::VALIDATED.iter().all(|f| self.get(*f).is_none())
    }

    /// All messages in field order
    pub fn messages(&self) -> Vec<String> {
        Field::VALIDATED
            .iter()
            .filter_map(|f| self.get(*f))
            .map(str::to_string)
            .collect()
    }
}

/// Validate a VIN
pub fn validate_vin(vin: &str) -> Option<&'static str> {
    let len = vin.trim().chars().count();
    if len == 0 {
        Some("VIN is required")
    } else if len < VIN_MIN_LEN {
        Some("VIN must be at least 5 characters")
    } else if len > VIN_MAX_LEN {
        Some("VIN must be at most 17 characters")
    } else {
        None
    }
}

/// Validate a manufacturer name
pub fn validate_make(make: &str) -> Option<&'static str> {
    let len = make.trim().chars().count();
    if len == 0 {
        Some("Manufacturer is required")
    } else if len < MAKE_MIN_LEN {
        Some("Manufacturer must be at least 2 characters")
    } else {
        None
    }
}

/// Validate a model name
pub fn validate_model(model: &str) -> Option<&'static str> {
    if model.trim().is_empty() {
        Some("Model is required")
    } else {
        None
    }
}

/// Validate a description
pub fn validate_description(description: &str) -> Option<&'static str> {
    let len = description.trim().chars().count();
    if len == 0 {
        Some("Description is required")
    } else if len < DESCRIPTION_MIN_LEN {
        Some("Description must be at least 10 characters")
    } else {
        None
    }
}

/// Split free text into image URLs on newlines and commas
pub fn parse_image_urls(raw: &str) -> Vec<String> {
    raw.split(['\n', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Unsaved add-vehicle form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub vin: String,
    pub make: String,
    pub model: String,
    pub description: String,
    pub image_urls_input: String,
    shown: FieldErrors,
    touched: HashSet<Field>,
}

impl FormDraft {
    /// Empty draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Current raw value of a field
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Vin => &self.vin,
            Field::Make => &self.make,
            Field::Model => &self.model,
            Field::Description => &self.description,
            Field::ImageUrls => &self.image_urls_input,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Vin => &mut self.vin,
            Field::Make => &mut self.make,
            Field::Model => &mut self.model,
            Field::Description => &mut self.description,
            Field::ImageUrls => &mut self.image_urls_input,
        }
    }

    /// Replace a field's value; hides that field's shown error
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.value_mut(field) = value.into();
        self.shown.set(field, None);
    }

    /// Append a character to a field
    pub fn push_char(&mut self, field: Field, c: char) {
        self.value_mut(field).push(c);
        self.shown.set(field, None);
    }

    /// Remove the last character of a field
    pub fn pop_char(&mut self, field: Field) {
        self.value_mut(field).pop();
        self.shown.set(field, None);
    }

    /// Field lost focus: mark touched and show its current error
    pub fn blur(&mut self, field: Field) {
        if !Field::VALIDATED.contains(&field) {
            return;
        }
        self.touched.insert(field);
        let error = self.validate().get(field);
        self.shown.set(field, error);
    }

    /// Mark every validated field touched and show all errors
    pub fn touch_all(&mut self) {
        self.touched.extend(Field::VALIDATED);
        self.shown = self.validate();
    }

    /// Whether a field has been touched
    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    /// Error currently displayed for a field
    pub fn visible_error(&self, field: Field) -> Option<&'static str> {
        if self.is_touched(field) {
            self.shown.get(field)
        } else {
            None
        }
    }

    /// Validate the current values
    pub fn validate(&self) -> FieldErrors {
        FieldErrors {
            vin: validate_vin(&self.vin),
            make: validate_make(&self.make),
            model: validate_model(&self.model),
            description: validate_description(&self.description),
        }
    }

    /// True when every check passes
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Parsed image URLs
    pub fn image_urls(&self) -> Vec<String> {
        parse_image_urls(&self.image_urls_input)
    }

    /// Build the create payload from trimmed values
    pub fn to_payload(&self) -> VehicleCreate {
        VehicleCreate {
            vin: self.vin.trim().to_string(),
            make: self.make.trim().to_string(),
            model: self.model.trim().to_string(),
            description: self.description.trim().to_string(),
            image_urls: self.image_urls(),
        }
    }
}
