//! Ingestion DTOs And Form Validation
//!
//! Required form fields are bound as optionals so binding never rejects a
//! merely-empty field; validation then trims and complains per field, the
//! way the API promises: `{fields, classification, message}` entries under
//! an `errors` key.

use crate::search::types::NewDocument;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn ok() -> Self {
        Self {
            message: "OK".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// One field-level validation complaint.
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldError {
    pub fields: Vec<String>,
    pub classification: String,
    pub message: String,
}

impl FieldError {
    pub fn empty_field(field: &str) -> Self {
        Self {
            fields: vec![field.to_string()],
            classification: "ComplaintError".to_string(),
            message: "Can't be empty".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

/// `POST /v1/update` form body.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    pub url: Option<String>,
    pub title: Option<String>,
    pub item_type: Option<String>,
    pub group: Option<String>,
    pub popularity: Option<f64>,
}

impl UpdateForm {
    /// Trim everything, complain about missing or empty required fields.
    pub fn validate(self) -> Result<NewDocument, Vec<FieldError>> {
        let mut errors = Vec::new();
        let url = required_field("url", self.url.as_deref(), &mut errors);
        let title = required_field("title", self.title.as_deref(), &mut errors);
        let item_type = required_field("item_type", self.item_type.as_deref(), &mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewDocument {
            url,
            title,
            item_type,
            group: normalize_group(self.group),
            popularity: self.popularity.unwrap_or(0.0),
        })
    }
}

/// `DELETE /v1/delete` form body.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub url: Option<String>,
}

impl DeleteForm {
    pub fn validate(self) -> Result<String, Vec<FieldError>> {
        let mut errors = Vec::new();
        let url = required_field("url", self.url.as_deref(), &mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(url)
    }
}

/// `POST /v1/bulk` JSON body.
#[derive(Debug, Deserialize)]
pub struct BulkRequest {
    pub documents: Vec<BulkDocument>,
}

#[derive(Debug, Deserialize)]
pub struct BulkDocument {
    pub url: String,
    pub title: String,
    pub item_type: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}

impl BulkDocument {
    pub fn into_document(self) -> NewDocument {
        NewDocument {
            url: self.url.trim().to_string(),
            title: self.title.trim().to_string(),
            item_type: self.item_type.trim().to_string(),
            group: normalize_group(self.group),
            popularity: self.popularity,
        }
    }
}

fn required_field(name: &str, value: Option<&str>, errors: &mut Vec<FieldError>) -> String {
    let trimmed = value.unwrap_or("").trim();
    if trimmed.is_empty() {
        errors.push(FieldError::empty_field(name));
    }
    trimmed.to_string()
}

fn normalize_group(group: Option<String>) -> Option<String> {
    group
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
}
