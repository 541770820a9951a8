use serde::{Deserialize, Serialize};

/// A document as handed to the index writer, after form normalization:
/// fields trimmed, an absent or empty group collapsed to `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDocument {
    pub url: String,
    pub title: String,
    pub item_type: String,
    pub group: Option<String>,
    pub popularity: f64,
}

/// Search endpoint payload. Each result row is `[url, title, item_type]`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub terms: Vec<String>,
    pub results: Vec<(String, String, String)>,
}
