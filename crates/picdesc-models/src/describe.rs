//! HTTP schemas for the describe endpoint.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::annotations::VisionAnnotations;

/// Response body for `POST /api/describe`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DescribeImageResponse {
    /// Generated natural-language description
    pub description: String,

    /// Number of labels the vendor returned
    pub label_count: u32,

    /// Number of localized objects the vendor returned
    pub object_count: u32,

    /// Number of faces the vendor returned
    pub face_count: u32,
}

impl DescribeImageResponse {
    /// Build a response from a description and the annotations it came from.
    pub fn new(description: impl Into<String>, annotations: &VisionAnnotations) -> Self {
        Self {
            description: description.into(),
            label_count: annotations.labels.len() as u32,
            object_count: annotations.objects.len() as u32,
            face_count: annotations.faces.len() as u32,
        }
    }
}
