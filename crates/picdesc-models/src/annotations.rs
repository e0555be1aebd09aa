//! Vision annotation models.
//!
//! These types mirror the structured facts the vendor annotation API extracts
//! from an image. Every section is optional: an image with no detected faces
//! simply carries an empty `faces` list. The description templater consumes
//! this type read-only.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ordinal likelihood scale used for face-emotion attributes.
///
/// Ordering is part of the contract:
/// `Unknown < VeryUnlikely < Unlikely < Possible < Likely < VeryLikely`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
    Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum Likelihood {
    #[default]
    Unknown,
    VeryUnlikely,
    Unlikely,
    Possible,
    Likely,
    VeryLikely,
}

// Values outside the known scale fold into Unknown rather than failing the
// whole annotation response.
impl From<String> for Likelihood {
    fn from(value: String) -> Self {
        match value.as_str() {
            "VERY_UNLIKELY" => Self::VeryUnlikely,
            "UNLIKELY" => Self::Unlikely,
            "POSSIBLE" => Self::Possible,
            "LIKELY" => Self::Likely,
            "VERY_LIKELY" => Self::VeryLikely,
            _ => Self::Unknown,
        }
    }
}

impl Likelihood {
    /// True for `Likely` and `VeryLikely` — the threshold at which an emotion
    /// counts toward the description tally.
    pub fn is_likely(self) -> bool {
        matches!(self, Self::Likely | Self::VeryLikely)
    }
}

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// A classification label with a confidence score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LabelAnnotation {
    /// Human-readable label text (e.g. "cat")
    pub description: String,
    /// Confidence score in [0, 1]
    pub score: f32,
}

impl LabelAnnotation {
    pub fn new(description: impl Into<String>, score: f32) -> Self {
        Self {
            description: description.into(),
            score,
        }
    }
}

/// A vertex of a bounding polygon, in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Vertex {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

/// Bounding polygon of a localized object.
///
/// Opaque to the templater; spatial relationships are deliberately never
/// computed from it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
}

/// A localized object detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ObjectAnnotation {
    /// Object class name (e.g. "Dog"); grouping keys on this verbatim
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

impl ObjectAnnotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounding_box: None,
        }
    }
}

/// Per-face emotion likelihoods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct FaceAnnotation {
    #[serde(default)]
    pub joy: Likelihood,
    #[serde(default)]
    pub sorrow: Likelihood,
    #[serde(default)]
    pub anger: Likelihood,
    #[serde(default)]
    pub surprise: Likelihood,
}

/// A dominant color swatch with its coverage score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ColorAnnotation {
    pub rgb: Rgb,
    /// Fraction of the image covered by this color, in [0, 1]
    pub score: f32,
}

impl ColorAnnotation {
    pub fn new(rgb: Rgb, score: f32) -> Self {
        Self { rgb, score }
    }
}

/// Detected text. The first entry is the aggregate full text of the image;
/// only that entry is consulted by the templater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextAnnotation {
    pub full_text: String,
}

impl TextAnnotation {
    pub fn new(full_text: impl Into<String>) -> Self {
        Self {
            full_text: full_text.into(),
        }
    }
}

/// Geographic coordinates of a recognized landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A recognized landmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LandmarkAnnotation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<LatLng>,
}

impl LandmarkAnnotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            coordinates: None,
        }
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some(LatLng { lat, lng });
        self
    }
}

/// A recognized brand logo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LogoAnnotation {
    pub name: String,
}

impl LogoAnnotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A web entity inferred from similar images on the web.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WebEntity {
    pub description: String,
    pub score: f32,
}

impl WebEntity {
    pub fn new(description: impl Into<String>, score: f32) -> Self {
        Self {
            description: description.into(),
            score,
        }
    }
}

/// The full structured annotation response for one image.
///
/// Sequence order is the vendor's ranking order (descending confidence for
/// labels and web entities); consumers must not re-sort.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct VisionAnnotations {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<LabelAnnotation>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<ObjectAnnotation>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faces: Vec<FaceAnnotation>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<ColorAnnotation>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<TextAnnotation>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub landmarks: Vec<LandmarkAnnotation>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logos: Vec<LogoAnnotation>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub web_entities: Vec<WebEntity>,

    /// Overall quality score in [0, 1]. Not populated by the feature set
    /// requested in production; mapped when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f32>,
}

impl VisionAnnotations {
    /// True when every annotation section is absent or empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
            && self.objects.is_empty()
            && self.faces.is_empty()
            && self.colors.is_empty()
            && self.text.is_empty()
            && self.landmarks.is_empty()
            && self.logos.is_empty()
            && self.web_entities.is_empty()
            && self.quality_score.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_likelihood_ordering() {
        assert!(Likelihood::VeryLikely > Likelihood::Likely);
        assert!(Likelihood::Likely > Likelihood::Possible);
        assert!(Likelihood::Unknown < Likelihood::VeryUnlikely);
    }

    #[test]
    fn test_likelihood_threshold() {
        assert!(Likelihood::Likely.is_likely());
        assert!(Likelihood::VeryLikely.is_likely());
        assert!(!Likelihood::Possible.is_likely());
        assert!(!Likelihood::Unknown.is_likely());
    }

    #[test]
    fn test_likelihood_wire_format() {
        let parsed: Likelihood = serde_json::from_str("\"VERY_LIKELY\"").unwrap();
        assert_eq!(parsed, Likelihood::VeryLikely);

        // Values outside the known scale fold into Unknown
        let parsed: Likelihood = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(parsed, Likelihood::Unknown);
    }

    #[test]
    fn test_annotations_all_sections_optional() {
        let annotations: VisionAnnotations = serde_json::from_str("{}").unwrap();
        assert!(annotations.is_empty());
    }

    #[test]
    fn test_annotations_partial_deserialization() {
        let json = r#"{
            "labels": [{"description": "cat", "score": 0.9}],
            "faces": [{"joy": "LIKELY"}]
        }"#;
        let annotations: VisionAnnotations = serde_json::from_str(json).unwrap();
        assert_eq!(annotations.labels.len(), 1);
        assert_eq!(annotations.labels[0].description, "cat");
        assert_eq!(annotations.faces[0].joy, Likelihood::Likely);
        assert_eq!(annotations.faces[0].sorrow, Likelihood::Unknown);
        assert!(!annotations.is_empty());
    }

    #[test]
    fn test_quality_score_counts_as_content() {
        let annotations = VisionAnnotations {
            quality_score: Some(0.9),
            ..Default::default()
        };
        assert!(!annotations.is_empty());
    }
}
