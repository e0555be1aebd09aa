//! Vendor wire format.
//!
//! Request and response shapes of the annotation endpoint, private to this
//! crate. The rest of the workspace only ever sees
//! [`picdesc_models::VisionAnnotations`], produced by the conversion at the
//! bottom of this module.

use serde::{Deserialize, Serialize};

use picdesc_models::{
    BoundingBox, ColorAnnotation, FaceAnnotation, LabelAnnotation, LandmarkAnnotation, LatLng,
    Likelihood, LogoAnnotation, ObjectAnnotation, Rgb, TextAnnotation, Vertex, VisionAnnotations,
    WebEntity,
};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct AnnotateRequest {
    pub requests: Vec<ImageRequest>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageRequest {
    pub image: ImageContent,
    pub features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ImageContent {
    /// Base64-encoded image bytes
    pub content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct Feature {
    #[serde(rename = "type")]
    pub feature_type: &'static str,
    #[serde(rename = "maxResults", skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

/// The production feature set. No quality feature is requested, so
/// `qualityScore` stays absent from responses in practice.
pub(crate) const FEATURES: &[(&str, Option<u32>)] = &[
    ("LABEL_DETECTION", Some(10)),
    ("OBJECT_LOCALIZATION", Some(10)),
    ("FACE_DETECTION", Some(10)),
    ("IMAGE_PROPERTIES", None),
    ("TEXT_DETECTION", None),
    ("LANDMARK_DETECTION", Some(5)),
    ("LOGO_DETECTION", Some(5)),
    ("WEB_DETECTION", Some(5)),
];

impl ImageRequest {
    pub fn new(base64_content: String) -> Self {
        Self {
            image: ImageContent {
                content: base64_content,
            },
            features: FEATURES
                .iter()
                .map(|&(feature_type, max_results)| Feature {
                    feature_type,
                    max_results,
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<ImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageResponse {
    #[serde(default)]
    pub label_annotations: Vec<WireLabel>,
    #[serde(default)]
    pub localized_object_annotations: Vec<WireObject>,
    #[serde(default)]
    pub face_annotations: Vec<WireFace>,
    #[serde(default)]
    pub image_properties_annotation: Option<WireImageProperties>,
    #[serde(default)]
    pub full_text_annotation: Option<WireFullText>,
    #[serde(default)]
    pub text_annotations: Vec<WireText>,
    #[serde(default)]
    pub landmark_annotations: Vec<WireLandmark>,
    #[serde(default)]
    pub logo_annotations: Vec<WireLogo>,
    #[serde(default)]
    pub web_detection: Option<WireWebDetection>,
    #[serde(default)]
    pub quality_score: Option<f32>,
    #[serde(default)]
    pub error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireError {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLabel {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireObject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bounding_poly: Option<WireBoundingPoly>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireBoundingPoly {
    #[serde(default)]
    pub normalized_vertices: Vec<WireVertex>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireVertex {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireFace {
    #[serde(default)]
    pub joy_likelihood: Likelihood,
    #[serde(default)]
    pub sorrow_likelihood: Likelihood,
    #[serde(default)]
    pub anger_likelihood: Likelihood,
    #[serde(default)]
    pub surprise_likelihood: Likelihood,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireImageProperties {
    #[serde(default)]
    pub dominant_colors: Option<WireDominantColors>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireDominantColors {
    #[serde(default)]
    pub colors: Vec<WireColorInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireColorInfo {
    #[serde(default)]
    pub color: WireColor,
    #[serde(default)]
    pub score: f32,
}

/// Channel values arrive as floats in [0, 255].
#[derive(Debug, Default, Deserialize)]
pub(crate) struct WireColor {
    #[serde(default)]
    pub red: f32,
    #[serde(default)]
    pub green: f32,
    #[serde(default)]
    pub blue: f32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireFullText {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireText {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLandmark {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub locations: Vec<WireLocation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireLocation {
    #[serde(default)]
    pub lat_lng: Option<WireLatLng>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLatLng {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLogo {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireWebDetection {
    #[serde(default)]
    pub web_entities: Vec<WireWebEntity>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireWebEntity {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub score: f32,
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

fn channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

impl ImageResponse {
    /// Flatten the wire shape into the model the templater consumes.
    pub fn into_annotations(self) -> VisionAnnotations {
        let labels = self
            .label_annotations
            .into_iter()
            .map(|label| LabelAnnotation::new(label.description, label.score))
            .collect();

        let objects = self
            .localized_object_annotations
            .into_iter()
            .map(|object| ObjectAnnotation {
                name: object.name,
                bounding_box: object.bounding_poly.map(|poly| BoundingBox {
                    vertices: poly
                        .normalized_vertices
                        .into_iter()
                        .map(|vertex| Vertex {
                            x: vertex.x,
                            y: vertex.y,
                        })
                        .collect(),
                }),
            })
            .collect();

        let faces = self
            .face_annotations
            .into_iter()
            .map(|face| FaceAnnotation {
                joy: face.joy_likelihood,
                sorrow: face.sorrow_likelihood,
                anger: face.anger_likelihood,
                surprise: face.surprise_likelihood,
            })
            .collect();

        let colors = self
            .image_properties_annotation
            .and_then(|properties| properties.dominant_colors)
            .map(|dominant| {
                dominant
                    .colors
                    .into_iter()
                    .map(|info| {
                        ColorAnnotation::new(
                            Rgb::new(
                                channel(info.color.red),
                                channel(info.color.green),
                                channel(info.color.blue),
                            ),
                            info.score,
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        // The aggregate full text is authoritative; individual text blocks
        // only matter when the aggregate is missing.
        let text = match self.full_text_annotation {
            Some(full_text) => vec![TextAnnotation::new(full_text.text)],
            None => self
                .text_annotations
                .into_iter()
                .take(1)
                .map(|block| TextAnnotation::new(block.description))
                .collect(),
        };

        let landmarks = self
            .landmark_annotations
            .into_iter()
            .map(|landmark| LandmarkAnnotation {
                name: landmark.description,
                coordinates: landmark
                    .locations
                    .into_iter()
                    .find_map(|location| location.lat_lng)
                    .map(|lat_lng| LatLng {
                        lat: lat_lng.latitude,
                        lng: lat_lng.longitude,
                    }),
            })
            .collect();

        let logos = self
            .logo_annotations
            .into_iter()
            .map(|logo| LogoAnnotation::new(logo.description))
            .collect();

        let web_entities = self
            .web_detection
            .map(|detection| {
                detection
                    .web_entities
                    .into_iter()
                    .map(|entity| WebEntity::new(entity.description, entity.score))
                    .collect()
            })
            .unwrap_or_default();

        VisionAnnotations {
            labels,
            objects,
            faces,
            colors,
            text,
            landmarks,
            logos,
            web_entities,
            quality_score: self.quality_score,
        }
    }
}
