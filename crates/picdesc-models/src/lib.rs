//! Shared data models for the PicDescribe backend.
//!
//! This crate provides Serde-serializable types for:
//! - Vision annotations returned by the vendor annotation API
//! - The face-emotion likelihood scale
//! - HTTP response schemas

pub mod annotations;
pub mod describe;

// Re-export common types
pub use annotations::{
    BoundingBox, ColorAnnotation, FaceAnnotation, LabelAnnotation, LandmarkAnnotation, LatLng,
    Likelihood, LogoAnnotation, ObjectAnnotation, Rgb, TextAnnotation, Vertex, VisionAnnotations,
    WebEntity,
};
pub use describe::DescribeImageResponse;
