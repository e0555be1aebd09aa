//! Description generation.
//!
//! An ordered pipeline of fragment rules, each a pure function
//! `(&VisionAnnotations) -> Option<String>` producing zero or one sentence.
//! Present fragments are concatenated in pipeline order, each terminated by
//! `". "`. Sections are independent: a skipped rule never affects later ones.

use std::panic::{catch_unwind, AssertUnwindSafe};

use picdesc_models::{FaceAnnotation, Likelihood, VisionAnnotations};

use crate::color::color_name;

/// Returned when fragment composition itself faults. All-or-fallback: a
/// partial description is never returned.
pub const FAULT_FALLBACK: &str = "An image containing various elements...";

/// Returned when no fragment applies. The templater never returns an empty
/// string.
pub const EMPTY_FALLBACK: &str = "The image does not contain any clearly identifiable elements.";

/// Scene-context vocabulary recognized among labels.
const SCENE_CONTEXTS: &[&str] = &[
    "indoor", "outdoor", "city", "rural", "landscape", "portrait", "closeup", "macro",
];

const MAX_SUBJECT_LABELS: usize = 4;
const MAX_COLOR_NAMES: usize = 3;
const MAX_WEB_ENTITIES: usize = 3;
const WEB_ENTITY_MIN_SCORE: f32 = 0.5;
const TEXT_EXCERPT_MAX_CHARS: usize = 100;
const HIGH_QUALITY_THRESHOLD: f32 = 0.8;
const LOW_QUALITY_THRESHOLD: f32 = 0.4;

/// The fragment pipeline, in emission order.
const FRAGMENTS: &[fn(&VisionAnnotations) -> Option<String>] = &[
    scene_context,
    main_subjects,
    landmark,
    people_count,
    emotions,
    objects,
    logos,
    dominant_colors,
    text_excerpt,
    web_entities,
    quality,
];

/// Generate a natural-language description for one annotation response.
///
/// Never fails: a fault while composing degrades to [`FAULT_FALLBACK`], an
/// input with no usable section yields [`EMPTY_FALLBACK`].
pub fn generate_description(annotations: &VisionAnnotations) -> String {
    catch_unwind(AssertUnwindSafe(|| compose(annotations)))
        .unwrap_or_else(|_| FAULT_FALLBACK.to_string())
}

fn compose(annotations: &VisionAnnotations) -> String {
    let mut description = String::new();
    for fragment in FRAGMENTS {
        if let Some(sentence) = fragment(annotations) {
            description.push_str(&sentence);
            description.push_str(". ");
        }
    }
    if description.is_empty() {
        EMPTY_FALLBACK.to_string()
    } else {
        description
    }
}

/// Rule 1: scene context, from the first label matching the closed vocabulary.
fn scene_context(annotations: &VisionAnnotations) -> Option<String> {
    let context = annotations.labels.iter().find_map(|label| {
        SCENE_CONTEXTS
            .iter()
            .find(|context| label.description.eq_ignore_ascii_case(context))
    })?;
    Some(format!("This appears to be an {context} image"))
}

/// Rule 2: main subjects, the first labels in the vendor's ranking order.
fn main_subjects(annotations: &VisionAnnotations) -> Option<String> {
    if annotations.labels.is_empty() {
        return None;
    }
    let subjects = annotations
        .labels
        .iter()
        .take(MAX_SUBJECT_LABELS)
        .map(|label| label.description.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("The image shows {subjects}"))
}

/// Rule 3: first landmark, with hemisphere-formatted coordinates if present.
fn landmark(annotations: &VisionAnnotations) -> Option<String> {
    let landmark = annotations.landmarks.first()?;
    let mut sentence = format!("The image features {}", landmark.name);
    if let Some(coordinates) = landmark.coordinates {
        let ns = if coordinates.lat >= 0.0 { "North" } else { "South" };
        let ew = if coordinates.lng >= 0.0 { "East" } else { "West" };
        sentence.push_str(&format!(
            " located at {}° {}, {}° {}",
            coordinates.lat.abs(),
            ns,
            coordinates.lng.abs(),
            ew
        ));
    }
    Some(sentence)
}

/// Rule 4a: person count, singular/plural.
fn people_count(annotations: &VisionAnnotations) -> Option<String> {
    match annotations.faces.len() {
        0 => None,
        1 => Some("There is 1 person in the image".to_string()),
        n => Some(format!("There are {n} people in the image")),
    }
}

/// Rule 4b: emotion tally across all faces.
///
/// A single face may count toward several emotions; the categories are not
/// mutually exclusive. Joy is worded "happy", the rest keep their own names.
fn emotions(annotations: &VisionAnnotations) -> Option<String> {
    if annotations.faces.is_empty() {
        return None;
    }

    let tally = |pick: fn(&FaceAnnotation) -> Likelihood| {
        annotations
            .faces
            .iter()
            .filter(|face| pick(face).is_likely())
            .count()
    };

    let counts: [(usize, &str); 4] = [
        (tally(|face| face.joy), "happy"),
        (tally(|face| face.sorrow), "sorrow"),
        (tally(|face| face.anger), "anger"),
        (tally(|face| face.surprise), "surprise"),
    ];

    let clauses = counts
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, emotion)| {
            if *count == 1 {
                format!("{count} appears to be {emotion}")
            } else {
                format!("{count} appear to be {emotion}")
            }
        })
        .collect::<Vec<_>>();

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(", "))
    }
}

/// Rule 5: objects grouped by exact name match, in first-seen order.
///
/// Grouping is case-sensitive: "Dog" and "dog" form distinct groups.
/// Pluralization is naive (always appends "s"). Spatial relationships between
/// objects are out of scope.
fn objects(annotations: &VisionAnnotations) -> Option<String> {
    if annotations.objects.is_empty() {
        return None;
    }

    // Order-preserving grouping keeps the output deterministic
    let mut groups: Vec<(&str, usize)> = Vec::new();
    for object in &annotations.objects {
        match groups.iter_mut().find(|(name, _)| *name == object.name) {
            Some((_, count)) => *count += 1,
            None => groups.push((object.name.as_str(), 1)),
        }
    }

    let phrases = groups
        .iter()
        .map(|(name, count)| {
            if *count == 1 {
                format!("a {name}")
            } else {
                format!("{count} {name}s")
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    Some(format!("The image contains {phrases}"))
}

/// Rule 6: logos, singular/plural keyed on count.
fn logos(annotations: &VisionAnnotations) -> Option<String> {
    if annotations.logos.is_empty() {
        return None;
    }
    let names = annotations
        .logos
        .iter()
        .map(|logo| logo.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let word = if annotations.logos.len() == 1 {
        "logo"
    } else {
        "logos"
    };
    Some(format!("The image contains the {names} {word}"))
}

/// Rule 7: top dominant colors by score, mapped through the color classifier.
fn dominant_colors(annotations: &VisionAnnotations) -> Option<String> {
    if annotations.colors.is_empty() {
        return None;
    }
    let mut colors = annotations.colors.clone();
    colors.sort_by(|a, b| b.score.total_cmp(&a.score));
    let names = colors
        .iter()
        .take(MAX_COLOR_NAMES)
        .map(|color| color_name(color.rgb))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("The dominant colors in the image are {names}"))
}

/// Rule 8: quoted excerpt of the aggregate text annotation.
fn text_excerpt(annotations: &VisionAnnotations) -> Option<String> {
    let text = annotations.text.first()?;
    let flattened = text
        .full_text
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string();
    if flattened.is_empty() {
        return None;
    }

    let excerpt = if flattened.chars().count() > TEXT_EXCERPT_MAX_CHARS {
        let truncated: String = flattened.chars().take(TEXT_EXCERPT_MAX_CHARS).collect();
        format!("{truncated}...")
    } else {
        flattened
    };

    Some(format!("The image contains the text: \"{excerpt}\""))
}

/// Rule 9: confidently-matched web entities.
fn web_entities(annotations: &VisionAnnotations) -> Option<String> {
    let entities = annotations
        .web_entities
        .iter()
        .filter(|entity| entity.score > WEB_ENTITY_MIN_SCORE)
        .take(MAX_WEB_ENTITIES)
        .map(|entity| entity.description.as_str())
        .collect::<Vec<_>>();
    if entities.is_empty() {
        return None;
    }
    Some(format!("The image may be related to {}", entities.join(", ")))
}

/// Rule 10: quality verdict at the fixed thresholds.
///
/// The production feature set never populates `quality_score`; the branch is
/// kept for responses that do carry it.
fn quality(annotations: &VisionAnnotations) -> Option<String> {
    let score = annotations.quality_score?;
    if score > HIGH_QUALITY_THRESHOLD {
        Some("This is a high-quality image".to_string())
    } else if score < LOW_QUALITY_THRESHOLD {
        Some("The image is of relatively low quality".to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picdesc_models::{
        ColorAnnotation, LabelAnnotation, LandmarkAnnotation, LogoAnnotation, ObjectAnnotation,
        Rgb, TextAnnotation, WebEntity,
    };

    fn with_labels(labels: &[(&str, f32)]) -> VisionAnnotations {
        VisionAnnotations {
            labels: labels
                .iter()
                .map(|(description, score)| LabelAnnotation::new(*description, *score))
                .collect(),
            ..Default::default()
        }
    }

    fn face(joy: Likelihood, sorrow: Likelihood) -> FaceAnnotation {
        FaceAnnotation {
            joy,
            sorrow,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_annotations_yield_fallback() {
        let annotations = VisionAnnotations::default();
        assert_eq!(generate_description(&annotations), EMPTY_FALLBACK);
    }

    #[test]
    fn test_labels_only() {
        let annotations = with_labels(&[("cat", 0.9), ("dog", 0.8)]);
        assert_eq!(generate_description(&annotations), "The image shows cat, dog. ");
    }

    #[test]
    fn test_scene_context_is_case_insensitive_and_first_match_only() {
        let annotations = with_labels(&[("Outdoor", 0.95), ("landscape", 0.9), ("beach", 0.8)]);
        assert_eq!(
            generate_description(&annotations),
            "This appears to be an outdoor image. The image shows Outdoor, landscape, beach. "
        );
    }

    #[test]
    fn test_subjects_capped_at_four() {
        let annotations = with_labels(&[
            ("a", 0.9),
            ("b", 0.8),
            ("c", 0.7),
            ("d", 0.6),
            ("e", 0.5),
        ]);
        assert_eq!(
            generate_description(&annotations),
            "The image shows a, b, c, d. "
        );
    }

    #[test]
    fn test_face_counts_and_emotion_tally() {
        let annotations = VisionAnnotations {
            faces: vec![
                face(Likelihood::Likely, Likelihood::Unknown),
                face(Likelihood::VeryLikely, Likelihood::Likely),
            ],
            ..Default::default()
        };
        assert_eq!(
            generate_description(&annotations),
            "There are 2 people in the image. 2 appear to be happy, 1 appears to be sorrow. "
        );
    }

    #[test]
    fn test_single_person_singular_wording() {
        let annotations = VisionAnnotations {
            faces: vec![face(Likelihood::Possible, Likelihood::Unknown)],
            ..Default::default()
        };
        // Possible is below the tally threshold, so no emotion sentence
        assert_eq!(
            generate_description(&annotations),
            "There is 1 person in the image. "
        );
    }

    #[test]
    fn test_landmark_with_coordinates() {
        let annotations = VisionAnnotations {
            landmarks: vec![
                LandmarkAnnotation::new("Sydney Opera House").with_coordinates(-33.8, 151.2),
            ],
            ..Default::default()
        };
        assert_eq!(
            generate_description(&annotations),
            "The image features Sydney Opera House located at 33.8° South, 151.2° East. "
        );
    }

    #[test]
    fn test_landmark_without_coordinates() {
        let annotations = VisionAnnotations {
            landmarks: vec![LandmarkAnnotation::new("Eiffel Tower")],
            ..Default::default()
        };
        assert_eq!(
            generate_description(&annotations),
            "The image features Eiffel Tower. "
        );
    }

    #[test]
    fn test_northern_eastern_hemispheres() {
        let annotations = VisionAnnotations {
            landmarks: vec![LandmarkAnnotation::new("Eiffel Tower").with_coordinates(48.85, 2.29)],
            ..Default::default()
        };
        assert_eq!(
            generate_description(&annotations),
            "The image features Eiffel Tower located at 48.85° North, 2.29° East. "
        );
    }

    #[test]
    fn test_object_grouping_is_case_sensitive() {
        let annotations = VisionAnnotations {
            objects: vec![
                ObjectAnnotation::new("Dog"),
                ObjectAnnotation::new("dog"),
                ObjectAnnotation::new("Cat"),
            ],
            ..Default::default()
        };
        assert_eq!(
            generate_description(&annotations),
            "The image contains a Dog, a dog, a Cat. "
        );
    }

    #[test]
    fn test_object_grouping_counts_and_pluralizes() {
        let annotations = VisionAnnotations {
            objects: vec![
                ObjectAnnotation::new("Car"),
                ObjectAnnotation::new("Person"),
                ObjectAnnotation::new("Car"),
            ],
            ..Default::default()
        };
        // First-seen order, naive "s" pluralization
        assert_eq!(
            generate_description(&annotations),
            "The image contains 2 Cars, a Person. "
        );
    }

    #[test]
    fn test_logo_wording_keyed_on_count() {
        let one = VisionAnnotations {
            logos: vec![LogoAnnotation::new("Acme")],
            ..Default::default()
        };
        assert_eq!(
            generate_description(&one),
            "The image contains the Acme logo. "
        );

        let two = VisionAnnotations {
            logos: vec![LogoAnnotation::new("Acme"), LogoAnnotation::new("Globex")],
            ..Default::default()
        };
        assert_eq!(
            generate_description(&two),
            "The image contains the Acme, Globex logos. "
        );
    }

    #[test]
    fn test_colors_sorted_by_score_and_capped() {
        let annotations = VisionAnnotations {
            colors: vec![
                ColorAnnotation::new(Rgb::new(128, 128, 128), 0.1),
                ColorAnnotation::new(Rgb::new(255, 0, 0), 0.5),
                ColorAnnotation::new(Rgb::new(255, 255, 255), 0.3),
                ColorAnnotation::new(Rgb::new(0, 0, 0), 0.2),
            ],
            ..Default::default()
        };
        assert_eq!(
            generate_description(&annotations),
            "The dominant colors in the image are red, white, black. "
        );
    }

    #[test]
    fn test_text_newlines_replaced_and_trimmed() {
        let annotations = VisionAnnotations {
            text: vec![TextAnnotation::new("  OPEN\n24 HOURS\r\n ")],
            ..Default::default()
        };
        let description = generate_description(&annotations);
        assert!(!description.contains('\n'));
        assert_eq!(
            description,
            "The image contains the text: \"OPEN 24 HOURS\". "
        );
    }

    #[test]
    fn test_text_truncated_at_hundred_chars() {
        let annotations = VisionAnnotations {
            text: vec![TextAnnotation::new("x".repeat(150))],
            ..Default::default()
        };
        let expected_excerpt = format!("{}...", "x".repeat(100));
        assert_eq!(
            generate_description(&annotations),
            format!("The image contains the text: \"{expected_excerpt}\". ")
        );
    }

    #[test]
    fn test_text_of_exactly_hundred_chars_not_truncated() {
        let annotations = VisionAnnotations {
            text: vec![TextAnnotation::new("y".repeat(100))],
            ..Default::default()
        };
        let description = generate_description(&annotations);
        assert!(!description.contains("..."));
    }

    #[test]
    fn test_web_entities_filtered_and_capped() {
        let annotations = VisionAnnotations {
            web_entities: vec![
                WebEntity::new("tabby cat", 0.9),
                WebEntity::new("noise", 0.4),
                WebEntity::new("pet", 0.6),
                WebEntity::new("animal", 0.55),
                WebEntity::new("mammal", 0.7),
            ],
            ..Default::default()
        };
        assert_eq!(
            generate_description(&annotations),
            "The image may be related to tabby cat, pet, animal. "
        );
    }

    #[test]
    fn test_web_entities_all_below_threshold() {
        let annotations = VisionAnnotations {
            web_entities: vec![WebEntity::new("noise", 0.5)],
            ..Default::default()
        };
        // 0.5 is not strictly above the threshold
        assert_eq!(generate_description(&annotations), EMPTY_FALLBACK);
    }

    #[test]
    fn test_quality_thresholds() {
        let high = VisionAnnotations {
            quality_score: Some(0.9),
            ..Default::default()
        };
        assert_eq!(generate_description(&high), "This is a high-quality image. ");

        let low = VisionAnnotations {
            quality_score: Some(0.3),
            ..Default::default()
        };
        assert_eq!(
            generate_description(&low),
            "The image is of relatively low quality. "
        );

        let middle = VisionAnnotations {
            quality_score: Some(0.5),
            ..Default::default()
        };
        assert_eq!(generate_description(&middle), EMPTY_FALLBACK);
    }

    #[test]
    fn test_fragment_order_with_all_sections() {
        let annotations = VisionAnnotations {
            labels: vec![
                LabelAnnotation::new("outdoor", 0.95),
                LabelAnnotation::new("dog", 0.9),
            ],
            objects: vec![ObjectAnnotation::new("Dog")],
            faces: vec![face(Likelihood::VeryLikely, Likelihood::Unknown)],
            colors: vec![ColorAnnotation::new(Rgb::new(255, 0, 0), 0.8)],
            text: vec![TextAnnotation::new("BEWARE")],
            landmarks: vec![LandmarkAnnotation::new("Hyde Park")],
            logos: vec![LogoAnnotation::new("Acme")],
            web_entities: vec![WebEntity::new("golden retriever", 0.9)],
            quality_score: Some(0.95),
        };
        assert_eq!(
            generate_description(&annotations),
            "This appears to be an outdoor image. \
             The image shows outdoor, dog. \
             The image features Hyde Park. \
             There is 1 person in the image. \
             1 appears to be happy. \
             The image contains a Dog. \
             The image contains the Acme logo. \
             The dominant colors in the image are red. \
             The image contains the text: \"BEWARE\". \
             The image may be related to golden retriever. \
             This is a high-quality image. "
        );
    }

    #[test]
    fn test_idempotence() {
        let annotations = VisionAnnotations {
            labels: vec![LabelAnnotation::new("cat", 0.9)],
            objects: vec![ObjectAnnotation::new("Cat"), ObjectAnnotation::new("Cat")],
            colors: vec![
                ColorAnnotation::new(Rgb::new(10, 250, 10), 0.4),
                ColorAnnotation::new(Rgb::new(160, 100, 40), 0.6),
            ],
            ..Default::default()
        };
        let first = generate_description(&annotations);
        let second = generate_description(&annotations);
        assert_eq!(first, second);
        assert_eq!(
            first,
            "The image shows cat. The image contains 2 Cats. \
             The dominant colors in the image are brown, green. "
        );
    }
}
