//! RGB-to-color-name classifier.
//!
//! An ordered decision list over 8-bit RGB. Rules are evaluated top to
//! bottom and the first match wins; the order is a contract, not an
//! implementation detail (white/black precede the hue buckets, hues precede
//! the gray-distance buckets, grays precede brown). Reordering changes the
//! result for boundary colors.

use picdesc_models::Rgb;

type Rule = (fn(u8, u8, u8) -> bool, &'static str);

/// Maximum pairwise channel difference for a color to count as gray.
const GRAY_TOLERANCE: u8 = 30;

fn is_grayish(r: u8, g: u8, b: u8) -> bool {
    r.abs_diff(g) < GRAY_TOLERANCE && g.abs_diff(b) < GRAY_TOLERANCE && r.abs_diff(b) < GRAY_TOLERANCE
}

/// The decision list. First match wins.
const RULES: &[Rule] = &[
    (|r, g, b| r > 220 && g > 220 && b > 220, "white"),
    (|r, g, b| r < 30 && g < 30 && b < 30, "black"),
    (|r, g, b| r > 200 && g < 70 && b < 70, "red"),
    (|r, g, b| r < 70 && g > 200 && b < 70, "green"),
    (|r, g, b| r < 70 && g < 70 && b > 200, "blue"),
    (|r, g, b| r > 200 && g > 200 && b < 70, "yellow"),
    (|r, g, b| r > 200 && g < 70 && b > 200, "magenta"),
    (|r, g, b| r < 70 && g > 200 && b > 200, "cyan"),
    (|r, g, b| r > 200 && g > 120 && g < 180 && b < 70, "orange"),
    (|r, g, b| r > 120 && r < 200 && g < 70 && b > 200, "purple"),
    (|r, g, b| r > 70 && r < 200 && g > 200 && b < 70, "lime"),
    (|r, g, b| r < 70 && g > 120 && g < 200 && b > 120 && b < 200, "teal"),
    (|r, g, b| r > 200 && g > 120 && g < 200 && b > 120 && b < 200, "pink"),
    (|r, g, b| r > 200 && g > 160 && g < 200 && b < 70, "gold"),
    (|r, g, b| is_grayish(r, g, b) && r < 80, "dark gray"),
    (|r, g, b| is_grayish(r, g, b) && r < 150, "gray"),
    (|r, g, b| is_grayish(r, g, b), "light gray"),
    (|r, g, b| r > 130 && r < 200 && g > 70 && g < 130 && b < 70, "brown"),
];

/// Classify an 8-bit RGB color into a human-readable name.
///
/// Total: every input maps to a name, with "mixed" as the catch-all.
pub fn color_name(rgb: Rgb) -> &'static str {
    let Rgb { red, green, blue } = rgb;
    RULES
        .iter()
        .find(|(matches, _)| matches(red, green, blue))
        .map(|(_, name)| *name)
        .unwrap_or("mixed")
}
