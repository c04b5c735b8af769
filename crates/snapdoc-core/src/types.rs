// SPDX-License-Identifier: MIT
//
// Core domain types for the Snapdoc assembly pipeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an item in the assembly collection.
///
/// Stable for the item's lifetime; never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Quarter-turn rotation applied to a page at render time.
///
/// Rotation is stored as metadata and applied once during rendering, so
/// repeated rotate operations never degrade image fidelity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Advance by a quarter turn clockwise (+90° mod 360).
    pub fn advance(self) -> Self {
        match self {
            Self::R0 => Self::R90,
            Self::R90 => Self::R180,
            Self::R180 => Self::R270,
            Self::R270 => Self::R0,
        }
    }

    /// Rotation in degrees: one of 0, 90, 180, 270.
    pub fn degrees(self) -> u16 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
            Self::R180 => 180,
            Self::R270 => 270,
        }
    }
}

/// Visual filter applied to a page at render time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageFilter {
    #[default]
    None,
    Grayscale,
    /// Grayscale plus a contrast boost, approximating a flatbed scan.
    BlackAndWhite,
}

impl PageFilter {
    /// Advance along the none → grayscale → black-and-white → none cycle.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Grayscale,
            Self::Grayscale => Self::BlackAndWhite,
            Self::BlackAndWhite => Self::None,
        }
    }
}

/// Lifecycle of the per-item text extraction request.
///
/// `Pending` implies exactly one in-flight request exists for the item. A new
/// request may start from any state except `Pending` (retry from `Failed`,
/// re-extract from `Done`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionState {
    #[default]
    Idle,
    Pending,
    Done,
    Failed,
}

/// Output page sizing strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSize {
    /// Each page adopts its source image's own dimensions.
    #[default]
    Auto,
    A4,
    Letter,
}

impl PageSize {
    /// Dimensions in millimetres (width, height) for fixed sizes.
    ///
    /// Returns `None` for [`PageSize::Auto`], where page dimensions come from
    /// the rendered image instead.
    pub fn dimensions_mm(&self) -> Option<(u32, u32)> {
        match self {
            Self::Auto => None,
            Self::A4 => Some((210, 297)),
            Self::Letter => Some((216, 279)),
        }
    }
}

/// Page orientation. Only meaningful for fixed page sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Document-level settings consumed by the assembler.
///
/// Constructed with defaults and updated field-by-field as the user adjusts
/// controls; the assembler reads a settings value and never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSettings {
    pub page_size: PageSize,
    pub orientation: Orientation,
    /// Compression/re-encoding quality in [0.1, 1.0].
    #[serde(deserialize_with = "deserialize_quality")]
    quality: f32,
    /// When present and non-empty, the output artifact is encrypted.
    pub password: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub subject: Option<String>,
}

/// The quality invariant holds even for persisted settings, so deserialized
/// values pass through the same clamp as the setter.
fn deserialize_quality<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let quality = f32::deserialize(deserializer)?;
    Ok(quality.clamp(0.1, 1.0))
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            page_size: PageSize::Auto,
            orientation: Orientation::Portrait,
            quality: 0.8,
            password: None,
            author: None,
            title: None,
            subject: None,
        }
    }
}

impl DocumentSettings {
    /// Current compression quality.
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Set the compression quality, clamped to [0.1, 1.0].
    pub fn set_quality(&mut self, quality: f32) {
        self.quality = quality.clamp(0.1, 1.0);
    }

    /// The effective password: `Some` only when set and non-empty.
    pub fn effective_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_is_a_four_cycle() {
        let mut r = Rotation::R0;
        for _ in 0..4 {
            r = r.advance();
        }
        assert_eq!(r, Rotation::R0);
    }

    #[test]
    fn rotation_matches_ninety_times_count_mod_360() {
        let mut r = Rotation::R0;
        for count in 1..=13u32 {
            r = r.advance();
            assert_eq!(u32::from(r.degrees()), (90 * count) % 360);
        }
    }

    #[test]
    fn filter_is_a_three_cycle_from_any_start() {
        for start in [
            PageFilter::None,
            PageFilter::Grayscale,
            PageFilter::BlackAndWhite,
        ] {
            assert_eq!(start.next().next().next(), start);
        }
    }

    #[test]
    fn default_settings_match_contract() {
        let settings = DocumentSettings::default();
        assert_eq!(settings.page_size, PageSize::Auto);
        assert_eq!(settings.orientation, Orientation::Portrait);
        assert!((settings.quality() - 0.8).abs() < f32::EPSILON);
        assert!(settings.effective_password().is_none());
    }

    #[test]
    fn quality_is_clamped() {
        let mut settings = DocumentSettings::default();
        settings.set_quality(0.0);
        assert!((settings.quality() - 0.1).abs() < f32::EPSILON);
        settings.set_quality(2.5);
        assert!((settings.quality() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn deserialized_quality_is_clamped() {
        let json = r#"{"page_size":"Auto","orientation":"Portrait","quality":7.0,
                       "password":null,"author":null,"title":null,"subject":null}"#;
        let settings: DocumentSettings = serde_json::from_str(json).expect("deserialize");
        assert!((settings.quality() - 1.0).abs() < f32::EPSILON);

        let json = json.replace("7.0", "0.0");
        let settings: DocumentSettings = serde_json::from_str(&json).expect("deserialize");
        assert!((settings.quality() - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_password_is_not_effective() {
        let mut settings = DocumentSettings::default();
        settings.password = Some(String::new());
        assert!(settings.effective_password().is_none());
        settings.password = Some("hunter2".into());
        assert_eq!(settings.effective_password(), Some("hunter2"));
    }

    #[test]
    fn fixed_page_sizes_have_dimensions() {
        assert_eq!(PageSize::A4.dimensions_mm(), Some((210, 297)));
        assert_eq!(PageSize::Letter.dimensions_mm(), Some((216, 279)));
        assert_eq!(PageSize::Auto.dimensions_mm(), None);
    }
}
