//! Model and format enums shared across the workspace.
//!
//! Wire representations match the upstream API exactly (`flux-kontext-pro`,
//! `21:9`, `png`), so these types serialize straight into request bodies
//! and persisted metadata.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// The two supported FLUX Kontext model variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FluxModel {
    #[serde(rename = "flux-kontext-pro")]
    KontextPro,
    #[serde(rename = "flux-kontext-max")]
    KontextMax,
}

impl FluxModel {
    /// Upstream endpoint path segment / wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::KontextPro => "flux-kontext-pro",
            Self::KontextMax => "flux-kontext-max",
        }
    }

    /// Parse a wire name, rejecting anything outside the two supported
    /// variants.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "flux-kontext-pro" => Ok(Self::KontextPro),
            "flux-kontext-max" => Ok(Self::KontextMax),
            _ => Err(CoreError::Validation(
                "Valid model is required (flux-kontext-pro or flux-kontext-max)".to_string(),
            )),
        }
    }
}

impl std::fmt::Display for FluxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Aspect ratios
// ---------------------------------------------------------------------------

/// The seven aspect ratios the provider accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "21:9")]
    UltraWide,
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "4:3")]
    Classic,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "9:16")]
    Vertical,
    #[serde(rename = "9:21")]
    UltraTall,
}

/// All valid aspect ratios in wire form.
pub const VALID_ASPECT_RATIOS: &[&str] = &["21:9", "16:9", "4:3", "1:1", "3:4", "9:16", "9:21"];

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UltraWide => "21:9",
            Self::Widescreen => "16:9",
            Self::Classic => "4:3",
            Self::Square => "1:1",
            Self::Portrait => "3:4",
            Self::Vertical => "9:16",
            Self::UltraTall => "9:21",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "21:9" => Ok(Self::UltraWide),
            "16:9" => Ok(Self::Widescreen),
            "4:3" => Ok(Self::Classic),
            "1:1" => Ok(Self::Square),
            "3:4" => Ok(Self::Portrait),
            "9:16" => Ok(Self::Vertical),
            "9:21" => Ok(Self::UltraTall),
            other => Err(CoreError::Validation(format!(
                "Invalid aspect ratio '{other}'. Must be one of: {}",
                VALID_ASPECT_RATIOS.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Output formats
// ---------------------------------------------------------------------------

/// Raster output format. The core flow always requests lossless PNG;
/// JPEG exists only as an upstream passthrough option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "png")]
    Png,
    #[serde(rename = "jpeg")]
    Jpeg,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_parse_valid() {
        assert_eq!(
            FluxModel::parse("flux-kontext-pro").unwrap(),
            FluxModel::KontextPro
        );
        assert_eq!(
            FluxModel::parse("flux-kontext-max").unwrap(),
            FluxModel::KontextMax
        );
    }

    #[test]
    fn model_parse_invalid() {
        let err = FluxModel::parse("flux-dev").unwrap_err();
        assert!(err.to_string().contains("flux-kontext-pro"));
    }

    #[test]
    fn model_serde_roundtrip() {
        let json = serde_json::to_string(&FluxModel::KontextMax).unwrap();
        assert_eq!(json, "\"flux-kontext-max\"");
        let back: FluxModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FluxModel::KontextMax);
    }

    #[test]
    fn aspect_ratio_parse_all_seven() {
        for wire in VALID_ASPECT_RATIOS {
            let ratio = AspectRatio::parse(wire).unwrap();
            assert_eq!(ratio.as_str(), *wire);
        }
    }

    #[test]
    fn aspect_ratio_parse_invalid() {
        assert!(AspectRatio::parse("2:1").is_err());
        assert!(AspectRatio::parse("").is_err());
    }

    #[test]
    fn aspect_ratio_serde_uses_wire_form() {
        let json = serde_json::to_string(&AspectRatio::UltraWide).unwrap();
        assert_eq!(json, "\"21:9\"");
    }

    #[test]
    fn output_format_defaults_to_png() {
        assert_eq!(OutputFormat::default(), OutputFormat::Png);
        assert_eq!(OutputFormat::default().as_str(), "png");
    }
}
