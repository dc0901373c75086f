//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//! The defaults carry the built-in remote font map and the portable list of
//! system font locations the font resolver walks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::MatchgenError;

/// Known display families, keyed by normalized (lowercase) family name.
///
/// A `-bold` / `-italic` suffixed key is preferred for styled text.
pub const BUILTIN_REMOTE_FONTS: &[(&str, &str)] = &[
    (
        "montserrat",
        "https://github.com/google/fonts/raw/main/ofl/montserrat/Montserrat%5Bwght%5D.ttf",
    ),
    (
        "roboto",
        "https://github.com/google/fonts/raw/main/ofl/roboto/Roboto%5Bwdth,wght%5D.ttf",
    ),
    (
        "open sans",
        "https://github.com/google/fonts/raw/main/ofl/opensans/OpenSans%5Bwdth,wght%5D.ttf",
    ),
    (
        "oswald",
        "https://github.com/google/fonts/raw/main/ofl/oswald/Oswald%5Bwght%5D.ttf",
    ),
    (
        "bebas neue",
        "https://github.com/google/fonts/raw/main/ofl/bebasneue/BebasNeue-Regular.ttf",
    ),
    (
        "anton",
        "https://github.com/google/fonts/raw/main/ofl/anton/Anton-Regular.ttf",
    ),
    (
        "lato",
        "https://github.com/google/fonts/raw/main/ofl/lato/Lato-Regular.ttf",
    ),
    (
        "lato-bold",
        "https://github.com/google/fonts/raw/main/ofl/lato/Lato-Bold.ttf",
    ),
];

/// Well-known system font files, tried in order after the remote map.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    // macOS
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Output raster format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg {
        #[serde(default = "default_jpeg_quality")]
        quality: u8,
    },
}

fn default_jpeg_quality() -> u8 {
    90
}

fn default_fetch_timeout_ms() -> u64 {
    5_000
}

fn default_user_agent() -> String {
    concat!("matchgen/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_remote_fonts() -> BTreeMap<String, String> {
    BUILTIN_REMOTE_FONTS
        .iter()
        .map(|(family, url)| (family.to_string(), url.to_string()))
        .collect()
}

fn default_system_font_paths() -> Vec<PathBuf> {
    SYSTEM_FONT_PATHS.iter().map(PathBuf::from).collect()
}

/// Configuration for a [`CompositionEngine`](crate::render::CompositionEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Timeout for every single fetch (template, element image, font).
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Directory holding `<Family>.ttf` / `<Family>-<Style>.ttf` files.
    #[serde(default)]
    pub font_dir: Option<PathBuf>,
    /// Family → URL. Entries given in a config file are merged over the
    /// built-in map.
    #[serde(default = "default_remote_fonts", deserialize_with = "merge_remote_fonts")]
    pub remote_fonts: BTreeMap<String, String>,
    #[serde(default = "default_system_font_paths")]
    pub system_font_paths: Vec<PathBuf>,
    #[serde(default)]
    pub output: OutputFormat,
}

fn merge_remote_fonts<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let extra: BTreeMap<String, String> = BTreeMap::deserialize(deserializer)?;
    let mut fonts = default_remote_fonts();
    fonts.extend(
        extra
            .into_iter()
            .map(|(family, url)| (family.trim().to_lowercase(), url)),
    );
    Ok(fonts)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: default_fetch_timeout_ms(),
            user_agent: default_user_agent(),
            font_dir: None,
            remote_fonts: default_remote_fonts(),
            system_font_paths: default_system_font_paths(),
            output: OutputFormat::default(),
        }
    }
}

impl EngineConfig {
    /// A config that never touches the network or system fonts.
    ///
    /// Text renders with the built-in font, which keeps output identical
    /// across machines.
    pub fn offline() -> Self {
        Self {
            remote_fonts: BTreeMap::new(),
            system_font_paths: Vec::new(),
            ..Self::default()
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn from_json(json: &str) -> Result<Self, MatchgenError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MatchgenError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            MatchgenError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), MatchgenError> {
        if self.fetch_timeout_ms == 0 {
            return Err(MatchgenError::Config(
                "fetch_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if let OutputFormat::Jpeg { quality } = self.output
            && !(1..=100).contains(&quality)
        {
            return Err(MatchgenError::Config(format!(
                "jpeg quality must be 1-100, got {}",
                quality
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_json_is_default() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
        assert_eq!(config.output, OutputFormat::Png);
    }

    #[test]
    fn test_remote_fonts_merge_over_builtin() {
        let config = EngineConfig::from_json(
            r#"{"remote_fonts": {"Club Sans": "https://cdn.example.com/club.ttf"}}"#,
        )
        .unwrap();
        assert_eq!(
            config.remote_fonts.get("club sans").map(String::as_str),
            Some("https://cdn.example.com/club.ttf")
        );
        assert!(config.remote_fonts.contains_key("montserrat"));
    }

    #[test]
    fn test_output_format_parsing() {
        let config = EngineConfig::from_json(r#"{"output": {"format": "jpeg"}}"#).unwrap();
        assert_eq!(config.output, OutputFormat::Jpeg { quality: 90 });

        let err = EngineConfig::from_json(r#"{"output": {"format": "jpeg", "quality": 0}}"#);
        assert!(matches!(err, Err(MatchgenError::Config(_))));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(EngineConfig::from_json(r#"{"fetch_timeout_ms": 0}"#).is_err());
    }

    #[test]
    fn test_offline_has_no_font_sources() {
        let config = EngineConfig::offline();
        assert!(config.remote_fonts.is_empty());
        assert!(config.system_font_paths.is_empty());
        assert!(config.font_dir.is_none());
    }
}
