// Viewer configuration: defaults plus an optional JSON override from the page.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::counter::DEFAULT_LENS_HALF_SIZE_PX;
use crate::map::projection::LngLat;
use crate::state::camera::{MAX_ZOOM, MIN_ZOOM};

pub const CONFIG_ELEMENT_ID: &str = "viewer-config";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub label: String,
    /// Absolute URL or path relative to the page.
    pub url: String,
    pub color: String,
    pub stroke_color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub center: LngLat,
    pub zoom: f64,
    pub lens_half_size_px: f64,
    pub primary: DatasetConfig,
    pub secondary: DatasetConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            center: LngLat::new(-74.006, 40.7128),
            zoom: 13.0,
            lens_half_size_px: DEFAULT_LENS_HALF_SIZE_PX,
            primary: DatasetConfig {
                label: "OSM POIs".to_string(),
                url: "https://storage.googleapis.com/nycpoiosm/NYC_OSM_POI.geojson".to_string(),
                color: "#000".to_string(),
                stroke_color: "#fff".to_string(),
            },
            secondary: DatasetConfig {
                label: "Common POIs".to_string(),
                url: "https://storage.googleapis.com/nycpoiosm/NYC_POI.geojson".to_string(),
                color: "#fff".to_string(),
                stroke_color: "#000".to_string(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("viewer config is not valid JSON")]
    Parse(#[from] serde_json::Error),
    #[error("invalid viewer config: {0}")]
    Invalid(String),
}

impl ViewerConfig {
    /// Applies a JSON override on top of the defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let overrides: Value = serde_json::from_str(text)?;
        if !overrides.is_object() {
            return Err(ConfigError::Invalid("expected a JSON object".to_string()));
        }
        let mut merged = serde_json::to_value(Self::default())?;
        merge(&mut merged, overrides);
        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.zoom) {
            return Err(ConfigError::Invalid(format!(
                "zoom {} outside {}..={}",
                self.zoom, MIN_ZOOM, MAX_ZOOM
            )));
        }
        if !(self.lens_half_size_px > 0.0) {
            return Err(ConfigError::Invalid("lens_half_size_px must be positive".to_string()));
        }
        for (name, dataset) in [("primary", &self.primary), ("secondary", &self.secondary)] {
            if dataset.url.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{} dataset has no url", name)));
            }
        }
        Ok(())
    }
}

fn merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Reads the page's config block. Missing block means defaults; a broken one
/// is logged and also falls back to defaults.
pub fn read_page_config() -> ViewerConfig {
    let text = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content());
    match text {
        Some(text) if !text.trim().is_empty() => match ViewerConfig::from_json(&text) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{}; using defaults", err);
                ViewerConfig::default()
            }
        },
        _ => ViewerConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(ViewerConfig::from_json("{}").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn partial_dataset_override_keeps_other_fields() {
        let cfg = ViewerConfig::from_json(
            r#"{ "center": [2.35, 48.85], "primary": { "url": "data/osm.geojson" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.center, LngLat::new(2.35, 48.85));
        assert_eq!(cfg.primary.url, "data/osm.geojson");
        assert_eq!(cfg.primary.label, "OSM POIs");
        assert_eq!(cfg.secondary, ViewerConfig::default().secondary);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(ViewerConfig::from_json("[1]"), Err(ConfigError::Invalid(_))));
        assert!(matches!(ViewerConfig::from_json("{"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            ViewerConfig::from_json(r#"{ "zoom": "close" }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json(r#"{ "zoom": 40 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json(r#"{ "lens_half_size_px": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json(r#"{ "secondary": { "url": " " } }"#),
            Err(ConfigError::Invalid(_))
        ));
    }
}
