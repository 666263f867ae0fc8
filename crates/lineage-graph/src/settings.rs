use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("No configuration directory available on this platform")]
    NoConfigDir,
    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Card geometry and spacing, in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub card_width: f32,
    pub card_height: f32,
    pub spouse_gap: f32,
    /// Horizontal gap between sibling subtrees.
    pub sibling_gap: f32,
    /// Vertical gap between generations.
    pub generation_gap: f32,
    /// Offset of a single tree from the canvas origin.
    pub padding: f32,
    pub forest_margin: f32,
    pub forest_tree_spacing: f32,
    pub min_canvas_width: f32,
    pub min_canvas_height: f32,
    /// Upper bound on root-finding hops. `None` climbs until a founder or a cycle.
    pub max_ancestor_hops: Option<usize>,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            card_width: 160.0,
            card_height: 200.0,
            spouse_gap: 10.0,
            sibling_gap: 40.0,
            generation_gap: 100.0,
            padding: 80.0,
            forest_margin: 80.0,
            forest_tree_spacing: 400.0,
            min_canvas_width: 1000.0,
            min_canvas_height: 800.0,
            max_ancestor_hops: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Exponent applied to wheel deltas: `factor = exp(-delta * intensity)`.
    pub zoom_intensity: f32,
    /// Screen distance a pointer must travel before a press becomes a pan.
    pub drag_threshold: f32,
    /// Scene-space margin around each card that still counts as a hit.
    pub hit_tolerance: f32,
    /// Used for centering until the interaction layer reports a real size.
    pub default_viewport_width: f32,
    pub default_viewport_height: f32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            min_scale: 0.3,
            max_scale: 50.0,
            zoom_intensity: 0.01,
            drag_threshold: 3.0,
            hit_tolerance: 0.0,
            default_viewport_width: 800.0,
            default_viewport_height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    pub layout: LayoutSettings,
    pub view: ViewSettings,
}

impl TreeSettings {
    /// Location of the user settings file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lineage").join("settings.json"))
    }

    /// Loads the user settings file, falling back to defaults on any problem.
    pub fn load() -> Self {
        if let Some(path) = Self::default_path() {
            tracing::info!("Loading settings from {:?}", path);
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(settings) => {
                        tracing::info!("Settings loaded successfully: {:?}", settings);
                        return settings;
                    }
                    Err(e) => tracing::error!("{}", e),
                }
            } else {
                tracing::info!("Settings file not found, using defaults");
            }
        }
        Self::default()
    }

    /// Strict variant for explicitly requested files: every failure is reported.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self) -> Result<PathBuf, SettingsError> {
        let path = Self::default_path().ok_or(SettingsError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let write_err = |source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent()
            && !dir.exists()
        {
            std::fs::create_dir_all(dir).map_err(write_err)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_err)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let layout = &self.layout;
        let positive = [
            ("layout.card_width", layout.card_width),
            ("layout.card_height", layout.card_height),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }

        let non_negative = [
            ("layout.spouse_gap", layout.spouse_gap),
            ("layout.sibling_gap", layout.sibling_gap),
            ("layout.generation_gap", layout.generation_gap),
            ("layout.padding", layout.padding),
            ("layout.forest_margin", layout.forest_margin),
            ("layout.forest_tree_spacing", layout.forest_tree_spacing),
            ("view.drag_threshold", self.view.drag_threshold),
            ("view.hit_tolerance", self.view.hit_tolerance),
        ];
        for (field, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("must not be negative, got {value}"),
                });
            }
        }

        let view = &self.view;
        if view.min_scale.is_nan() || view.min_scale <= 0.0 {
            return Err(SettingsError::Invalid {
                field: "view.min_scale",
                reason: format!("must be positive, got {}", view.min_scale),
            });
        }
        if view.min_scale > view.max_scale {
            return Err(SettingsError::Invalid {
                field: "view.max_scale",
                reason: format!(
                    "must be at least min_scale ({}), got {}",
                    view.min_scale, view.max_scale
                ),
            });
        }
        Ok(())
    }
}
