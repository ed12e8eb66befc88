//! # Ground truth settings
//!
//! This module defines [`GroundTruthSettings`], the explicit and immutable configuration value
//! handed to [`GroundTruth::new`](crate::groundtruth::GroundTruth::new), together with its fluent
//! builder [`GroundTruthSettingsBuilder`] and the dataset kind [`GroundTruthKind`].
//!
//! ## Configuration surface
//! -----------------
//! | Field                 | Default                           | Meaning                                          |
//! |-----------------------|-----------------------------------|--------------------------------------------------|
//! | `kind`                | –                                 | Dataset format                                   |
//! | `base_path`           | –                                 | Dataset root directory                           |
//! | `name`                | `""`                              | Sequence name (KITTI, TUM, EuRoC)                |
//! | `start_frame_offset`  | `0`                               | Added to every requested frame id                |
//! | `associations`        | `None`                            | TUM association list file name                   |
//! | `groundtruth_file`    | `None`                            | Simple ground truth file name                    |
//! | `max_time_difference` | [`DEFAULT_MAX_TIME_DIFFERENCE`]   | Association threshold (seconds, exclusive)      |
//! | `time_offset`         | [`DEFAULT_TIME_OFFSET`]           | Added to ground truth timestamps when associating |
//! | `scale_factor`        | per-kind constant                 | Multiplier applied to positions                  |
//!
//! ## Loading from JSON
//! -----------------
//! [`GroundTruthSettings::from_json_file`] accepts the keys above, plus `type` as an alias of
//! `kind` and `start_frame_id` as an alias of `start_frame_offset`:
//!
//! ```json
//! { "type": "tum", "base_path": "/data/tum", "name": "rgbd_dataset_freiburg1_xyz",
//!   "associations": "associations.txt", "start_frame_id": 0 }
//! ```
//!
//! Both paths run the same validation.
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::{
    constants::{
        Seconds, DEFAULT_MAX_TIME_DIFFERENCE, DEFAULT_START_FRAME_OFFSET, DEFAULT_TIME_OFFSET,
        SCALE_EUROC, SCALE_KITTI, SCALE_SIMPLE, SCALE_TUM,
    },
    groundtruth_errors::GroundTruthError,
};

/// Supported ground truth dataset formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum GroundTruthKind {
    /// No ground truth available.
    None,
    Kitti,
    Tum,
    Euroc,
    /// `timestamp x y z scale` lines, used for video and image folder datasets.
    Simple,
}

impl GroundTruthKind {
    /// Scale factor applied to positions when none is configured.
    pub fn default_scale(&self) -> f64 {
        match self {
            GroundTruthKind::None | GroundTruthKind::Simple => SCALE_SIMPLE,
            GroundTruthKind::Kitti => SCALE_KITTI,
            GroundTruthKind::Tum => SCALE_TUM,
            GroundTruthKind::Euroc => SCALE_EUROC,
        }
    }

    /// Whether frames are resolved through an association map.
    pub fn is_associated(&self) -> bool {
        matches!(self, GroundTruthKind::Tum | GroundTruthKind::Euroc)
    }
}

impl FromStr for GroundTruthKind {
    type Err = GroundTruthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(GroundTruthKind::None),
            "kitti" => Ok(GroundTruthKind::Kitti),
            "tum" => Ok(GroundTruthKind::Tum),
            "euroc" => Ok(GroundTruthKind::Euroc),
            "simple" | "video" | "folder" => Ok(GroundTruthKind::Simple),
            other => Err(GroundTruthError::InvalidSetting(format!(
                "unknown ground truth type: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for GroundTruthKind {
    type Error = GroundTruthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Immutable configuration of a ground truth source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroundTruthSettings {
    #[serde(alias = "type")]
    pub kind: GroundTruthKind,
    pub base_path: Utf8PathBuf,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "start_frame_id")]
    pub start_frame_offset: usize,
    #[serde(default)]
    pub associations: Option<String>,
    #[serde(default)]
    pub groundtruth_file: Option<String>,
    #[serde(default = "default_max_time_difference")]
    pub max_time_difference: Seconds,
    #[serde(default)]
    pub time_offset: Seconds,
    #[serde(default)]
    pub scale_factor: Option<f64>,
}

fn default_max_time_difference() -> Seconds {
    DEFAULT_MAX_TIME_DIFFERENCE
}

impl GroundTruthSettings {
    /// Create a [`GroundTruthSettingsBuilder`] for a dataset of `kind` rooted at `base_path`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use groundtruth::settings::{GroundTruthKind, GroundTruthSettings};
    ///
    /// let settings = GroundTruthSettings::builder(GroundTruthKind::Euroc, "/data/euroc")
    ///     .name("MH_01_easy")
    ///     .start_frame_offset(10)
    ///     .max_time_difference(0.01)
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder(
        kind: GroundTruthKind,
        base_path: impl Into<Utf8PathBuf>,
    ) -> GroundTruthSettingsBuilder {
        GroundTruthSettingsBuilder::new(kind, base_path)
    }

    /// Read and validate settings from a JSON file.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, GroundTruthError> {
        if !path.is_file() {
            return Err(GroundTruthError::NotFound(path.to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse and validate settings from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, GroundTruthError> {
        let settings: GroundTruthSettings = serde_json::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Scale factor applied to positions: the configured one, else the kind's default.
    pub fn effective_scale(&self) -> f64 {
        self.scale_factor
            .unwrap_or_else(|| self.kind.default_scale())
    }

    /// Check value ranges and the per-kind required fields.
    ///
    /// Validation rules
    /// -----------------
    /// * `max_time_difference` must be finite and strictly positive.
    /// * `time_offset` and `scale_factor` must be finite.
    /// * KITTI, TUM and EuRoC need a non-empty `name`.
    /// * TUM needs `associations`, Simple needs `groundtruth_file`.
    pub fn validate(&self) -> Result<(), GroundTruthError> {
        let invalid = |msg: &str| Err(GroundTruthError::InvalidSetting(msg.into()));

        if !(self.max_time_difference.is_finite() && self.max_time_difference > 0.0) {
            return invalid("max_time_difference must be finite and > 0");
        }
        if !self.time_offset.is_finite() {
            return invalid("time_offset must be finite");
        }
        if self.scale_factor.is_some_and(|s| !s.is_finite()) {
            return invalid("scale_factor must be finite");
        }

        match self.kind {
            GroundTruthKind::Kitti | GroundTruthKind::Euroc if self.name.is_empty() => {
                invalid("a sequence name is required")
            }
            GroundTruthKind::Tum if self.name.is_empty() => invalid("a sequence name is required"),
            GroundTruthKind::Tum if self.associations.is_none() => {
                invalid("TUM ground truth requires an associations file")
            }
            GroundTruthKind::Simple if self.groundtruth_file.is_none() => {
                invalid("Simple ground truth requires a groundtruth_file")
            }
            _ => Ok(()),
        }
    }
}

/// Builder for [`GroundTruthSettings`], with validation.
#[derive(Debug, Clone)]
pub struct GroundTruthSettingsBuilder {
    settings: GroundTruthSettings,
}

impl GroundTruthSettingsBuilder {
    pub fn new(kind: GroundTruthKind, base_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            settings: GroundTruthSettings {
                kind,
                base_path: base_path.into(),
                name: String::new(),
                start_frame_offset: DEFAULT_START_FRAME_OFFSET,
                associations: None,
                groundtruth_file: None,
                max_time_difference: DEFAULT_MAX_TIME_DIFFERENCE,
                time_offset: DEFAULT_TIME_OFFSET,
                scale_factor: None,
            },
        }
    }

    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.settings.name = v.into();
        self
    }
    pub fn start_frame_offset(mut self, v: usize) -> Self {
        self.settings.start_frame_offset = v;
        self
    }
    pub fn associations(mut self, v: impl Into<String>) -> Self {
        self.settings.associations = Some(v.into());
        self
    }
    pub fn groundtruth_file(mut self, v: impl Into<String>) -> Self {
        self.settings.groundtruth_file = Some(v.into());
        self
    }
    pub fn max_time_difference(mut self, v: Seconds) -> Self {
        self.settings.max_time_difference = v;
        self
    }
    pub fn time_offset(mut self, v: Seconds) -> Self {
        self.settings.time_offset = v;
        self
    }
    pub fn scale_factor(mut self, v: f64) -> Self {
        self.settings.scale_factor = Some(v);
        self
    }

    /// Finalize the builder, running [`GroundTruthSettings::validate`].
    pub fn build(self) -> Result<GroundTruthSettings, GroundTruthError> {
        self.settings.validate()?;
        Ok(self.settings)
    }
}
