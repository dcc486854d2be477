//! Run configuration: JSON file plus defaults, turned into [`EngineOpts`].

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::engine::EngineOpts;
use crate::foundation::core::{Fps, Size};
use crate::foundation::error::{BootError, BootResult};
use crate::logs::filter::DisplayThreshold;

/// Everything a run can be configured with. Every field has a default, so an empty JSON object
/// is a valid configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootConfig {
    /// Archive locations, searched in order. The first one that exists is used.
    pub archive_paths: Vec<PathBuf>,
    /// Kernel log devices to tail in text mode.
    pub log_devices: Vec<PathBuf>,
    /// Directory holding `event<N>` input nodes.
    pub input_dir: PathBuf,
    /// Sysfs class directory used to read key capabilities.
    pub input_sysfs_dir: PathBuf,
    /// Font atlas image. The built-in atlas is used when unset or unreadable.
    pub font_path: Option<PathBuf>,
    /// Logo mask image.
    pub logo_mask_path: Option<PathBuf>,
    /// Logo shine image.
    pub logo_shine_path: Option<PathBuf>,
    /// Threshold at start-up.
    pub initial_threshold: DisplayThreshold,
    /// Logo animation rate in frames per second.
    pub logo_fps: u32,
    /// Text overlay refresh rate in frames per second.
    pub text_fps: u32,
    /// Headless surface width.
    pub display_width: u32,
    /// Headless surface height.
    pub display_height: u32,
    /// Stop after this many ticks.
    pub tick_limit: Option<u64>,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            archive_paths: vec![
                PathBuf::from("/data/local/bootanimation.zip"),
                PathBuf::from("/system/media/bootanimation.zip"),
            ],
            log_devices: vec![
                PathBuf::from("/dev/log/main"),
                PathBuf::from("/dev/log/system"),
            ],
            input_dir: PathBuf::from("/dev/input"),
            input_sysfs_dir: PathBuf::from("/sys/class/input"),
            font_path: None,
            logo_mask_path: None,
            logo_shine_path: None,
            initial_threshold: DisplayThreshold::SILENT,
            logo_fps: 12,
            text_fps: 5,
            display_width: 480,
            display_height: 800,
            tick_limit: None,
        }
    }
}

impl BootConfig {
    /// Load a JSON config file, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> BootResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .map_err(|e| BootError::config(format!("read '{}': {e}", path.display())))?;
        Self::from_json(&text)
            .map_err(|e| BootError::config(format!("'{}': {e}", path.display())))
    }

    /// Parse a JSON config document.
    pub fn from_json(text: &str) -> BootResult<Self> {
        let cfg: Self =
            serde_json::from_str(text).map_err(|e| BootError::config(format!("parse: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> BootResult<()> {
        if self.logo_fps == 0 || self.text_fps == 0 {
            return Err(BootError::config("logo_fps and text_fps must be > 0"));
        }
        if self.display_width == 0 || self.display_height == 0 {
            return Err(BootError::config("display size must be non-zero"));
        }
        Ok(())
    }

    /// Surface size for headless runs.
    pub fn display_size(&self) -> Size {
        Size::new(self.display_width, self.display_height)
    }

    /// Build engine options, reading the optional image files. Unreadable images are logged and
    /// replaced by the built-in ones.
    pub fn engine_opts(&self) -> BootResult<EngineOpts> {
        self.validate()?;
        Ok(EngineOpts {
            initial_threshold: self.initial_threshold,
            logo_fps: Fps::per_second(self.logo_fps)?,
            text_fps: Fps::per_second(self.text_fps)?,
            tick_limit: self.tick_limit,
            font_image: read_optional(self.font_path.as_deref(), "font"),
            logo_mask_image: read_optional(self.logo_mask_path.as_deref(), "logo mask"),
            logo_shine_image: read_optional(self.logo_shine_path.as_deref(), "logo shine"),
        })
    }
}

fn read_optional(path: Option<&Path>, what: &str) -> Option<Vec<u8>> {
    let path = path?;
    match std::fs::read(path).with_context(|| format!("read {what} image '{}'", path.display())) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "using the built-in {what} image");
            None
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
