use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::consts::{self, CONFIG_FILE_NAME};
use crate::error::{CurlyError, Result};
use crate::interpolate::{Interpolator, InterpolatorBuilder, Markers};
use crate::trust::StrictContextualEscaping;

/// curly.toml schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub markers: MarkersConfig,
    #[serde(default)]
    pub trust: TrustConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkersConfig {
    #[serde(default = "default_start")]
    pub start: String,
    #[serde(default = "default_end")]
    pub end: String,
    #[serde(default = "default_escaped_start")]
    pub escaped_start: String,
    #[serde(default = "default_escaped_end")]
    pub escaped_end: String,
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            end: default_end(),
            escaped_start: default_escaped_start(),
            escaped_end: default_escaped_end(),
        }
    }
}

fn default_start() -> String {
    consts::markers::START.to_string()
}

fn default_end() -> String {
    consts::markers::END.to_string()
}

fn default_escaped_start() -> String {
    consts::markers::ESCAPED_START.to_string()
}

fn default_escaped_end() -> String {
    consts::markers::ESCAPED_END.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Strict contextual escaping on/off
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// URL prefixes accepted as resource URLs without an explicit trust tag
    #[serde(default)]
    pub resource_url_whitelist: Vec<String>,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            resource_url_whitelist: Vec::new(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

impl Config {
    /// Read curly.toml
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CurlyError::ConfigParseError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| CurlyError::ConfigInvalid(e.to_string()))
    }

    /// Write curly.toml
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CurlyError::ConfigParseError(e.to_string()))?;

        std::fs::write(path.as_ref(), content).map_err(CurlyError::IoError)?;

        Ok(())
    }

    /// Find curly.toml in `start` or one of its parents
    pub fn find_file(start: impl AsRef<Path>) -> Option<PathBuf> {
        start
            .as_ref()
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load the nearest curly.toml, or the defaults when there is none
    pub fn discover(start: impl AsRef<Path>) -> Result<Self> {
        match Self::find_file(start) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Marker symbols described by `[markers]`
    pub fn markers(&self) -> Result<Markers> {
        let m = &self.markers;
        Markers::new(m.start.as_str(), m.end.as_str())
            .and_then(|markers| markers.with_escaped(m.escaped_start.as_str(), m.escaped_end.as_str()))
            .map_err(|e| CurlyError::ConfigInvalidValue {
                field: "markers".to_string(),
                reason: e.to_string(),
            })
    }

    /// Trust service described by `[trust]`
    pub fn trust_service(&self) -> StrictContextualEscaping {
        let service = if self.trust.enabled {
            StrictContextualEscaping::new()
        } else {
            StrictContextualEscaping::disabled()
        };
        service.with_resource_url_whitelist(self.trust.resource_url_whitelist.iter().cloned())
    }

    /// Builder preloaded with this configuration
    pub fn interpolator_builder(&self) -> Result<InterpolatorBuilder> {
        Ok(Interpolator::builder()
            .markers(self.markers()?)
            .trust(Arc::new(self.trust_service())))
    }

    pub fn interpolator(&self) -> Result<Interpolator> {
        Ok(self.interpolator_builder()?.build())
    }
}
