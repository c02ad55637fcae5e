//! Generator settings: output location and defaults for new organizations

use crate::registry::AUTO_CONNECT_BOUNDS;
use crate::{Error, OrganizationRecord, Result, ServiceMode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Current settings version for migration support
pub const SETTINGS_VERSION: u32 = 1;

/// Target platform of the managed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Macos,
    Linux,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Windows, Platform::Macos, Platform::Linux];

    /// Where the WARP client looks for `mdm.xml`
    pub fn install_path(&self) -> &'static str {
        match self {
            Platform::Windows => r"C:\ProgramData\Cloudflare\mdm.xml",
            Platform::Macos => "/Library/Application Support/Cloudflare/mdm.xml",
            Platform::Linux => "/var/lib/cloudflare-warp/mdm.xml",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Macos => "macos",
            Platform::Linux => "linux",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Persistent settings for the generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub version: u32,
    pub output: OutputSection,
    pub defaults: DefaultsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    /// File name used when exporting without an explicit path
    pub file_name: String,
    /// Platform the file is prepared for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsSection {
    /// auto_connect given to new organizations, in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_connect: Option<i64>,
    /// service_mode given to new organizations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_mode: Option<ServiceMode>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            output: OutputSection {
                file_name: "mdm.xml".to_string(),
                platform: None,
            },
            defaults: DefaultsSection {
                auto_connect: Some(0),
                service_mode: Some(ServiceMode::FullTunnel),
            },
        }
    }
}

impl Settings {
    /// Get the default settings file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("warp-mdm")
            .join("config.toml")
    }

    /// Load settings from file, or create default if not exists
    pub fn load_or_default() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            let settings = Self::default();
            settings.save()?;
            Ok(settings)
        }
    }

    /// Load settings from a specific path
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;

        if settings.version > SETTINGS_VERSION {
            return Err(Error::config(format!(
                "Settings version {} is newer than supported version {}",
                settings.version, SETTINGS_VERSION
            )));
        }

        Ok(settings)
    }

    /// Save settings to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        self.save_to(&path)
    }

    /// Save settings to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.output.file_name.trim().is_empty() {
            return Err(Error::validation("Output file name cannot be empty"));
        }
        if let Some(minutes) = self.defaults.auto_connect {
            if !AUTO_CONNECT_BOUNDS.contains(minutes) {
                return Err(Error::validation(
                    "Default auto_connect must be between 0 and 1440 minutes",
                ));
            }
        }
        Ok(())
    }

    /// Where an export lands when no path is given
    pub fn output_path(&self) -> PathBuf {
        match self.output.platform {
            Some(platform) => PathBuf::from(platform.install_path()),
            None => PathBuf::from(&self.output.file_name),
        }
    }

    /// A new organization record carrying the configured defaults
    pub fn fresh_organization(&self) -> OrganizationRecord {
        OrganizationRecord {
            auto_connect: self.defaults.auto_connect,
            service_mode: self.defaults.service_mode,
            ..OrganizationRecord::default()
        }
    }
}
