//! Demo simulation configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use shelfmark_core::{ItemDefaults, TrackingProfile};

const DEFAULT_CONFIG_PATH: &str = "config/shelfmark.toml";

/// One scripted item scan: the code and where on the shelf it lands.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemScan {
    /// Barcode payload delivered by the simulated scanner.
    pub upc: String,
    /// World-space target on the shelf face.
    pub target: [f32; 3],
}

/// Demo simulation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for reproducible hit jitter.
    pub seed: u64,
    /// Maximum jitter applied to simulated hit positions, metres.
    pub jitter: f32,
    /// Directory holding the planogram export.
    pub data_dir: PathBuf,
    /// Section barcode scanned first.
    pub section_code: String,
    /// Where the section scan lands on the shelf.
    pub section_target: [f32; 3],
    /// Item scans, in order.
    pub items: Vec<ItemScan>,
    /// Defaults stamped onto scanned items.
    pub defaults: ItemDefaults,
    /// Session request handed to the (simulated) tracker.
    pub tracking: TrackingProfile,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            jitter: 0.004,
            data_dir: PathBuf::from("data"),
            section_code: "1234509876".to_owned(),
            section_target: [0.0, 1.5, 0.0],
            items: vec![
                ItemScan {
                    upc: "012345678905".to_owned(),
                    target: [0.55, 1.5, 0.0],
                },
                ItemScan {
                    upc: "036000291452".to_owned(),
                    target: [1.1, 1.25, 0.0],
                },
                ItemScan {
                    upc: "078000082166".to_owned(),
                    target: [-0.6, 1.7, 0.0],
                },
            ],
            defaults: ItemDefaults::default(),
            tracking: TrackingProfile::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                Self::default()
            }
        }
    }
}
