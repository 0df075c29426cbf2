use std::path::PathBuf;
use std::time::Duration;

use crate::error::{HeatmapError, Result};

pub const DEFAULT_ENDPOINT: &str =
    "https://coastwatch.pfeg.noaa.gov/erddap/griddap/usgsCeSrtm30v6.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// 30 arc-seconds, the native SRTM30 sample spacing.
pub const DEFAULT_CELL_DEGREES: f64 = 0.0083333;


/// Settings for talking to the elevation service and caching its answers.
#[derive(Debug, Clone)]
pub struct TopoConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub cache_dir: PathBuf,
    pub cell_degrees: f64,
}

impl Default for TopoConfig {
    fn default() -> Self {
        TopoConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_dir: PathBuf::from("."),
            cell_degrees: DEFAULT_CELL_DEGREES,
        }
    }
}

impl TopoConfig {
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(HeatmapError::Config("endpoint must not be empty".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(HeatmapError::Config("timeout must be at least one second".to_string()));
        }
        if !(self.cell_degrees > 0.0) {
            return Err(HeatmapError::Config(format!(
                "cell size must be positive, got {}",
                self.cell_degrees
            )));
        }
        Ok(())
    }
}
