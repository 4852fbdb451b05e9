//! JSON configuration for field sweeps

use crate::error::{Result, WaveError};
use crate::kernel::Kernel;
use crate::params::PhysicalParameters;
use crate::plan::Tolerances;
use crate::quadrature::QuadratureRule;
use crate::sampler::{AxisGrid, FieldSampler};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete sweep configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Medium and source constants
    pub physics: PhysicalParameters,
    /// Radius axis
    pub radius: AxisGrid,
    /// Single time or time axis
    pub time: TimeConfig,
    /// Estimator tolerances
    #[serde(default)]
    pub tolerances: Tolerances,
    /// Integrated quantity
    #[serde(default)]
    pub kernel: Kernel,
    /// Quadrature evaluation order
    #[serde(default)]
    pub rule: QuadratureRule,
    /// Map grid points over worker threads
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Simulation metadata
    #[serde(default)]
    pub metadata: MetadataConfig,
}

fn default_parallel() -> bool {
    true
}

/// Time sampling of a sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TimeConfig {
    /// Radius profile at one time
    #[serde(rename = "single")]
    Single {
        /// Evaluation time
        t: f64,
    },
    /// Time × radius field
    #[serde(rename = "grid")]
    Grid {
        /// First time
        min: f64,
        /// Last time
        max: f64,
        /// Number of times
        points: usize,
    },
}

impl TimeConfig {
    /// Time values, one for `Single`
    pub fn values(&self) -> Vec<f64> {
        match *self {
            TimeConfig::Single { t } => vec![t],
            TimeConfig::Grid { min, max, points } => AxisGrid::new(min, max, points).values(),
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            TimeConfig::Single { t } if !t.is_finite() => Err(WaveError::InvalidGrid {
                axis: "time",
                reason: format!("non-finite time {t}"),
            }),
            TimeConfig::Single { .. } => Ok(()),
            TimeConfig::Grid { min, max, points } => {
                AxisGrid::new(min, max, points).validate("time")
            }
        }
    }
}

/// Simulation metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Author
    #[serde(default)]
    pub author: String,
}

impl SweepConfig {
    /// Load configuration from JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| WaveError::Config(format!("Failed to read config file: {}", e)))?;

        let config: SweepConfig = serde_json::from_str(&contents)
            .map_err(|e| WaveError::Config(format!("Failed to parse JSON: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| WaveError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, json)
            .map_err(|e| WaveError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.physics.validate()?;
        self.radius.validate("radius")?;
        self.time.validate()?;
        self.tolerances.validate()?;
        if self.kernel == Kernel::Pressure && self.physics.source.is_none() {
            log::warn!("Pressure kernel without source terms: output is ∂F/∂t (unit source)");
        }
        Ok(())
    }

    /// Validate and build the sampler described by this configuration
    pub fn to_sampler(&self) -> Result<FieldSampler> {
        self.validate()?;
        Ok(FieldSampler::new(self.physics, self.tolerances)?
            .kernel(self.kernel)
            .rule(self.rule)
            .parallel(self.parallel))
    }
}

/// Create a default configuration: unit medium, t ∈ [0.1, 3], r ∈ [0, 4]
pub fn default_config() -> SweepConfig {
    SweepConfig {
        physics: PhysicalParameters {
            wave_speed: 1.0,
            damping_frequency: 1.0,
            source: None,
        },
        radius: AxisGrid::new(0.0, 4.0, 81),
        time: TimeConfig::Grid {
            min: 0.1,
            max: 3.0,
            points: 30,
        },
        tolerances: Tolerances::default(),
        kernel: Kernel::Fundamental,
        rule: QuadratureRule::Shared,
        parallel: true,
        metadata: MetadataConfig {
            description: "Viscous wave fundamental solution, unit medium".to_string(),
            author: String::new(),
        },
    }
}
