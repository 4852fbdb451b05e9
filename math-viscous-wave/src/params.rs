//! Physical constants of the viscous acoustic medium and of the source.

use crate::error::{Result, require_positive};
use serde::{Deserialize, Serialize};

/// Speed of sound in liquid xenon near its boiling point (m/s)
pub const LXE_WAVE_SPEED: f64 = 650.0;

/// Immutable description of the medium.
///
/// Built once per experiment and shared read-only by every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalParameters {
    /// Sound speed c (> 0)
    pub wave_speed: f64,
    /// Viscous damping frequency ω₀ (> 0)
    pub damping_frequency: f64,
    /// Thermoacoustic source terms, needed only for pressure output
    #[serde(default)]
    pub source: Option<SourceTerms>,
}

impl PhysicalParameters {
    /// Create validated parameters without source terms.
    pub fn new(wave_speed: f64, damping_frequency: f64) -> Result<Self> {
        Ok(Self {
            wave_speed: require_positive("wave_speed", wave_speed)?,
            damping_frequency: require_positive("damping_frequency", damping_frequency)?,
            source: None,
        })
    }

    /// Attach validated source terms.
    pub fn with_source(mut self, source: SourceTerms) -> Result<Self> {
        source.validate()?;
        self.source = Some(source);
        Ok(self)
    }

    /// Re-check every field (used after deserialization).
    pub fn validate(&self) -> Result<()> {
        require_positive("wave_speed", self.wave_speed)?;
        require_positive("damping_frequency", self.damping_frequency)?;
        if let Some(source) = &self.source {
            source.validate()?;
        }
        Ok(())
    }

    /// k_crit = 2ω₀/c, where modes switch from oscillatory to overdamped
    #[inline]
    pub fn critical_wavenumber(&self) -> f64 {
        2.0 * self.damping_frequency / self.wave_speed
    }

    /// Modal damping rate a(k) = c²k²/(2ω₀)
    #[inline]
    pub fn damping_rate(&self, k: f64) -> f64 {
        let ck = self.wave_speed * k;
        ck * ck / (2.0 * self.damping_frequency)
    }

    /// Factor turning ∂F/∂t into pressure, 1 without source terms.
    pub fn pressure_scale(&self) -> f64 {
        self.source
            .as_ref()
            .map_or(1.0, |s| s.pressure_scale(self.wave_speed))
    }
}

/// Point energy deposition in the liquid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceTerms {
    /// Volumetric thermal expansion coefficient β (1/K)
    pub thermal_expansion: f64,
    /// Deposited energy E₀ (J)
    pub deposited_energy: f64,
    /// Specific heat at constant pressure C_p (J/(kg·K))
    pub specific_heat: f64,
    /// Mass density ρ (kg/m³)
    pub density: f64,
    /// Temperature T (K)
    pub temperature: f64,
    /// Spatial width σ of the deposition (m)
    pub source_width: f64,
}

impl SourceTerms {
    /// Check every term is finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        require_positive("thermal_expansion", self.thermal_expansion)?;
        require_positive("deposited_energy", self.deposited_energy)?;
        require_positive("specific_heat", self.specific_heat)?;
        require_positive("density", self.density)?;
        require_positive("temperature", self.temperature)?;
        require_positive("source_width", self.source_width)?;
        Ok(())
    }

    /// β c² E₀ / C_p
    pub fn pressure_scale(&self, wave_speed: f64) -> f64 {
        self.thermal_expansion * wave_speed * wave_speed * self.deposited_energy
            / self.specific_heat
    }

    /// Approximate liquid xenon at 165 K with a 1 keV deposit.
    pub fn liquid_xenon() -> Self {
        Self {
            thermal_expansion: 4.0e-3,
            deposited_energy: 1.602e-16,
            specific_heat: 340.0,
            density: 2953.0,
            temperature: 165.0,
            source_width: 1.0e-6,
        }
    }
}
