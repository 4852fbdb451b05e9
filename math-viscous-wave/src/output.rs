//! Output JSON formatting and diagnostic summaries for field sweeps

use crate::config::{SweepConfig, TimeConfig};
use crate::sampler::SweepSummary;
use ndarray::{Array1, Array2};
use std::fmt::Write as FmtWrite;

/// Values computed by a sweep
#[derive(Debug, Clone, PartialEq)]
pub enum FieldResult {
    /// Radius profile at a single time
    Radial(Array1<f64>),
    /// Time × radius field, time-major
    Field(Array2<f64>),
}

impl FieldResult {
    /// Number of stored values
    pub fn len(&self) -> usize {
        match self {
            FieldResult::Radial(v) => v.len(),
            FieldResult::Field(v) => v.len(),
        }
    }

    /// True when the sweep has no points
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of non-finite values (tolerated, reported)
    pub fn non_finite_count(&self) -> usize {
        match self {
            FieldResult::Radial(v) => v.iter().filter(|x| !x.is_finite()).count(),
            FieldResult::Field(v) => v.iter().filter(|x| !x.is_finite()).count(),
        }
    }

    fn values_json(&self) -> serde_json::Value {
        match self {
            FieldResult::Radial(v) => serde_json::json!(v.to_vec()),
            FieldResult::Field(v) => serde_json::json!(
                v.rows()
                    .into_iter()
                    .map(|row| row.to_vec())
                    .collect::<Vec<_>>()
            ),
        }
    }
}

/// Create the output document of a sweep
///
/// Non-finite values are written as `null`.
pub fn create_output_json(
    config: &SweepConfig,
    summary: &SweepSummary,
    result: &FieldResult,
    elapsed_seconds: f64,
) -> serde_json::Value {
    let shape = match result {
        FieldResult::Radial(v) => vec![v.len()],
        FieldResult::Field(v) => vec![v.nrows(), v.ncols()],
    };

    serde_json::json!({
        "physics": config.physics,
        "critical_wavenumber": config.physics.critical_wavenumber(),
        "tolerances": config.tolerances,
        "kernel": config.kernel,
        "rule": config.rule,
        "radius": config.radius.values(),
        "time": config.time.values(),
        "shape": shape,
        "values": result.values_json(),
        "summary": summary,
        "metadata": {
            "description": config.metadata.description,
            "author": config.metadata.author,
            "version": crate::version(),
            "elapsed_seconds": elapsed_seconds,
            "non_finite_values": result.non_finite_count(),
        },
    })
}

/// Diagnostic text shown before a long sweep
pub fn sweep_summary_text(config: &SweepConfig, summary: &SweepSummary) -> String {
    let mut out = String::new();
    let p = &config.physics;
    let _ = writeln!(out, "\n=== Sweep Summary ===");
    let _ = writeln!(
        out,
        "Medium: c = {:.4e}, ω₀ = {:.4e}, k_crit = {:.4e}",
        p.wave_speed,
        p.damping_frequency,
        p.critical_wavenumber()
    );
    if let Some(source) = &p.source {
        let _ = writeln!(
            out,
            "Source: E₀ = {:.3e} J, β = {:.3e} 1/K, C_p = {:.3e}, pressure scale = {:.3e}",
            source.deposited_energy,
            source.thermal_expansion,
            source.specific_heat,
            p.pressure_scale()
        );
        let _ = writeln!(
            out,
            "        ρ = {:.1} kg/m³, T = {:.1} K, σ = {:.3e} m",
            source.density, source.temperature, source.source_width
        );
    }
    let _ = writeln!(
        out,
        "Radius: {} points in [{:.4e}, {:.4e}]",
        config.radius.points, config.radius.min, config.radius.max
    );
    match config.time {
        TimeConfig::Single { t } => {
            let _ = writeln!(out, "Time:   single t = {:.4e}", t);
        }
        TimeConfig::Grid { min, max, points } => {
            let _ = writeln!(out, "Time:   {} points in [{:.4e}, {:.4e}]", points, min, max);
        }
    }
    let t = &config.tolerances;
    let _ = writeln!(
        out,
        "Tolerances: δ = {:.2e}, N_p = {}, k_min = {:.1e}, N: {}",
        t.relative_error,
        t.samples_per_period,
        t.lower_bound,
        t.subinterval_policy.name()
    );
    let _ = writeln!(
        out,
        "Kernel: {}, rule: {}",
        config.kernel.name(),
        config.rule.name()
    );
    let _ = writeln!(
        out,
        "Points: {} ({} zero by definition)",
        summary.points, summary.degenerate_points
    );
    if let Some((lo, hi)) = summary.cutoff_range {
        let _ = writeln!(out, "Cutoff k₀: [{:.4e}, {:.4e}]", lo, hi);
    }
    let _ = writeln!(
        out,
        "Subintervals: {} total, {} max per point",
        summary.total_subintervals, summary.max_subintervals
    );
    let _ = writeln!(out, "Integrand evaluations: {:.3e}", summary.total_evaluations as f64);
    out
}

/// Print configuration summary
pub fn print_sweep_summary(config: &SweepConfig, summary: &SweepSummary) {
    print!("{}", sweep_summary_text(config, summary));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;
    use ndarray::array;

    fn summary() -> SweepSummary {
        SweepSummary {
            points: 4,
            degenerate_points: 2,
            radius_range: Some((0.0, 1.0)),
            time_range: Some((0.5, 0.5)),
            cutoff_range: Some((2.0, 40.0)),
            max_subintervals: 120,
            total_subintervals: 200,
            total_evaluations: 402,
        }
    }

    #[test]
    fn test_output_json_field() {
        let config = default_config();
        let result = FieldResult::Field(array![[0.0, 1.5], [f64::NAN, 2.0]]);
        let json = create_output_json(&config, &summary(), &result, 0.25);

        assert_eq!(json["shape"], serde_json::json!([2, 2]));
        assert_eq!(json["values"][0][1], 1.5);
        assert!(json["values"][1][0].is_null());
        assert_eq!(json["kernel"], "fundamental");
        assert_eq!(json["rule"], "shared");
        assert_eq!(json["metadata"]["non_finite_values"], 1);
        assert_eq!(json["summary"]["degenerate_points"], 2);
        assert_eq!(json["radius"].as_array().unwrap().len(), 81);
    }

    #[test]
    fn test_output_json_radial() {
        let config = default_config();
        let result = FieldResult::Radial(array![1.0, 2.0, 3.0]);
        let json = create_output_json(&config, &summary(), &result, 0.0);
        assert_eq!(json["shape"], serde_json::json!([3]));
        assert_eq!(json["values"][2], 3.0);
        assert_eq!(result.len(), 3);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_summary_text() {
        let text = sweep_summary_text(&default_config(), &summary());
        assert!(text.contains("Sweep Summary"));
        assert!(text.contains("Points: 4 (2 zero by definition)"));
        assert!(text.contains("Cutoff k₀"));
        assert!(text.contains("Kernel: fundamental, rule: shared"));
        assert!(text.contains("N: literal"));
        assert!(!text.contains("Source:"));
    }

    #[test]
    fn test_summary_text_reports_source_terms() {
        use crate::params::SourceTerms;
        let mut config = default_config();
        config.physics.source = Some(SourceTerms::liquid_xenon());
        let text = sweep_summary_text(&config, &summary());
        assert!(text.contains("Source: E₀ = 1.602e-16 J"));
        assert!(text.contains("ρ = 2953.0 kg/m³, T = 165.0 K, σ = 1.000e-6 m"));
    }
}
