//! Parameter metadata for the structure pipeline
//!
//! This module provides metadata about configuration parameters, enabling:
//! - Grid search over swing period and lookback
//! - Parameter documentation
//! - Automatic configuration UI generation
//!
//! # Example
//!
//! ```rust
//! use swing_structure::params::{ParamMeta, ParamType, ParameterizedConfig};
//! use swing_structure::prelude::*;
//!
//! for param in StructureConfig::param_meta() {
//!     println!("{}: {:?} (default: {})", param.name, param.param_type, param.default);
//! }
//! ```

use std::collections::HashMap;

use crate::{Lookback, Result, StructureConfig, StructureError, SwingPeriod};

// ============================================================
// PARAMETER TYPES
// ============================================================

/// Type of parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
  /// Odd window width (>= 3)
  Period,
  /// Swing buffer capacity (>= 4)
  Capacity,
}

/// Metadata for a single pipeline parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
  /// Parameter name (e.g., "swing_period")
  pub name: &'static str,
  /// Parameter type
  pub param_type: ParamType,
  /// Default value
  pub default: f64,
  /// Range for optimization: (min, max, step)
  pub range: (f64, f64, f64),
  /// Human-readable description
  pub description: &'static str,
}

impl ParamMeta {
  /// Create a new ParamMeta for a Period parameter
  pub const fn period(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Period, default, range, description }
  }

  /// Create a new ParamMeta for a Capacity parameter
  pub const fn capacity(
    name: &'static str,
    default: f64,
    range: (f64, f64, f64),
    description: &'static str,
  ) -> Self {
    Self { name, param_type: ParamType::Capacity, default, range, description }
  }

  /// Generate all values for grid search
  pub fn generate_grid(&self) -> Vec<f64> {
    let (min, max, step) = self.range;
    let mut values = Vec::new();
    let mut v = min;
    while v <= max + f64::EPSILON {
      values.push(v);
      v += step;
    }
    values
  }

  /// Validate a value for this parameter
  pub fn validate(&self, value: f64) -> Result<()> {
    let (min, max, _) = self.range;
    if value < min || value > max {
      return Err(StructureError::OutOfRange { field: self.name, value, min, max });
    }
    if value.fract() != 0.0 {
      return Err(StructureError::InvalidValue("Parameter must be an integer"));
    }
    match self.param_type {
      ParamType::Period => SwingPeriod::new(value as usize).map(|_| ()),
      ParamType::Capacity => Lookback::new(value as usize).map(|_| ()),
    }
  }
}

/// Parameters exposed by [`StructureConfig`]
pub const STRUCTURE_PARAMS: &[ParamMeta] = &[
  ParamMeta::period(
    "swing_period",
    5.0,
    (3.0, 21.0, 2.0),
    "Fractal window width; a swing needs period/2 lower highs (higher lows) on each side",
  ),
  ParamMeta::capacity(
    "lookback",
    200.0,
    (4.0, 500.0, 4.0),
    "HTF bars scanned for swings and swings retained per kind",
  ),
];

// ============================================================
// PARAMETERIZED CONFIG TRAIT
// ============================================================

/// Trait for configurations that support parameterization
///
/// Implementing this trait enables:
/// - Discovery of available parameters
/// - Creation of configurations with custom parameter values
/// - Grid search optimization
pub trait ParameterizedConfig: Sized {
  /// Returns metadata for all configurable parameters
  fn param_meta() -> &'static [ParamMeta];

  /// Creates a configuration with parameters from a HashMap
  ///
  /// Missing parameters use their default values.
  fn with_params(params: &HashMap<&str, f64>) -> Result<Self>;
}

impl ParameterizedConfig for StructureConfig {
  fn param_meta() -> &'static [ParamMeta] {
    STRUCTURE_PARAMS
  }

  fn with_params(params: &HashMap<&str, f64>) -> Result<Self> {
    if let Some(unknown) = params.keys().find(|k| !STRUCTURE_PARAMS.iter().any(|m| m.name == **k)) {
      return Err(StructureError::InvalidConfig(format!("unknown parameter: {unknown}")));
    }
    Ok(Self {
      swing_period: get_swing_period(params, "swing_period", SwingPeriod::DEFAULT.get())?,
      lookback: get_lookback(params, "lookback", Lookback::DEFAULT.get())?,
      ..Self::default()
    })
  }
}

// ============================================================
// PARAMETER VALUE HELPERS
// ============================================================

/// Helper to get a SwingPeriod from params with default fallback
pub fn get_swing_period(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<SwingPeriod> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  SwingPeriod::new(value as usize)
}

/// Helper to get a Lookback from params with default fallback
pub fn get_lookback(params: &HashMap<&str, f64>, key: &str, default: usize) -> Result<Lookback> {
  let value = params.get(key).copied().unwrap_or(default as f64);
  Lookback::new(value as usize)
}

// ============================================================
// TESTS
// ============================================================

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_param_meta_defaults_match_config() {
    let config = StructureConfig::default();
    let metas = StructureConfig::param_meta();

    assert_eq!(metas.len(), 2);
    assert_eq!(metas[0].name, "swing_period");
    assert_eq!(metas[0].param_type, ParamType::Period);
    assert_eq!(metas[0].default as usize, config.swing_period.get());
    assert_eq!(metas[1].param_type, ParamType::Capacity);
    assert_eq!(metas[1].default as usize, config.lookback.get());
  }

  #[test]
  fn test_generate_grid() {
    let grid = STRUCTURE_PARAMS[0].generate_grid();
    assert_eq!(grid.len(), 10);
    assert!((grid[0] - 3.0).abs() < f64::EPSILON);
    assert!((grid[9] - 21.0).abs() < f64::EPSILON);
    // every grid value is a valid period
    assert!(grid.iter().all(|&v| STRUCTURE_PARAMS[0].validate(v).is_ok()));
  }

  #[test]
  fn test_validate_period() {
    let meta = &STRUCTURE_PARAMS[0];
    assert!(meta.validate(5.0).is_ok());
    assert!(meta.validate(21.0).is_ok());
    assert!(meta.validate(6.0).is_err());
    assert!(meta.validate(5.5).is_err());
    assert!(meta.validate(1.0).is_err());
    assert!(meta.validate(23.0).is_err());
  }

  #[test]
  fn test_validate_capacity() {
    let meta = &STRUCTURE_PARAMS[1];
    assert!(meta.validate(4.0).is_ok());
    assert!(meta.validate(500.0).is_ok());
    assert!(matches!(meta.validate(501.0), Err(StructureError::OutOfRange { .. })));
    assert!(meta.validate(3.0).is_err());
  }

  #[test]
  fn test_with_params() {
    let mut params = HashMap::new();
    params.insert("swing_period", 7.0);

    let config = StructureConfig::with_params(&params).unwrap();
    assert_eq!(config.swing_period.get(), 7);
    assert_eq!(config.lookback.get(), 200);

    params.insert("lookback", 3.0);
    assert!(StructureConfig::with_params(&params).is_err());

    let mut unknown = HashMap::new();
    unknown.insert("period", 5.0);
    assert!(matches!(
      StructureConfig::with_params(&unknown),
      Err(StructureError::InvalidConfig(_))
    ));
  }

  #[test]
  fn test_get_helpers() {
    let mut params = HashMap::new();
    params.insert("key1", 9.0);

    assert_eq!(get_swing_period(&params, "key1", 5).unwrap().get(), 9);
    assert_eq!(get_swing_period(&params, "key2", 5).unwrap().get(), 5);
    assert_eq!(get_lookback(&params, "key2", 50).unwrap().get(), 50);
    assert!(get_swing_period(&params, "key2", 4).is_err());
  }
}
