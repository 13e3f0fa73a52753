//! Configuration for laying a pattern along a path.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for a layout run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Intended length of one repetition; adjusted so repetitions exactly cover the path.
    pub nominal_pitch: f64,
    /// Distance under which the path ends count as coincident.
    pub closure_tolerance: f64,
    /// Spans shorter than this are not emitted.
    pub min_span: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            nominal_pitch: 0.0,
            closure_tolerance: 1e-6,
            min_span: 1e-9,
        }
    }
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`] with the specified nominal pitch.
    pub fn new(nominal_pitch: f64) -> Self {
        Self {
            nominal_pitch,
            ..Default::default()
        }
    }

    /// Sets the nominal pitch.
    pub fn with_nominal_pitch(mut self, nominal_pitch: f64) -> Self {
        self.nominal_pitch = nominal_pitch;
        self
    }

    /// Sets the closure tolerance.
    pub fn with_closure_tolerance(mut self, closure_tolerance: f64) -> Self {
        self.closure_tolerance = closure_tolerance;
        self
    }

    /// Sets the minimum emitted span length.
    pub fn with_min_span(mut self, min_span: f64) -> Self {
        self.min_span = min_span;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.nominal_pitch.is_finite() && self.nominal_pitch > 0.0) {
            return Err(Error::domain(
                "nominal_pitch",
                format!("must be finite and > 0, got {}", self.nominal_pitch),
            ));
        }
        if !(self.closure_tolerance.is_finite() && self.closure_tolerance >= 0.0) {
            return Err(Error::InvalidConfig(
                "closure_tolerance must be finite and >= 0".into(),
            ));
        }
        if !(self.min_span.is_finite() && self.min_span >= 0.0) {
            return Err(Error::InvalidConfig(
                "min_span must be finite and >= 0".into(),
            ));
        }
        Ok(())
    }
}
