//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, broken path topology, non-tangent joins, out-of-domain numeric input,
//! out-of-range path queries, and failures reported by an emission sink.
use glam::DVec2;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error type returned by [`crate::layout::sink::TrackSink`] implementations.
pub type SinkError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raw primitives do not form exactly one connected chain.
    #[error("structural error: {message} (primitives {primitives:?})")]
    Structural {
        message: String,
        primitives: Vec<usize>,
    },

    /// Adjacent primitives meet at a shared endpoint but their headings disagree.
    #[error(
        "non-tangent join at junction {junction} between primitive {from} and primitive {to} at {location}: headings differ by {:.4}°",
        .deviation.to_degrees()
    )]
    Tangency {
        junction: usize,
        from: usize,
        to: usize,
        location: DVec2,
        /// Absolute heading difference in radians.
        deviation: f64,
    },

    #[error("{field} out of domain: {message}")]
    Domain { field: String, message: String },

    #[error("distance {distance} is outside the path range [0, {length}]")]
    OutOfRange { distance: f64, length: f64 },

    /// The emission sink rejected a primitive; everything before `index` was already emitted.
    #[error("sink rejected {primitive} at emission index {index}: {source}")]
    Emission {
        index: usize,
        primitive: &'static str,
        #[source]
        source: SinkError,
    },
}

impl Error {
    pub(crate) fn domain(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Domain {
            field: field.into(),
            message: message.into(),
        }
    }

    pub(crate) fn structural(message: impl Into<String>, primitives: Vec<usize>) -> Self {
        Error::Structural {
            message: message.into(),
            primitives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_helper_names_the_field() {
        let err = Error::domain("nominal_pitch", "must be > 0");
        assert_eq!(err.to_string(), "nominal_pitch out of domain: must be > 0");
    }

    #[test]
    fn tangency_message_reports_degrees() {
        let err = Error::Tangency {
            junction: 1,
            from: 0,
            to: 3,
            location: DVec2::new(1.0, 2.0),
            deviation: 10f64.to_radians(),
        };
        let msg = err.to_string();
        assert!(msg.contains("junction 1"), "{msg}");
        assert!(msg.contains("10.0000°"), "{msg}");
    }

    #[test]
    fn emission_error_exposes_source() {
        let err = Error::Emission {
            index: 4,
            primitive: "arc",
            source: "board is read-only".into(),
        };
        let source = std::error::Error::source(&err).expect("source present");
        assert_eq!(source.to_string(), "board is read-only");
    }
}
