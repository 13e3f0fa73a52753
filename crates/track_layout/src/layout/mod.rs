//! Stamping a pattern along a path and handing the result to a sink.
pub mod config;
pub mod emission;
pub mod engine;
pub mod sink;

pub use config::LayoutConfig;
pub use emission::{ArcSegment, Emission, LineSegment, MarkerPoint};
pub use engine::{
    draw_path, layout, repetition_count, Layout, LayoutStats, TrackBuilder, MAX_REPETITIONS,
};
pub use sink::{FnSink, MultiSink, SinkResult, TrackSink, VecSink};
