#![forbid(unsafe_code)]
//! track_layout: repeat a line and marker pattern along a guide path of straight runs and
//! tangent arcs.
//!
//! Modules:
//! - geometry: poses and the local-to-global transforms along straights and curves
//! - path: guide paths, drafting primitives, and reconstruction of a path from unordered primitives
//! - pattern: the repeating motif of parallel lines, transverse lines and markers
//! - layout: pitch adjustment, the layout engine, and emission sinks
//!
//! Runnable demos live in the `track_layout_examples` crate.
pub mod error;
pub mod geometry;
pub mod layout;
pub mod path;
pub mod pattern;

/// Convenient re-exports for common types. Import with `use track_layout::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result, SinkError};
    pub use crate::geometry::Pose;
    pub use crate::layout::{
        draw_path, layout, repetition_count, ArcSegment, Emission, FnSink, Layout, LayoutConfig,
        LayoutStats, LineSegment, MarkerPoint, MultiSink, SinkResult, TrackBuilder, TrackSink,
        VecSink,
    };
    pub use crate::path::primitive::{PolylineVertex, RawPrimitive};
    pub use crate::path::reconstruct::{
        reconstruct, OrientedPrimitive, ReconstructOptions, Reconstruction,
    };
    pub use crate::path::{ElementSpan, Path, PathElement};
    pub use crate::pattern::{
        LayerId, Marker, ParallelLine, Pattern, Placement, TransverseLine,
    };
}
