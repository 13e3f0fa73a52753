use std::f64::consts::PI;
use std::time::Duration;

use criterion::{Criterion, Throughput};
use track_layout::prelude::{Path, PathElement};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

/// Straight run leading each serpentine turn.
const LOBE_STRAIGHT: f64 = 10.0;
/// Radius of each serpentine half turn.
const LOBE_RADIUS: f64 = 5.0;

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

/// Throughput in path elements, primitives or emissions per iteration.
pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Open meander of `turns` half turns alternating left and right, each led by a straight.
pub fn serpentine(turns: usize) -> Path {
    let mut elements = Vec::with_capacity(2 * turns + 1);
    elements.push(PathElement::start((0.0, 0.0), 0.0));
    for i in 0..turns {
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        elements.push(PathElement::straight(LOBE_STRAIGHT));
        elements.push(PathElement::curve(sign * PI, LOBE_RADIUS));
    }
    Path::new(elements).expect("valid serpentine")
}
