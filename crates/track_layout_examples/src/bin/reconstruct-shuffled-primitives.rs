use std::f64::consts::{FRAC_PI_2, PI};

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use track_layout::prelude::*;
use track_layout_examples::{init_tracing, PngSink, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // A rounded rectangle as a drawing would store it: undirected, unordered, arcs CCW.
    let mut primitives = vec![
        RawPrimitive::line((10.0, 0.0), (70.0, 0.0)),
        RawPrimitive::arc((70.0, 10.0), 10.0, -FRAC_PI_2, 0.0),
        RawPrimitive::line((80.0, 40.0), (80.0, 10.0)),
        RawPrimitive::arc((70.0, 40.0), 10.0, 0.0, FRAC_PI_2),
        RawPrimitive::line((10.0, 50.0), (70.0, 50.0)),
        RawPrimitive::arc((10.0, 40.0), 10.0, FRAC_PI_2, PI),
        RawPrimitive::line((0.0, 10.0), (0.0, 40.0)),
        RawPrimitive::arc((10.0, 10.0), 10.0, PI, 1.5 * PI),
    ];

    let mut rng = StdRng::seed_from_u64(7);
    for i in (1..primitives.len()).rev() {
        let j = ((rng.random::<f64>() * (i + 1) as f64) as usize).min(i);
        primitives.swap(i, j);
    }

    let rec = reconstruct(&primitives, &ReconstructOptions::default())?;
    println!(
        "closed: {}, length {:.4}, order: {}",
        rec.closed,
        rec.path.total_length(),
        rec.order
            .iter()
            .map(|step| format!("{}{}", step.index, if step.reversed { "r" } else { "" }))
            .collect::<Vec<_>>()
            .join(" ")
    );

    let pattern = Pattern::new()
        .with_placement(Placement::parallel_line(0.1, 0.9, 1.5, 0.3, "F.Cu"))
        .with_placement(Placement::marker(0.0, 1.5));

    let mut config = RenderConfig::new((800, 560));
    config.set_layer_color("F.Cu", [30, 140, 60]);
    let mut sink = PngSink::new(config).with_guide(&rec.path);

    draw_path(&rec.path, &pattern, &LayoutConfig::new(4.0), &mut sink)?;
    sink.save("reconstruct-shuffled-primitives.png")?;
    Ok(())
}
