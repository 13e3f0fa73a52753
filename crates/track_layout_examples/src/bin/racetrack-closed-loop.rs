use std::f64::consts::PI;

use track_layout::prelude::*;
use track_layout_examples::{init_tracing, PngSink, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let path = Path::new(vec![
        PathElement::start((0.0, 0.0), 0.0),
        PathElement::straight(100.0),
        PathElement::curve(PI, 20.0),
        PathElement::straight(100.0),
        PathElement::curve(PI, 20.0),
    ])?;

    // Two rails with a cross tie and a via on each side per repetition.
    let pattern = Pattern::new()
        .with_placement(Placement::parallel_line(0.0, 1.0, 3.0, 0.4, "F.Cu"))
        .with_placement(Placement::parallel_line(0.0, 1.0, -3.0, 0.4, "F.Cu"))
        .with_placement(Placement::transverse_line(0.5, -3.0, 3.0, 0.3, "B.Cu"))
        .with_placement(Placement::marker(0.5, 3.0))
        .with_placement(Placement::marker(0.5, -3.0));

    let builder = TrackBuilder::try_new(LayoutConfig::new(12.0), pattern)?;

    let mut config = RenderConfig::new((1200, 600));
    config
        .set_layer_color("F.Cu", [200, 60, 40])
        .set_layer_color("B.Cu", [40, 90, 200]);
    let mut sink = PngSink::new(config).with_guide(&path);

    let result = builder.draw(&path, &mut sink)?;
    let stats = result.stats();
    println!(
        "{} repetitions at pitch {:.4} (nominal 12): {} lines, {} arcs, {} markers",
        result.repetitions, result.effective_pitch, stats.lines, stats.arcs, stats.markers
    );

    sink.save("racetrack-closed-loop.png")?;
    Ok(())
}
