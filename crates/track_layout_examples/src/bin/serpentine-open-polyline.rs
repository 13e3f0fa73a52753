use track_layout::prelude::*;
use track_layout_examples::{init_tracing, PngSink, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Bulge 1 is a counter-clockwise half circle, -1 a clockwise one.
    let vertices = [
        PolylineVertex::new((0.0, 0.0), 0.0),
        PolylineVertex::new((40.0, 0.0), 1.0),
        PolylineVertex::new((40.0, 10.0), 0.0),
        PolylineVertex::new((0.0, 10.0), -1.0),
        PolylineVertex::new((0.0, 20.0), 0.0),
        PolylineVertex::new((40.0, 20.0), 1.0),
        PolylineVertex::new((40.0, 30.0), 0.0),
        PolylineVertex::new((0.0, 30.0), 0.0),
    ];
    let primitives = RawPrimitive::from_polyline(&vertices, false)?;
    let rec = reconstruct(&primitives, &ReconstructOptions::default())?;

    // A meander heater: one wide trace on the centerline with a thermal via every cell.
    let pattern = Pattern::new()
        .with_placement(Placement::parallel_line(0.0, 1.0, 0.0, 1.2, "F.Cu"))
        .with_placement(Placement::parallel_line(0.0, 0.45, 2.0, 0.2, "F.SilkS"))
        .with_placement(Placement::marker_sized(0.75, 2.0, 0.4, 0.8));

    let layout_config = LayoutConfig::new(3.0);
    let computed = layout(&rec.path, &pattern, &layout_config)?;

    let mut config = RenderConfig::new((1000, 800)).with_margin(32);
    config
        .set_layer_color("F.Cu", [190, 110, 20])
        .set_layer_color("F.SilkS", [90, 90, 90]);
    let mut sink = PngSink::new(config).with_guide(&rec.path);
    computed.emit_to(&mut sink)?;

    println!(
        "open: {}, {} repetitions, {} primitives emitted",
        !rec.closed,
        computed.repetitions,
        sink.emissions().len()
    );
    sink.save("serpentine-open-polyline.png")?;
    Ok(())
}
