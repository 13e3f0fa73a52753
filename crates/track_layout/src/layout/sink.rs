//! The emission boundary: sinks that materialize laid-out primitives.
//!
//! The engine calls a [`TrackSink`] once per primitive, strictly in order. Implement it to
//! write to a board, a file, or anything else; the helpers here collect, forward, fan out,
//! or discard emissions.
use crate::error::SinkError;
use crate::layout::emission::{ArcSegment, Emission, LineSegment, MarkerPoint};

pub type SinkResult = std::result::Result<(), SinkError>;

/// Receiver for laid-out primitives.
///
/// An error from any method aborts the remaining layout; primitives already accepted are not
/// rolled back.
pub trait TrackSink {
    fn emit_line(&mut self, line: &LineSegment) -> SinkResult;

    fn emit_arc(&mut self, arc: &ArcSegment) -> SinkResult;

    fn emit_marker(&mut self, marker: &MarkerPoint) -> SinkResult;

    /// Dispatches to the method matching the emission kind.
    fn emit(&mut self, emission: &Emission) -> SinkResult {
        match emission {
            Emission::Line(line) => self.emit_line(line),
            Emission::Arc(arc) => self.emit_arc(arc),
            Emission::Marker(marker) => self.emit_marker(marker),
        }
    }
}

/// A no-op sink.
impl TrackSink for () {
    #[inline]
    fn emit_line(&mut self, _line: &LineSegment) -> SinkResult {
        Ok(())
    }

    #[inline]
    fn emit_arc(&mut self, _arc: &ArcSegment) -> SinkResult {
        Ok(())
    }

    #[inline]
    fn emit_marker(&mut self, _marker: &MarkerPoint) -> SinkResult {
        Ok(())
    }
}

impl<S: TrackSink + ?Sized> TrackSink for &mut S {
    fn emit_line(&mut self, line: &LineSegment) -> SinkResult {
        (**self).emit_line(line)
    }

    fn emit_arc(&mut self, arc: &ArcSegment) -> SinkResult {
        (**self).emit_arc(arc)
    }

    fn emit_marker(&mut self, marker: &MarkerPoint) -> SinkResult {
        (**self).emit_marker(marker)
    }

    fn emit(&mut self, emission: &Emission) -> SinkResult {
        (**self).emit(emission)
    }
}

/// A sink that forwards every emission to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(&Emission) -> SinkResult,
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(&Emission) -> SinkResult,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> TrackSink for FnSink<F>
where
    F: FnMut(&Emission) -> SinkResult,
{
    fn emit_line(&mut self, line: &LineSegment) -> SinkResult {
        (self.f)(&Emission::Line(line.clone()))
    }

    fn emit_arc(&mut self, arc: &ArcSegment) -> SinkResult {
        (self.f)(&Emission::Arc(arc.clone()))
    }

    fn emit_marker(&mut self, marker: &MarkerPoint) -> SinkResult {
        (self.f)(&Emission::Marker(*marker))
    }

    #[inline]
    fn emit(&mut self, emission: &Emission) -> SinkResult {
        (self.f)(emission)
    }
}

/// A sink that collects all emissions in a `Vec`.
#[derive(Debug, Default)]
pub struct VecSink {
    emissions: Vec<Emission>,
}

impl VecSink {
    pub fn new() -> Self {
        Self {
            emissions: Vec::new(),
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            emissions: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<Emission> {
        self.emissions
    }

    pub fn as_slice(&self) -> &[Emission] {
        &self.emissions
    }

    pub fn clear(&mut self) {
        self.emissions.clear();
    }

    pub fn len(&self) -> usize {
        self.emissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emissions.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineSegment> {
        self.emissions.iter().filter_map(Emission::as_line)
    }

    pub fn arcs(&self) -> impl Iterator<Item = &ArcSegment> {
        self.emissions.iter().filter_map(Emission::as_arc)
    }

    pub fn markers(&self) -> impl Iterator<Item = &MarkerPoint> {
        self.emissions.iter().filter_map(Emission::as_marker)
    }
}

impl TrackSink for VecSink {
    fn emit_line(&mut self, line: &LineSegment) -> SinkResult {
        self.emissions.push(Emission::Line(line.clone()));
        Ok(())
    }

    fn emit_arc(&mut self, arc: &ArcSegment) -> SinkResult {
        self.emissions.push(Emission::Arc(arc.clone()));
        Ok(())
    }

    fn emit_marker(&mut self, marker: &MarkerPoint) -> SinkResult {
        self.emissions.push(Emission::Marker(*marker));
        Ok(())
    }

    #[inline]
    fn emit(&mut self, emission: &Emission) -> SinkResult {
        self.emissions.push(emission.clone());
        Ok(())
    }
}

/// Fan-out sink that forwards each emission to all contained sinks, in order.
///
/// Stops at the first sink that fails; later sinks do not see that emission.
pub struct MultiSink<S: TrackSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: TrackSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: TrackSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TrackSink> TrackSink for MultiSink<S> {
    fn emit_line(&mut self, line: &LineSegment) -> SinkResult {
        self.sinks.iter_mut().try_for_each(|s| s.emit_line(line))
    }

    fn emit_arc(&mut self, arc: &ArcSegment) -> SinkResult {
        self.sinks.iter_mut().try_for_each(|s| s.emit_arc(arc))
    }

    fn emit_marker(&mut self, marker: &MarkerPoint) -> SinkResult {
        self.sinks.iter_mut().try_for_each(|s| s.emit_marker(marker))
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;

    fn line() -> LineSegment {
        LineSegment {
            start: DVec2::ZERO,
            end: DVec2::X,
            width: 0.2,
            layer: "F.Cu".into(),
        }
    }

    fn marker() -> MarkerPoint {
        MarkerPoint {
            position: DVec2::ONE,
            drill: 0.3,
            pad: 0.6,
        }
    }

    #[test]
    fn vec_sink_collects_emissions() {
        let mut sink = VecSink::with_capacity(2);
        assert!(sink.is_empty());
        sink.emit_line(&line()).unwrap();
        sink.emit(&Emission::Marker(marker())).unwrap();
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.lines().count(), 1);
        assert_eq!(sink.markers().count(), 1);
        assert_eq!(sink.arcs().count(), 0);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn multi_sink_fans_out_emissions() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        multi.emit(&Emission::Line(line())).unwrap();
        assert_eq!(multi.len(), 2);
        assert_eq!(multi.sinks[0].len(), 1);
        assert_eq!(multi.sinks[1].len(), 1);
        assert!(matches!(multi.sinks[1].as_slice()[0], Emission::Line(_)));
    }

    #[test]
    fn fn_sink_invokes_callback_and_propagates_failure() {
        let mut count = 0;
        let mut sink = FnSink::new(|emission: &Emission| {
            count += 1;
            match emission {
                Emission::Marker(_) => Err("markers unsupported".into()),
                _ => Ok(()),
            }
        });
        assert!(sink.emit_line(&line()).is_ok());
        let err = sink.emit_marker(&marker()).unwrap_err();
        assert_eq!(err.to_string(), "markers unsupported");
        drop(sink);
        assert_eq!(count, 2);
    }

    fn emit_twice(mut sink: impl TrackSink) {
        sink.emit_marker(&marker()).unwrap();
        sink.emit(&Emission::Line(line())).unwrap();
    }

    #[test]
    fn mutable_reference_forwards_to_inner_sink() {
        let mut inner = VecSink::new();
        emit_twice(&mut inner);
        assert_eq!(inner.len(), 2);
    }

    #[test]
    fn unit_sink_discards() {
        assert!(TrackSink::emit_line(&mut (), &line()).is_ok());
        emit_twice(());
    }
}
