//! Reconstruction of a [`Path`] from an unordered bag of drafting primitives.
//!
//! Endpoints are merged into junction nodes (within [`ReconstructOptions::point_tolerance`]),
//! the resulting undirected graph is walked from a free end (or from the first primitive
//! when every node has degree two), and each joint is checked for tangent continuity.
//! Anything other than a single tangent-continuous chain is rejected; nothing is dropped.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use glam::DVec2;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geometry::{angle_between, normalize_angle};
use crate::path::primitive::RawPrimitive;
use crate::path::{Path, PathElement};

/// Tolerances used when stitching primitives together.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct ReconstructOptions {
    /// Two endpoints closer than this are the same junction.
    pub point_tolerance: f64,
    /// Largest heading difference, in radians, accepted at a junction.
    pub angle_tolerance: f64,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            point_tolerance: 1e-6,
            angle_tolerance: 1e-3,
        }
    }
}

impl ReconstructOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint matching tolerance.
    pub fn with_point_tolerance(mut self, point_tolerance: f64) -> Self {
        self.point_tolerance = point_tolerance;
        self
    }

    /// Sets the junction heading tolerance in radians.
    pub fn with_angle_tolerance(mut self, angle_tolerance: f64) -> Self {
        self.angle_tolerance = angle_tolerance;
        self
    }

    /// Validates the options, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.point_tolerance.is_finite() && self.point_tolerance > 0.0) {
            return Err(Error::InvalidConfig(
                "point_tolerance must be finite and > 0".into(),
            ));
        }
        if !(self.angle_tolerance.is_finite() && self.angle_tolerance > 0.0) {
            return Err(Error::InvalidConfig(
                "angle_tolerance must be finite and > 0".into(),
            ));
        }
        Ok(())
    }
}

/// A primitive placed in the chain with its travel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientedPrimitive {
    /// Index into the input slice.
    pub index: usize,
    /// Traversed from its natural end to its natural start.
    pub reversed: bool,
}

/// Result of a successful reconstruction.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct Reconstruction {
    /// The stitched path, starting at the chain head.
    pub path: Path,
    /// The chain returns to its first endpoint.
    pub closed: bool,
    /// Input primitives in chain order.
    pub order: Vec<OrientedPrimitive>,
}

const START: usize = 0;
const END: usize = 1;

/// A junction: every primitive end that lands within tolerance of `position`.
struct Node {
    position: DVec2,
    ends: Vec<(usize, usize)>,
}

struct JunctionGraph {
    nodes: Vec<Node>,
    /// Node ids of each primitive's `[START, END]`.
    node_of: Vec<[usize; 2]>,
}

impl JunctionGraph {
    fn build(primitives: &[RawPrimitive], tolerance: f64) -> Self {
        let mut graph = JunctionGraph {
            nodes: Vec::new(),
            node_of: Vec::with_capacity(primitives.len()),
        };
        for (index, primitive) in primitives.iter().enumerate() {
            let (a, b) = primitive.endpoints();
            let start = graph.attach(a, (index, START), tolerance);
            let end = graph.attach(b, (index, END), tolerance);
            graph.node_of.push([start, end]);
        }
        graph
    }

    fn attach(&mut self, position: DVec2, end: (usize, usize), tolerance: f64) -> usize {
        let existing = self
            .nodes
            .iter()
            .position(|n| n.position.distance(position) <= tolerance);
        match existing {
            Some(id) => {
                self.nodes[id].ends.push(end);
                id
            }
            None => {
                self.nodes.push(Node {
                    position,
                    ends: vec![end],
                });
                self.nodes.len() - 1
            }
        }
    }

    fn entry_node(&self, step: OrientedPrimitive) -> usize {
        self.node_of[step.index][if step.reversed { END } else { START }]
    }

    fn exit_node(&self, step: OrientedPrimitive) -> usize {
        self.node_of[step.index][if step.reversed { START } else { END }]
    }

    /// The other primitive end sharing the node `step` exits through.
    fn successor(&self, step: OrientedPrimitive) -> Option<OrientedPrimitive> {
        let exit_end = if step.reversed { START } else { END };
        self.nodes[self.exit_node(step)]
            .ends
            .iter()
            .find(|&&end| end != (step.index, exit_end))
            .map(|&(index, end)| OrientedPrimitive {
                index,
                reversed: end == END,
            })
    }
}

/// Orders, orients and validates `primitives` into a single path.
pub fn reconstruct(
    primitives: &[RawPrimitive],
    options: &ReconstructOptions,
) -> Result<Reconstruction> {
    options.validate()?;
    if primitives.is_empty() {
        return Err(Error::structural("no primitives to reconstruct", Vec::new()));
    }
    for (index, primitive) in primitives.iter().enumerate() {
        primitive.validate(index)?;
    }

    let graph = JunctionGraph::build(primitives, options.point_tolerance);
    if let Some(node) = graph.nodes.iter().find(|n| n.ends.len() > 2) {
        let mut shared: Vec<usize> = node.ends.iter().map(|&(index, _)| index).collect();
        shared.dedup();
        return Err(Error::structural(
            format!(
                "{} primitive ends meet at {}; a path junction joins exactly two",
                node.ends.len(),
                node.position
            ),
            shared,
        ));
    }

    let first = graph
        .nodes
        .iter()
        .find(|n| n.ends.len() == 1)
        .map(|n| {
            let (index, end) = n.ends[0];
            OrientedPrimitive {
                index,
                reversed: end == END,
            }
        })
        .unwrap_or(OrientedPrimitive {
            index: 0,
            reversed: false,
        });

    let mut used = vec![false; primitives.len()];
    used[first.index] = true;
    let mut order = vec![first];
    let mut current = first;
    while let Some(next) = graph.successor(current) {
        if used[next.index] {
            break;
        }
        used[next.index] = true;
        order.push(next);
        current = next;
    }

    let unused: Vec<usize> = (0..primitives.len()).filter(|&i| !used[i]).collect();
    if !unused.is_empty() {
        return Err(Error::structural(
            format!(
                "{} of {} primitives are not connected to the chain",
                unused.len(),
                primitives.len()
            ),
            unused,
        ));
    }

    let closed = graph.exit_node(current) == graph.entry_node(first);
    if !closed {
        orient_by_first_input(&mut order);
    }

    check_tangency(primitives, &order, closed, options.angle_tolerance)?;

    let head = order[0];
    let (location, _) = oriented_endpoints(&primitives[head.index], head.reversed);
    let (heading, _) = primitives[head.index].headings(head.reversed);
    let mut elements = Vec::with_capacity(order.len() + 1);
    elements.push(PathElement::start(location, normalize_angle(heading)));
    elements.extend(
        order
            .iter()
            .map(|step| primitives[step.index].to_element(step.reversed)),
    );
    let path = Path::new(elements)?;

    info!(
        "Reconstructed {} primitives into a {} path of length {:.4}.",
        order.len(),
        if closed { "closed" } else { "open" },
        path.total_length()
    );

    Ok(Reconstruction {
        path,
        closed,
        order,
    })
}

/// Flips an open chain so the first input primitive runs in its natural direction.
fn orient_by_first_input(order: &mut [OrientedPrimitive]) {
    let flip = order
        .iter()
        .find(|step| step.index == 0)
        .is_some_and(|step| step.reversed);
    if flip {
        order.reverse();
        for step in order.iter_mut() {
            step.reversed = !step.reversed;
        }
    }
}

fn oriented_endpoints(primitive: &RawPrimitive, reversed: bool) -> (DVec2, DVec2) {
    let (a, b) = primitive.endpoints();
    if reversed {
        (b, a)
    } else {
        (a, b)
    }
}

fn check_tangency(
    primitives: &[RawPrimitive],
    order: &[OrientedPrimitive],
    closed: bool,
    tolerance: f64,
) -> Result<()> {
    let joints = if closed { order.len() } else { order.len() - 1 };
    for junction in 0..joints {
        let from = order[junction];
        let to = order[(junction + 1) % order.len()];
        let (_, exit_heading) = primitives[from.index].headings(from.reversed);
        let (entry_heading, _) = primitives[to.index].headings(to.reversed);
        let deviation = angle_between(exit_heading, entry_heading).abs();
        debug!(
            "Junction {} ({} {} -> {} {}): heading deviation {:.3e} rad.",
            junction,
            primitives[from.index].kind_name(),
            from.index,
            primitives[to.index].kind_name(),
            to.index,
            deviation
        );
        if deviation > tolerance {
            let (_, location) = oriented_endpoints(&primitives[from.index], from.reversed);
            return Err(Error::Tangency {
                junction,
                from: from.index,
                to: to.index,
                location,
                deviation,
            });
        }
    }
    Ok(())
}
