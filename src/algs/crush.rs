//! Crushing a triangulation along a short, non-isolating curve.
//!
//! With `a` the edge parallel to the curve and `(a, b, e)` its corner, the
//! crushed triangulation swaps the labels `e` and `!b`, cutting the surface
//! open along the curve and collapsing each side to a puncture. Only the
//! coordinates of `b` and `e` change; the lift back is linear.

use crate::lamination::curve::Curve;
use crate::lamination::Lamination;
use crate::surface_error::SurfaceError;
use crate::topology::edge::Edge;
use crate::topology::triangulation::Triangulation;

/// Combinatorial data shared by a crush and its lift.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrushData {
    pub(crate) parallel: Edge,
    pub(crate) b: Edge,
    pub(crate) e: Edge,
    /// Vertex cycle of `parallel`, from `parallel` up to `!parallel`.
    pub(crate) around_parallel: Vec<Edge>,
    /// Vertex cycle of `c`, from `c` up to `!c`, where `(!e, c, d)` is a corner.
    pub(crate) around_opposite: Vec<Edge>,
    /// Multiplier of the `b` coordinate in each row of the lift.
    pub(crate) counts: Vec<i64>,
}

impl CrushData {
    pub fn parallel(&self) -> Edge {
        self.parallel
    }
}

/// The run of `cycle` starting at `from` and stopping before `to`.
pub(crate) fn cyclic_slice(cycle: &[Edge], from: Edge, to: Edge) -> Option<Vec<Edge>> {
    let start = cycle.iter().position(|&x| x == from)?;
    let run: Vec<Edge> = cycle[start..]
        .iter()
        .chain(&cycle[..start])
        .copied()
        .take_while(|&x| x != to)
        .collect();
    (run.len() < cycle.len()).then_some(run)
}

/// Builds the crushed triangulation for a short curve.
pub(crate) fn prepare(curve: &Curve) -> Result<(Triangulation, CrushData), SurfaceError> {
    let lamination = curve.lamination();
    let weight = lamination.weight();
    if weight != 2 {
        return Err(SurfaceError::IsolatingCurve { weight });
    }
    let source = lamination.triangulation();
    let a = curve.parallel()?;
    let [_, b, e] = source.corner(a);
    let [_, c, _] = source.corner(!e);

    let swap = |x: Edge| {
        if x == e {
            !b
        } else if x == !b {
            e
        } else {
            x
        }
    };
    let target = Triangulation::new(
        source
            .triangles()
            .iter()
            .map(|t| t.edges().map(|x| swap(x).label())),
    )?;

    let around = |x: Edge| {
        cyclic_slice(&source.vertices()[source.vertex_of(x)], x, !x).ok_or_else(|| {
            SurfaceError::InvariantViolation(format!("{} does not return to its own vertex", x))
        })
    };
    let around_parallel = around(a)?;
    let around_opposite = around(c)?;

    let mut counts = vec![0; source.zeta()];
    for x in &around_parallel[1..] {
        counts[x.index()] += 1;
    }
    let data = CrushData { parallel: a, b, e, around_parallel, around_opposite, counts };
    Ok((target, data))
}

/// Coordinates after crushing; `lamination` lives on the uncrushed triangulation.
pub(crate) fn crush_weights(data: &CrushData, lamination: &Lamination) -> Vec<i64> {
    let (wb, we) = (lamination.get(data.b), lamination.get(data.e));
    let (new_b, new_e) = if wb < 0 || we < 0 {
        (wb + we, wb + we)
    } else {
        let min_side = |cycle: &[Edge]| {
            cycle.iter().map(|&x| lamination.side_weight(x)).min().unwrap_or(0)
        };
        (min_side(&data.around_parallel), min_side(&data.around_opposite))
    };
    let mut weights = lamination.weights().to_vec();
    weights[data.b.index()] = new_b;
    weights[data.e.index()] = new_e;
    weights
}

/// Coordinates after lifting; `lamination` lives on the crushed triangulation.
pub(crate) fn lift_weights(data: &CrushData, lamination: &Lamination) -> Vec<i64> {
    let weights = lamination.weights();
    let (b, e) = (data.b.index(), data.e.index());
    weights
        .iter()
        .enumerate()
        .map(|(j, &w)| {
            if j == b {
                w + weights[e]
            } else {
                w + data.counts[j] * weights[b]
            }
        })
        .collect()
}

/// The lift as a dense matrix: row `j` gives the new coordinate `j`.
pub fn lift_matrix(data: &CrushData) -> Vec<Vec<i64>> {
    let zeta = data.counts.len();
    let (b, e) = (data.b.index(), data.e.index());
    (0..zeta)
        .map(|j| {
            (0..zeta)
                .map(|i| {
                    if i == j {
                        1
                    } else if i == b {
                        data.counts[j]
                    } else if i == e && j == b {
                        1
                    } else {
                        0
                    }
                })
                .collect()
        })
        .collect()
}
