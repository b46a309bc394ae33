//! Encodings: composable paths of moves in the flip graph.
//!
//! An [`Encoding`] is a chain of [`Move`]s where each move's target is the
//! next one's source. It acts on laminations by applying its moves strictly
//! in order. The zero-length encoding on a triangulation is the identity.
//!
//! Equality of encodings is operational: two encodings with the same
//! endpoints are equal when they send every edge arc of the source to the
//! same lamination (see [`Encoding::try_eq`]).

pub mod mapping_class;
pub mod moves;

use std::fmt;
use std::sync::Arc;

use crate::debug_invariants::DebugInvariants;
use crate::lamination::Lamination;
use crate::surface_error::SurfaceError;
use crate::topology::edge::Edge;
use crate::topology::triangulation::Triangulation;

use self::moves::{Move, Transport};

/// Same triangulation, by pointer or by structure.
pub(crate) fn same_triangulation(a: &Arc<Triangulation>, b: &Arc<Triangulation>) -> bool {
    Arc::ptr_eq(a, b) || **a == **b
}

/// A sequence of moves, stored in the order they are applied.
#[derive(Clone)]
pub struct Encoding {
    source: Arc<Triangulation>,
    target: Arc<Triangulation>,
    moves: Vec<Move>,
}

impl Encoding {
    /// The zero-length encoding on `triangulation`.
    pub fn identity(triangulation: Arc<Triangulation>) -> Self {
        Encoding {
            target: Arc::clone(&triangulation),
            source: triangulation,
            moves: Vec::new(),
        }
    }

    pub fn from_move(step: Move) -> Self {
        Encoding {
            source: Arc::clone(step.source()),
            target: Arc::clone(step.target()),
            moves: vec![step],
        }
    }

    /// Chains `moves` starting from `source`, checking that endpoints meet.
    pub fn from_moves(
        source: Arc<Triangulation>,
        moves: impl IntoIterator<Item = Move>,
    ) -> Result<Self, SurfaceError> {
        moves
            .into_iter()
            .try_fold(Encoding::identity(source), Encoding::then_move)
    }

    #[inline]
    pub fn source(&self) -> &Arc<Triangulation> {
        &self.source
    }

    #[inline]
    pub fn target(&self) -> &Arc<Triangulation> {
        &self.target
    }

    /// Moves in application order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Whether source and target are the same triangulation.
    pub fn is_mapping_class(&self) -> bool {
        same_triangulation(&self.source, &self.target)
    }

    // -------------------------------------------------------------------------
    // Composition
    // -------------------------------------------------------------------------

    /// Appends one move after the current target.
    pub fn then_move(mut self, step: Move) -> Result<Self, SurfaceError> {
        if !same_triangulation(&self.target, step.source()) {
            return Err(SurfaceError::TriangulationMismatch("move does not start at the target"));
        }
        self.target = Arc::clone(step.target());
        self.moves.push(step);
        Ok(self)
    }

    /// Appends a flip of `edge` of the current target.
    pub fn flip(self, edge: Edge) -> Result<Self, SurfaceError> {
        let step = Move::flip(Arc::clone(&self.target), edge)?;
        self.then_move(step)
    }

    /// `self` first, then `other`.
    pub fn then(&self, other: &Encoding) -> Result<Encoding, SurfaceError> {
        if !same_triangulation(&self.target, &other.source) {
            return Err(SurfaceError::TriangulationMismatch("composing encodings"));
        }
        let mut moves = Vec::with_capacity(self.moves.len() + other.moves.len());
        moves.extend(self.moves.iter().cloned());
        moves.extend(other.moves.iter().cloned());
        Ok(Encoding {
            source: Arc::clone(&self.source),
            target: Arc::clone(&other.target),
            moves,
        })
    }

    /// `self` after `other`, i.e. `self ∘ other`.
    pub fn compose(&self, other: &Encoding) -> Result<Encoding, SurfaceError> {
        other.then(self)
    }

    /// Reverses the path, inverting each move.
    pub fn inverse(&self) -> Encoding {
        Encoding {
            source: Arc::clone(&self.target),
            target: Arc::clone(&self.source),
            moves: self.moves.iter().rev().map(Transport::inverse).collect(),
        }
    }

    // -------------------------------------------------------------------------
    // Action on laminations
    // -------------------------------------------------------------------------

    /// Pushes `lamination` through every move in order.
    pub fn apply(&self, lamination: &Lamination) -> Result<Lamination, SurfaceError> {
        if !same_triangulation(lamination.triangulation(), &self.source) {
            return Err(SurfaceError::TriangulationMismatch(
                "lamination is not on the encoding's source",
            ));
        }
        let mut current = lamination.clone();
        for step in &self.moves {
            let weights = step.transport(&current)?;
            current = Lamination::from_parts(Arc::clone(step.target()), weights);
        }
        Ok(current)
    }

    /// Images of the edge arcs of the source, one row per edge.
    pub fn intersection_matrix(&self) -> Result<Vec<Vec<i64>>, SurfaceError> {
        Lamination::edge_arcs(&self.source)
            .iter()
            .map(|arc| self.apply(arc).map(Lamination::into_weights))
            .collect()
    }

    /// Operational equality: same endpoints and the same image of every edge arc.
    pub fn try_eq(&self, other: &Encoding) -> Result<bool, SurfaceError> {
        if !same_triangulation(&self.source, &other.source)
            || !same_triangulation(&self.target, &other.target)
        {
            return Err(SurfaceError::TriangulationMismatch("comparing encodings"));
        }
        let arcs = Lamination::edge_arcs(&self.source);
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            arcs.par_iter()
                .map(|arc| Ok(self.apply(arc)? == other.apply(arc)?))
                .try_reduce(|| true, |x, y| Ok(x && y))
        }
        #[cfg(not(feature = "rayon"))]
        {
            for arc in &arcs {
                if self.apply(arc)? != other.apply(arc)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
    }
}

impl fmt::Debug for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.moves.iter()).finish()
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.moves.is_empty() {
            return f.write_str("Id");
        }
        for (i, step) in self.moves.iter().enumerate() {
            if i > 0 {
                f.write_str(" . ")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl DebugInvariants for Encoding {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Encoding");
    }

    fn validate_invariants(&self) -> Result<(), SurfaceError> {
        let mut at = &self.source;
        for (i, step) in self.moves.iter().enumerate() {
            crate::ensure_invariant!(
                same_triangulation(at, step.source()),
                "move {i} ({step}) does not start where move {} ends",
                i.saturating_sub(1)
            );
            at = step.target();
        }
        crate::ensure_invariant!(
            same_triangulation(at, &self.target),
            "last move does not end at the target"
        );
        Ok(())
    }
}
