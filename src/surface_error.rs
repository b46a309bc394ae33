//! SurfaceError: Unified error type for flip-graph public APIs
//!
//! Every fallible operation in the crate returns `Result<_, SurfaceError>`.
//! Variants fall into three classes, reported by [`SurfaceError::kind`]:
//! - [`ErrorKind::Contract`]: the caller broke an API contract (wrong
//!   triangulation, unflippable edge, malformed gluing table, ...).
//! - [`ErrorKind::Assumption`]: coordinates turned out not to describe an
//!   embedded lamination, or a geometric precondition of a construction
//!   does not hold.
//! - [`ErrorKind::Internal`]: a guard that should be unreachable fired.
//!
//! Errors always propagate to the immediate caller; recovery is a policy
//! decision of the calling layer.

use thiserror::Error;

use crate::topology::edge::Edge;

/// Classification of a [`SurfaceError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Programmer error: the operation was called outside its contract.
    Contract,
    /// The input is not geometrically realizable as assumed.
    Assumption,
    /// Internal invariant failure (step guard exceeded, broken invariant).
    Internal,
}

/// Unified error type for flip-graph operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The gluing table does not describe a triangulation.
    #[error("invalid gluing table: {0}")]
    InvalidGluing(String),
    /// An edge label outside `-zeta..zeta`.
    #[error("edge {edge} does not exist in a triangulation with {zeta} edges")]
    UnknownEdge { edge: Edge, zeta: usize },
    /// A triangle index outside the triangulation.
    #[error("triangle {index} does not exist (triangulation has {count} triangles)")]
    UnknownTriangle { index: usize, count: usize },
    /// The edge borders the same triangle on both sides.
    #[error("edge {0} is not flippable: it borders a single triangle twice")]
    NotFlippable(Edge),
    /// Edges of a multi-flip share a triangle.
    #[error("edges {0} and {1} are adjacent and cannot be flipped simultaneously")]
    AdjacentEdges(Edge, Edge),
    /// Two objects were expected to live on the same triangulation.
    #[error("triangulation mismatch: {0}")]
    TriangulationMismatch(&'static str),
    /// A coordinate vector of the wrong length.
    #[error("expected {expected} coordinates, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    /// An encoding whose source and target differ was used as a mapping class.
    #[error("encoding does not start and end on the same triangulation")]
    NotAMappingClass,
    /// The endpoints of a mapping are not isometric.
    #[error("source and target triangulations are not isometric")]
    NotIsometric,
    /// A short curve was required.
    #[error("curve is not short: {0}")]
    NotShort(String),
    /// The lamination is not a single non-peripheral curve.
    #[error("lamination is not a curve: {0}")]
    NotACurve(String),
    /// The lamination contains no arc component.
    #[error("lamination is not a multiarc: {0}")]
    NotAMultiArc(String),
    /// A slope about a curve was asked of a lamination disjoint from it.
    #[error("slope is undefined for laminations disjoint from the curve")]
    UndefinedSlope,
    /// A half twist needs an arc between two distinct punctures.
    #[error("arc along edge {0} joins a puncture to itself")]
    ArcIsALoop(Edge),
    /// Integer overflow while combining twist powers.
    #[error("power {base} * {exponent} overflows")]
    PowerOverflow { base: i64, exponent: i64 },
    /// Coordinates that no embedded lamination has.
    #[error("unrealizable coordinates at edge {edge}: {reason}")]
    Unrealizable { edge: Edge, reason: &'static str },
    /// Propagating a partial label map hit a contradiction.
    #[error("no isometry extends the given labels: {0}")]
    InconsistentIsometry(&'static str),
    /// The construction only supports non-isolating curves.
    #[error("curve is isolating (short weight {weight})")]
    IsolatingCurve { weight: i64 },
    /// The lamination has arcs ending at a vertex the move creates or removes.
    #[error("terminal arcs at {0} block this move")]
    TerminalArcs(&'static str),
    /// A bounded loop ran past its bound.
    #[error("{algorithm} exceeded its step bound of {bound}")]
    StepBoundExceeded { algorithm: &'static str, bound: usize },
    /// A structural invariant was found broken.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl SurfaceError {
    /// Which class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        use SurfaceError::*;
        match self {
            InvalidGluing(_)
            | UnknownEdge { .. }
            | UnknownTriangle { .. }
            | NotFlippable(_)
            | AdjacentEdges(..)
            | TriangulationMismatch(_)
            | LengthMismatch { .. }
            | NotAMappingClass
            | NotIsometric
            | NotShort(_)
            | NotACurve(_)
            | NotAMultiArc(_)
            | PowerOverflow { .. } => ErrorKind::Contract,
            Unrealizable { .. }
            | InconsistentIsometry(_)
            | IsolatingCurve { .. }
            | TerminalArcs(_)
            | UndefinedSlope
            | ArcIsALoop(_) => ErrorKind::Assumption,
            StepBoundExceeded { .. } | InvariantViolation(_) => ErrorKind::Internal,
        }
    }

    /// Shorthand for `kind() == ErrorKind::Assumption`.
    pub fn is_assumption(&self) -> bool {
        self.kind() == ErrorKind::Assumption
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_partitioned() {
        assert_eq!(SurfaceError::NotFlippable(Edge::new(0)).kind(), ErrorKind::Contract);
        assert_eq!(
            SurfaceError::InconsistentIsometry("degree").kind(),
            ErrorKind::Assumption
        );
        assert_eq!(
            SurfaceError::StepBoundExceeded { algorithm: "shorten", bound: 3 }.kind(),
            ErrorKind::Internal
        );
        assert!(SurfaceError::TerminalArcs("pachner").is_assumption());
        assert!(SurfaceError::UndefinedSlope.is_assumption());
        assert!(SurfaceError::ArcIsALoop(Edge::new(1)).is_assumption());
    }

    #[test]
    fn messages_name_the_edge() {
        let err = SurfaceError::NotFlippable(Edge::new(!2));
        assert_eq!(
            err.to_string(),
            "edge ~2 is not flippable: it borders a single triangle twice"
        );
    }
}
