//! `Edge`: an oriented edge label of an ideal triangulation
//!
//! A triangulation with `zeta` edges labels them `0..zeta`. Each edge has two
//! orientations: label `i` and its reverse `!i` (two's complement, so
//! `!i == -1 - i`). The reverse of the reverse is the original label.
//!
//! This module provides:
//! - A transparent `Edge` newtype around `i32`.
//! - `!edge` for reversal and [`Edge::index`] for the unoriented edge index.
//! - Ordering that matches the raw labels, so reversed orientations sort
//!   before every non-negative label.

use std::{fmt, ops::Not};

/// An oriented edge label.
///
/// # Memory layout
/// `repr(transparent)`, same size and alignment as `i32`. Serialised as the
/// bare integer label.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Edge(i32);

impl Edge {
    /// Wraps a raw label. Negative labels are reversed orientations.
    #[inline]
    pub const fn new(label: i32) -> Self {
        Edge(label)
    }

    /// The non-negative orientation of edge `index`.
    #[inline]
    pub const fn positive(index: usize) -> Self {
        Edge(index as i32)
    }

    /// The raw label.
    #[inline]
    pub const fn label(self) -> i32 {
        self.0
    }

    /// The unoriented edge index, `max(label, !label)`.
    #[inline]
    pub const fn index(self) -> usize {
        if self.0 >= 0 {
            self.0 as usize
        } else {
            (!self.0) as usize
        }
    }

    /// True for the orientation labelled by a non-negative integer.
    #[inline]
    pub const fn is_positive(self) -> bool {
        self.0 >= 0
    }

    /// Position of this label in a `2 * zeta` lookup table: positive labels
    /// first, then the reversed ones.
    #[inline]
    pub(crate) const fn slot(self, zeta: usize) -> usize {
        if self.0 >= 0 {
            self.0 as usize
        } else {
            zeta + (!self.0) as usize
        }
    }

    /// Inverse of [`Edge::slot`].
    #[inline]
    pub(crate) const fn from_slot(slot: usize, zeta: usize) -> Self {
        if slot < zeta {
            Edge(slot as i32)
        } else {
            Edge(!((slot - zeta) as i32))
        }
    }
}

impl Not for Edge {
    type Output = Edge;

    #[inline]
    fn not(self) -> Edge {
        Edge(!self.0)
    }
}

impl From<i32> for Edge {
    #[inline]
    fn from(label: i32) -> Self {
        Edge(label)
    }
}

// -----------------------------------------------------------------------------
// Formatting traits
// -----------------------------------------------------------------------------

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Edge").field(&self.0).finish()
    }
}

/// Prints `3` for a positive label and `~3` for its reverse.
impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_positive() {
            write!(f, "{}", self.0)
        } else {
            write!(f, "~{}", self.index())
        }
    }
}

// -----------------------------------------------------------------------------
// Testing and assertions
// -----------------------------------------------------------------------------

#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::{assert_eq_align, assert_eq_size};

    assert_eq_size!(Edge, i32);
    assert_eq_align!(Edge, i32);
}


#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_is_the_bare_label() {
        let e = Edge::new(!1);
        let s = serde_json::to_string(&e).unwrap();
        assert_eq!(s, "-2");
        let back: Edge = serde_json::from_str(&s).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn bincode_roundtrip() {
        let e = Edge::new(11);
        let bytes = bincode::serialize(&e).unwrap();
        let back: Edge = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, e);
    }
}
