//! The flip update rule: transporting a lamination's weight on the flipped
//! diagonal of a square.
//!
//! Given the square `[a, b, c, d, e]` around a flippable edge `e` (corners
//! `(e, a, b)` and `(!e, c, d)`), only the coordinate of the diagonal changes.
//! Its new value depends on how the lamination sits in the two triangles:
//!
//! - In generic position every strand either crosses the square or cuts off
//!   a corner, and the new diagonal weight is `max(a + c, b + d) - e`.
//! - Eight exceptional configurations involve strands that end at a corner of
//!   the square (terminal arcs) or sides that are themselves components of the
//!   lamination (negative weight). Each has its own closed form.
//!
//! Classification and update are table-driven: [`FLIP_RULES`] lists every
//! case with its guard and update formula, and the first case whose guard
//! matches wins. The sides `a, b, c, d` are clamped to be non-negative before
//! classification; the diagonal `e` is not, since a negative `e` means the
//! diagonal itself is carried by the lamination.

use std::fmt;

/// Which row of [`FLIP_RULES`] produced a flip result.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlipCase {
    /// `A(ab)`: strands from the `a`/`b` corner run into the far vertex.
    AnnularAB,
    /// `A(cd)`: mirror image of `A(ab)` across the diagonal.
    AnnularCD,
    /// `D(ad)`: the diagonal is carried, the square is `a`/`d` heavy.
    DiagonalAD,
    /// `D(bc)`: the diagonal is carried, the square is `b`/`c` heavy.
    DiagonalBC,
    /// `N(ad)`: terminal strands through sides `a` and `d`.
    DegenerateAD,
    /// `N(bc)`: terminal strands through sides `b` and `c`.
    DegenerateBC,
    /// `N(ab)`: strands entering and leaving through `a` and `b` pinch at `e`.
    DegenerateAB,
    /// `N(cd)`: mirror image of `N(ab)`.
    DegenerateCD,
    /// Generic position, `max(a + c, b + d) - e`.
    Standard,
}

impl FlipCase {
    /// All cases in the order they are tried.
    pub const ALL: [FlipCase; 9] = [
        FlipCase::AnnularAB,
        FlipCase::AnnularCD,
        FlipCase::DiagonalAD,
        FlipCase::DiagonalBC,
        FlipCase::DegenerateAD,
        FlipCase::DegenerateBC,
        FlipCase::DegenerateAB,
        FlipCase::DegenerateCD,
        FlipCase::Standard,
    ];

    pub fn is_exceptional(self) -> bool {
        self != FlipCase::Standard
    }

    /// Short name in the usual notation, e.g. `A(ab)`.
    pub fn notation(self) -> &'static str {
        match self {
            FlipCase::AnnularAB => "A(ab)",
            FlipCase::AnnularCD => "A(cd)",
            FlipCase::DiagonalAD => "D(ad)",
            FlipCase::DiagonalBC => "D(bc)",
            FlipCase::DegenerateAD => "N(ad)",
            FlipCase::DegenerateBC => "N(bc)",
            FlipCase::DegenerateAB => "N(ab)",
            FlipCase::DegenerateCD => "N(cd)",
            FlipCase::Standard => "standard",
        }
    }
}

impl fmt::Display for FlipCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.notation())
    }
}

/// Lamination weights around a square, in square order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SquareWeights {
    pub a: i64,
    pub b: i64,
    pub c: i64,
    pub d: i64,
    pub e: i64,
}

impl SquareWeights {
    pub fn new([a, b, c, d, e]: [i64; 5]) -> Self {
        SquareWeights { a, b, c, d, e }
    }

    /// Sides clamped to be non-negative, diagonal untouched.
    #[inline]
    fn clamped(self) -> SquareWeights {
        SquareWeights {
            a: self.a.max(0),
            b: self.b.max(0),
            c: self.c.max(0),
            d: self.d.max(0),
            e: self.e,
        }
    }
}

/// One row of the case table.
pub struct FlipRule {
    pub case: FlipCase,
    /// Guard, evaluated on clamped weights.
    pub applies: fn(&SquareWeights) -> bool,
    /// New diagonal weight, evaluated on clamped weights.
    pub update: fn(&SquareWeights) -> i64,
}

/// The case table, tried top to bottom.
pub static FLIP_RULES: [FlipRule; 9] = [
    FlipRule {
        case: FlipCase::AnnularAB,
        applies: |w| w.e >= w.a + w.b && w.a >= w.d && w.b >= w.c,
        update: |w| w.a + w.b - w.e,
    },
    FlipRule {
        case: FlipCase::AnnularCD,
        applies: |w| w.e >= w.c + w.d && w.d >= w.a && w.c >= w.b,
        update: |w| w.c + w.d - w.e,
    },
    FlipRule {
        case: FlipCase::DiagonalAD,
        applies: |w| w.e <= 0 && w.a >= w.b && w.d >= w.c,
        update: |w| w.a + w.d - w.e,
    },
    FlipRule {
        case: FlipCase::DiagonalBC,
        applies: |w| w.e <= 0 && w.b >= w.a && w.c >= w.d,
        update: |w| w.b + w.c - w.e,
    },
    FlipRule {
        case: FlipCase::DegenerateAD,
        applies: |w| w.e >= 0 && w.a >= w.b + w.e && w.d >= w.c + w.e,
        update: |w| w.a + w.d - 2 * w.e,
    },
    FlipRule {
        case: FlipCase::DegenerateBC,
        applies: |w| w.e >= 0 && w.b >= w.a + w.e && w.c >= w.d + w.e,
        update: |w| w.b + w.c - 2 * w.e,
    },
    FlipRule {
        case: FlipCase::DegenerateAB,
        applies: |w| w.a + w.b >= w.e && w.b + w.e >= 2 * w.c + w.a && w.a + w.e >= 2 * w.d + w.b,
        update: |w| (w.a + w.b - w.e).div_euclid(2),
    },
    FlipRule {
        case: FlipCase::DegenerateCD,
        applies: |w| w.c + w.d >= w.e && w.d + w.e >= 2 * w.a + w.c && w.c + w.e >= 2 * w.b + w.d,
        update: |w| (w.c + w.d - w.e).div_euclid(2),
    },
    FlipRule {
        case: FlipCase::Standard,
        applies: |_| true,
        update: |w| (w.a + w.c).max(w.b + w.d) - w.e,
    },
];

/// The matching row of [`FLIP_RULES`] for these weights.
pub fn classify(weights: SquareWeights) -> &'static FlipRule {
    let w = weights.clamped();
    // The last row always applies.
    FLIP_RULES
        .iter()
        .find(|rule| (rule.applies)(&w))
        .unwrap_or(&FLIP_RULES[FLIP_RULES.len() - 1])
}

/// New diagonal weight after the flip, with the case that produced it.
pub fn flipped_weight(weights: SquareWeights) -> (FlipCase, i64) {
    let rule = classify(weights);
    let new_e = (rule.update)(&weights.clamped());
    log::trace!("flip rule {} on {:?} -> {}", rule.case, weights, new_e);
    (rule.case, new_e)
}

/// Number of components of a triangle's local picture cutting off the corner
/// opposite the first side. Negative values count terminal arcs ending at
/// that corner.
///
/// Weights are clamped first; `correction` is non-zero only when the triangle
/// inequality fails.
pub fn dual_weight(a: i64, b: i64, c: i64) -> i64 {
    let (a, b, c) = (a.max(0), b.max(0), c.max(0));
    let correction = (a + b - c).min(b + c - a).min(c + a - b).min(0);
    (b + c - a + correction).div_euclid(2)
}
