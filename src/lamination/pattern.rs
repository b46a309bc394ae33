//! Local pictures of a lamination inside one triangle.
//!
//! Inside a triangle a lamination is a union of normal arcs cutting off
//! corners, counted by the three dual weights, plus possibly:
//! - strands ending at a corner (a negative dual weight, "cusp"), and
//! - sides of the triangle that are themselves arcs of the lamination
//!   (negative edge weight, "carried").
//!
//! The shape is decided by the signs of the dual weights; at most one dual
//! weight can be negative. Together with whether a side is carried this gives
//! fourteen patterns. Multicurves realise only the four plain uncusped ones.

/// The fourteen local patterns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocalPattern {
    /// No strands.
    Empty,
    /// Strands round one corner only.
    Corridor,
    /// Strands round two corners.
    Bipod,
    /// Strands round all three corners.
    Wye,
    /// Strands ending at one corner, nothing else.
    Cusp,
    /// Terminal strands plus one family of corner arcs.
    CuspCorridor,
    /// Terminal strands plus two families of corner arcs.
    CuspBipod,
    /// A carried side, otherwise empty.
    CarriedEmpty,
    CarriedCorridor,
    CarriedBipod,
    CarriedWye,
    CarriedCusp,
    CarriedCuspCorridor,
    CarriedCuspBipod,
}

impl LocalPattern {
    pub const ALL: [LocalPattern; 14] = [
        LocalPattern::Empty,
        LocalPattern::Corridor,
        LocalPattern::Bipod,
        LocalPattern::Wye,
        LocalPattern::Cusp,
        LocalPattern::CuspCorridor,
        LocalPattern::CuspBipod,
        LocalPattern::CarriedEmpty,
        LocalPattern::CarriedCorridor,
        LocalPattern::CarriedBipod,
        LocalPattern::CarriedWye,
        LocalPattern::CarriedCusp,
        LocalPattern::CarriedCuspCorridor,
        LocalPattern::CarriedCuspBipod,
    ];

    /// Classifies from the three dual weights and whether a side is carried.
    pub fn from_parts(duals: [i64; 3], carried: bool) -> LocalPattern {
        use LocalPattern::*;
        let positive = duals.iter().filter(|&&d| d > 0).count();
        let cusped = duals.iter().any(|&d| d < 0);
        let table: [[LocalPattern; 4]; 4] = [
            [Empty, Corridor, Bipod, Wye],
            [Cusp, CuspCorridor, CuspBipod, CuspBipod],
            [CarriedEmpty, CarriedCorridor, CarriedBipod, CarriedWye],
            [CarriedCusp, CarriedCuspCorridor, CarriedCuspBipod, CarriedCuspBipod],
        ];
        table[usize::from(carried) * 2 + usize::from(cusped)][positive]
    }

    /// True for the patterns a multicurve can produce.
    pub fn is_multicurve_pattern(self) -> bool {
        matches!(
            self,
            LocalPattern::Empty | LocalPattern::Corridor | LocalPattern::Bipod | LocalPattern::Wye
        )
    }

    pub fn has_cusp(self) -> bool {
        use LocalPattern::*;
        matches!(
            self,
            Cusp | CuspCorridor | CuspBipod | CarriedCusp | CarriedCuspCorridor | CarriedCuspBipod
        )
    }

    pub fn is_carried(self) -> bool {
        (self as u8) >= (LocalPattern::CarriedEmpty as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_covers_all_fourteen() {
        let mut seen = std::collections::HashSet::new();
        for carried in [false, true] {
            for duals in [[0, 0, 0], [1, 0, 0], [1, 1, 0], [1, 1, 1], [-1, 0, 0], [-1, 2, 0], [-2, 1, 1]] {
                seen.insert(LocalPattern::from_parts(duals, carried));
            }
        }
        assert_eq!(seen.len(), 14);
        for p in LocalPattern::ALL {
            assert!(seen.contains(&p));
        }
    }

    #[test]
    fn multicurve_patterns() {
        let curve_like: Vec<_> = LocalPattern::ALL
            .into_iter()
            .filter(|p| p.is_multicurve_pattern())
            .collect();
        assert_eq!(
            curve_like,
            vec![LocalPattern::Empty, LocalPattern::Corridor, LocalPattern::Bipod, LocalPattern::Wye]
        );
        assert!(LocalPattern::CarriedCusp.is_carried());
        assert!(LocalPattern::CarriedCusp.has_cusp());
        assert!(!LocalPattern::Wye.is_carried());
    }
}
