#![allow(dead_code)]
use std::sync::Arc;

use flip_graph::lamination::Lamination;
use flip_graph::lamination::curve::Curve;
use flip_graph::topology::triangulation::Triangulation;

/// A named surface fixture: gluing table plus a few curves on it.
pub struct Surface {
    pub name: &'static str,
    pub triangles: &'static [[i32; 3]],
    pub curves: &'static [&'static [i64]],
    pub max_order: usize,
    pub self_isometries: usize,
}

pub const S_1_1: Surface = Surface {
    name: "S_1_1",
    triangles: &[[0, 1, 2], [!0, !1, !2]],
    curves: &[&[1, 1, 0], &[0, 1, 1], &[1, 0, 1], &[1, 2, 1]],
    max_order: 6,
    self_isometries: 6,
};

pub const S_0_4: Surface = Surface {
    name: "S_0_4",
    triangles: &[[-6, -1, 0], [-5, 2, 5], [-4, -3, 4], [-2, 1, 3]],
    curves: &[&[0, 1, 1, 2, 1, 0], &[1, 0, 1, 0, 1, 2], &[1, 1, 0, 2, 2, 2], &[1, 1, 2, 2, 0, 2]],
    max_order: 4,
    self_isometries: 2,
};

pub const S_1_2: Surface = Surface {
    name: "S_1_2",
    triangles: &[[-6, -1, 4], [-5, 2, 3], [-4, 5, 1], [-3, 0, -2]],
    curves: &[&[0, 0, 0, 1, 1, 1], &[0, 1, 1, 1, 0, 0], &[1, 1, 0, 0, 0, 1], &[0, 1, 1, 0, 1, 1]],
    max_order: 6,
    self_isometries: 3,
};

pub const S_0_5: Surface = Surface {
    name: "S_0_5",
    triangles: &[[-9, -2, -1], [-8, 7, 4], [-7, -3, 0], [-6, 3, 5], [-5, 8, -4], [1, 2, 6]],
    curves: &[
        &[1, 1, 1, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 2, 2, 1, 0, 1, 0],
        &[1, 1, 0, 0, 2, 0, 1, 1, 2],
        &[1, 1, 0, 2, 0, 1, 1, 0, 2],
    ],
    max_order: 5,
    self_isometries: 1,
};

pub const S_2_1: Surface = Surface {
    name: "S_2_1",
    triangles: &[[-9, -5, 3], [-8, -7, -2], [-6, -1, -3], [-4, 1, 7], [0, 2, 4], [5, 6, 8]],
    curves: &[
        &[0, 1, 0, 0, 0, 0, 0, 1, 0],
        &[1, 0, 1, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 1, 0, 0, 1, 1, 1],
        &[0, 0, 1, 0, 1, 1, 0, 0, 1],
    ],
    max_order: 10,
    self_isometries: 2,
};

pub const S_1_3: Surface = Surface {
    name: "S_1_3",
    triangles: &[[-9, -5, -4], [-8, 5, -1], [-7, 7, 1], [-6, 4, 3], [-3, 2, 6], [-2, 8, 0]],
    curves: &[
        &[0, 0, 0, 1, 1, 0, 0, 0, 0],
        &[1, 1, 0, 0, 0, 0, 0, 1, 0],
        &[1, 0, 0, 0, 1, 1, 0, 0, 1],
        &[1, 0, 0, 1, 0, 1, 0, 0, 1],
    ],
    max_order: 6,
    self_isometries: 1,
};

pub const SURFACES: [Surface; 6] = [S_1_1, S_0_4, S_1_2, S_0_5, S_2_1, S_1_3];

/// A separating curve on `S_2_1` that cuts off a one-holed torus.
pub const S_2_1_ISOLATING: &[i64] = &[0, 2, 0, 2, 0, 0, 2, 2, 2];

impl Surface {
    pub fn triangulation(&self) -> Arc<Triangulation> {
        Arc::new(Triangulation::new(self.triangles.iter().copied()).unwrap())
    }

    pub fn lamination(&self, t: &Arc<Triangulation>, weights: &[i64]) -> Lamination {
        Lamination::new(Arc::clone(t), weights.to_vec()).unwrap()
    }

    pub fn curves(&self, t: &Arc<Triangulation>) -> Vec<Curve> {
        self.curves
            .iter()
            .map(|w| Curve::new(self.lamination(t, w)).unwrap())
            .collect()
    }
}

/// Seeded generator so failures reproduce.
pub fn rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}
