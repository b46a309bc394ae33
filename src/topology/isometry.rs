//! Isometry search between triangulations.
//!
//! An isometry is a relabeling that carries the triangles of one
//! triangulation onto those of another. It is determined by the image of a
//! single oriented edge: knowing `f -> t` forces `!f -> !t` and
//! `corner(f)[1] -> corner(t)[1]`, and propagating these two rules reaches
//! every label of the component. The search therefore tries each candidate
//! image of one root edge and propagates, reporting failure rather than
//! backtracking.

use hashbrown::{HashMap, HashSet};

use crate::surface_error::SurfaceError;
use crate::topology::edge::Edge;
use crate::topology::label_map::LabelMap;
use crate::topology::triangulation::Triangulation;

impl Triangulation {
    /// Extends `seed` to an isometry onto `other`.
    ///
    /// Components of `self` not reached from the seed are mapped by the
    /// identity. Fails with [`SurfaceError::InconsistentIsometry`] if the
    /// propagation contradicts itself, vertex degrees disagree, or the
    /// result does not carry triangles onto triangles.
    pub fn find_isometry(
        &self,
        other: &Triangulation,
        seed: &[(Edge, Edge)],
    ) -> Result<LabelMap, SurfaceError> {
        if self.zeta() != other.zeta() {
            return Err(SurfaceError::InconsistentIsometry("edge counts differ"));
        }
        let mut map: HashMap<Edge, Edge> = HashMap::with_capacity(2 * self.zeta());
        // Labels already used as images.
        let mut used: HashSet<Edge> = HashSet::with_capacity(2 * self.zeta());
        let mut stack = Vec::with_capacity(seed.len());
        for &(from, to) in seed {
            self.check_edge(from)?;
            other.check_edge(to)?;
            if let Some(&prev) = map.get(&from) {
                if prev != to {
                    return Err(SurfaceError::InconsistentIsometry("seed is contradictory"));
                }
                continue;
            }
            map.insert(from, to);
            used.insert(to);
            stack.push((from, to));
        }

        while let Some((from, to)) = stack.pop() {
            for (next_from, next_to) in [(!from, !to), (self.corner(from)[1], other.corner(to)[1])] {
                match map.get(&next_from) {
                    Some(&image) if image != next_to => {
                        return Err(SurfaceError::InconsistentIsometry("propagation conflict"));
                    }
                    Some(_) => {}
                    None => {
                        if self.vertex_degree(next_from) != other.vertex_degree(next_to) {
                            return Err(SurfaceError::InconsistentIsometry("vertex degrees differ"));
                        }
                        map.insert(next_from, next_to);
                        used.insert(next_to);
                        stack.push((next_from, next_to));
                    }
                }
            }
        }

        for component in self.components() {
            let touched = component.iter().any(|e| map.contains_key(e) || used.contains(e));
            if !touched {
                for &e in component {
                    map.insert(e, e);
                }
            }
        }

        if map.len() != 2 * self.zeta() {
            return Err(SurfaceError::InconsistentIsometry("labels left unmapped"));
        }
        let label_map = LabelMap::from_pairs(self.zeta(), map)
            .map_err(|_| SurfaceError::InconsistentIsometry("not a bijection"))?;
        let image = self.relabel(&label_map)?;
        if image != *other {
            return Err(SurfaceError::InconsistentIsometry("triangles not preserved"));
        }
        Ok(label_map)
    }

    /// Every isometry from `self` onto `other`.
    ///
    /// Roots the search at the first label of a smallest vertex and tries
    /// every target label on a vertex of the same degree.
    pub fn isometries_to(&self, other: &Triangulation) -> Vec<LabelMap> {
        if self.zeta() != other.zeta() || self.num_vertices() != other.num_vertices() {
            return Vec::new();
        }
        let Some(root_vertex) = self.vertices().iter().min_by_key(|v| v.len()) else {
            return Vec::new();
        };
        let root = root_vertex[0];
        let degree = root_vertex.len();
        let found: Vec<LabelMap> = other
            .vertices()
            .iter()
            .filter(|v| v.len() == degree)
            .flatten()
            .filter_map(|&target| self.find_isometry(other, &[(root, target)]).ok())
            .collect();
        if found.is_empty() {
            log::warn!(
                "no isometry between triangulations with {} edges and {} vertices",
                self.zeta(),
                self.num_vertices()
            );
        }
        found
    }

    pub fn is_isometric_to(&self, other: &Triangulation) -> bool {
        !self.isometries_to(other).is_empty()
    }

    /// The symmetry group of this triangulation, as label maps.
    pub fn self_isometries(&self) -> Vec<LabelMap> {
        self.isometries_to(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torus() -> Triangulation {
        Triangulation::new([[0, 1, 2], [!0, !1, !2]]).unwrap()
    }

    #[test]
    fn identity_from_any_fixed_label() {
        let t = torus();
        let map = t.find_isometry(&t, &[(Edge::new(0), Edge::new(0))]).unwrap();
        assert!(map.is_identity());
    }

    #[test]
    fn torus_has_six_symmetries() {
        // Rotations of each triangle (3) times swapping the triangles (2).
        let t = torus();
        assert_eq!(t.self_isometries().len(), 6);
    }

    #[test]
    fn flip_then_isometry_back() {
        let t = torus();
        let (f, _) = t.flip(Edge::new(0)).unwrap();
        assert!(f.is_isometric_to(&t));
        for map in f.isometries_to(&t) {
            assert_eq!(f.relabel(&map).unwrap(), t);
        }
    }

    #[test]
    fn inconsistent_seed_is_reported() {
        let t = torus();
        let err = t
            .find_isometry(&t, &[(Edge::new(0), Edge::new(0)), (Edge::new(1), Edge::new(2))])
            .unwrap_err();
        assert!(err.is_assumption());
    }

    fn two_tori() -> Triangulation {
        Triangulation::new([[0, 1, 2], [!0, !1, !2], [3, 4, 5], [!3, !4, !5]]).unwrap()
    }

    #[test]
    fn unseeded_components_stay_put() {
        let t = two_tori();
        let map = t.find_isometry(&t, &[(Edge::new(0), Edge::new(1))]).unwrap();
        assert_eq!(map.get(Edge::new(0)), Edge::new(1));
        for label in 3..6 {
            assert_eq!(map.get(Edge::new(label)), Edge::new(label));
            assert_eq!(map.get(Edge::new(!label)), Edge::new(!label));
        }
    }

    #[test]
    fn components_hit_only_as_images_are_not_filled() {
        // Sending the first torus onto the second leaves the second one's
        // labels without images; they must not be claimed by the identity.
        let t = two_tori();
        let err = t.find_isometry(&t, &[(Edge::new(0), Edge::new(3))]).unwrap_err();
        assert_eq!(err, SurfaceError::InconsistentIsometry("labels left unmapped"));
        let swap = t
            .find_isometry(&t, &[(Edge::new(0), Edge::new(3)), (Edge::new(3), Edge::new(0))])
            .unwrap();
        assert_eq!(swap.get(Edge::new(!1)), Edge::new(!4));
        assert_eq!(t.relabel(&swap).unwrap(), t);
    }

    #[test]
    fn different_surfaces_are_not_isometric() {
        let s04 = Triangulation::new([[-6, -1, 0], [-5, 2, 5], [-4, -3, 4], [-2, 1, 3]]).unwrap();
        let s12 = Triangulation::new([[-6, -1, 4], [-5, 2, 3], [-4, 5, 1], [-3, 0, -2]]).unwrap();
        assert!(!s04.is_isometric_to(&s12));
        assert_eq!(s04.self_isometries().len(), 2);
        assert_eq!(s12.self_isometries().len(), 3);
    }
}
