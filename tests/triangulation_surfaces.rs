mod util;
use util::*;

use flip_graph::prelude::*;
use flip_graph::topology::gluing::GluingTable;

#[test]
fn fixtures_have_expected_topology() {
    let expected: [(usize, usize); 6] = [(1, 1), (0, 4), (1, 2), (0, 5), (2, 1), (1, 3)];
    for (surface, (genus, punctures)) in SURFACES.iter().zip(expected) {
        let t = surface.triangulation();
        assert!(t.is_connected(), "{}", surface.name);
        assert_eq!(t.surface_types(), vec![(genus, punctures)], "{}", surface.name);
        assert_eq!(t.num_punctures(), punctures);
        assert_eq!(t.euler_characteristic(), 2 - 2 * genus as i64, "{}", surface.name);
        assert_eq!(t.zeta(), t.num_triangles() * 3 / 2);
    }
}

#[test]
fn max_order_and_symmetries() {
    for surface in &SURFACES {
        let t = surface.triangulation();
        assert_eq!(t.max_order(), surface.max_order, "{}", surface.name);
        let symmetries = t.self_isometries();
        assert_eq!(symmetries.len(), surface.self_isometries, "{}", surface.name);
        for map in &symmetries {
            assert!(map.respects_orientation());
            assert_eq!(t.relabel(map).unwrap(), *t);
        }
        assert_eq!(symmetries.iter().filter(|m| m.is_identity()).count(), 1);
    }
}

#[test]
fn every_label_sits_in_one_vertex_cycle() {
    for surface in &SURFACES {
        let t = surface.triangulation();
        let total: usize = t.vertices().iter().map(Vec::len).sum();
        assert_eq!(total, 2 * t.zeta());
        for e in t.edges() {
            let cycle = &t.vertices()[t.vertex_of(e)];
            assert!(cycle.contains(&e));
            assert_eq!(t.vertex_degree(e), cycle.len());
        }
    }
}

#[test]
fn flip_and_reverse_flip_restore() {
    for surface in &SURFACES {
        let t = surface.triangulation();
        for e in t.edges() {
            if !t.is_flippable(e) {
                assert_eq!(t.flip(e).unwrap_err(), SurfaceError::NotFlippable(e));
                continue;
            }
            let (flipped, map) = t.flip(e).unwrap();
            assert!(map.is_identity());
            assert_ne!(flipped, *t, "{} flip {e}", surface.name);
            let (back, _) = flipped.flip(!e).unwrap();
            assert_eq!(back, *t, "{} flip {e}", surface.name);
        }
    }
}

#[test]
fn self_folded_edges_cannot_be_flipped() {
    let t = S_0_4.triangulation();
    let e = Edge::new(0);
    assert!(!t.is_flippable(e));
    assert!(matches!(t.square(e), Err(SurfaceError::NotFlippable(_))));
}

#[test]
fn flips_preserve_the_surface() {
    for surface in &SURFACES {
        let t = surface.triangulation();
        let e = t.edges().find(|&e| t.is_flippable(e)).unwrap();
        let (flipped, _) = t.flip(e).unwrap();
        assert_eq!(flipped.surface_types(), t.surface_types());
        assert_eq!(flipped.max_order(), t.max_order());
    }
}

#[test]
fn gluing_table_round_trip() {
    for surface in &SURFACES {
        let t = surface.triangulation();
        let table = GluingTable::from(&*t);
        let rebuilt = Triangulation::from_gluing(&table).unwrap();
        assert_eq!(rebuilt, *t);
        assert_eq!(table.edge_sides().unwrap().len(), t.zeta());
    }
}

#[test]
fn gluing_table_serializes() {
    let table = GluingTable::new(S_1_2.triangles.to_vec());
    let json = serde_json::to_string(&table).unwrap();
    let back: GluingTable = serde_json::from_str(&json).unwrap();
    assert_eq!(back, table);
    let bytes = bincode::serialize(&table).unwrap();
    let back: GluingTable = bincode::deserialize(&bytes).unwrap();
    assert_eq!(Triangulation::from_gluing(&back).unwrap(), *S_1_2.triangulation());
}

#[test]
fn malformed_tables_are_rejected() {
    for bad in [
        vec![],
        vec![[0, 1, 2], [!0, !1, !1]],
        vec![[0, 1, 2], [!0, !1, !5]],
        vec![[0, 1, 2]],
    ] {
        let err = Triangulation::new(bad.clone()).unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidGluing(_)), "{bad:?} gave {err:?}");
    }
}

#[test]
fn disconnected_triangulations_split_into_components() {
    // Two copies of the once-punctured torus.
    let t = Triangulation::new([[0, 1, 2], [!0, !1, !2], [3, 4, 5], [!3, !4, !5]]).unwrap();
    assert!(!t.is_connected());
    assert_eq!(t.components().len(), 2);
    assert_eq!(t.surface_types(), vec![(1, 1), (1, 1)]);
    // Each torus has symmetries of order 6, and the two may be swapped.
    assert_eq!(t.max_order(), 12);
}

#[test]
fn isometries_survive_relabeling() {
    let t = S_1_2.triangulation();
    let symmetries = t.self_isometries();
    let other = symmetries.iter().find(|m| !m.is_identity()).unwrap();
    let relabeled = t.relabel(other).unwrap();
    assert!(t.is_isometric_to(&relabeled));
    assert!(!t.is_isometric_to(&S_0_4.triangulation()));
}
