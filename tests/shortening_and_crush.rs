mod util;
use util::*;

use std::sync::Arc;

use flip_graph::algs::shorten::{is_local_minimum, shorten_lamination};
use flip_graph::prelude::*;
use rand::Rng;

/// A random product of four twists (or inverse twists) about fixture curves.
fn random_word(surface: &Surface, t: &Arc<Triangulation>, rng: &mut impl Rng) -> MappingClass {
    let generators: Vec<MappingClass> = surface
        .curves(t)
        .iter()
        .map(|c| c.encode_twist(if rng.gen_bool(0.5) { 1 } else { -1 }).unwrap())
        .collect();
    let mut word = MappingClass::identity(Arc::clone(t));
    for _ in 0..4 {
        let g = &generators[rng.gen_range(0..generators.len())];
        word = word.then(g).unwrap();
    }
    word
}

#[test]
fn shortening_reaches_weight_two() {
    let mut rng = rng(1);
    for surface in &SURFACES {
        let t = surface.triangulation();
        for _ in 0..4 {
            let word = random_word(surface, &t, &mut rng);
            for curve in surface.curves(&t) {
                let image = Curve::new(word.encoding().apply(curve.lamination()).unwrap()).unwrap();
                let (short, conjugator) = image.shorten().unwrap();
                assert!(short.is_short());
                assert_eq!(short.weight(), 2, "{}", surface.name);
                assert_eq!(&conjugator.apply(image.lamination()).unwrap(), short.lamination());
                assert!(short.parallel().is_ok());
                // Already short: nothing more to do.
                let (again, none) = short.shorten().unwrap();
                assert_eq!(again, short);
                assert!(none.is_empty());
            }
        }
    }
}

#[test]
fn tight_guard_reports_instead_of_looping() {
    let t = S_1_2.triangulation();
    let curves = S_1_2.curves(&t);
    let curve = &curves[3];
    let word = curve.encode_twist(25).unwrap();
    let other = Curve::new(word.encoding().apply(curves[0].lamination()).unwrap()).unwrap();
    let config = EngineConfig { shorten_step_factor: 0, ..Default::default() };
    let err = other.shorten_with(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(other.shorten().is_ok());
}

#[test]
fn untwisting_does_not_depend_on_the_number_of_twists() {
    let t = S_1_2.triangulation();
    let curves = S_1_2.curves(&t);
    let mut lengths = Vec::new();
    let mut shorts = Vec::new();
    for n in [10, 100, 1000, 10000] {
        let word = curves[3].encode_twist(n).unwrap();
        let image = Curve::new(word.encoding().apply(curves[0].lamination()).unwrap()).unwrap();
        assert!(image.weight() > n);
        let (short, conjugator) = image.shorten().unwrap();
        assert_eq!(short.weight(), 2);
        assert_eq!(&conjugator.apply(image.lamination()).unwrap(), short.lamination());
        assert!(conjugator.len() < 64, "{} moves for {n} twists", conjugator.len());
        lengths.push(conjugator.len());
        shorts.push(short);
    }
    assert!(lengths.windows(2).all(|w| w[1] <= w[0] + 2), "{lengths:?}");

    // Flip by flip the descent needs a move per twist.
    let literal = EngineConfig { accelerate_twists: false, ..Default::default() };
    let word = curves[3].encode_twist(100).unwrap();
    let image = Curve::new(word.encoding().apply(curves[0].lamination()).unwrap()).unwrap();
    let (short, conjugator) = image.shorten_with(&literal).unwrap();
    assert_eq!(short.weight(), 2);
    assert!(conjugator.len() >= 100);
}

#[test]
fn local_minima_are_local_minima() {
    let mut rng = rng(2);
    for surface in &SURFACES {
        let t = surface.triangulation();
        let word = random_word(surface, &t, &mut rng);
        for curve in surface.curves(&t) {
            let image = word.encoding().apply(curve.lamination()).unwrap();
            let (min, conjugator) = shorten_lamination(&image, &EngineConfig::default()).unwrap();
            assert!(is_local_minimum(&min));
            assert!(min.weight() <= image.weight());
            assert_eq!(conjugator.apply(&image).unwrap(), min);
        }
    }
}

#[test]
fn twisted_edge_arcs_shorten_to_edges() {
    let mut rng = rng(4);
    for surface in &SURFACES {
        let t = surface.triangulation();
        let word = random_word(surface, &t, &mut rng);
        for arc in Lamination::edge_arcs(&t) {
            let image = MultiArc::new(word.encoding().apply(&arc).unwrap()).unwrap();
            let (short, conjugator) = image.shorten().unwrap();
            assert!(short.is_short());
            let weights = short.lamination().weights();
            assert_eq!(weights.iter().filter(|&&w| w < 0).count(), 1, "{}", surface.name);
            assert_eq!(weights.iter().min(), Some(&-1));
            assert_eq!(&conjugator.apply(image.lamination()).unwrap(), short.lamination());
        }
    }
}

#[test]
fn boundaries_are_natural() {
    let mut rng = rng(5);
    for surface in &SURFACES {
        let t = surface.triangulation();
        let word = random_word(surface, &t, &mut rng);
        for (i, arc) in Lamination::edge_arcs(&t).into_iter().enumerate() {
            let boundary = MultiArc::new(arc.clone()).unwrap().boundary().unwrap();
            assert!(boundary.validate_realizable().is_ok());
            // The boundary runs alongside the arc, never across it.
            assert_eq!(boundary.get(Edge::positive(i)), 0);
            let image = MultiArc::new(word.encoding().apply(&arc).unwrap()).unwrap();
            assert_eq!(
                image.boundary().unwrap(),
                word.encoding().apply(&boundary).unwrap(),
                "{}",
                surface.name
            );
        }
    }
}

#[test]
fn closed_curves_are_not_multiarcs() {
    let t = S_1_3.triangulation();
    for curve in S_1_3.curves(&t) {
        assert!(matches!(
            MultiArc::new(curve.into_lamination()),
            Err(SurfaceError::NotAMultiArc(_))
        ));
    }
}

#[test]
fn crushing_kills_the_curve() {
    let vertices = [3, 6, 4, 7, 3, 5];
    for (surface, expected) in SURFACES.iter().zip(vertices) {
        let t = surface.triangulation();
        for curve in surface.curves(&t) {
            let crush = curve.crush().unwrap();
            assert_eq!(crush.source(), &t);
            assert_eq!(crush.target().num_vertices(), expected, "{}", surface.name);
            assert!(crush.apply(curve.lamination()).unwrap().is_empty());
        }
    }
}

#[test]
fn crushing_forgets_twists_about_the_curve() {
    for surface in &SURFACES {
        let t = surface.triangulation();
        let curves = surface.curves(&t);
        for curve in &curves {
            let crush = curve.crush().unwrap();
            let tw = curve.encode_twist(3).unwrap();
            for other in &curves {
                let before = crush.apply(other.lamination()).unwrap();
                let twisted = tw.encoding().apply(other.lamination()).unwrap();
                assert_eq!(crush.apply(&twisted).unwrap(), before, "{}", surface.name);
            }
        }
    }
}

#[test]
fn crushed_images_drop_peripheral_curves() {
    let t = S_1_1.triangulation();
    let a = Curve::new(S_1_1.lamination(&t, &[1, 1, 0])).unwrap();
    let around = S_1_1.lamination(&t, &[2, 2, 2]);
    assert!(around.is_peripheral());
    let crush = a.crush().unwrap();
    assert!(crush.apply(&around).unwrap().is_empty());
    // The curve round the old puncture, seen from the crushed side.
    let crushed = Lamination::new(Arc::clone(crush.target()), vec![1, 1, 2]).unwrap();
    assert!(crushed.is_peripheral());
    assert!(crush.inverse().apply(&crushed).unwrap().is_empty());

    for surface in &SURFACES {
        let t = surface.triangulation();
        let curves = surface.curves(&t);
        for curve in &curves {
            let crush = curve.crush().unwrap();
            for other in &curves {
                let image = crush.apply(other.lamination()).unwrap();
                assert!(!image.has_peripheral(), "{}", surface.name);
                assert!(!crush.inverse().apply(&image).unwrap().has_peripheral());
            }
        }
    }
}

#[test]
fn lift_inverts_crush_as_a_move() {
    let t = S_1_2.triangulation();
    let curves = S_1_2.curves(&t);
    let curve = &curves[0];
    let crush = curve.crush().unwrap();
    let round_trip = crush.then(&crush.inverse()).unwrap();
    assert!(round_trip.is_mapping_class());
    assert_eq!(round_trip.len(), 2 * crush.len());
    match round_trip.moves().iter().find(|m| matches!(m, Move::Lift(_))) {
        Some(Move::Lift(lift)) => {
            let matrix = lift.matrix();
            assert_eq!(matrix.len(), t.zeta());
            assert!(matrix.iter().all(|row| row.len() == t.zeta()));
        }
        _ => panic!("inverse of a crush contains a lift"),
    }
}
