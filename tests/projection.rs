use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stabilizer_tableau_rust::prelude::*;

mod common;
use common::{assert_rows, pauli, paulis, stabilizer};

#[test]
fn test_ghz_destruction() {
    let mut s = stabilizer("XXXX ZZII IZZI IIZZ");
    s.canonicalize(true);
    let outcome = s.project(&pauli("Z___")).unwrap();
    assert_eq!(outcome.anticommutes, Some(0));
    assert_eq!(outcome.result, None);
    s.canonicalize(true);
    assert_rows(s.tableau(), &["+Z___", "+_Z__", "+__Z_", "+___Z"]);
    s.validate().unwrap();
}

#[test]
fn test_negative_eigenstate_is_reported() {
    let mut s = stabilizer("ZII IXI IIY");
    s.canonicalize(true);
    assert_rows(s.tableau(), &["+_X_", "+__Y", "+Z__"]);
    let outcome = s.project(&pauli("-Z__")).unwrap();
    assert_eq!(outcome.anticommutes, None);
    assert_eq!(outcome.result, Some(PhaseFactor::MINUS_ONE));
    assert_rows(s.tableau(), &["+_X_", "+__Y", "+Z__"]);
}

#[test]
fn test_projection_outside_group_changes_nothing() {
    let mut s = stabilizer("XZI IZI");
    let outcome = s.project(&pauli("IIX")).unwrap();
    assert_eq!(outcome.anticommutes, None);
    assert_eq!(outcome.result, None);
    // same group, canonical presentation
    assert_rows(s.tableau(), &["+X__", "+_Z_"]);
}

#[test]
fn test_projection_is_idempotent() {
    let mut s = stabilizer("XXXX ZZII IZZI IIZZ");
    s.canonicalize(true);
    let z = pauli("Z___");
    s.project(&z).unwrap();
    let again = s.project(&z).unwrap();
    assert_eq!(again.anticommutes, None);
    assert_eq!(again.result, Some(PhaseFactor::PLUS_ONE));
}

#[test]
fn test_single_qubit_projection_helpers() {
    let mut s = stabilizer("Z_ _Z");
    let outcome = s.project_z(0).unwrap();
    assert_eq!(outcome.result, Some(PhaseFactor::PLUS_ONE));
    let outcome = s.project_x(1).unwrap();
    assert_eq!(outcome.anticommutes, Some(1));
    assert!(s.project_x(5).is_err());
}

#[test]
fn test_width_mismatch_is_rejected() {
    let mut s = stabilizer("Z_ _Z");
    assert!(matches!(
        s.project(&pauli("Z")),
        Err(Error::DimensionMismatch(1, 2))
    ));
}

#[test]
fn test_mixed_stabilizer_learns_a_new_generator() {
    let mut ms = MixedStabilizer::new(3, paulis(&["XZI", "IZI"])).unwrap();
    let outcome = ms.project(&pauli("IIX")).unwrap();
    assert_eq!(outcome.anticommutes, None);
    assert_eq!(outcome.result, None);
    assert_eq!(ms.rank(), 3);
    assert_rows(&ms.stabilizer(), &["+X__", "+_Z_", "+__X"]);
    ms.validate().unwrap();
}

#[test]
fn test_fresh_mixed_stabilizer_rank_growth() {
    let mut ms = MixedStabilizer::new(3, paulis(&["Z__", "_Z_"])).unwrap();
    let outcome = ms.project(&pauli("__X")).unwrap();
    assert_eq!(outcome.anticommutes, None);
    assert_eq!(outcome.result, None);
    assert_eq!(ms.rank(), 3);
    assert_rows(&ms.stabilizer(), &["+Z__", "+_Z_", "+__X"]);
}

#[test]
fn test_mixed_stabilizer_append_without_result_checks_independence() {
    let opts = ProjectOpts {
        keep_result: false,
        phases: true,
    };
    let mut ms = MixedStabilizer::new(3, paulis(&["Z__", "_Z_"])).unwrap();
    // independent operator: the canonicalized append survives
    let outcome = ms.project_with(&pauli("__X"), opts).unwrap();
    assert_eq!(outcome.result, None);
    assert_eq!(ms.rank(), 3);

    let mut ms = MixedStabilizer::new(3, paulis(&["Z__", "_Z_"])).unwrap();
    // dependent operator: the appended row canonicalizes to the identity
    let outcome = ms.project_with(&pauli("ZZ_"), opts).unwrap();
    assert_eq!(outcome.anticommutes, None);
    assert_eq!(ms.rank(), 2);
    ms.validate().unwrap();
}

#[test]
fn test_mixed_destabilizer_rank_growth() {
    let mut md = MixedDestabilizer::from_parts(
        paulis(&["X__", "_X_"]),
        paulis(&["__X"]),
        paulis(&["Z__", "_Z_"]),
        paulis(&["__Z"]),
    )
    .unwrap();
    let outcome = md.project(&pauli("__X")).unwrap();
    assert_eq!(outcome.anticommutes, None);
    assert_eq!(outcome.result, None);
    assert_eq!(md.rank(), 3);
    assert_rows(&md.stabilizer(), &["+Z__", "+_Z_", "+__X"]);
    assert_rows(&md.destabilizer(), &["+X__", "+_X_", "+__Z"]);
    md.validate().unwrap();
}

#[test]
fn test_mixed_destabilizer_promotes_a_logical_x() {
    let mut md = MixedDestabilizer::from_parts(
        paulis(&["X__"]),
        paulis(&["_X_", "__X"]),
        paulis(&["Z__"]),
        paulis(&["_Z_", "__Z"]),
    )
    .unwrap();
    let outcome = md.project(&pauli("__Z")).unwrap();
    assert_eq!(outcome.anticommutes, None);
    assert_eq!(outcome.result, None);
    assert_eq!(md.rank(), 2);
    assert_rows(&md.stabilizer(), &["+Z__", "+__Z"]);
    assert_rows(&md.destabilizer(), &["+X__", "+__X"]);
    assert_rows(&md.logical_x(), &["+_Z_"]);
    assert_rows(&md.logical_z(), &["+_X_"]);
    md.validate().unwrap();
}

#[test]
fn test_mixed_destabilizer_anticommuting_projection_keeps_duality() {
    let mut md = MixedDestabilizer::from_parts(
        paulis(&["X_", "_X"]),
        vec![],
        paulis(&["Z_", "_Z"]),
        vec![],
    )
    .unwrap();
    let outcome = md.project(&pauli("X_")).unwrap();
    assert_eq!(outcome.anticommutes, Some(0));
    assert_eq!(outcome.result, None);
    assert_eq!(md.rank(), 2);
    assert_rows(&md.stabilizer(), &["+X_", "+_Z"]);
    assert_rows(&md.destabilizer(), &["+Z_", "+_X"]);
    md.validate().unwrap();
}

#[test]
fn test_mixed_destabilizer_membership_sign() {
    let mut md = MixedDestabilizer::from_parts(
        paulis(&["X_", "_X"]),
        vec![],
        paulis(&["Z_", "_Z"]),
        vec![],
    )
    .unwrap();
    let outcome = md.project(&pauli("-Z_")).unwrap();
    assert_eq!(outcome.anticommutes, None);
    assert_eq!(outcome.result, Some(PhaseFactor::MINUS_ONE));
    assert_eq!(md.rank(), 2);
    assert_rows(&md.stabilizer(), &["+Z_", "+_Z"]);
}

#[test]
fn test_destabilizer_matches_stabilizer_signs() {
    // the O(n²) destabilizer expansion and the O(n³) reduction must agree
    // on every member of the group
    for probe in ["X_", "-X_", "_Z", "XZ", "-XZ"] {
        let mut d =
            Destabilizer::from_parts(paulis(&["Z_", "_X"]), paulis(&["X_", "_Z"])).unwrap();
        let fast = d.project(&pauli(probe)).unwrap();

        let mut s = stabilizer("X_ _Z");
        let slow = s.project(&pauli(probe)).unwrap();

        assert_eq!(fast.anticommutes, None, "probe {probe}");
        assert_eq!(fast.result, slow.result, "probe {probe}");
        assert!(fast.result.is_some(), "probe {probe}");
    }
}

#[test]
fn test_destabilizer_anticommuting_projection() {
    let mut d = Destabilizer::from_parts(paulis(&["X_", "_X"]), paulis(&["Z_", "_Z"])).unwrap();
    let outcome = d.project(&pauli("X_")).unwrap();
    assert_eq!(outcome.anticommutes, Some(0));
    assert_rows(&d.stabilizer(), &["+X_", "+_Z"]);
    assert_rows(&d.destabilizer(), &["+Z_", "+_X"]);
    d.validate().unwrap();
}

#[test]
fn test_underdetermined_destabilizer_is_fatal() {
    let mut d = Destabilizer::from_parts(paulis(&["X_"]), paulis(&["Z_"])).unwrap();
    // anticommuting projections still work on a deficient pair set
    let outcome = d.project(&pauli("X_")).unwrap();
    assert_eq!(outcome.anticommutes, Some(0));
    // a commuting operator cannot be classified without full rank
    let err = d.project(&pauli("_X")).unwrap_err();
    assert!(matches!(err, Error::BadDataStructure { .. }));
}

#[test]
fn test_decompose_round_trip() {
    let mut s = stabilizer("XXXX ZZII IZZI IIZZ");
    s.canonicalize(true);
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..32 {
        let subset: Vec<usize> = (0..4).filter(|_| rng.gen_bool(0.5)).collect();
        if subset.is_empty() {
            continue;
        }
        let mut product = PauliOperator::zero(4);
        for &row in &subset {
            product.mul_left(&s.row(row), true);
        }
        let mut reduced = product.clone();
        let used = s.decompose(&mut reduced, true, true).unwrap();
        assert!(reduced.is_identity());
        assert_eq!(reduced.phase(), PhaseFactor::PLUS_ONE);
        assert_eq!(used, subset);
    }
}

#[test]
fn test_decompose_rejects_outsiders() {
    let mut s = stabilizer("XXXX ZZII IZZI IIZZ");
    s.canonicalize(true);
    let mut probe = pauli("Y___");
    assert!(s.decompose(&mut probe, true, true).is_none());
}
