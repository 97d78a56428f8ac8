mod common;
use common::{assert_rows, stabilizer};

#[test]
fn test_ghz_canonical_form() {
    let mut s = stabilizer("XXXX ZZII IZZI IIZZ");
    let (x_boundary, z_boundary) = s.canonicalize(true);
    assert_eq!((x_boundary, z_boundary), (1, 4));
    assert_rows(s.tableau(), &["+XXXX", "+Z__Z", "+_Z_Z", "+__ZZ"]);
}

#[test]
fn test_x_block_precedes_z_block() {
    let mut s = stabilizer("ZII IXI IIY");
    let (x_boundary, z_boundary) = s.canonicalize(true);
    assert_eq!((x_boundary, z_boundary), (2, 3));
    assert_rows(s.tableau(), &["+_X_", "+__Y", "+Z__"]);
}

#[test]
fn test_canonicalize_tracks_signs() {
    let mut s = stabilizer("ZZ -XX");
    s.canonicalize(true);
    assert_rows(s.tableau(), &["-XX", "+ZZ"]);
}

#[test]
fn test_canonicalize_is_idempotent() {
    let mut s = stabilizer("XXXX ZZII IZZI IIZZ");
    s.canonicalize(true);
    let once = s.clone();
    s.canonicalize(true);
    assert_eq!(s, once);
}

#[test]
fn test_rref_collects_supported_rows_at_the_bottom() {
    let mut s = stabilizer("XXXX ZZII IZZI IIZZ");
    s.canonicalize(true);
    let boundary = s.canonicalize_rref(&[0], true).unwrap();
    assert_eq!(boundary, 2);
    for i in 0..boundary {
        let row = s.row(i);
        assert!(!row.x_bit(0) && !row.z_bit(0), "row {i} still touches qubit 0");
    }
    let touching = (boundary..s.len())
        .filter(|&i| {
            let row = s.row(i);
            row.x_bit(0) || row.z_bit(0)
        })
        .count();
    assert!(touching > 0);
    s.validate().unwrap();
    assert!(s.canonicalize_rref(&[9], true).is_err());
}
