//! Integration tests for pf-mesh.

use pf_core::units::{m, m2, m3};
use pf_mesh::{Mesh, MeshBuilder, MeshError, ScalarField};
use proptest::prelude::*;

#[test]
fn build_two_cell_channel() {
    // inlet | C0 | C1 | outlet
    let mut builder = MeshBuilder::new();
    let inlet = builder.add_patch("inlet");
    let outlet = builder.add_patch("outlet");
    let c0 = builder.add_cell([0.5, 0.0, 0.0], m3(1.0));
    let c1 = builder.add_cell([1.5, 0.0, 0.0], m3(1.0));
    builder.add_boundary_face(c0, inlet, m2(1.0), [-1.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
    let mid = builder.add_internal_face(c0, c1, m2(1.0), [1.0, 0.0, 0.0]);
    builder.add_boundary_face(c1, outlet, m2(1.0), [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);

    let mesh = builder.build().unwrap();

    assert_eq!(mesh.n_cells(), 2);
    assert_eq!(mesh.internal_faces().count(), 1);
    assert_eq!(mesh.boundary_faces().count(), 2);

    let face = mesh.face(mid).unwrap();
    assert_eq!(face.owner, c0);
    assert_eq!(face.neighbour, Some(c1));
    assert!((face.delta - 1.0).abs() < 1e-15);

    assert_eq!(mesh.patch_by_name("outlet").map(|p| p.id), Some(outlet));
    assert!(mesh.patch_by_name("wall").is_none());
    assert_eq!(mesh.cell_faces(c0).len(), 2);
}

#[test]
fn uniform_line_matches_hand_built_mesh() {
    let line = Mesh::uniform_line(2, m(2.0), m2(1.0)).unwrap();

    let mut builder = MeshBuilder::new();
    let inlet = builder.add_patch("inlet");
    let outlet = builder.add_patch("outlet");
    let c0 = builder.add_cell([0.5, 0.0, 0.0], m3(1.0));
    let c1 = builder.add_cell([1.5, 0.0, 0.0], m3(1.0));
    builder.add_boundary_face(c0, inlet, m2(1.0), [-1.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
    builder.add_internal_face(c0, c1, m2(1.0), [1.0, 0.0, 0.0]);
    builder.add_boundary_face(c1, outlet, m2(1.0), [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
    let hand = builder.build().unwrap();

    assert_eq!(line.fingerprint(), hand.fingerprint());
}

#[test]
fn field_length_is_checked_against_mesh() {
    let mesh = Mesh::uniform_line(4, m(1.0), m2(1.0)).unwrap();
    let err = ScalarField::new(&mesh, "T", vec![1.0; 5]).unwrap_err();
    assert_eq!(
        err,
        MeshError::LengthMismatch {
            what: "field values",
            expected: 4,
            found: 5
        }
    );
    assert!(err.to_string().contains("length 5"));
}

proptest! {
    #[test]
    fn inner_product_is_symmetric_and_positive(
        a in prop::collection::vec(-10.0_f64..10.0, 6),
        b in prop::collection::vec(-10.0_f64..10.0, 6),
    ) {
        let mesh = Mesh::uniform_line(6, m(3.0), m2(0.2)).unwrap();
        let ab = mesh.inner(&a, &b).unwrap();
        let ba = mesh.inner(&b, &a).unwrap();
        prop_assert!((ab - ba).abs() <= 1e-12 * (1.0 + ab.abs()));
        prop_assert!(mesh.inner(&a, &a).unwrap() >= 0.0);
    }
}
