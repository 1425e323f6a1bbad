use std::path::Path;

use pf_case::*;

fn minimal_case() -> Case {
    Case {
        version: LATEST_VERSION,
        name: "Minimal".to_string(),
        mesh: MeshDef::UniformLine {
            n_cells: 8,
            length_m: 2.0,
            area_m2: 0.5,
        },
        transport: TransportDef {
            velocity_m_s: [0.0, 0.0, 0.0],
            diffusivity_m2_s: 0.1,
            boundaries: vec![],
        },
        pod: PodDef {
            field: "C".to_string(),
            n_modes: 2,
            reference: ReferenceDef::SnapshotMean,
            orthonormality_tol: 1e-9,
            rank_tol: 0.0,
            auto_clear_fields: false,
        },
        full_order: None,
        run: RunDef {
            initial: InitialDef::Uniform { value: 0.5 },
            dt_s: 0.01,
            t_end_s: 1.0,
            write_every: 10,
            integrator: IntegratorDef::LinearlyImplicitEuler,
        },
    }
}

#[test]
fn roundtrip_yaml() {
    let case = minimal_case();
    let path = std::env::temp_dir().join("pf_case_roundtrip.yaml");
    save_yaml(&path, &case).unwrap();
    assert_eq!(load_yaml(&path).unwrap(), case);
}

#[test]
fn roundtrip_json() {
    let case = minimal_case();
    let path = std::env::temp_dir().join("pf_case_roundtrip.json");
    save_json(&path, &case).unwrap();
    assert_eq!(load(&path).unwrap(), case);
}

#[test]
fn save_refuses_invalid_case() {
    let mut case = minimal_case();
    case.pod.n_modes = 0;
    let path = std::env::temp_dir().join("pf_case_invalid.yaml");
    assert!(matches!(
        save_yaml(&path, &case),
        Err(CaseError::Validation(_))
    ));
}

#[test]
fn defaults_fill_optional_fields() {
    let yaml = r#"
version: 1
name: defaults
mesh: { type: UniformLine, n_cells: 4, length_m: 1.0 }
transport: { velocity_m_s: [1.0, 0.0, 0.0], diffusivity_m2_s: 0.0 }
pod: { field: T, n_modes: 1 }
run:
  initial: { type: Gaussian, centre_m: 0.5, width_m: 0.1 }
  dt_s: 0.1
  t_end_s: 1.0
  write_every: 1
"#;
    let case: Case = serde_yaml::from_str(yaml).unwrap();
    validate_case(&case).unwrap();
    assert_eq!(case.pod.reference, ReferenceDef::Zero);
    assert_eq!(case.pod.orthonormality_tol, 1e-8);
    assert!(case.pod.auto_clear_fields);
    assert_eq!(case.run.integrator, IntegratorDef::RK4);
    assert!(case.full_order.is_none());
    assert!(matches!(
        case.mesh,
        MeshDef::UniformLine { area_m2, .. } if area_m2 == 1.0
    ));
    assert!(matches!(
        case.run.initial,
        InitialDef::Gaussian { amplitude, .. } if amplitude == 1.0
    ));
}

#[test]
fn channel_case_loads_and_validates() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../cases/channel/case.yaml");
    let case = load_yaml(&path).unwrap_or_else(|e| panic!("failed to load channel case: {e}"));
    assert_eq!(case.pod.n_modes, 4);
    assert!(case.full_order.is_some());
}
