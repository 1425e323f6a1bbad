//! Translate a case definition into mesh, operator, model configuration and
//! integration options.

use pf_case::{
    BoundaryKindDef, Case, InitialDef, IntegratorDef, MeshDef, PodDef, ReferenceDef, TransportDef,
};
use pf_core::units::{m, m2, m2ps, mps};
use pf_io::CaseStore;
use pf_mesh::{Mesh, ScalarField};
use pf_ode::{IntegratorType, OdeOptions};
use pf_pod::{BoundaryCondition, ConvectionDiffusion, PodConfig, ReferenceField};

use crate::error::{CliError, CliResult};

pub fn build_mesh(mesh: &MeshDef) -> CliResult<Mesh> {
    match mesh {
        MeshDef::UniformLine {
            n_cells,
            length_m,
            area_m2,
        } => Ok(Mesh::uniform_line(*n_cells, m(*length_m), m2(*area_m2))?),
    }
}

pub fn build_transport(transport: &TransportDef) -> CliResult<ConvectionDiffusion> {
    let [ux, uy, uz] = transport.velocity_m_s;
    let mut op = ConvectionDiffusion::new(
        [mps(ux), mps(uy), mps(uz)],
        m2ps(transport.diffusivity_m2_s),
    )?;
    for boundary in &transport.boundaries {
        let bc = match boundary.condition {
            BoundaryKindDef::ZeroValue => BoundaryCondition::ZeroValue,
            BoundaryKindDef::ZeroGradient => BoundaryCondition::ZeroGradient,
        };
        op = op.with_boundary(boundary.patch.clone(), bc);
    }
    Ok(op)
}

pub fn pod_config(pod: &PodDef) -> PodConfig {
    let reference = match pod.reference {
        ReferenceDef::Zero => ReferenceField::Zero,
        ReferenceDef::SnapshotMean => ReferenceField::SnapshotMean,
    };
    let mut config = PodConfig::new(pod.field.clone(), pod.n_modes)
        .with_reference(reference)
        .with_auto_clear_fields(pod.auto_clear_fields);
    config.orthonormality_tol = pod.orthonormality_tol;
    config.rank_tol = pod.rank_tol;
    config
}

pub fn ode_options(
    dt_s: f64,
    t_end_s: f64,
    integrator: IntegratorDef,
    record_every: usize,
) -> OdeOptions {
    let integrator = match integrator {
        IntegratorDef::RK4 => IntegratorType::RK4,
        IntegratorDef::ForwardEuler => IntegratorType::ForwardEuler,
        IntegratorDef::LinearlyImplicitEuler => IntegratorType::LinearlyImplicitEuler,
    };
    OdeOptions {
        x_start: 0.0,
        dt: dt_s,
        x_end: t_end_s,
        max_steps: usize::MAX,
        record_every,
        integrator,
    }
}

/// Full-order initial field for `initial`.
pub fn initial_field(
    case: &Case,
    mesh: &Mesh,
    initial: &InitialDef,
    store: &CaseStore,
) -> CliResult<Vec<f64>> {
    let field = case.pod.field.as_str();
    match initial {
        InitialDef::Gaussian {
            centre_m,
            width_m,
            amplitude,
        } => Ok(ScalarField::from_fn(mesh, field, |c| {
            amplitude * (-((c[0] - centre_m) / width_m).powi(2)).exp()
        })
        .into_values()),
        InitialDef::Uniform { value } => Ok(ScalarField::uniform(mesh, field, *value).into_values()),
        InitialDef::FirstSnapshot => {
            let first = store.load_snapshots(field)?.into_iter().next().ok_or_else(|| {
                CliError::InvalidInput(format!("no snapshots of '{field}' to start from"))
            })?;
            if first.mesh_fingerprint != mesh.fingerprint() {
                return Err(CliError::InvalidInput(format!(
                    "first snapshot of '{field}' was taken on a different mesh"
                )));
            }
            Ok(first.values)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_case::BoundaryDef;
    use pf_pod::TransportOperator;

    #[test]
    fn transport_carries_boundaries() {
        let def = TransportDef {
            velocity_m_s: [1.0, 0.0, 0.0],
            diffusivity_m2_s: 0.01,
            boundaries: vec![BoundaryDef {
                patch: "inlet".to_string(),
                condition: BoundaryKindDef::ZeroValue,
            }],
        };
        let op = build_transport(&def).unwrap();
        assert_eq!(op.boundary("inlet"), BoundaryCondition::ZeroValue);
        assert_eq!(op.boundary("outlet"), BoundaryCondition::ZeroGradient);
        assert_eq!(op.name(), "convection-diffusion");
    }

    #[test]
    fn options_map_integrator() {
        let opts = ode_options(0.01, 1.0, IntegratorDef::ForwardEuler, 5);
        assert_eq!(opts.integrator, IntegratorType::ForwardEuler);
        assert_eq!(opts.step_count(), 100);
    }

    #[test]
    fn config_copies_tolerances() {
        let pod = PodDef {
            field: "T".to_string(),
            n_modes: 3,
            reference: ReferenceDef::SnapshotMean,
            orthonormality_tol: 1e-6,
            rank_tol: 1e-10,
            auto_clear_fields: false,
        };
        let cfg = pod_config(&pod);
        assert_eq!(cfg.reference, ReferenceField::SnapshotMean);
        assert_eq!(cfg.orthonormality_tol, 1e-6);
        assert!(!cfg.auto_clear_fields);
    }
}
