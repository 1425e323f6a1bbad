//! Case validation logic.

use std::collections::HashSet;

use crate::schema::{Case, FullOrderDef, InitialDef, MeshDef, PodDef, RunDef, TransportDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate entry: {id} in {context}")]
    Duplicate { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_case(case: &Case) -> Result<(), ValidationError> {
    if case.version == 0 || case.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: case.version,
        });
    }

    validate_mesh(&case.mesh)?;
    validate_transport(&case.transport, &case.mesh)?;
    validate_pod(&case.pod)?;
    if let Some(full_order) = &case.full_order {
        validate_full_order(full_order)?;
    }
    validate_run(&case.run)?;

    Ok(())
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    Ok(())
}

fn nonzero(field: &str, value: usize) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_mesh(mesh: &MeshDef) -> Result<(), ValidationError> {
    match mesh {
        MeshDef::UniformLine {
            n_cells,
            length_m,
            area_m2,
        } => {
            nonzero("mesh n_cells", *n_cells)?;
            positive("mesh length_m", *length_m)?;
            positive("mesh area_m2", *area_m2)?;
        }
    }
    Ok(())
}

fn validate_transport(transport: &TransportDef, mesh: &MeshDef) -> Result<(), ValidationError> {
    for (axis, u) in ["x", "y", "z"].iter().zip(transport.velocity_m_s) {
        if !u.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: format!("transport velocity_m_s.{axis}"),
                value: u.to_string(),
                reason: "must be finite".to_string(),
            });
        }
    }

    let d = transport.diffusivity_m2_s;
    if !(d.is_finite() && d >= 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "transport diffusivity_m2_s".to_string(),
            value: d.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }

    let patches = mesh.patch_names();
    let mut seen = HashSet::new();
    for boundary in &transport.boundaries {
        if !patches.contains(&boundary.patch.as_str()) {
            return Err(ValidationError::MissingReference {
                id: boundary.patch.clone(),
                context: "transport boundaries patch".to_string(),
            });
        }
        if !seen.insert(boundary.patch.as_str()) {
            return Err(ValidationError::Duplicate {
                id: boundary.patch.clone(),
                context: "transport boundaries".to_string(),
            });
        }
    }

    Ok(())
}

fn validate_pod(pod: &PodDef) -> Result<(), ValidationError> {
    if pod.field.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "pod field".to_string(),
            value: pod.field.clone(),
            reason: "must not be empty".to_string(),
        });
    }
    if pod.field.contains(['/', '\\']) {
        return Err(ValidationError::InvalidValue {
            field: "pod field".to_string(),
            value: pod.field.clone(),
            reason: "must not contain path separators".to_string(),
        });
    }
    nonzero("pod n_modes", pod.n_modes)?;
    positive("pod orthonormality_tol", pod.orthonormality_tol)?;
    if !(pod.rank_tol.is_finite() && pod.rank_tol >= 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "pod rank_tol".to_string(),
            value: pod.rank_tol.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    Ok(())
}

fn validate_initial(field: &str, initial: &InitialDef) -> Result<(), ValidationError> {
    match initial {
        InitialDef::Gaussian {
            centre_m,
            width_m,
            amplitude,
        } => {
            positive(&format!("{field} width_m"), *width_m)?;
            for (name, v) in [("centre_m", centre_m), ("amplitude", amplitude)] {
                if !v.is_finite() {
                    return Err(ValidationError::InvalidValue {
                        field: format!("{field} {name}"),
                        value: v.to_string(),
                        reason: "must be finite".to_string(),
                    });
                }
            }
        }
        InitialDef::Uniform { value } => {
            if !value.is_finite() {
                return Err(ValidationError::InvalidValue {
                    field: format!("{field} value"),
                    value: value.to_string(),
                    reason: "must be finite".to_string(),
                });
            }
        }
        InitialDef::FirstSnapshot => {}
    }
    Ok(())
}

fn validate_span(context: &str, dt_s: f64, t_end_s: f64) -> Result<(), ValidationError> {
    positive(&format!("{context} dt_s"), dt_s)?;
    positive(&format!("{context} t_end_s"), t_end_s)?;
    Ok(())
}

fn validate_full_order(full_order: &FullOrderDef) -> Result<(), ValidationError> {
    if matches!(full_order.initial, InitialDef::FirstSnapshot) {
        return Err(ValidationError::InvalidValue {
            field: "full_order initial".to_string(),
            value: "FirstSnapshot".to_string(),
            reason: "the full-order run produces the snapshots".to_string(),
        });
    }
    validate_initial("full_order initial", &full_order.initial)?;
    validate_span("full_order", full_order.dt_s, full_order.t_end_s)?;
    nonzero("full_order snapshot_every", full_order.snapshot_every)?;
    Ok(())
}

fn validate_run(run: &RunDef) -> Result<(), ValidationError> {
    validate_initial("run initial", &run.initial)?;
    validate_span("run", run.dt_s, run.t_end_s)?;
    nonzero("run write_every", run.write_every)?;
    Ok(())
}
