//! Reduced-order integration with periodic field output.

use std::path::PathBuf;

use pf_ode::{OdeError, OdeOptions, OdeRecord, run_with_observer};
use pf_pod::{PodResult, ScalarTransportPod};

use crate::error::CliResult;

pub struct ReducedRun {
    pub record: OdeRecord,
    /// Number of reconstructed fields written, including the initial one.
    pub written: usize,
}

/// Integrate `model` from its current coefficients, writing the reconstructed
/// field at `opts.x_start`, every `write_every` steps and after the last step.
///
/// On return the model's cached field matches its final coefficients.
pub fn integrate_and_write(
    model: &mut ScalarTransportPod<'_>,
    opts: &OdeOptions,
    write_every: usize,
) -> CliResult<ReducedRun> {
    write_current(model, opts.x_start)?;

    let steps = opts.step_count();
    let mut written = 1usize;
    let record = run_with_observer(model, opts, |sys, step, t| {
        if step % write_every == 0 || step == steps {
            write_current(sys, t).map_err(OdeError::system)?;
            written += 1;
        }
        Ok(())
    })?;

    model.update_fields()?;
    Ok(ReducedRun { record, written })
}

/// Rebuild the field from the live coefficients, then write it. The cached
/// field is not refreshed by coefficient updates when auto-clear is off.
fn write_current(model: &mut ScalarTransportPod<'_>, time_s: f64) -> PodResult<PathBuf> {
    model.update_fields()?;
    model.write(time_s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::units::{m, m2, m2ps, mps};
    use pf_io::CaseStore;
    use pf_mesh::Mesh;
    use pf_ode::{IntegratorType, OdeSystem};
    use pf_pod::{BasisSource, ConvectionDiffusion, PodConfig, reconstruct};

    fn snapshots(n: usize) -> Vec<Vec<f64>> {
        (0..3)
            .map(|k| {
                (0..n)
                    .map(|i| ((k + 1) as f64 * 0.9 * i as f64).sin() + 0.2 * k as f64)
                    .collect()
            })
            .collect()
    }

    fn check_written_fields(auto_clear: bool, dir: &str) {
        let mesh = Mesh::uniform_line(10, m(1.0), m2(1.0)).unwrap();
        let transport =
            ConvectionDiffusion::new([mps(0.5), mps(0.0), mps(0.0)], m2ps(0.02)).unwrap();
        let root = std::env::temp_dir().join(dir);
        let _ = std::fs::remove_dir_all(&root);
        let store = CaseStore::new(root).unwrap();

        let config = PodConfig::new("T", 3).with_auto_clear_fields(auto_clear);
        let mut model = ScalarTransportPod::new(&mesh, config, Box::new(transport))
            .unwrap()
            .with_source(BasisSource::InMemory(snapshots(10)))
            .with_output(store.clone());
        model.set_coefficients(&[1.0, -0.5, 0.25]).unwrap();

        let opts = OdeOptions {
            x_start: 0.0,
            dt: 0.01,
            x_end: 0.1,
            max_steps: 1_000,
            record_every: 5,
            integrator: IntegratorType::RK4,
        };
        let run = integrate_and_write(&mut model, &opts, 5).unwrap();
        assert_eq!(run.written, 3);
        assert_eq!(run.record.len(), 3);
        assert_eq!(store.list_output_times().unwrap().len(), 3);

        let basis = model.ortho_base().unwrap().clone();
        for (t, y) in run.record.x.iter().zip(&run.record.y) {
            let written = store.load_field("T", *t).unwrap();
            let expected = reconstruct(&basis, y).unwrap();
            for (a, b) in written.values.iter().zip(&expected) {
                assert!((a - b).abs() < 1e-12, "t = {t}: {a} vs {b}");
            }
        }

        let first = store.load_field("T", 0.0).unwrap().values;
        let last = store.load_field("T", 0.1).unwrap().values;
        assert_ne!(first, last);

        let final_y = model.coefficients().to_vec();
        let expected = reconstruct(&basis, &final_y).unwrap();
        assert_eq!(model.field().unwrap().values(), expected.as_slice());
    }

    #[test]
    fn written_fields_follow_coefficients_with_auto_clear() {
        check_written_fields(true, "pf_cli_test_reduced_auto_clear");
    }

    #[test]
    fn written_fields_follow_coefficients_without_auto_clear() {
        check_written_fields(false, "pf_cli_test_reduced_manual_clear");
    }
}
