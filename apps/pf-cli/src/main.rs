mod error;
mod reduced;
mod setup;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;

use pf_case::Case;
use pf_io::CaseStore;
use pf_ode::{OdeError, OdeSystem, run_with_observer};
use pf_pod::{
    BasisSource, FullOrderTransport, OrthoNormalBasis, ScalarTransportPod, load_snapshots,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::{CliError, CliResult};

#[derive(Parser)]
#[command(name = "pf")]
#[command(about = "PodFlow CLI - POD reduced-order scalar transport", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a case file and summarize its contents
    Validate {
        /// Path to the case YAML (or JSON) file
        case_path: PathBuf,
    },
    /// Run the full-order model and store snapshots
    Snapshots {
        /// Path to the case YAML (or JSON) file
        case_path: PathBuf,
    },
    /// Build the basis from stored snapshots and persist it
    Basis {
        /// Path to the case YAML (or JSON) file
        case_path: PathBuf,
    },
    /// Run the reduced-order model and write reconstructed fields
    Run {
        /// Path to the case YAML (or JSON) file
        case_path: PathBuf,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { case_path } => cmd_validate(&case_path),
        Commands::Snapshots { case_path } => cmd_snapshots(&case_path),
        Commands::Basis { case_path } => cmd_basis(&case_path),
        Commands::Run { case_path } => cmd_run(&case_path),
    }
}

fn load_case(case_path: &Path) -> CliResult<(Case, CaseStore)> {
    let case = pf_case::load(case_path)?;
    let store = CaseStore::for_case(case_path)?;
    Ok((case, store))
}

fn cmd_validate(case_path: &Path) -> CliResult<()> {
    println!("Validating case: {}", case_path.display());
    let (case, store) = load_case(case_path)?;
    let mesh = setup::build_mesh(&case.mesh)?;
    setup::build_transport(&case.transport)?;
    let field = case.pod.field.as_str();

    println!("✓ Case is valid: {}", case.name);
    println!("  Cells: {}", mesh.n_cells());
    println!("  Field: {field} ({} modes)", case.pod.n_modes);
    println!(
        "  Stored snapshots: {}",
        if store.has_snapshots(field) { "yes" } else { "no" }
    );
    println!(
        "  Stored basis: {}",
        if store.has_basis(field) { "yes" } else { "no" }
    );
    Ok(())
}

fn cmd_snapshots(case_path: &Path) -> CliResult<()> {
    let (case, store) = load_case(case_path)?;
    let full_order = case.full_order.as_ref().ok_or_else(|| {
        CliError::InvalidInput("case has no full_order section".to_string())
    })?;
    let field = case.pod.field.clone();

    let mesh = setup::build_mesh(&case.mesh)?;
    let transport = setup::build_transport(&case.transport)?;
    let initial = setup::initial_field(&case, &mesh, &full_order.initial, &store)?;
    let opts = setup::ode_options(
        full_order.dt_s,
        full_order.t_end_s,
        full_order.integrator,
        full_order.snapshot_every,
    );

    println!(
        "Running full-order model: {} cells, dt = {:.3e} s, t_end = {:.3} s",
        mesh.n_cells(),
        opts.dt,
        opts.x_end
    );
    let started = Instant::now();

    store.clear_snapshots(&field)?;
    let mut system = FullOrderTransport::new(&mesh, Box::new(transport), initial)?;
    store.write_snapshot(&system.snapshot(&field, opts.x_start))?;

    let steps = opts.step_count();
    let every = full_order.snapshot_every;
    let mut written = 1usize;
    run_with_observer(&mut system, &opts, |sys, step, t| {
        if step % every == 0 || step == steps {
            store
                .write_snapshot(&sys.snapshot(&field, t))
                .map_err(OdeError::system)?;
            written += 1;
        }
        Ok(())
    })?;

    println!(
        "✓ Wrote {written} snapshots of '{field}' in {:.2} s",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn cmd_basis(case_path: &Path) -> CliResult<()> {
    let (case, store) = load_case(case_path)?;
    let mesh = setup::build_mesh(&case.mesh)?;
    let config = setup::pod_config(&case.pod);

    let snapshots = load_snapshots(&store, &mesh, &config.field_name)?;
    let basis = OrthoNormalBasis::from_snapshots(&mesh, &snapshots, &config)?;
    let path = store.save_basis(&basis.to_record(&config.field_name))?;

    println!(
        "✓ Basis of '{}' from {} snapshots: {}",
        config.field_name,
        snapshots.len(),
        path.display()
    );
    println!("  Eigenvalues:");
    for (i, lambda) in basis.eigenvalues().iter().enumerate() {
        let marker = if i < basis.mode_count() { "*" } else { " " };
        println!("   {marker} {i:>3}  {lambda:.6e}");
    }
    if let Some(energy) = basis.captured_energy() {
        println!("  Captured energy: {:.4}%", energy * 100.0);
    }
    println!(
        "  Orthonormality error: {:.3e}",
        basis.orthonormality_error(&mesh)?
    );
    Ok(())
}

fn cmd_run(case_path: &Path) -> CliResult<()> {
    let (case, store) = load_case(case_path)?;
    let mesh = setup::build_mesh(&case.mesh)?;
    let transport = setup::build_transport(&case.transport)?;
    let config = setup::pod_config(&case.pod);
    let initial = setup::initial_field(&case, &mesh, &case.run.initial, &store)?;
    let opts = setup::ode_options(
        case.run.dt_s,
        case.run.t_end_s,
        case.run.integrator,
        case.run.write_every,
    );

    let mut model = ScalarTransportPod::new(&mesh, config, Box::new(transport))?
        .with_source(BasisSource::Case(store.clone()))
        .with_output(store);
    model.initialise_from(&initial)?;

    println!(
        "Running reduced model: {} modes, dt = {:.3e} s, t_end = {:.3} s",
        model.equation_count(),
        opts.dt,
        opts.x_end
    );
    let started = Instant::now();
    let run = reduced::integrate_and_write(&mut model, &opts, case.run.write_every)?;

    let stats = model.cache_stats();
    info!(
        basis_builds = stats.basis_builds,
        operator_builds = stats.operator_builds,
        field_builds = stats.field_builds,
        "reduced run cache usage"
    );

    let coefficients = model.coefficients().to_vec();
    let field = model.field()?;
    println!(
        "✓ Reduced run complete in {:.2} s ({} recorded states, {} fields written)",
        started.elapsed().as_secs_f64(),
        run.record.len(),
        run.written
    );
    if let Some((lo, hi)) = field.min_max() {
        println!("  Final '{}' range: [{lo:.4}, {hi:.4}]", field.name());
    }
    println!("  Volume-weighted mean: {:.6}", field.weighted_average(&mesh)?);
    println!("  Final coefficients: {coefficients:?}");
    Ok(())
}
