//! Investment advisor entry point: CLI wiring and config-driven input loading.

mod cli;

use std::path::Path;
use std::process;

use energy_invest::config::AdvisorConfig;
use energy_invest::invest::{AllocationResult, Project, allocate};
use energy_invest::io::catalog::{load_catalog, read_series_csv};
use energy_invest::io::export::export_csv;
use energy_invest::profiles::{self, SeriesShape};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::CliOptions;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Resolves the configuration: `--config` takes priority, then `--preset`,
/// then the default preset. CLI overrides are applied last.
fn load_config(cli: &CliOptions) -> Result<AdvisorConfig, String> {
    let mut config = if let Some(ref path) = cli.config {
        AdvisorConfig::from_toml_file(path).map_err(|e| e.to_string())?
    } else if let Some(ref name) = cli.preset {
        AdvisorConfig::from_preset(name).map_err(|e| e.to_string())?
    } else {
        AdvisorConfig::default()
    };

    if let Some(budget) = cli.budget {
        config.allocation.budget = Some(budget);
    }
    if let Some(max_shares) = cli.max_shares {
        config.allocation.max_shares_per_project = max_shares;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(lines.join("\n"));
    }
    Ok(config)
}

/// Loads consumption and catalog from files, or builds the seeded demo.
fn load_inputs(cli: &CliOptions, config: &AdvisorConfig) -> Result<(Vec<f64>, Vec<Project>), String> {
    if let (Some(consumption), Some(catalog), Some(production_dir)) =
        (&cli.consumption, &cli.catalog, &cli.production_dir)
    {
        let consumption = read_series_csv(consumption).map_err(|e| e.to_string())?;
        let projects =
            load_catalog(catalog, production_dir, consumption.len()).map_err(|e| e.to_string())?;
        info!(
            intervals = consumption.len(),
            projects = projects.len(),
            "loaded inputs from files"
        );
        return Ok((consumption, projects));
    }

    let demo = &config.demo;
    let shape = SeriesShape::from_interval_hours(config.allocation.interval_hours, demo.days);
    let consumption = profiles::household_consumption(shape, demo.base_load_kw, demo.seed);
    let projects = profiles::demo_catalog(shape, demo.seed);
    info!(
        days = demo.days,
        seed = demo.seed,
        intervals = consumption.len(),
        "using demo portfolio"
    );
    Ok((consumption, projects))
}

fn run(cli: &CliOptions) -> Result<(AdvisorConfig, AllocationResult), String> {
    let config = load_config(cli)?;
    let (consumption, projects) = load_inputs(cli, &config)?;
    let result =
        allocate(&consumption, &projects, &config.allocation_params()).map_err(|e| e.to_string())?;
    Ok((config, result))
}

fn main() {
    init_tracing();

    let cli = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        cli::print_usage();
        process::exit(1);
    });

    #[cfg(not(feature = "api"))]
    if cli.serve {
        eprintln!("error: --serve requires building with the `api` feature");
        process::exit(1);
    }

    #[cfg_attr(not(feature = "api"), expect(unused_variables))]
    let (config, result) = run(&cli).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    println!("{result}");

    // Export CSV if requested
    if let Some(ref path) = cli.report_out {
        if let Err(e) = export_csv(&result, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Recommendations written to {}", path.display());
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(energy_invest::api::AppState { config });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(energy_invest::api::serve(state, addr)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
    }
}
