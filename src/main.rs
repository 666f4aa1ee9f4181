use charge_field::config::{SamplerConfig, FLUX_SAMPLES};
use charge_field::error::ConfigError;
use charge_field::export::{render_plot, write_plot, ExportFormat};
use charge_field::gauss::gauss_flux;
use charge_field::plot::{dipole_plot, gaussian_plot, FieldPlot};
use charge_field::request::{DipoleRequest, GaussianRequest};
use charge_field::units::{elementary_to_coulombs, enclosed_flux};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "charge_field",
    version,
    about = "Electrostatic field sampler for point charges and Gaussian surfaces"
)]
struct Cli {
    /// TOML file overriding grid, display and charge settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format for plot documents (json or csv)
    #[arg(long, global = true, default_value = "json")]
    format: ExportFormat,

    /// Write the plot here instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Field of the proton/electron pair
    Dipole {
        #[arg(long)]
        hide_proton: bool,
        #[arg(long)]
        hide_electron: bool,
        /// JSON toggles, e.g. '{"proton": false}'; overrides the flags
        #[arg(long)]
        request: Option<String>,
    },
    /// Closed-form field of a Gaussian surface with its overlay
    Gaussian {
        #[command(flatten)]
        surface: SurfaceArgs,
        /// JSON parameters, e.g. '{"surface": "plane", "radius": 10}'; overrides the flags
        #[arg(long)]
        request: Option<String>,
    },
    /// Integrate the Gauss flux through a surface and compare with 4π k_e q
    Flux {
        #[command(flatten)]
        surface: SurfaceArgs,
        #[arg(long, default_value_t = FLUX_SAMPLES)]
        samples: usize,
    },
}

#[derive(Args)]
struct SurfaceArgs {
    /// sphere, cylinder or plane
    #[arg(long, default_value = "sphere")]
    surface: String,
    #[arg(long, default_value_t = charge_field::config::DEFAULT_GAUSS_RADIUS)]
    radius: f64,
    /// Enclosed charge in elementary charges
    #[arg(
        long,
        default_value_t = charge_field::config::DEFAULT_GAUSS_CHARGE,
        allow_hyphen_values = true
    )]
    charge: f64,
}

impl SurfaceArgs {
    fn to_request(&self) -> Result<GaussianRequest, ConfigError> {
        Ok(GaussianRequest::parse(&self.surface, self.radius, self.charge)?)
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SamplerConfig, ConfigError> {
    match path {
        Some(path) => {
            let config = SamplerConfig::load_from_file(path)?;
            log::info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(SamplerConfig::default()),
    }
}

fn emit(plot: &FieldPlot, cli: &Cli) -> Result<(), ConfigError> {
    match &cli.output {
        Some(path) => write_plot(plot, cli.format, path),
        None => {
            println!("{}", render_plot(plot, cli.format)?);
            Ok(())
        }
    }
}

fn run(cli: &Cli) -> Result<(), ConfigError> {
    let config = load_config(cli.config.as_ref())?;

    match &cli.command {
        Command::Dipole {
            hide_proton,
            hide_electron,
            request,
        } => {
            let request = match request {
                Some(json) => DipoleRequest::from_json(json)?,
                None => DipoleRequest {
                    proton: !hide_proton,
                    electron: !hide_electron,
                },
            };
            log::info!(
                "Plotting dipole (proton: {}, electron: {})",
                request.proton,
                request.electron
            );
            emit(&dipole_plot(&config, &request)?, cli)
        }
        Command::Gaussian { surface, request } => {
            let request = match request {
                Some(json) => GaussianRequest::from_json(json)?,
                None => surface.to_request()?,
            };
            log::info!(
                "Plotting {} surface (radius {}, charge {} e)",
                request.surface,
                request.radius,
                request.charge_e
            );
            emit(&gaussian_plot(&config, &request)?, cli)
        }
        Command::Flux { surface, samples } => {
            let request = surface.to_request()?;
            let flux = gauss_flux(request.surface, request.charge_e, request.radius, *samples)?;
            let expected = enclosed_flux(elementary_to_coulombs(request.charge_e));
            let rel_error = if expected != 0.0 {
                ((flux - expected) / expected).abs()
            } else {
                flux.abs()
            };
            println!(
                "{} r={} q={} e: flux={:.6e} expected={:.6e} rel_error={:.3e}",
                request.surface, request.radius, request.charge_e, flux, expected, rel_error
            );
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = run(&cli);

    #[cfg(feature = "profiling")]
    charge_field::PROFILER.lock().log_and_clear();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
