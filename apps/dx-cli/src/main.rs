use clap::{Parser, Subcommand};
use dx_coil::{CoilInputs, CondenserType, OperatingPoint, TimestepOutput};
use dx_core::ensure_finite;
use dx_core::units::constants::std_pressure;
use dx_core::units::{kgps, s, w};
use dx_psychro::AirState;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Core(#[from] dx_core::DxError),

    #[error(transparent)]
    Project(#[from] dx_project::ProjectError),

    #[error(transparent)]
    Coil(#[from] dx_coil::CoilError),

    #[error(transparent)]
    Psychro(#[from] dx_psychro::PsychroError),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "dx-cli")]
#[command(about = "DX cooling coil performance model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and references
    Validate {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Describe the coils of a project and their rated speeds
    Describe {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Run a coil for a number of identical timesteps
    Simulate(SimulateArgs),
}

#[derive(clap::Args)]
struct SimulateArgs {
    /// Path to the project YAML file
    project_path: PathBuf,
    /// Coil name
    #[arg(long)]
    coil: String,
    /// Entering air dry-bulb temperature [°C]
    #[arg(long, default_value_t = 26.67)]
    entering_db: f64,
    /// Entering air wet-bulb temperature [°C]
    #[arg(long, default_value_t = 19.44)]
    entering_wb: f64,
    /// Outdoor dry-bulb temperature [°C]
    #[arg(long, default_value_t = 35.0)]
    outdoor_db: f64,
    /// Outdoor wet-bulb temperature [°C]
    #[arg(long, default_value_t = 23.9)]
    outdoor_wb: f64,
    /// Requested sensible load [W]
    #[arg(long)]
    load: f64,
    /// Requested latent load [W]; switches to total-load matching
    #[arg(long)]
    latent: Option<f64>,
    /// Supply air mass flow [kg/s]
    #[arg(long, default_value_t = 1.2)]
    mass_flow: f64,
    /// Timestep length [s]
    #[arg(long, default_value_t = 3600.0)]
    dt: f64,
    /// Number of timesteps
    #[arg(long, default_value_t = 1)]
    steps: u32,
    /// Operating mode number, overriding the mode schedule
    #[arg(long)]
    mode: Option<f64>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Describe { project_path } => cmd_describe(&project_path),
        Commands::Simulate(args) => cmd_simulate(&args),
    }
}

fn cmd_validate(project_path: &Path) -> CliResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = dx_project::load_yaml(project_path)?;
    // Building resolves curve arities and rated bypass factors too.
    let bank = dx_project::build_bank(&project)?;
    println!("✓ Project is valid ({} coils)", bank.len());
    Ok(())
}

fn cmd_describe(project_path: &Path) -> CliResult<()> {
    let project = dx_project::load_yaml(project_path)?;
    let bank = dx_project::build_bank(&project)?;

    if bank.is_empty() {
        println!("No coils found in project");
        return Ok(());
    }

    for name in bank.names() {
        let coil = bank.get(name)?;
        let perf = coil.performance();
        println!("{} -> {}", coil.name(), perf.name());
        println!(
            "  crankcase heater: {:.0} W below {:.1} °C, compressor lockout below {:.1} °C",
            perf.crankcase_heater_capacity().value,
            perf.max_outdoor_temp_crankcase_c(),
            perf.min_outdoor_temp_compressor_c()
        );
        for (id, mode) in perf.modes() {
            let condenser = match mode.condenser() {
                CondenserType::AirCooled => "air-cooled".to_string(),
                CondenserType::Evaporative(evap) => {
                    format!("evaporative (effectiveness {:.2})", evap.effectiveness)
                }
            };
            println!(
                "  mode {} {}: {:.0} W, {:.3} m³/s, SHR {:.2}, {:?}, {}",
                id.number(),
                mode.name(),
                mode.rated_total_capacity().value,
                mode.rated_evap_air_flow().value,
                mode.rated_shr(),
                mode.speed_control(),
                condenser
            );
            for (sid, speed) in mode.speeds() {
                let rating = speed.rating();
                println!(
                    "    speed {} {}: {:8.0} W  {:.3} kg/s  SHR {:.3}  COP {:.2}  BF {:.3}",
                    sid.number(),
                    speed.name(),
                    rating.total_capacity.value,
                    rating.air_mass_flow.value,
                    rating.shr,
                    speed.spec().rated_cop,
                    rating.bypass_factor
                );
            }
        }
    }
    Ok(())
}

fn cmd_simulate(args: &SimulateArgs) -> CliResult<()> {
    let project = dx_project::load_yaml(&args.project_path)?;
    let schedules = dx_project::build_schedules(&project)?;
    let mut coil = dx_project::build_coil(&project, &args.coil)?;

    let p = std_pressure();
    let inputs = CoilInputs {
        entering_air: AirState::from_tdb_twb(args.entering_db, args.entering_wb, p)?,
        condenser_entering_air: AirState::from_tdb_twb(args.outdoor_db, args.outdoor_wb, p)?,
        requested_sensible_load: w(args.load),
        requested_latent_load: args.latent.map(w),
        supply_air_mass_flow: kgps(args.mass_flow),
        timestep: s(args.dt),
    };

    info!(coil = coil.name(), steps = args.steps, "simulating");

    for step in 0..args.steps {
        let t = s(args.dt * f64::from(step));
        let values = match args.mode {
            Some(mode) => coil.resolve_schedules_in_mode(&schedules, t, ensure_finite(mode, "mode override")?)?,
            None => coil.resolve_schedules(&schedules, t)?,
        };
        let out = coil.simulate(&inputs, values)?;
        print_step(step, &out);
    }

    let state = coil.state();
    println!("\nTotals after {} timesteps:", state.timesteps());
    println!("  Electric energy:    {:.1} kJ", state.electric_energy().value / 1000.0);
    println!("  Crankcase heater:   {:.1} kJ", state.crankcase_heater_energy().value / 1000.0);
    println!("  Basin heater:       {:.1} kJ", state.basin_heater_energy().value / 1000.0);
    println!("  Evaporative water:  {:.4} m³", state.evaporative_water_volume().value);
    println!("  Condensate:         {:.4} m³", state.condensate_volume().value);
    println!("  On cycles:          {}", state.on_cycles());
    Ok(())
}

fn print_step(step: u32, out: &TimestepOutput) {
    let point = match out.operating_point {
        OperatingPoint::Off => "off".to_string(),
        OperatingPoint::Cycling { speed, plr } => format!("speed {} PLR {:.3}", speed.number(), plr),
        OperatingPoint::Blend {
            lower,
            upper,
            ratio,
        } => format!("speed {}-{} ratio {:.3}", lower.number(), upper.number(), ratio),
    };
    println!(
        "[{step:>4}] {point:<24} out {:.2} °C / {:.5} kg/kg  Q {:.0}/{:.0}/{:.0} W  P {:.0} W  RTF {:.3}",
        out.outlet_air.dry_bulb_c(),
        out.outlet_air.humidity_ratio(),
        out.total_capacity.value,
        out.sensible_capacity.value,
        out.latent_capacity.value,
        out.total_power.value,
        out.runtime_fraction
    );
    let d = &out.diagnostics;
    if d.unmet_load.value > 0.0 {
        println!("       unmet load {:.0} W", d.unmet_load.value);
    }
    if d.compressor_locked_out {
        println!("       compressor locked out");
    }
    if !d.clamped_curves.is_empty() {
        let roles: Vec<String> = d.clamped_curves.iter().map(|r| r.to_string()).collect();
        println!("       clamped curves: {}", roles.join(", "));
    }
}
