use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use vf_core::{derive_coefficients, load_yaml};
use vf_dump::read_header;
use vf_sim::SimResult;

#[derive(Parser)]
#[command(name = "vf-cli")]
#[command(about = "ViscoFlow CLI - Two-phase viscoelastic flow simulation control", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a simulation config file
    Validate {
        /// Path to the config YAML file
        config_path: PathBuf,
    },
    /// Print the physical coefficients derived from a config
    Coefficients {
        /// Path to the config YAML file
        config_path: PathBuf,
    },
    /// Show the header of a checkpoint file without loading the state
    Inspect {
        /// Path to a restart slot or archive file
        checkpoint_path: PathBuf,
    },
}

fn main() -> SimResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Coefficients { config_path } => cmd_coefficients(&config_path),
        Commands::Inspect { checkpoint_path } => cmd_inspect(&checkpoint_path),
    }
}

fn cmd_validate(config_path: &Path) -> SimResult<()> {
    println!("Validating config: {}", config_path.display());
    let config = load_yaml(config_path)?;
    println!("✓ Config is valid");
    println!("  {}", config.summary_line());
    match serde_yaml::to_string(&config) {
        Ok(rendered) => println!("\nEffective config (defaults filled in):\n{rendered}"),
        Err(e) => eprintln!("could not render config: {e}"),
    }
    Ok(())
}

fn cmd_coefficients(config_path: &Path) -> SimResult<()> {
    let config = load_yaml(config_path)?;
    let c = derive_coefficients(&config)?;

    println!("Derived coefficients (gas-scaled units):");
    println!("  Density:     liquid {:.6e}  gas {:.6e}", c.rho_liquid, c.rho_gas);
    println!("  Viscosity:   liquid {:.6e}  gas {:.6e}", c.mu_liquid, c.mu_gas);
    println!(
        "  Modulus:     liquid {:.6e}  gas {:.6e}",
        c.modulus_liquid, c.modulus_gas
    );
    println!(
        "  Relaxation:  liquid {:.6e}  gas {:.6e}",
        c.relaxation_liquid, c.relaxation_gas
    );
    println!("  Surface tension: {:.6e}", c.surface_tension);
    Ok(())
}

fn cmd_inspect(checkpoint_path: &Path) -> SimResult<()> {
    let header = read_header(checkpoint_path)?;

    println!("Checkpoint: {}", checkpoint_path.display());
    println!("  Version:     {}", header.version);
    println!("  Time:        {:.6}", header.time);
    println!("  Step:        {}", header.step);
    println!("  Last dt:     {:.6e}", header.dt);
    println!("  Config hash: {}", header.config_hash);
    println!("  Created:     {}", header.created_at);
    Ok(())
}
