//! Point d'entrée CLI pour coordtrans

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use coordtrans::cli::{self, Commands};

/// Convertir des coordonnées tabulaires entre systèmes de référence
#[derive(Parser)]
#[command(name = "coordtrans")]
#[command(author, version)]
#[command(about = "Convertir les colonnes de coordonnées d'une table entre CRS")]
#[command(
    long_about = "Reprojette les colonnes de coordonnées d'une table CSV d'un CRS vers un autre \
                  (codes EPSG ou WKT), et gère les shapefiles/rasters associés (sidecars .prj, \
                  copie, suppression)."
)]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Transform {
            input,
            in_x_field,
            in_y_field,
            in_crs,
            output,
            out_x_field,
            out_y_field,
            out_crs,
            yes,
        } => cli::cmd_transform(
            &input,
            in_x_field,
            in_y_field,
            in_crs.as_deref(),
            output,
            out_x_field,
            out_y_field,
            out_crs.as_deref(),
            yes,
        )?,
        Commands::DefineProjection { path, crs } => cli::cmd_define_projection(&path, &crs)?,
        Commands::CopyFeatures { input, output } => cli::cmd_copy_features(&input, &output)?,
        Commands::CopyRaster { input, output } => cli::cmd_copy_raster(&input, &output)?,
        Commands::Delete { path } => cli::cmd_delete(&path)?,
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
