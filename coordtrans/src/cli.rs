//! Définition et implémentation des commandes CLI
//!
//! - `transform` : reprojection des colonnes de coordonnées d'une table CSV
//! - `define-projection` : réécriture du sidecar `.prj` d'un jeu de données
//! - `copy-features` / `copy-raster` / `delete` : gestion de fichiers avec
//!   sidecars

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;

use geotable::CrsSpec;

use crate::confirm::{AlwaysOverwrite, OverwriteConfirmation, PromptStdin};
use crate::management;
use crate::transform::{coordinate_transform, TableSource, TransformParams};

#[derive(Subcommand)]
pub enum Commands {
    /// Reproject the coordinate columns of a delimited table
    Transform {
        /// Path to the input table (CSV with a header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Input x coordinate field
        #[arg(long, default_value = "x")]
        in_x_field: String,

        /// Input y coordinate field
        #[arg(long, default_value = "y")]
        in_y_field: String,

        /// Input CRS: EPSG code, WKT literal, or path to a .prj file
        #[arg(long)]
        in_crs: Option<String>,

        /// Output table path (omit to compute without writing)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output x coordinate field (created, or overwritten if it exists)
        #[arg(long, default_value = "lon")]
        out_x_field: String,

        /// Output y coordinate field (created, or overwritten if it exists)
        #[arg(long, default_value = "lat")]
        out_y_field: String,

        /// Target CRS: EPSG code, WKT literal, or path to a .prj file
        #[arg(long)]
        out_crs: Option<String>,

        /// Overwrite the input table without prompting
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Overwrite the projection definition of a shapefile or GeoTIFF
    DefineProjection {
        /// Path to the dataset (.shp, .tif or .tiff)
        #[arg(short, long)]
        path: PathBuf,

        /// CRS to define: WKT literal or path to a .prj file
        #[arg(long)]
        crs: String,
    },

    /// Copy a shapefile together with all its sidecar files
    CopyFeatures {
        /// Path to the source .shp
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the destination .shp
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Copy a GeoTIFF together with all its sidecar files
    CopyRaster {
        /// Path to the source .tif
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the destination .tif
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Delete a shapefile or GeoTIFF together with all its sidecar files
    Delete {
        /// Path to the dataset (.shp or .tif)
        #[arg(short, long)]
        path: PathBuf,
    },
}

/// Interprète un argument CRS de la ligne de commande
///
/// Chiffres seuls → code EPSG ; chemin d'un fichier existant (typiquement
/// un `.prj`) → son contenu lu comme WKT ; sinon → WKT littéral. Absent →
/// pas de CRS.
pub fn crs_spec_from_arg(arg: Option<&str>) -> Result<CrsSpec> {
    let arg = match arg {
        Some(arg) => arg.trim(),
        None => return Ok(CrsSpec::Undefined),
    };

    if !arg.is_empty() && arg.chars().all(|c| c.is_ascii_digit()) {
        let code: u32 = arg.parse().context("EPSG code out of range")?;
        return Ok(CrsSpec::Epsg(code));
    }

    let as_path = Path::new(arg);
    if as_path.is_file() {
        let wkt = std::fs::read_to_string(as_path)
            .context(format!("Failed to read CRS file: {}", as_path.display()))?;
        return Ok(CrsSpec::Wkt(wkt.trim().to_string()));
    }

    Ok(CrsSpec::Wkt(arg.to_string()))
}

/// Exécute la commande transform
pub fn cmd_transform(
    input: &Path,
    in_x_field: String,
    in_y_field: String,
    in_crs: Option<&str>,
    output: Option<PathBuf>,
    out_x_field: String,
    out_y_field: String,
    out_crs: Option<&str>,
    yes: bool,
) -> Result<()> {
    let params = TransformParams {
        source: TableSource::Path(input.to_path_buf()),
        in_x_field,
        in_y_field,
        in_crs: crs_spec_from_arg(in_crs)?,
        out_table_path: output.clone(),
        out_x_field,
        out_y_field,
        out_crs: crs_spec_from_arg(out_crs)?,
    };

    let confirm: Box<dyn OverwriteConfirmation> = if yes {
        Box::new(AlwaysOverwrite)
    } else {
        Box::new(PromptStdin)
    };

    let table = coordinate_transform(params, confirm.as_ref())?;

    println!("=== Transform ===");
    println!("Input: {}", input.display());
    println!("Rows: {}", table.num_rows());
    println!("Columns: {}", table.columns().join(", "));
    match output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (not written)"),
    }

    Ok(())
}

/// Exécute la commande define-projection
pub fn cmd_define_projection(path: &Path, crs_arg: &str) -> Result<()> {
    let crs = crs_spec_from_arg(Some(crs_arg))?
        .resolve()?
        .context("define-projection requires a CRS, none given")?;
    management::define_projection(path, &crs)?;
    println!("Projection defined for {}", path.display());
    Ok(())
}

/// Exécute la commande copy-features
pub fn cmd_copy_features(input: &Path, output: &Path) -> Result<()> {
    management::copy_features(input, output)?;
    println!("Copied {} -> {}", input.display(), output.display());
    Ok(())
}

/// Exécute la commande copy-raster
pub fn cmd_copy_raster(input: &Path, output: &Path) -> Result<()> {
    management::copy_raster(input, output)?;
    println!("Copied {} -> {}", input.display(), output.display());
    Ok(())
}

/// Exécute la commande delete
pub fn cmd_delete(path: &Path) -> Result<()> {
    management::delete(path)?;
    println!("Deleted {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_arg_digits_become_epsg() {
        assert_eq!(crs_spec_from_arg(Some("4326")).unwrap(), CrsSpec::Epsg(4326));
    }

    #[test]
    fn test_crs_arg_absent_is_undefined() {
        assert_eq!(crs_spec_from_arg(None).unwrap(), CrsSpec::Undefined);
    }

    #[test]
    fn test_crs_arg_literal_wkt() {
        let spec = crs_spec_from_arg(Some("GEOGCS[\"WGS 84\"]")).unwrap();
        assert!(matches!(spec, CrsSpec::Wkt(s) if s.starts_with("GEOGCS")));
    }

    #[test]
    fn test_crs_arg_prj_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let prj = dir.path().join("def.prj");
        std::fs::write(&prj, "GEOGCS[\"WGS 84\"]\n").unwrap();

        let spec = crs_spec_from_arg(Some(prj.to_str().unwrap())).unwrap();
        assert_eq!(spec, CrsSpec::Wkt("GEOGCS[\"WGS 84\"]".to_string()));
    }
}
