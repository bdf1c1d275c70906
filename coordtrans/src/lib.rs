//! # coordtrans
//!
//! Conversion de colonnes de coordonnées tabulaires entre systèmes de
//! référence (CRS), et gestion des fichiers géospatiaux associés.
//!
//! ## Features
//!
//! - Pipeline table CSV → points → reprojection PROJ → table CSV
//! - Garde interactive contre l'écrasement silencieux du fichier d'entrée
//! - Export shapefile de points, sidecars `.prj`, copie/suppression de
//!   jeux de données avec leurs fichiers associés
//! - CLI simple
//!
//! ## Usage CLI
//!
//! ```bash
//! # Reprojeter les colonnes x,y d'une table vers EPSG:4326
//! coordtrans transform --input points.csv --in-crs 3826 \
//!     --output points_wgs84.csv --out-crs 4326
//!
//! # Définir la projection d'un shapefile
//! coordtrans define-projection --path points.shp --crs def.prj
//! ```

pub mod cli;
pub mod confirm;
pub mod error;
pub mod management;
pub mod pathinfo;
pub mod transform;

pub use confirm::{AlwaysOverwrite, NeverOverwrite, OverwriteConfirmation, PromptStdin};
pub use error::CoordtransError;
pub use pathinfo::{PathInfo, PathKind};
pub use transform::{coordinate_transform, TableSource, TransformParams};
