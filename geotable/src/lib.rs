//! # geotable
//!
//! Tables de coordonnées avec construction de géométries de points,
//! résolution de CRS et reprojection.
//!
//! ## Features
//!
//! - Modèle de table délimitée en mémoire (lecture/écriture CSV)
//! - Résolution de CRS par type somme : code EPSG, chaîne numérique, WKT,
//!   CRS déjà résolu, ou absent
//! - Reprojection en lot via PROJ, types `geo` pour l'interopérabilité
//!   avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust,ignore
//! use geotable::{CrsSpec, PointSet, Table};
//! use std::path::Path;
//!
//! let table = Table::from_path(Path::new("points.csv"))?;
//! let in_crs = CrsSpec::Epsg(3826).resolve()?;
//! let out_crs = CrsSpec::Epsg(4326).resolve()?;
//!
//! let points = PointSet::from_table(&table, "x", "y", None, in_crs)?;
//! let reprojected = points.reproject(out_crs.as_ref())?;
//! ```

pub mod crs;
pub mod error;
pub mod points;
pub mod table;

pub use crs::{Crs, CrsSpec};
pub use error::GeotableError;
pub use points::PointSet;
pub use table::Table;
