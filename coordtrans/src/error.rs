//! Types d'erreurs pour le crate coordtrans

use std::path::PathBuf;

use geotable::Table;
use thiserror::Error;

/// Erreurs pouvant survenir dans le pipeline de transformation et la
/// gestion des fichiers géospatiaux
#[derive(Debug, Error)]
pub enum CoordtransError {
    /// Table d'entrée introuvable ou illisible
    #[error("Input table '{}' does not exist", .path.display())]
    InputNotFound { path: PathBuf },

    /// Noms de champs invalides (x et y identiques, nom vide)
    #[error("Invalid field name: {reason}")]
    InvalidFieldName { reason: String },

    /// Chemin du mauvais type pour l'opération
    #[error("Invalid path '{}': {reason}", .path.display())]
    InvalidPath { path: PathBuf, reason: String },

    /// Écrasement refusé par l'utilisateur : rien n'est écrit, mais la
    /// table calculée est conservée dans l'erreur
    #[error("The original file '{}' will not be overwritten", .path.display())]
    OverwriteDeclined { path: PathBuf, table: Table },

    /// Erreur de la couche table/géométrie
    #[error(transparent)]
    Geotable(#[from] geotable::GeotableError),

    /// Erreur d'I/O sur le système de fichiers
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Erreur de lecture ou d'écriture de shapefile
    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    /// Fichier raster illisible
    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),
}

impl CoordtransError {
    /// Crée une erreur de nom de champ invalide
    pub fn invalid_field_name(reason: impl Into<String>) -> Self {
        Self::InvalidFieldName {
            reason: reason.into(),
        }
    }

    /// Crée une erreur de chemin invalide avec contexte
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
