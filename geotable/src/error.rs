//! Types d'erreurs pour le crate geotable

use thiserror::Error;

/// Erreurs pouvant survenir lors de la manipulation de tables et de géométries
#[derive(Debug, Error)]
pub enum GeotableError {
    /// Erreur d'I/O lors de la lecture ou de l'écriture d'une table
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Table CSV illisible ou mal formée
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Colonne absente de la table
    #[error("Field '{field}' does not exist in the table")]
    FieldNotFound { field: String },

    /// Valeur de coordonnée non numérique
    #[error("Field '{field}' row {row}: '{value}' is not a valid number")]
    InvalidValue {
        field: String,
        row: usize,
        value: String,
    },

    /// Définition de CRS non reconnue par PROJ
    #[error("Invalid coordinate system '{definition}': {reason}")]
    InvalidCrs { definition: String, reason: String },

    /// Reprojection demandée sur un jeu de points sans CRS source
    #[error("Cannot reproject a point set with no source CRS")]
    UndefinedSourceCrs,

    /// Échec de la transformation de coordonnées PROJ
    #[error("Coordinate transformation failed: {0}")]
    Transform(#[from] proj::ProjError),
}

impl GeotableError {
    /// Crée une erreur de colonne absente
    pub fn field_not_found(field: impl Into<String>) -> Self {
        Self::FieldNotFound {
            field: field.into(),
        }
    }

    /// Crée une erreur de CRS invalide avec contexte
    pub fn invalid_crs(definition: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCrs {
            definition: definition.into(),
            reason: reason.into(),
        }
    }
}
