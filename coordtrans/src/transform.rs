//! Pipeline de transformation de coordonnées tabulaires
//!
//! Enchaîne validation, chargement, résolution des CRS, reprojection et
//! persistance gardée. Toute étape en échec interrompt le pipeline ; rien
//! n'est écrit tant que le calcul n'est pas terminé.

use std::path::{Path, PathBuf};

use tracing::info;

use geotable::{CrsSpec, PointSet, Table};

use crate::confirm::OverwriteConfirmation;
use crate::pathinfo::{same_path, PathInfo};
use crate::CoordtransError;

/// Source de la table d'entrée : un chemin à charger ou une table déjà en
/// mémoire
#[derive(Debug)]
pub enum TableSource {
    /// Table CSV à lire depuis le disque
    Path(PathBuf),
    /// Table fournie par l'appelant, lue telle quelle
    InMemory(Table),
}

impl From<&Path> for TableSource {
    fn from(path: &Path) -> Self {
        TableSource::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for TableSource {
    fn from(path: PathBuf) -> Self {
        TableSource::Path(path)
    }
}

impl From<Table> for TableSource {
    fn from(table: Table) -> Self {
        TableSource::InMemory(table)
    }
}

/// Paramètres du pipeline
#[derive(Debug)]
pub struct TransformParams {
    /// Table d'entrée
    pub source: TableSource,
    /// Colonne x d'entrée
    pub in_x_field: String,
    /// Colonne y d'entrée
    pub in_y_field: String,
    /// CRS des coordonnées d'entrée
    pub in_crs: CrsSpec,
    /// Chemin de sortie ; `None` pour ne rien écrire
    pub out_table_path: Option<PathBuf>,
    /// Colonne x de sortie (créée, ou écrasée si elle existe)
    pub out_x_field: String,
    /// Colonne y de sortie (créée, ou écrasée si elle existe)
    pub out_y_field: String,
    /// CRS cible
    pub out_crs: CrsSpec,
}

/// Convertit les colonnes de coordonnées d'une table d'un CRS vers un autre
///
/// Les colonnes d'origine sont conservées dans la table de sortie, sauf
/// collision de nom avec les colonnes de sortie (même nom = même colonne,
/// contenu écrasé). La table n'est jamais écrite par-dessus son fichier
/// d'entrée sans l'accord de la politique `confirm` ; en cas de refus, la
/// table calculée est retournée dans [`CoordtransError::OverwriteDeclined`].
pub fn coordinate_transform(
    params: TransformParams,
    confirm: &dyn OverwriteConfirmation,
) -> Result<Table, CoordtransError> {
    // 1. Validation des noms de champs, avant toute I/O
    validate_field_names(&params)?;

    // 2. Chargement
    let (mut table, in_path) = load_source(params.source)?;

    // 3. Les colonnes d'entrée doivent exister
    for field in [params.in_x_field.as_str(), params.in_y_field.as_str()] {
        if !table.has_column(field) {
            return Err(geotable::GeotableError::field_not_found(field).into());
        }
    }

    // 4. Résolution des CRS
    let in_crs = params.in_crs.resolve()?;
    let out_crs = params.out_crs.resolve()?;

    info!(
        rows = table.num_rows(),
        in_crs = in_crs.as_ref().map(|c| c.definition()),
        out_crs = out_crs.as_ref().map(|c| c.definition()),
        "Transforming coordinates"
    );

    // 5. Construction → reprojection → aplatissement
    let points = PointSet::from_table(
        &table,
        &params.in_x_field,
        &params.in_y_field,
        None,
        in_crs,
    )?;
    let reprojected = points.reproject(out_crs.as_ref())?;
    reprojected.flatten_into(&mut table, &params.out_x_field, &params.out_y_field);

    // 6. Persistance gardée
    persist(table, params.out_table_path.as_deref(), in_path.as_deref(), confirm)
}

/// Rejette les noms de champs dégénérés (x == y, nom vide)
fn validate_field_names(params: &TransformParams) -> Result<(), CoordtransError> {
    if params.in_x_field == params.in_y_field {
        return Err(CoordtransError::invalid_field_name(
            "in_x_field same as in_y_field",
        ));
    }
    if params.out_x_field == params.out_y_field {
        return Err(CoordtransError::invalid_field_name(
            "out_x_field same as out_y_field",
        ));
    }
    for (name, value) in [
        ("in_x_field", &params.in_x_field),
        ("in_y_field", &params.in_y_field),
        ("out_x_field", &params.out_x_field),
        ("out_y_field", &params.out_y_field),
    ] {
        if value.is_empty() {
            return Err(CoordtransError::invalid_field_name(format!(
                "{} must not be empty",
                name
            )));
        }
    }
    Ok(())
}

/// Charge la source et retourne le chemin d'entrée, s'il y en a un
fn load_source(source: TableSource) -> Result<(Table, Option<PathBuf>), CoordtransError> {
    match source {
        TableSource::Path(path) => {
            if !path.is_file() {
                return Err(CoordtransError::InputNotFound { path });
            }
            let table = Table::from_path(&path)?;
            Ok((table, Some(path)))
        }
        TableSource::InMemory(table) => Ok((table, None)),
    }
}

/// Écrit la table, avec confirmation quand la sortie écraserait l'entrée
fn persist(
    table: Table,
    out_path: Option<&Path>,
    in_path: Option<&Path>,
    confirm: &dyn OverwriteConfirmation,
) -> Result<Table, CoordtransError> {
    let out_path = match out_path {
        Some(path) => path,
        None => return Ok(table),
    };

    if let Some(in_path) = in_path {
        if same_path(in_path, out_path) {
            if !confirm.confirm(out_path) {
                return Err(CoordtransError::OverwriteDeclined {
                    path: out_path.to_path_buf(),
                    table,
                });
            }
            table.write(out_path)?;
            info!(path = %out_path.display(), "Input table overwritten on confirmation");
            return Ok(table);
        }
    }

    let info = PathInfo::file(out_path)?;
    info.ensure_parent_dirs()?;
    table.write(out_path)?;
    info!(path = %out_path.display(), rows = table.num_rows(), "Table written");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::AlwaysOverwrite;

    fn params_with_fields(in_x: &str, in_y: &str, out_x: &str, out_y: &str) -> TransformParams {
        TransformParams {
            source: TableSource::Path(PathBuf::from("/nonexistent/input.csv")),
            in_x_field: in_x.to_string(),
            in_y_field: in_y.to_string(),
            in_crs: CrsSpec::Epsg(4326),
            out_table_path: None,
            out_x_field: out_x.to_string(),
            out_y_field: out_y.to_string(),
            out_crs: CrsSpec::Epsg(4326),
        }
    }

    #[test]
    fn test_identical_input_fields_rejected_before_io() {
        // Le chemin d'entrée n'existe pas : si la validation passait après
        // le chargement, on verrait InputNotFound
        let err =
            coordinate_transform(params_with_fields("x", "x", "lon", "lat"), &AlwaysOverwrite)
                .unwrap_err();
        assert!(matches!(err, CoordtransError::InvalidFieldName { .. }));
    }

    #[test]
    fn test_identical_output_fields_rejected() {
        let err =
            coordinate_transform(params_with_fields("x", "y", "lon", "lon"), &AlwaysOverwrite)
                .unwrap_err();
        assert!(matches!(err, CoordtransError::InvalidFieldName { .. }));
    }

    #[test]
    fn test_empty_field_name_rejected() {
        let err = coordinate_transform(params_with_fields("x", "y", "", "lat"), &AlwaysOverwrite)
            .unwrap_err();
        assert!(matches!(err, CoordtransError::InvalidFieldName { .. }));
    }

    #[test]
    fn test_missing_input_reported() {
        let err =
            coordinate_transform(params_with_fields("x", "y", "lon", "lat"), &AlwaysOverwrite)
                .unwrap_err();
        assert!(matches!(err, CoordtransError::InputNotFound { .. }));
    }
}
