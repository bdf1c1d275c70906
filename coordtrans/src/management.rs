//! Gestion des fichiers géospatiaux : shapefiles, rasters et leurs sidecars
//!
//! Opérations sur des jeux de données complets : export d'une table en
//! shapefile de points, définition de projection, copie et suppression avec
//! tous les fichiers associés.

use std::collections::HashMap;
use std::path::Path;

use shapefile::dbase;
use tracing::{info, warn};

use geotable::{Crs, GeotableError, PointSet, Table};

use crate::pathinfo::{same_path, PathInfo};
use crate::CoordtransError;

/// Sidecars obligatoires d'un shapefile (extensions, `.shp` inclus)
const SHAPEFILE_REQUIRED: [&str; 3] = ["shp", "shx", "dbf"];

/// Sidecars optionnels d'un shapefile
const SHAPEFILE_OPTIONAL: [&str; 11] = [
    "prj", "sbn", "sbx", "fbn", "fbx", "ain", "aih", "ixs", "mxs", "cpg", "shp.xml",
];

/// Sidecars optionnels d'un raster GeoTIFF
const RASTER_OPTIONAL: [&str; 4] = ["tfw", "tif.aux.xml", "tif.ovr", "tif.xml"];

/// Longueur maximale d'un nom de champ dBase
const DBF_FIELD_NAME_MAX: usize = 10;

/// Construit un jeu de points depuis une table, et l'écrit en shapefile si
/// un chemin de sortie est fourni
///
/// Les colonnes de la table deviennent des attributs texte dans le `.dbf`
/// (noms tronqués à 10 caractères). Le CRS, s'il porte un WKT, est écrit en
/// sidecar `.prj`.
pub fn xy_table_to_point(
    table: &Table,
    out_feature_class: Option<&Path>,
    x_field: &str,
    y_field: &str,
    z_field: Option<&str>,
    crs: Option<Crs>,
) -> Result<PointSet, CoordtransError> {
    let points = PointSet::from_table(table, x_field, y_field, z_field, crs)?;

    if let Some(path) = out_feature_class {
        write_point_shapefile(table, &points, path)?;
        info!(path = %path.display(), points = points.len(), "Shapefile written");
    }

    Ok(points)
}

/// Écrit un jeu de points en shapefile avec les attributs de la table
fn write_point_shapefile(
    table: &Table,
    points: &PointSet,
    path: &Path,
) -> Result<(), CoordtransError> {
    let out = PathInfo::file(path)?;
    if out.extension().as_deref() != Some("shp") {
        return Err(CoordtransError::invalid_path(
            path,
            "output feature class must be a path to a shapefile (.shp)",
        ));
    }
    // Deux colonnes qui coïncident une fois tronquées à 10 caractères
    // s'écraseraient mutuellement dans le .dbf
    let mut truncated_names: HashMap<String, &str> = HashMap::new();
    for column in table.columns() {
        let truncated: String = column.chars().take(DBF_FIELD_NAME_MAX).collect();
        if let Some(previous) = truncated_names.insert(truncated.clone(), column.as_str()) {
            return Err(CoordtransError::invalid_field_name(format!(
                "columns '{}' and '{}' collide once truncated to dBase field name '{}'",
                previous, column, truncated
            )));
        }
    }

    out.ensure_parent_dirs()?;

    let mut builder = dbase::TableWriterBuilder::new();
    for column in table.columns() {
        let name = dbf_field_name(path, column)?;
        builder = builder.add_character_field(name, 254);
    }

    let mut writer = shapefile::Writer::from_path(path, builder)?;

    if let Some(z) = points.z() {
        for (i, point) in points.points().iter().enumerate() {
            let shape = shapefile::PointZ::new(point.x(), point.y(), z[i], shapefile::NO_DATA);
            writer.write_shape_and_record(&shape, &attribute_record(table, i))?;
        }
    } else {
        for (i, point) in points.points().iter().enumerate() {
            let shape = shapefile::Point::new(point.x(), point.y());
            writer.write_shape_and_record(&shape, &attribute_record(table, i))?;
        }
    }
    drop(writer);

    match points.crs().and_then(|crs| crs.wkt()) {
        Some(wkt) => std::fs::write(path.with_extension("prj"), wkt)?,
        None => {
            if points.crs().is_some() {
                warn!(
                    path = %path.display(),
                    "CRS has no WKT definition, .prj sidecar not written"
                );
            }
        }
    }

    Ok(())
}

/// Nom de champ dBase tronqué à 10 caractères
fn dbf_field_name(path: &Path, column: &str) -> Result<dbase::FieldName, CoordtransError> {
    let truncated: String = column.chars().take(DBF_FIELD_NAME_MAX).collect();
    dbase::FieldName::try_from(truncated.as_str()).map_err(|_| {
        CoordtransError::invalid_path(path, format!("invalid dBase field name '{}'", column))
    })
}

/// Attributs d'une ligne de la table sous forme d'enregistrement dBase
fn attribute_record(table: &Table, row: usize) -> dbase::Record {
    let mut record = dbase::Record::default();
    for column in table.columns() {
        // column() ne peut pas échouer : le nom vient de la table elle-même
        let value = table
            .column(column)
            .map(|values| values[row].to_string())
            .unwrap_or_default();
        let name: String = column.chars().take(DBF_FIELD_NAME_MAX).collect();
        record.insert(name, dbase::FieldValue::Character(Some(value)));
    }
    record
}

/// Type de jeu de données reconnu par son extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatasetKind {
    Feature,
    Raster,
}

/// Classifie un chemin de jeu de données existant
fn dataset_kind(info: &PathInfo) -> Result<DatasetKind, CoordtransError> {
    match info.extension().as_deref() {
        Some("shp") => Ok(DatasetKind::Feature),
        Some("tif") | Some("tiff") => Ok(DatasetKind::Raster),
        _ => Err(CoordtransError::invalid_path(
            info.path(),
            "must be a shapefile (.shp) or a GeoTIFF (.tif/.tiff)",
        )),
    }
}

/// Définit (écrase) la projection d'un jeu de données existant
///
/// Pour un shapefile : vérifie qu'il s'ouvre, puis réécrit le sidecar
/// `.prj`. Pour un GeoTIFF : vérifie que le TIFF s'ouvre, puis écrit le WKT
/// en sidecar `.prj` à côté du raster. Exige un CRS construit depuis un WKT.
pub fn define_projection(path: &Path, crs: &Crs) -> Result<(), CoordtransError> {
    let info = PathInfo::file(path)?;
    if !info.is_existing_file() {
        return Err(CoordtransError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let kind = dataset_kind(&info)?;

    let wkt = crs.wkt().ok_or_else(|| {
        GeotableError::invalid_crs(
            crs.definition(),
            "a WKT definition is required to write a .prj sidecar",
        )
    })?;

    // Vérifier que le jeu de données est lisible avant d'écrire quoi que
    // ce soit
    match kind {
        DatasetKind::Feature => {
            shapefile::Reader::from_path(path)?;
        }
        DatasetKind::Raster => {
            let file = std::fs::File::open(path)?;
            tiff::decoder::Decoder::new(std::io::BufReader::new(file))?;
        }
    }

    let prj_path = path.with_extension("prj");
    std::fs::write(&prj_path, wkt)?;
    info!(path = %prj_path.display(), "Projection definition written");
    Ok(())
}

/// Copie un shapefile avec tous ses fichiers associés
///
/// Les sidecars obligatoires (`.shp`, `.shx`, `.dbf`) doivent tous exister ;
/// les optionnels sont copiés s'ils sont présents.
pub fn copy_features(in_features: &Path, out_feature_class: &Path) -> Result<(), CoordtransError> {
    let src = PathInfo::file(in_features)?;
    let dst = PathInfo::file(out_feature_class)?;

    if src.extension().as_deref() != Some("shp") || !src.is_existing_file() {
        return Err(CoordtransError::invalid_path(
            in_features,
            "input features must be a path to an existing shapefile (.shp)",
        ));
    }
    if dst.extension().as_deref() != Some("shp") {
        return Err(CoordtransError::invalid_path(
            out_feature_class,
            "output feature class must be a path to a shapefile (.shp)",
        ));
    }
    if same_path(src.path(), dst.path()) {
        return Err(CoordtransError::invalid_path(
            out_feature_class,
            "output is the same file as the input, copying would truncate it",
        ));
    }

    for ext in SHAPEFILE_REQUIRED {
        if !src.path().with_extension(ext).is_file() {
            return Err(CoordtransError::invalid_path(
                in_features,
                format!("required sidecar '.{}' is missing", ext),
            ));
        }
    }

    dst.ensure_parent_dirs()?;
    copy_sidecars(src.path(), dst.path(), &SHAPEFILE_REQUIRED, &SHAPEFILE_OPTIONAL)
}

/// Copie un raster GeoTIFF avec tous ses fichiers associés
pub fn copy_raster(in_raster: &Path, out_raster: &Path) -> Result<(), CoordtransError> {
    let src = PathInfo::file(in_raster)?;
    let dst = PathInfo::file(out_raster)?;

    if src.extension().as_deref() != Some("tif") || !src.is_existing_file() {
        return Err(CoordtransError::invalid_path(
            in_raster,
            "input raster must be a path to an existing GeoTIFF (.tif)",
        ));
    }
    if dst.extension().as_deref() != Some("tif") {
        return Err(CoordtransError::invalid_path(
            out_raster,
            "output raster must be a path to a GeoTIFF (.tif)",
        ));
    }
    if same_path(src.path(), dst.path()) {
        return Err(CoordtransError::invalid_path(
            out_raster,
            "output is the same file as the input, copying would truncate it",
        ));
    }

    dst.ensure_parent_dirs()?;
    copy_sidecars(src.path(), dst.path(), &["tif"], &RASTER_OPTIONAL)
}

/// Copie les sidecars obligatoires puis les optionnels présents
fn copy_sidecars(
    src: &Path,
    dst: &Path,
    required: &[&str],
    optional: &[&str],
) -> Result<(), CoordtransError> {
    for ext in required {
        std::fs::copy(src.with_extension(ext), dst.with_extension(ext))?;
    }
    for ext in optional {
        let sidecar = src.with_extension(ext);
        if sidecar.is_file() {
            std::fs::copy(&sidecar, dst.with_extension(ext))?;
        }
    }
    Ok(())
}

/// Supprime un jeu de données et tous ses sidecars connus
///
/// Le fichier principal est supprimé sous son nom exact ; les sidecars sont
/// dérivés de l'extension réelle (`.tif` et `.tiff` n'ont pas les mêmes).
pub fn delete(in_data: &Path) -> Result<(), CoordtransError> {
    let info = PathInfo::file(in_data)?;
    let kind = dataset_kind(&info)?;

    let sidecars: Vec<String> = match kind {
        DatasetKind::Feature => SHAPEFILE_REQUIRED
            .iter()
            .chain(SHAPEFILE_OPTIONAL.iter())
            .filter(|ext| **ext != "shp")
            .map(|ext| ext.to_string())
            .collect(),
        DatasetKind::Raster => {
            let ext = info.extension().unwrap_or_default();
            vec![
                "tfw".to_string(),
                format!("{}.aux.xml", ext),
                format!("{}.ovr", ext),
                format!("{}.xml", ext),
            ]
        }
    };

    let mut removed = 0usize;
    if in_data.is_file() {
        std::fs::remove_file(in_data)?;
        removed += 1;
    }
    for ext in &sidecars {
        let target = in_data.with_extension(ext.as_str());
        if target.is_file() {
            std::fs::remove_file(&target)?;
            removed += 1;
        }
    }
    info!(path = %in_data.display(), removed, "Dataset deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotable::CrsSpec;

    fn sample_table() -> Table {
        let mut table = Table::new(vec!["x".to_string(), "y".to_string(), "name".to_string()]);
        table.push_row(vec![
            "2.35".to_string(),
            "48.85".to_string(),
            "paris".to_string(),
        ]);
        table.push_row(vec![
            "5.72".to_string(),
            "45.18".to_string(),
            "grenoble".to_string(),
        ]);
        table
    }

    const WGS84_WKT: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]]"#;

    #[test]
    fn test_xy_table_to_point_without_output() {
        let table = sample_table();
        let points = xy_table_to_point(&table, None, "x", "y", None, None).unwrap();
        assert_eq!(points.len(), 2);
        assert!(points.crs().is_none());
    }

    #[test]
    fn test_xy_table_to_point_writes_shapefile_with_prj() {
        let dir = tempfile::tempdir().unwrap();
        let shp = dir.path().join("points.shp");

        let table = sample_table();
        let crs = CrsSpec::from(WGS84_WKT).resolve().unwrap();
        xy_table_to_point(&table, Some(&shp), "x", "y", None, crs).unwrap();

        assert!(shp.is_file());
        assert!(dir.path().join("points.shx").is_file());
        assert!(dir.path().join("points.dbf").is_file());
        let prj = std::fs::read_to_string(dir.path().join("points.prj")).unwrap();
        assert_eq!(prj, WGS84_WKT);

        // Relisible par le même codec
        let mut reader = shapefile::Reader::from_path(&shp).unwrap();
        let count = reader.iter_shapes_and_records().count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_xy_table_to_point_rejects_non_shp_output() {
        let dir = tempfile::tempdir().unwrap();
        let table = sample_table();
        let err = xy_table_to_point(&table, Some(&dir.path().join("points.csv")), "x", "y", None, None)
            .unwrap_err();
        assert!(matches!(err, CoordtransError::InvalidPath { .. }));
    }

    #[test]
    fn test_define_projection_rewrites_prj() {
        let dir = tempfile::tempdir().unwrap();
        let shp = dir.path().join("points.shp");

        let table = sample_table();
        let crs = CrsSpec::from(WGS84_WKT).resolve().unwrap();
        xy_table_to_point(&table, Some(&shp), "x", "y", None, crs.clone()).unwrap();

        std::fs::write(dir.path().join("points.prj"), "stale definition").unwrap();
        define_projection(&shp, crs.as_ref().unwrap()).unwrap();

        let prj = std::fs::read_to_string(dir.path().join("points.prj")).unwrap();
        assert_eq!(prj, WGS84_WKT);
    }

    #[test]
    fn test_define_projection_requires_wkt() {
        let dir = tempfile::tempdir().unwrap();
        let shp = dir.path().join("points.shp");

        let table = sample_table();
        xy_table_to_point(&table, Some(&shp), "x", "y", None, None).unwrap();

        let epsg_only = Crs::from_epsg(4326).unwrap();
        let err = define_projection(&shp, &epsg_only).unwrap_err();
        assert!(matches!(
            err,
            CoordtransError::Geotable(GeotableError::InvalidCrs { .. })
        ));
    }

    #[test]
    fn test_define_projection_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "x,y\n").unwrap();

        let crs = Crs::from_wkt(WGS84_WKT).unwrap();
        let err = define_projection(&path, &crs).unwrap_err();
        assert!(matches!(err, CoordtransError::InvalidPath { .. }));
    }

    #[test]
    fn test_copy_and_delete_features() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.shp");
        let dst = dir.path().join("copy/dst.shp");

        let table = sample_table();
        let crs = CrsSpec::from(WGS84_WKT).resolve().unwrap();
        xy_table_to_point(&table, Some(&src), "x", "y", None, crs).unwrap();

        copy_features(&src, &dst).unwrap();
        assert!(dst.is_file());
        assert!(dir.path().join("copy/dst.shx").is_file());
        assert!(dir.path().join("copy/dst.dbf").is_file());
        assert!(dir.path().join("copy/dst.prj").is_file());

        delete(&dst).unwrap();
        assert!(!dst.exists());
        assert!(!dir.path().join("copy/dst.dbf").exists());
        // La source n'est pas touchée
        assert!(src.is_file());
    }

    #[test]
    fn test_copy_features_onto_itself_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.shp");

        let table = sample_table();
        xy_table_to_point(&table, Some(&src), "x", "y", None, None).unwrap();

        let err = copy_features(&src, &src).unwrap_err();
        assert!(matches!(err, CoordtransError::InvalidPath { .. }));

        // Le jeu de données est intact
        let mut reader = shapefile::Reader::from_path(&src).unwrap();
        assert_eq!(reader.iter_shapes_and_records().count(), 2);
    }

    #[test]
    fn test_copy_raster_onto_itself_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let raster = dir.path().join("r.tif");
        std::fs::write(&raster, b"fake raster bytes").unwrap();

        // Même fichier sous une orthographe différente
        let err = copy_raster(&raster, &dir.path().join("./r.tif")).unwrap_err();
        assert!(matches!(err, CoordtransError::InvalidPath { .. }));
        assert_eq!(std::fs::read(&raster).unwrap(), b"fake raster bytes");
    }

    #[test]
    fn test_delete_tiff_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let raster = dir.path().join("r.tiff");
        std::fs::write(&raster, b"fake raster bytes").unwrap();
        std::fs::write(dir.path().join("r.tiff.aux.xml"), b"<meta/>").unwrap();
        std::fs::write(dir.path().join("r.tfw"), b"1 0 0 -1 0 0").unwrap();

        delete(&raster).unwrap();
        assert!(!raster.exists());
        assert!(!dir.path().join("r.tiff.aux.xml").exists());
        assert!(!dir.path().join("r.tfw").exists());
    }

    #[test]
    fn test_truncated_attribute_names_must_stay_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = Table::new(vec![
            "x".to_string(),
            "y".to_string(),
            "temperature_min".to_string(),
            "temperature_max".to_string(),
        ]);
        table.push_row(vec![
            "2.35".to_string(),
            "48.85".to_string(),
            "3.2".to_string(),
            "12.8".to_string(),
        ]);

        let err = xy_table_to_point(&table, Some(&dir.path().join("t.shp")), "x", "y", None, None)
            .unwrap_err();
        assert!(matches!(err, CoordtransError::InvalidFieldName { .. }));
        assert!(!dir.path().join("t.shp").exists());
    }

    #[test]
    fn test_copy_features_missing_required_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("orphan.shp");
        std::fs::write(&src, b"not really a shapefile").unwrap();

        let err = copy_features(&src, &dir.path().join("dst.shp")).unwrap_err();
        assert!(matches!(err, CoordtransError::InvalidPath { .. }));
    }

    #[test]
    fn test_copy_raster_requires_tif() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_raster(&dir.path().join("missing.tif"), &dir.path().join("out.tif"))
            .unwrap_err();
        assert!(matches!(err, CoordtransError::InvalidPath { .. }));
    }
}
