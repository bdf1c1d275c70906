//! Pont table ↔ géométries de points
//!
//! Construit un jeu de points depuis des colonnes de coordonnées, le
//! reprojette entre CRS, et le réaplatit en colonnes. Le jeu de points ne
//! survit jamais au pipeline qui l'a créé.

use geo::Point;
use proj::Proj;
use tracing::warn;

use crate::crs::Crs;
use crate::table::Table;
use crate::GeotableError;

/// Jeu ordonné de points 2D (z optionnel), aligné 1:1 sur les lignes d'une
/// table, annoté d'au plus un CRS
///
/// La reprojection produit toujours un nouveau jeu étiqueté du CRS cible ;
/// le CRS d'un jeu existant n'est jamais écrasé en place.
#[derive(Debug, Clone)]
pub struct PointSet {
    points: Vec<Point<f64>>,
    z: Option<Vec<f64>>,
    crs: Option<Crs>,
}

impl PointSet {
    /// Construit un point par ligne depuis les colonnes nommées
    ///
    /// Étiquette le jeu avec `crs` tel quel : la construction déclare le
    /// CRS, elle ne convertit rien. `None` laisse le jeu sans CRS.
    pub fn from_table(
        table: &Table,
        x_field: &str,
        y_field: &str,
        z_field: Option<&str>,
        crs: Option<Crs>,
    ) -> Result<Self, GeotableError> {
        let xs = table.numeric_column(x_field)?;
        let ys = table.numeric_column(y_field)?;
        let z = match z_field {
            Some(field) => Some(table.numeric_column(field)?),
            None => None,
        };

        let points = xs
            .into_iter()
            .zip(ys)
            .map(|(x, y)| Point::new(x, y))
            .collect();

        Ok(Self { points, z, crs })
    }

    /// Nombre de points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Le jeu est-il vide ?
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// CRS du jeu, s'il est défini
    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    /// Points du jeu, dans l'ordre des lignes
    pub fn points(&self) -> &[Point<f64>] {
        &self.points
    }

    /// Valeurs z, si le jeu est 3D
    pub fn z(&self) -> Option<&[f64]> {
        self.z.as_deref()
    }

    /// Reprojette le jeu vers `target`
    ///
    /// Cible absente : avertissement + retour du jeu inchangé (repli
    /// permissif documenté, jamais une erreur). Cible présente : exige un
    /// CRS source, transforme toutes les coordonnées en lot, et retourne un
    /// nouveau jeu étiqueté du CRS cible. Les z sont conservés tels quels.
    pub fn reproject(&self, target: Option<&Crs>) -> Result<Self, GeotableError> {
        let target = match target {
            Some(target) => target,
            None => {
                warn!("No target coordinate system specified, returning the point set unchanged");
                return Ok(self.clone());
            }
        };

        let source = self.crs.as_ref().ok_or(GeotableError::UndefinedSourceCrs)?;

        // Source == cible : rien à transformer, on ré-étiquette
        if source == target {
            return Ok(Self {
                points: self.points.clone(),
                z: self.z.clone(),
                crs: Some(target.clone()),
            });
        }

        let proj = Proj::new_known_crs(source.definition(), target.definition(), None)
            .map_err(|e| {
                GeotableError::invalid_crs(
                    format!("{} -> {}", source.definition(), target.definition()),
                    e.to_string(),
                )
            })?;

        // Transformation en lot, plus rapide que point par point
        let mut coords: Vec<(f64, f64)> = self.points.iter().map(|p| (p.x(), p.y())).collect();
        proj.convert_array(&mut coords)?;

        let points = coords.into_iter().map(|(x, y)| Point::new(x, y)).collect();

        Ok(Self {
            points,
            z: self.z.clone(),
            crs: Some(target.clone()),
        })
    }

    /// Réaplatit le jeu en deux colonnes numériques de la table
    ///
    /// Écrase en place une colonne existante du même nom (jamais de
    /// doublon). Le jeu est consommé : il ne persiste pas après cette étape.
    pub fn flatten_into(self, table: &mut Table, x_field: &str, y_field: &str) {
        debug_assert_ne!(x_field, y_field);

        let xs: Vec<f64> = self.points.iter().map(|p| p.x()).collect();
        let ys: Vec<f64> = self.points.iter().map(|p| p.y()).collect();
        table.set_numeric_column(x_field, &xs);
        table.set_numeric_column(y_field, &ys);
    }
}
