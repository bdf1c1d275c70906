//! Modèle de table de coordonnées (colonnes ordonnées, lignes de valeurs)
//!
//! Les valeurs sont conservées sous forme de texte comme dans le fichier
//! source ; le parsing numérique n'a lieu qu'à la construction des
//! géométries.

use std::path::Path;

use crate::GeotableError;

/// Table délimitée en mémoire : noms de colonnes ordonnés + lignes
///
/// Les colonnes sont uniques par nom. L'ordre n'a d'importance que pour le
/// placement des champs en sortie.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Crée une table vide avec les colonnes données
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Ajoute une ligne
    ///
    /// La ligne doit avoir autant de valeurs que la table a de colonnes.
    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Lit une table CSV depuis un fichier (première ligne = en-têtes)
    pub fn from_path(path: &Path) -> Result<Self, GeotableError> {
        let mut reader = csv::Reader::from_path(path)?;

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }

        Ok(Self { columns, rows })
    }

    /// Écrit la table en CSV (en-têtes + lignes, sans colonne d'index)
    pub fn write(&self, path: &Path) -> Result<(), GeotableError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Noms de colonnes, dans l'ordre
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Nombre de lignes
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// La colonne existe-t-elle ?
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Index d'une colonne par nom
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Valeurs d'une colonne sous forme de texte
    pub fn column(&self, name: &str) -> Result<Vec<&str>, GeotableError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| GeotableError::field_not_found(name))?;
        Ok(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Valeurs d'une colonne parsées en `f64`
    ///
    /// Échoue en identifiant la colonne, la ligne et la valeur fautive.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, GeotableError> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| GeotableError::field_not_found(name))?;

        let mut values = Vec::with_capacity(self.rows.len());
        for (row, record) in self.rows.iter().enumerate() {
            let raw = record[idx].trim();
            let parsed = raw.parse::<f64>().map_err(|_| GeotableError::InvalidValue {
                field: name.to_string(),
                row,
                value: raw.to_string(),
            })?;
            values.push(parsed);
        }
        Ok(values)
    }

    /// Écrit une colonne : écrase en place si le nom existe, sinon ajoute
    /// la colonne en fin de table
    ///
    /// Même nom = même colonne, jamais de doublon. `values` doit avoir
    /// autant d'éléments que la table a de lignes.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());

        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// Écrit une colonne numérique (formatage `f64` round-trip)
    pub fn set_numeric_column(&mut self, name: &str, values: &[f64]) {
        self.set_column(name, values.iter().map(|v| v.to_string()).collect());
    }
}
