//! Résolution de systèmes de coordonnées (CRS)
//!
//! Une spécification de CRS (`CrsSpec`) est un type somme : code EPSG,
//! chaîne WKT, CRS déjà résolu, ou absent. La résolution normalise tout en
//! un `Crs` canonique validé par PROJ, ou en « pas de CRS » quand aucun
//! n'est demandé.

use proj::Proj;

use crate::GeotableError;

/// CRS canonique : définition validée par PROJ, immuable
///
/// La définition est soit `EPSG:<code>`, soit la chaîne WKT d'origine.
/// L'égalité compare les définitions ; PROJ n'expose pas de comparaison de
/// CRS au niveau de ce binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Crs {
    definition: String,
    wkt: Option<String>,
}

impl Crs {
    /// Résout un code d'autorité EPSG
    pub fn from_epsg(code: u32) -> Result<Self, GeotableError> {
        let definition = format!("EPSG:{}", code);
        validate_definition(&definition)?;
        Ok(Self {
            definition,
            wkt: None,
        })
    }

    /// Résout une définition well-known-text
    pub fn from_wkt(wkt: &str) -> Result<Self, GeotableError> {
        validate_definition(wkt)?;
        Ok(Self {
            definition: wkt.to_string(),
            wkt: Some(wkt.to_string()),
        })
    }

    /// Définition PROJ (`EPSG:<code>` ou WKT)
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// WKT d'origine, si le CRS a été construit depuis un WKT
    ///
    /// Nécessaire pour écrire les sidecars `.prj` ; le binding PROJ ne sait
    /// pas exporter un WKT depuis un code EPSG.
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }
}

/// Vérifie que PROJ accepte la définition
///
/// Construit une transformation identité, comme le fait un reprojector
/// source == cible. Échec = définition invalide.
fn validate_definition(definition: &str) -> Result<(), GeotableError> {
    Proj::new_known_crs(definition, definition, None)
        .map(|_| ())
        .map_err(|e| GeotableError::invalid_crs(definition, e.to_string()))
}

/// Spécification de CRS : ce que l'appelant fournit avant résolution
///
/// Consommée une seule fois par [`CrsSpec::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub enum CrsSpec {
    /// Code d'autorité EPSG
    Epsg(u32),
    /// Chaîne WKT (ou chaîne de chiffres, traitée comme code EPSG)
    Wkt(String),
    /// CRS déjà résolu, repassé tel quel
    Resolved(Crs),
    /// Aucun CRS demandé
    Undefined,
}

impl CrsSpec {
    /// Résout la spécification en CRS canonique
    ///
    /// Ordre fixe, premier cas gagnant :
    /// 1. code EPSG entier ;
    /// 2. chaîne composée uniquement de chiffres → code EPSG ;
    /// 3. chaîne non numérique → WKT ;
    /// 4. CRS déjà résolu → inchangé ;
    /// 5. absent → `Ok(None)` (sentinelle « pas de CRS », pas une erreur).
    pub fn resolve(self) -> Result<Option<Crs>, GeotableError> {
        match self {
            CrsSpec::Epsg(code) => Crs::from_epsg(code).map(Some),
            CrsSpec::Wkt(s) => {
                if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                    let code = s.parse::<u32>().map_err(|e| {
                        GeotableError::invalid_crs(&s, format!("not a valid EPSG code: {}", e))
                    })?;
                    Crs::from_epsg(code).map(Some)
                } else {
                    Crs::from_wkt(&s).map(Some)
                }
            }
            CrsSpec::Resolved(crs) => Ok(Some(crs)),
            CrsSpec::Undefined => Ok(None),
        }
    }
}

impl From<u32> for CrsSpec {
    fn from(code: u32) -> Self {
        CrsSpec::Epsg(code)
    }
}

impl From<&str> for CrsSpec {
    fn from(s: &str) -> Self {
        CrsSpec::Wkt(s.to_string())
    }
}

impl From<String> for CrsSpec {
    fn from(s: String) -> Self {
        CrsSpec::Wkt(s)
    }
}

impl From<Crs> for CrsSpec {
    fn from(crs: Crs) -> Self {
        CrsSpec::Resolved(crs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WGS84_WKT: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]]"#;

    #[test]
    fn test_resolve_epsg_code() {
        let crs = CrsSpec::Epsg(4326).resolve().unwrap().unwrap();
        assert_eq!(crs.definition(), "EPSG:4326");
        assert!(crs.wkt().is_none());
    }

    #[test]
    fn test_resolve_numeric_string_as_epsg() {
        // Chaîne de chiffres = code d'autorité, pas un WKT
        let crs = CrsSpec::from("4326").resolve().unwrap().unwrap();
        assert_eq!(crs.definition(), "EPSG:4326");
    }

    #[test]
    fn test_resolve_wkt_string() {
        let crs = CrsSpec::from(WGS84_WKT).resolve().unwrap().unwrap();
        assert_eq!(crs.wkt(), Some(WGS84_WKT));
    }

    #[test]
    fn test_resolve_passes_through_resolved() {
        let crs = Crs::from_epsg(3857).unwrap();
        let resolved = CrsSpec::from(crs.clone()).resolve().unwrap().unwrap();
        assert_eq!(resolved, crs);
    }

    #[test]
    fn test_resolve_undefined_is_none_not_error() {
        assert!(CrsSpec::Undefined.resolve().unwrap().is_none());
    }

    #[test]
    fn test_resolve_unknown_epsg_fails() {
        let err = CrsSpec::Epsg(999999).resolve().unwrap_err();
        assert!(matches!(err, GeotableError::InvalidCrs { .. }));
    }

    #[test]
    fn test_resolve_garbage_wkt_fails() {
        let err = CrsSpec::from("not a coordinate system").resolve().unwrap_err();
        assert!(matches!(err, GeotableError::InvalidCrs { .. }));
    }
}
