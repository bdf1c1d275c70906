//! Introspection de chemins : type attendu, existence, extension
//!
//! Petit utilitaire de classification : un chemin vise un fichier ou un
//! dossier, et la construction échoue si une entrée existante du système de
//! fichiers contredit le type attendu.

use std::path::{Path, PathBuf};

use crate::CoordtransError;

/// Type visé par un chemin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Dir,
}

/// Chemin classifié
#[derive(Debug, Clone)]
pub struct PathInfo {
    path: PathBuf,
    kind: PathKind,
}

impl PathInfo {
    /// Chemin visant un fichier
    ///
    /// Échoue si le chemin existe déjà et désigne un dossier.
    pub fn file(path: impl Into<PathBuf>) -> Result<Self, CoordtransError> {
        let path = path.into();
        if path.is_dir() {
            return Err(CoordtransError::invalid_path(
                &path,
                "already exists and is a directory, not a file",
            ));
        }
        Ok(Self {
            path,
            kind: PathKind::File,
        })
    }

    /// Chemin visant un dossier
    ///
    /// Échoue si le chemin existe déjà et désigne un fichier.
    pub fn dir(path: impl Into<PathBuf>) -> Result<Self, CoordtransError> {
        let path = path.into();
        if path.is_file() {
            return Err(CoordtransError::invalid_path(
                &path,
                "already exists and is a file, not a directory",
            ));
        }
        Ok(Self {
            path,
            kind: PathKind::Dir,
        })
    }

    /// Classifie un chemin existant
    ///
    /// Échoue si le chemin n'existe pas : impossible de déterminer le type.
    pub fn detect(path: impl Into<PathBuf>) -> Result<Self, CoordtransError> {
        let path = path.into();
        let kind = if path.is_dir() {
            PathKind::Dir
        } else if path.is_file() {
            PathKind::File
        } else {
            return Err(CoordtransError::invalid_path(
                &path,
                "does not exist, cannot tell whether it is a file or a directory",
            ));
        };
        Ok(Self { path, kind })
    }

    /// Chemin brut
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Type visé
    pub fn kind(&self) -> PathKind {
        self.kind
    }

    /// Le chemin existe-t-il (fichier ou dossier) ?
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Le chemin est-il un fichier existant ?
    pub fn is_existing_file(&self) -> bool {
        self.kind == PathKind::File && self.path.is_file()
    }

    /// Le chemin est-il un dossier existant ?
    pub fn is_existing_dir(&self) -> bool {
        self.kind == PathKind::Dir && self.path.is_dir()
    }

    /// Extension en minuscules, `None` pour un dossier ou sans extension
    pub fn extension(&self) -> Option<String> {
        if self.kind == PathKind::Dir {
            return None;
        }
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }

    /// Nom du fichier sans extension
    pub fn file_stem(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }

    /// Dossier parent
    pub fn parent(&self) -> Option<&Path> {
        self.path.parent()
    }

    /// Chemin absolu (sans résolution des liens symboliques)
    pub fn abs_path(&self) -> Result<PathBuf, CoordtransError> {
        Ok(std::path::absolute(&self.path)?)
    }

    /// Crée les dossiers manquants : le parent pour un fichier, le chemin
    /// lui-même pour un dossier
    pub fn ensure_parent_dirs(&self) -> Result<(), CoordtransError> {
        let dir = match self.kind {
            PathKind::File => match self.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => return Ok(()),
            },
            PathKind::Dir => &self.path,
        };
        std::fs::create_dir_all(dir)?;
        Ok(())
    }
}

/// Deux chemins désignent-ils le même fichier ?
///
/// Comparaison sur les chemins absolus non canonicalisés : la cible peut ne
/// pas encore exister.
pub fn same_path(a: &Path, b: &Path) -> bool {
    match (std::path::absolute(a), std::path::absolute(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
