//! Politiques de confirmation d'écrasement
//!
//! Le pipeline ne bloque jamais lui-même sur un terminal : l'appelant
//! injecte une politique. Le prompt interactif reproduit le protocole
//! d'origine (avertissement jaune, une ligne lue, « Y » exact pour
//! accepter).

use std::io::{BufRead, Write};
use std::path::Path;

/// Capacité de confirmer l'écrasement d'un fichier existant
pub trait OverwriteConfirmation {
    /// Retourne `true` si l'écrasement de `path` est autorisé
    fn confirm(&self, path: &Path) -> bool;
}

/// Demande confirmation sur le terminal, une ligne, « Y » exact
pub struct PromptStdin;

impl OverwriteConfirmation for PromptStdin {
    fn confirm(&self, path: &Path) -> bool {
        // Avertissement en jaune, comme l'outil d'origine
        println!(
            "\x1b[33mWarning: The output table path is the same as the input table path ({}). \
             Are you sure you want to overwrite? (Y/n)\x1b[0m",
            path.display()
        );
        let _ = std::io::stdout().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        answer.trim_end_matches(['\r', '\n']) == "Y"
    }
}

/// Autorise toujours l'écrasement (mode non interactif, `--yes`)
pub struct AlwaysOverwrite;

impl OverwriteConfirmation for AlwaysOverwrite {
    fn confirm(&self, _path: &Path) -> bool {
        true
    }
}

/// Refuse toujours l'écrasement
pub struct NeverOverwrite;

impl OverwriteConfirmation for NeverOverwrite {
    fn confirm(&self, _path: &Path) -> bool {
        false
    }
}
