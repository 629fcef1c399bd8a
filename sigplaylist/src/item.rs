//! PlaylistItem : entrée normalisée de la playlist et décodage des formes héritées

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Une entrée normalisée de la playlist
///
/// `name` est le nom de fichier du contenu (jamais un chemin) ; `repeats`
/// est le nombre de passages consécutifs dans une boucle de lecture,
/// toujours `>= 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub name: String,
    #[serde(default = "default_repeats")]
    pub repeats: u32,
}

fn default_repeats() -> u32 {
    1
}

impl PlaylistItem {
    /// Crée une entrée (repeats est ramené à au moins 1)
    pub fn new(name: impl Into<String>, repeats: u32) -> Self {
        Self {
            name: name.into(),
            repeats: repeats.max(1),
        }
    }
}

/// Forme brute d'une entrée telle qu'écrite par le tableau de bord
///
/// Deux formes héritées coexistent : un nom nu, ou un objet portant
/// `name` (ou l'ancienne clé `filename`) et un `repeats` facultatif dont
/// le type n'est pas garanti. Les champs inconnus sont ignorés.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Name(String),
    Record(RawRecord),
    // Tout autre type JSON (nombre, null, liste imbriquée) est toléré
    // et écarté à la normalisation.
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    repeats: Option<serde_json::Value>,
}

/// Décode et normalise une définition de playlist
///
/// Le document doit être une liste JSON ; chaque élément est normalisé en
/// `PlaylistItem` selon les règles suivantes :
/// - nom nu -> `repeats = 1`
/// - `repeats` absent, non numérique, nul ou négatif -> `1`
/// - entrée sans nom exploitable -> écartée silencieusement
/// - les doublons sont conservés tels quels, dans l'ordre du document
pub fn parse_definition(text: &str) -> Result<Vec<PlaylistItem>> {
    let entries: Vec<RawEntry> = serde_json::from_str(text)
        .map_err(|e| Error::InvalidDefinition(e.to_string()))?;
    Ok(normalize(entries))
}

fn normalize(entries: Vec<RawEntry>) -> Vec<PlaylistItem> {
    let mut items = Vec::with_capacity(entries.len());

    for entry in entries {
        match entry {
            RawEntry::Name(name) => {
                if let Some(name) = clean_name(Some(name)) {
                    items.push(PlaylistItem { name, repeats: 1 });
                }
            }
            RawEntry::Record(record) => {
                let RawRecord {
                    name,
                    filename,
                    repeats,
                } = record;
                if let Some(name) = clean_name(name).or_else(|| clean_name(filename)) {
                    items.push(PlaylistItem {
                        name,
                        repeats: coerce_repeats(repeats.as_ref()),
                    });
                }
            }
            RawEntry::Other(value) => {
                tracing::debug!("Ignoring malformed playlist entry: {}", value);
            }
        }
    }

    items
}

/// Un nom vide ou réduit à des blancs est écarté (malformé, pas orphelin)
fn clean_name(name: Option<String>) -> Option<String> {
    let name = name?;
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Ramène un `repeats` arbitraire à un entier `>= 1`
///
/// Accepte les entiers, les flottants (tronqués) et les chaînes numériques,
/// comme l'acceptait le tableau de bord historique.
fn coerce_repeats(value: Option<&serde_json::Value>) -> u32 {
    use serde_json::Value;

    let Some(value) = value else {
        return 1;
    };

    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(r) => r.clamp(1, u32::MAX as i64) as u32,
        None => 1,
    }
}
