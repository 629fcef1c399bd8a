//! MediaEntry : média jouable issu de l'expansion d'une entrée de playlist

use serde::Serialize;

/// Un média prêt à être joué par un client d'affichage
///
/// C'est la forme servie aux écrans : une URL relative sous `/content/`,
/// plus la durée d'affichage pour les images. L'expansion est faite au
/// moment du rendu, jamais stockée dans le cache de playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaEntry {
    /// Fichier vidéo servi tel quel
    Video { url: String, name: String },

    /// Planche de présentation, affichée `duration` secondes
    Image {
        url: String,
        name: String,
        duration: u64,
    },
}

impl MediaEntry {
    /// Nom du fichier sous-jacent
    pub fn name(&self) -> &str {
        match self {
            MediaEntry::Video { name, .. } => name,
            MediaEntry::Image { name, .. } => name,
        }
    }

    /// URL relative de diffusion
    pub fn url(&self) -> &str {
        match self {
            MediaEntry::Video { url, .. } => url,
            MediaEntry::Image { url, .. } => url,
        }
    }
}
