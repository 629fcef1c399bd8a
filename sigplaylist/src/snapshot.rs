//! PlaylistSnapshot : séquence validée, empreinte et horodatage

use crate::PlaylistItem;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha1::{Digest, Sha1};

/// Snapshot immuable de la playlist validée
///
/// C'est la valeur servie aux consommateurs : une fois construite elle
/// n'est plus jamais modifiée, seul le `Arc` qui la porte est remplacé.
/// L'empreinte identifie le contenu (les clients s'en servent pour savoir
/// si la playlist a changé sans comparer les séquences).
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistSnapshot {
    pub items: Vec<PlaylistItem>,
    pub digest: String,
    pub computed_at: DateTime<Utc>,
}

impl PlaylistSnapshot {
    /// Construit un snapshot depuis une séquence déjà validée
    pub(crate) fn new(items: Vec<PlaylistItem>) -> Self {
        let digest = digest_items(&items);
        Self {
            items,
            digest,
            computed_at: Utc::now(),
        }
    }

    /// Snapshot vide (playlist absente ou illisible)
    pub(crate) fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Nombre d'entrées
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Vérifie si la playlist est vide
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Empreinte SHA-1 de la forme JSON canonique de la séquence
fn digest_items(items: &[PlaylistItem]) -> String {
    let json = serde_json::to_vec(items).unwrap_or_default();
    let mut hasher = Sha1::new();
    hasher.update(&json);
    hex::encode(hasher.finalize())
}
