//! Types d'erreurs pour sigplaylist

/// Erreurs de lecture/validation de playlist
///
/// Aucune de ces erreurs ne remonte jusqu'aux appelants de
/// `PlaylistCache::get_playlist` : elles dégradent en playlist vide ou en
/// snapshot précédent. Elles restent visibles pour le code qui manipule
/// directement le parsing ou l'index de contenu.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid playlist definition: {0}")]
    InvalidDefinition(String),

    #[error("Content index unavailable: {0}")]
    IndexUnavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type Result spécialisé pour sigplaylist
pub type Result<T> = std::result::Result<T, Error>;
