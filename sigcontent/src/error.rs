//! Types d'erreurs pour sigcontent

use std::path::PathBuf;

/// Erreurs d'accès au contenu
///
/// Un fichier absent n'est PAS une erreur (c'est une réponse négative) ;
/// seule l'indisponibilité d'une racine de contenu en est une.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Content root unavailable: {path}: {source}")]
    RootUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Type Result spécialisé pour sigcontent
pub type Result<T> = std::result::Result<T, Error>;
