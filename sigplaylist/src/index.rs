//! ContentIndex : capacité de résolution du contenu, fournie par l'application

use crate::{Error, Result};

/// Index du contenu actuellement disponible
///
/// La validation de la playlist ne connaît du contenu que cette question :
/// « l'entrée `name` désigne-t-elle encore quelque chose de jouable ? ».
/// `Ok(false)` signifie un orphelin (l'entrée est écartée avec un warning) ;
/// `Err(_)` signifie que le store lui-même est indisponible, auquel cas le
/// cache conserve son snapshot précédent plutôt que de servir du vide.
pub trait ContentIndex: Send + Sync {
    /// Teste si une entrée de playlist résout encore du contenu jouable
    fn contains(&self, name: &str) -> Result<bool>;
}

impl ContentIndex for sigcontent::ContentStore {
    fn contains(&self, name: &str) -> Result<bool> {
        sigcontent::ContentStore::contains(self, name)
            .map_err(|e| Error::IndexUnavailable(e.to_string()))
    }
}
