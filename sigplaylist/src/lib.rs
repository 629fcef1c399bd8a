//! # sigplaylist - Cache de playlist du lecteur d'affichage
//!
//! Cette crate fournit la vue en cache de la playlist définie par le
//! tableau de bord d'administration :
//! - Lecture et normalisation de `playlist.json` (deux formes héritées :
//!   liste de noms, ou liste d'objets `{name, repeats}`)
//! - Validation des entrées contre le store de contenu (les entrées
//!   orphelines sont écartées, jamais fatales)
//! - Cache avec TTL, invalidé immédiatement si le fichier est modifié
//! - Recalcul single-flight : des lecteurs concurrents partagent le même
//!   recalcul et observent toujours un snapshot complet
//!
//! # Architecture
//!
//! - **PlaylistCache** : l'objet possédant l'état du cache (un par process,
//!   partagé par `Arc` entre les handlers)
//! - **PlaylistItem** : entrée normalisée (`name`, `repeats >= 1`)
//! - **PlaylistSnapshot** : séquence validée + empreinte + horodatage
//! - **ContentIndex** : capacité "ce contenu existe-t-il encore ?" fournie
//!   par l'application (implémentée pour `sigcontent::ContentStore`)
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use sigplaylist::PlaylistCache;
//! use sigcontent::ContentStore;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = ContentStore::new("/srv/signage/content/videos", "/srv/signage/cache/slides");
//! let cache = Arc::new(PlaylistCache::new("/srv/signage/playlist.json", Arc::new(store)));
//!
//! // Dans chaque handler de requête :
//! let snapshot = cache.get_playlist().await;
//! for item in &snapshot.items {
//!     println!("{} x{}", item.name, item.repeats);
//! }
//! # }
//! ```

mod cache;
mod error;
mod index;
mod item;
mod snapshot;

#[cfg(feature = "sigconfig")]
mod config_ext;

// Réexports publics
pub use cache::{PlaylistCache, DEFAULT_CACHE_TTL};
pub use error::{Error, Result};
pub use index::ContentIndex;
pub use item::{parse_definition, PlaylistItem};
pub use snapshot::PlaylistSnapshot;

#[cfg(feature = "sigconfig")]
pub use config_ext::PlaylistConfigExt;
