//! # sigcontent - Store de contenu du lecteur d'affichage
//!
//! Cette crate donne accès aux deux racines de contenu du lecteur :
//! - les vidéos (`content/videos`)
//! - les planches de présentations converties en PNG (`cache/slides`,
//!   un sous-répertoire par présentation)
//!
//! Elle fournit :
//! - **ContentStore** : tests d'existence utilisés pour valider la playlist
//! - **MediaEntry** : expansion d'une entrée de playlist en médias jouables
//!   (une vidéo, ou la séquence de planches d'une présentation)
//!
//! # Exemple d'utilisation
//!
//! ```no_run
//! use sigcontent::ContentStore;
//!
//! # fn main() -> anyhow::Result<()> {
//! let store = ContentStore::new("/srv/signage/content/videos", "/srv/signage/cache/slides");
//!
//! // L'entrée existe-t-elle encore sur disque ?
//! if store.contains("intro.mp4")? {
//!     // Expansion en médias jouables
//!     for media in store.expand("intro.mp4", 2)? {
//!         println!("{:?}", media);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod media;
mod store;

#[cfg(feature = "sigconfig")]
mod config_ext;

// Réexports publics
pub use error::{Error, Result};
pub use media::MediaEntry;
pub use store::ContentStore;

#[cfg(feature = "sigconfig")]
pub use config_ext::ContentConfigExt;
