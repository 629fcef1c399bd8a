//! Extension de sigconfig pour le cache de playlist

use crate::cache::{PlaylistCache, DEFAULT_CACHE_TTL};
use crate::index::ContentIndex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Trait d'extension pour sigconfig::Config
pub trait PlaylistConfigExt {
    /// Retourne le chemin du fichier de définition de playlist
    fn playlist_path(&self) -> PathBuf;

    /// Retourne le TTL du cache de playlist
    fn playlist_cache_ttl(&self) -> Duration;
}

impl PlaylistConfigExt for sigconfig::Config {
    fn playlist_path(&self) -> PathBuf {
        self.get_playlist_path()
    }

    fn playlist_cache_ttl(&self) -> Duration {
        match self.get_playlist_cache_ttl() {
            Ok(secs) => Duration::from_secs(secs as u64),
            Err(_) => DEFAULT_CACHE_TTL,
        }
    }
}

impl PlaylistCache {
    /// Construit le cache depuis la configuration globale
    pub fn from_config(index: Arc<dyn ContentIndex>) -> Self {
        let config = sigconfig::get_config();
        PlaylistCache::new(config.playlist_path(), index).with_ttl(config.playlist_cache_ttl())
    }
}
