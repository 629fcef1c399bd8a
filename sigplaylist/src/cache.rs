//! PlaylistCache : vue en cache, bornée par TTL, de la définition de playlist

use crate::index::ContentIndex;
use crate::item::parse_definition;
use crate::snapshot::PlaylistSnapshot;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, RwLock as StdRwLock};
use std::time::{Duration, Instant, SystemTime};
use tokio::sync::Mutex;

/// TTL par défaut du cache de playlist
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

/// État protégé du cache
///
/// Invariant : `snapshot` est toujours une séquence complète, construite
/// hors verrou puis substituée d'un bloc. Aucun lecteur ne peut observer
/// une séquence en cours de construction.
#[derive(Default)]
struct CacheState {
    snapshot: Option<Arc<PlaylistSnapshot>>,
    computed_at: Option<Instant>,
    source_version: Option<SystemTime>,
}

impl CacheState {
    /// Retourne le snapshot s'il est encore frais pour la version observée
    fn fresh(&self, version: Option<SystemTime>, ttl: Duration) -> Option<Arc<PlaylistSnapshot>> {
        let snapshot = self.snapshot.as_ref()?;
        let computed_at = self.computed_at?;

        if computed_at.elapsed() >= ttl {
            return None;
        }
        // Une édition du fichier invalide le cache sans attendre le TTL
        if self.source_version != version {
            return None;
        }

        Some(snapshot.clone())
    }
}

/// Résultat d'un recalcul
enum Rebuild {
    /// Lecture + validation réussies
    Built(Arc<PlaylistSnapshot>),
    /// Fichier absent, illisible ou invalide : playlist vide
    Degraded(Arc<PlaylistSnapshot>),
    /// Index de contenu indisponible : on garde le snapshot précédent
    IndexUnavailable,
}

/// Cache de playlist
///
/// Un seul exemplaire par process, construit au démarrage et partagé par
/// `Arc` entre les handlers de requêtes. `get_playlist` ne retourne jamais
/// d'erreur : tous les modes de panne dégradent en playlist vide ou en
/// snapshot précédent, la lecture ne s'arrête jamais pour un problème de
/// configuration.
pub struct PlaylistCache {
    playlist_path: PathBuf,
    ttl: Duration,
    index: Arc<dyn ContentIndex>,
    state: StdRwLock<CacheState>,
    // Sérialise les recalculs : les appelants concurrents attendent celui
    // en vol et réutilisent son résultat (single-flight)
    refresh_lock: Mutex<()>,
}

impl PlaylistCache {
    /// Crée le cache sur un fichier de définition, avec le TTL par défaut
    pub fn new(playlist_path: impl Into<PathBuf>, index: Arc<dyn ContentIndex>) -> Self {
        Self {
            playlist_path: playlist_path.into(),
            ttl: DEFAULT_CACHE_TTL,
            index,
            state: StdRwLock::new(CacheState::default()),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Remplace le TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Chemin du fichier de définition
    pub fn playlist_path(&self) -> &std::path::Path {
        &self.playlist_path
    }

    /// Retourne la playlist validée courante
    ///
    /// Sert le snapshot en cache tant qu'il est frais : moins vieux que le
    /// TTL et correspondant au marqueur de modification courant du fichier.
    /// Sinon recalcule (lecture, normalisation, filtrage des orphelins) et
    /// substitue le nouveau snapshot d'un bloc.
    pub async fn get_playlist(&self) -> Arc<PlaylistSnapshot> {
        let version = self.probe_version();

        // Chemin rapide : snapshot frais, aucune relecture du fichier
        {
            let state = self.state.read().unwrap();
            if let Some(snapshot) = state.fresh(version, self.ttl) {
                return snapshot;
            }
        }

        // Chemin lent : un seul recalcul à la fois
        let _guard = self.refresh_lock.lock().await;

        // Un autre appelant a pu recalculer pendant notre attente
        {
            let state = self.state.read().unwrap();
            if let Some(snapshot) = state.fresh(version, self.ttl) {
                return snapshot;
            }
        }

        // Tout le travail de reconstruction se fait hors du verrou d'état
        let outcome = self.rebuild();

        let mut state = self.state.write().unwrap();
        match outcome {
            Rebuild::Built(snapshot) => {
                state.snapshot = Some(snapshot.clone());
                state.computed_at = Some(Instant::now());
                state.source_version = version;
                tracing::debug!(
                    digest = %snapshot.digest,
                    items = snapshot.len(),
                    "Playlist cache refreshed"
                );
                snapshot
            }
            Rebuild::Degraded(snapshot) => {
                // TTL quand même, pour ne pas recalculer en boucle ; mais
                // pas de version source, pour recalculer dès que le fichier
                // redevient lisible
                state.snapshot = Some(snapshot.clone());
                state.computed_at = Some(Instant::now());
                state.source_version = None;
                snapshot
            }
            Rebuild::IndexUnavailable => {
                // Mieux vaut un snapshot périmé qu'un écran vide
                state.computed_at = Some(Instant::now());
                match &state.snapshot {
                    Some(previous) => previous.clone(),
                    None => {
                        let empty = Arc::new(PlaylistSnapshot::empty());
                        state.snapshot = Some(empty.clone());
                        empty
                    }
                }
            }
        }
    }

    /// Empreinte de la playlist courante
    pub async fn playlist_digest(&self) -> String {
        self.get_playlist().await.digest.clone()
    }

    /// Marqueur de modification courant du fichier de définition
    ///
    /// `None` si le fichier est absent ou si son mtime est inaccessible.
    fn probe_version(&self) -> Option<SystemTime> {
        fs::metadata(&self.playlist_path)
            .and_then(|meta| meta.modified())
            .ok()
    }

    /// Relit, normalise et valide la définition
    fn rebuild(&self) -> Rebuild {
        let text = match fs::read_to_string(&self.playlist_path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.playlist_path.display(),
                    "Playlist file missing, serving empty playlist"
                );
                return Rebuild::Degraded(Arc::new(PlaylistSnapshot::empty()));
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.playlist_path.display(),
                    error = %e,
                    "Failed to read playlist file, serving empty playlist"
                );
                return Rebuild::Degraded(Arc::new(PlaylistSnapshot::empty()));
            }
        };

        let entries = match parse_definition(&text) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    path = %self.playlist_path.display(),
                    error = %e,
                    "Failed to parse playlist file, serving empty playlist"
                );
                return Rebuild::Degraded(Arc::new(PlaylistSnapshot::empty()));
            }
        };

        let mut items = Vec::with_capacity(entries.len());
        for item in entries {
            match self.index.contains(&item.name) {
                Ok(true) => items.push(item),
                Ok(false) => {
                    tracing::warn!(
                        "Skipping orphaned playlist item: {} (content not found)",
                        item.name
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Content index unavailable, keeping previous playlist snapshot"
                    );
                    return Rebuild::IndexUnavailable;
                }
            }
        }

        Rebuild::Built(Arc::new(PlaylistSnapshot::new(items)))
    }
}

impl std::fmt::Debug for PlaylistCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaylistCache")
            .field("playlist_path", &self.playlist_path)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
