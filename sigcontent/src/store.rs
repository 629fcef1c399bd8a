//! ContentStore : accès aux racines de contenu (vidéos et planches)

use crate::media::MediaEntry;
use crate::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Extensions vidéo acceptées par défaut (sans le point)
const DEFAULT_VIDEO_FORMATS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm"];

/// Durée d'affichage d'une planche par défaut
const DEFAULT_SLIDE_DURATION: Duration = Duration::from_secs(10);

/// Store de contenu du lecteur
///
/// Les vidéos sont des fichiers plats dans `videos_dir`. Les présentations
/// sont représentées par leurs planches converties : un sous-répertoire de
/// `slides_dir` nommé d'après le stem du fichier de présentation, contenant
/// des fichiers `slide_*.png`. Une présentation sans planche convertie est
/// considérée comme absente.
#[derive(Debug, Clone)]
pub struct ContentStore {
    videos_dir: PathBuf,
    slides_dir: PathBuf,
    video_formats: Vec<String>,
    slide_duration: Duration,
}

impl ContentStore {
    /// Crée un store sur les deux racines de contenu
    pub fn new(videos_dir: impl Into<PathBuf>, slides_dir: impl Into<PathBuf>) -> Self {
        Self {
            videos_dir: videos_dir.into(),
            slides_dir: slides_dir.into(),
            video_formats: DEFAULT_VIDEO_FORMATS.iter().map(|s| s.to_string()).collect(),
            slide_duration: DEFAULT_SLIDE_DURATION,
        }
    }

    /// Remplace la liste des extensions vidéo acceptées
    pub fn with_video_formats(mut self, formats: Vec<String>) -> Self {
        if !formats.is_empty() {
            self.video_formats = formats
                .into_iter()
                .map(|f| f.trim_start_matches('.').to_lowercase())
                .collect();
        }
        self
    }

    /// Remplace la durée d'affichage des planches
    pub fn with_slide_duration(mut self, duration: Duration) -> Self {
        self.slide_duration = duration;
        self
    }

    /// Racine des vidéos
    pub fn videos_dir(&self) -> &Path {
        &self.videos_dir
    }

    /// Racine des planches converties
    pub fn slides_dir(&self) -> &Path {
        &self.slides_dir
    }

    /// Teste si un nom de fichier porte une extension vidéo acceptée
    pub fn is_video_name(&self, name: &str) -> bool {
        match Path::new(name).extension().and_then(|e| e.to_str()) {
            Some(ext) => {
                let ext = ext.to_lowercase();
                self.video_formats.iter().any(|f| *f == ext)
            }
            None => false,
        }
    }

    /// Liste les vidéos présentes, triées par nom
    pub fn list_videos(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.videos_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.root_unavailable(&self.videos_dir, e)),
        };

        let mut videos: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .map(|n| self.is_video_name(n))
                        .unwrap_or(false)
            })
            .collect();
        videos.sort();
        Ok(videos)
    }

    /// Teste l'existence d'une vidéo par son nom de fichier exact
    pub fn has_video(&self, name: &str) -> Result<bool> {
        let Some(name) = plain_file_name(name) else {
            return Ok(false);
        };
        if !self.is_video_name(name) {
            return Ok(false);
        }

        match fs::metadata(self.videos_dir.join(name)) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // Distinguer un fichier absent d'une racine inaccessible
                self.probe_root(&self.videos_dir)?;
                Ok(false)
            }
            Err(e) => Err(self.root_unavailable(&self.videos_dir, e)),
        }
    }

    /// Liste les planches converties d'une présentation, triées
    ///
    /// `name` peut être le nom du fichier de présentation (`rapport.pptx`)
    /// ou directement son stem (`rapport`).
    pub fn slides_for(&self, name: &str) -> Result<Vec<PathBuf>> {
        let Some(stem) = presentation_stem(name) else {
            return Ok(Vec::new());
        };

        let dir = self.slides_dir.join(stem);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.probe_root(&self.slides_dir)?;
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.root_unavailable(&dir, e)),
        };

        let mut slides: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_slide_file(path))
            .collect();
        slides.sort();
        Ok(slides)
    }

    /// Teste si une présentation a au moins une planche convertie
    pub fn has_slides(&self, name: &str) -> Result<bool> {
        Ok(!self.slides_for(name)?.is_empty())
    }

    /// Teste si une entrée de playlist désigne encore du contenu jouable
    ///
    /// Une vidéo est cherchée par nom de fichier exact ; sinon l'entrée est
    /// traitée comme une présentation, cherchée par stem dans le cache de
    /// planches.
    pub fn contains(&self, name: &str) -> Result<bool> {
        if self.has_video(name)? {
            return Ok(true);
        }
        self.has_slides(name)
    }

    /// Expanse une entrée de playlist normalisée en médias jouables
    ///
    /// Une vidéo produit `repeats` entrées identiques ; une présentation
    /// produit `repeats` fois sa séquence de planches, chaque planche
    /// portant la durée d'affichage configurée. Une entrée qui ne résout
    /// plus rien produit une liste vide (avec un warning).
    pub fn expand(&self, name: &str, repeats: u32) -> Result<Vec<MediaEntry>> {
        let repeats = repeats.max(1) as usize;

        if self.has_video(name)? {
            let entry = MediaEntry::Video {
                url: format!("/content/videos/{}", name),
                name: name.to_string(),
            };
            return Ok(vec![entry; repeats]);
        }

        let slides = self.slides_for(name)?;
        if slides.is_empty() {
            tracing::warn!("Skipping orphaned playlist item: {} (content not found)", name);
            return Ok(Vec::new());
        }

        let stem = presentation_stem(name).unwrap_or_default();
        let duration = self.slide_duration.as_secs();
        let mut media = Vec::with_capacity(slides.len() * repeats);
        for _ in 0..repeats {
            for slide in &slides {
                let file_name = slide
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
                    .to_string();
                media.push(MediaEntry::Image {
                    url: format!("/content/slides/{}/{}", stem, file_name),
                    name: file_name,
                    duration,
                });
            }
        }
        Ok(media)
    }

    /// Vérifie qu'une racine est lisible (un répertoire absent est toléré)
    fn probe_root(&self, root: &Path) -> Result<()> {
        match fs::metadata(root) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.root_unavailable(root, e)),
        }
    }

    fn root_unavailable(&self, path: &Path, source: std::io::Error) -> Error {
        Error::RootUnavailable {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Retourne le nom s'il désigne un fichier plat (pas de séparateur)
fn plain_file_name(name: &str) -> Option<&str> {
    let name = name.trim();
    if name.is_empty() || name.contains('/') || name.contains('\\') {
        None
    } else {
        Some(name)
    }
}

/// Stem de présentation (`rapport.pptx` -> `rapport`)
fn presentation_stem(name: &str) -> Option<&str> {
    let name = plain_file_name(name)?;
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
}

/// Les planches converties sont nommées `slide_*.png`
fn is_slide_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with("slide_") && n.ends_with(".png"))
        .unwrap_or(false)
}
