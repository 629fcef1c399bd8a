//! # Signage Configuration Module
//!
//! This module provides configuration management for the signage player,
//! including:
//! - Loading configuration from YAML files
//! - Merging with embedded default configuration
//! - Environment variable overrides
//! - Type-safe getters and setters for configuration values
//! - Thread-safe singleton access pattern
//!
//! ## Usage
//!
//! ```no_run
//! use sigconfig::get_config;
//!
//! // Get the global configuration
//! let config = get_config();
//!
//! // Access configuration values
//! let playlist = config.get_playlist_path();
//! let ttl = config.get_playlist_cache_ttl()?;
//!
//! // Update configuration values
//! config.set_playlist_cache_ttl(10)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{anyhow, Result};
use dirs::home_dir;
use lazy_static::lazy_static;
use serde_yaml::{Mapping, Number, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::info;
use uuid::Uuid;

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("signage.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> =
        Arc::new(Config::load_config("").expect("Failed to load signage configuration"));
}

const ENV_CONFIG_DIR: &str = "SIGNAGE_CONFIG";
const ENV_PREFIX: &str = "SIGNAGE_CONFIG__";

// Default values for configuration
const DEFAULT_PLAYLIST_FILE: &str = "playlist.json";
const DEFAULT_PLAYLIST_CACHE_TTL_SECS: usize = 5;
const DEFAULT_SLIDE_DURATION_SECS: usize = 10;
const DEFAULT_VIDEO_FORMATS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm"];
const DEFAULT_LOG_BUFFER_CAPACITY: usize = 1000;
const DEFAULT_LOG_MIN_LEVEL: &str = "TRACE";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;

/// Macro to generate getter/setter for usize values with default
macro_rules! impl_usize_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<usize> {
            match self.get_value($path)? {
                Value::Number(n) if n.is_i64() => Ok(n.as_i64().unwrap() as usize),
                Value::Number(n) if n.is_u64() => Ok(n.as_u64().unwrap() as usize),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, size: usize) -> Result<()> {
            let n = Number::from(size);
            self.set_value($path, Value::Number(n))
        }
    };
}

/// Macro to generate getter/setter for bool values with default
macro_rules! impl_bool_config {
    ($getter:ident, $setter:ident, $path:expr, $default:expr) => {
        pub fn $getter(&self) -> Result<bool> {
            match self.get_value($path)? {
                Value::Bool(b) => Ok(b),
                _ => Ok($default),
            }
        }

        pub fn $setter(&self, value: bool) -> Result<()> {
            self.set_value($path, Value::Bool(value))
        }
    };
}

/// Configuration manager for the signage host
///
/// This structure manages the application configuration, including:
/// - Loading configuration from YAML files
/// - Merging with default configuration
/// - Handling environment variable overrides
/// - Providing typed getters/setters for configuration values
#[derive(Debug)]
pub struct Config {
    config_dir: String,
    path: String,
    data: Mutex<Value>,
}

// Implémentation manuelle de Clone
impl Clone for Config {
    fn clone(&self) -> Self {
        let data = self.data.lock().unwrap().clone();
        Self {
            config_dir: self.config_dir.clone(),
            path: self.path.clone(),
            data: Mutex::new(data),
        }
    }
}

impl Config {
    /// Finds a config directory by trying different locations in order
    fn find_config_dir(directory: &str) -> String {
        // 1. Try provided directory
        if !directory.is_empty() {
            return directory.to_string();
        }

        // 2. Try environment variable
        if let Ok(env_path) = env::var(ENV_CONFIG_DIR) {
            info!(env_var=ENV_CONFIG_DIR, path=%env_path, "Trying to load config from env");
            return env_path;
        }

        // 3. Try current directory
        if Path::new(".signage").exists() {
            return ".signage".to_string();
        }

        // 4. Try home directory
        if let Some(home) = home_dir() {
            let home_config = home.join(".signage");
            if home_config.exists() {
                return home_config.to_string_lossy().to_string();
            }
        }

        // Default fallback
        ".signage".to_string()
    }

    /// Validates and prepares a config directory
    fn validate_config_dir(path: &Path) -> Result<()> {
        // Create if doesn't exist
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        // Verify it's a directory
        if !path.is_dir() {
            return Err(anyhow!("Le chemin spécifié n'est pas un répertoire"));
        }

        // Test write permission
        let test_file = path.join(".write_test");
        fs::write(&test_file, b"test")?;
        fs::remove_file(&test_file)?;

        // Test read permission
        fs::read_dir(path)?;

        Ok(())
    }

    /// Determines and validates the configuration directory
    ///
    /// The directory is searched in the following order:
    /// 1. The provided `directory` parameter if not empty
    /// 2. The `SIGNAGE_CONFIG` environment variable
    /// 3. `.signage` in the current directory
    /// 4. `.signage` in the user's home directory
    ///
    /// The directory is created if it doesn't exist, and validated for
    /// read/write permissions.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created or validated
    pub fn config_dir(directory: &str) -> String {
        let dir_path = Self::find_config_dir(directory);
        let path = Path::new(&dir_path);

        Self::validate_config_dir(path)
            .expect("Impossible de valider le répertoire de configuration");

        dir_path
    }

    /// Loads the configuration from the specified directory
    ///
    /// This method:
    /// 1. Determines the configuration directory
    /// 2. Loads the default embedded configuration
    /// 3. Merges it with the external config.yaml file if present
    /// 4. Applies environment variable overrides
    /// 5. Saves the merged configuration
    pub fn load_config(directory: &str) -> Result<Self> {
        // Obtenir le répertoire de configuration
        let config_dir = Self::config_dir(directory);
        info!(config_dir=%config_dir, "Using config directory");

        // Construire le chemin du fichier config.yaml
        let config_file_path = Path::new(&config_dir).join("config.yaml");
        let path = config_file_path.to_string_lossy().to_string();

        // Charger la configuration par défaut
        let mut default_value: Value = serde_yaml::from_str(DEFAULT_CONFIG)?;

        // Essayer de charger le fichier de configuration
        let yaml_data = if let Ok(data) = fs::read(&path) {
            info!(config_file=%path, "Loaded config file");
            data
        } else {
            info!(config_file=%path, "Config file not found, using default embedded config");
            DEFAULT_CONFIG.as_bytes().to_vec()
        };

        // Merger avec la config par défaut
        let external_value: Value = serde_yaml::from_slice(&yaml_data)?;
        merge_yaml(&mut default_value, &external_value);
        let mut config_value = Self::lower_keys_value(default_value);

        // Appliquer les overrides depuis les variables d'environnement
        Self::apply_env_overrides(&mut config_value);

        // Créer la configuration
        let config = Config {
            config_dir,
            path,
            data: Mutex::new(config_value),
        };

        // Sauvegarder la configuration
        config.save()?;
        Ok(config)
    }

    /// Saves the current configuration to the config.yaml file
    pub fn save(&self) -> Result<()> {
        let data = self.data.lock().unwrap();
        let yaml = serde_yaml::to_string(&*data)?;
        fs::write(&self.path, yaml)?;
        Ok(())
    }

    /// Sets a configuration value at the specified path and saves it
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["playlist", "path"]`)
    /// * `value` - The YAML value to set
    pub fn set_value(&self, path: &[&str], value: Value) -> Result<()> {
        let mut data = self.data.lock().unwrap();
        Self::set_value_internal(&mut data, path, value.clone())?;
        drop(data);
        self.save()?;
        Ok(())
    }

    fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<()> {
        if path.is_empty() {
            *data = value;
            return Ok(());
        }
        if let Value::Mapping(map) = data {
            let key = path[0].to_lowercase();
            let key_value = Value::String(key.clone());
            if path.len() == 1 {
                map.insert(key_value, value);
            } else {
                let entry = map
                    .entry(key_value)
                    .or_insert(Value::Mapping(Mapping::new()));
                Self::set_value_internal(entry, &path[1..], value)?;
            }
            Ok(())
        } else {
            Err(anyhow!("Current node is not a map"))
        }
    }

    /// Gets a configuration value at the specified path
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["playlist", "path"]`)
    pub fn get_value(&self, path: &[&str]) -> Result<Value> {
        let data = self.data.lock().unwrap();
        Self::get_value_internal(&data, path)
    }

    fn get_value_internal(data: &Value, path: &[&str]) -> Result<Value> {
        let mut current = data;
        for (i, key) in path.iter().enumerate() {
            if let Value::Mapping(map) = current {
                let key = key.to_lowercase();

                if let Some(next) = map.get(&Value::String(key)) {
                    current = next;
                } else {
                    return Err(anyhow!("Path {} does not exist", path[..=i].join(".")));
                }
            } else {
                return Err(anyhow!("Path {} is not a Config", path[..i].join(".")));
            }
        }
        Ok(current.clone())
    }

    fn apply_env_overrides(config: &mut Value) {
        for (key, value) in env::vars() {
            if key.starts_with(ENV_PREFIX) {
                let key_path = key
                    .trim_start_matches(ENV_PREFIX)
                    .split("__")
                    .collect::<Vec<_>>();
                let yaml_value = Self::convert_env_value(&value);
                let _ = Self::set_value_internal(config, &key_path, yaml_value);
            }
        }
    }

    fn convert_env_value(value: &str) -> Value {
        if let Ok(parsed) = serde_yaml::from_str::<Value>(value) {
            return parsed;
        }
        Value::String(value.to_string())
    }

    fn lower_keys_value(value: Value) -> Value {
        match value {
            Value::Mapping(map) => {
                let mut new_map = Mapping::new();
                for (k, v) in map {
                    if let Value::String(s) = k {
                        let new_key = Value::String(s.to_lowercase());
                        let new_val = Self::lower_keys_value(v);
                        new_map.insert(new_key, new_val);
                    } else {
                        new_map.insert(k, Self::lower_keys_value(v));
                    }
                }
                Value::Mapping(new_map)
            }
            Value::Sequence(seq) => {
                Value::Sequence(seq.into_iter().map(Self::lower_keys_value).collect())
            }
            _ => value,
        }
    }

    /// Résout un chemin relatif ou absolu et crée le répertoire si nécessaire
    fn resolve_and_create_dir(&self, dir_path: &str) -> Result<String> {
        let path = Path::new(dir_path);

        // Déterminer si le chemin est relatif ou absolu
        let absolute_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            // Chemin relatif : le résoudre par rapport à config_dir
            Path::new(&self.config_dir).join(path)
        };

        // Créer le répertoire s'il n'existe pas
        if !absolute_path.exists() {
            fs::create_dir_all(&absolute_path)?;
            info!(directory=%absolute_path.display(), "Created content directory");
        }

        // Retourner le chemin absolu
        Ok(absolute_path.to_string_lossy().to_string())
    }

    /// Résout un chemin de fichier relatif ou absolu sans le créer
    fn resolve_file(&self, file_path: &str) -> PathBuf {
        let path = Path::new(file_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new(&self.config_dir).join(path)
        }
    }

    /// Récupère un répertoire géré par la configuration
    ///
    /// Cette méthode générique permet de récupérer n'importe quel répertoire
    /// configuré dans le YAML. Le répertoire peut être absolu ou relatif au
    /// répertoire de configuration. Il sera créé s'il n'existe pas.
    ///
    /// # Arguments
    ///
    /// * `path` - Chemin dans l'arbre de configuration (ex: `&["content", "videos_directory"]`)
    /// * `default` - Nom de répertoire par défaut si non configuré
    pub fn get_managed_dir(&self, path: &[&str], default: &str) -> Result<String> {
        let dir_path = match self.get_value(path) {
            Ok(Value::String(s)) => s,
            _ => {
                self.set_managed_dir(path, default.to_string())?;
                default.to_string()
            }
        };
        self.resolve_and_create_dir(&dir_path)
    }

    /// Définit un répertoire géré par la configuration
    pub fn set_managed_dir(&self, path: &[&str], directory: String) -> Result<()> {
        self.set_value(path, Value::String(directory))
    }

    /// Gets the path of the playlist definition file (`playlist.json`)
    ///
    /// The playlist file is written by the admin dashboard; this side only
    /// ever reads it. A relative path is resolved against the configuration
    /// directory. The file is NOT created: a missing playlist simply means
    /// an empty one.
    pub fn get_playlist_path(&self) -> PathBuf {
        let configured = match self.get_value(&["playlist", "path"]) {
            Ok(Value::String(s)) if !s.is_empty() => s,
            _ => DEFAULT_PLAYLIST_FILE.to_string(),
        };
        self.resolve_file(&configured)
    }

    /// Sets the path of the playlist definition file
    pub fn set_playlist_path(&self, path: String) -> Result<()> {
        self.set_value(&["playlist", "path"], Value::String(path))
    }

    /// Gets the videos directory, creating it if necessary
    pub fn get_videos_dir(&self) -> Result<String> {
        self.get_managed_dir(&["content", "videos_directory"], "content/videos")
    }

    /// Gets the cached-slides directory, creating it if necessary
    ///
    /// Presentations are converted to PNG slides by the conversion pipeline;
    /// each presentation owns a sub-directory named after its file stem.
    pub fn get_slides_cache_dir(&self) -> Result<String> {
        self.get_managed_dir(&["content", "slides_cache_directory"], "cache/slides")
    }

    /// Gets the accepted video file extensions (lowercase, without dot)
    pub fn get_video_formats(&self) -> Vec<String> {
        match self.get_value(&["content", "video_formats"]) {
            Ok(Value::Sequence(seq)) => {
                let formats: Vec<String> = seq
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::String(s) if !s.is_empty() => {
                            Some(s.trim_start_matches('.').to_lowercase())
                        }
                        _ => None,
                    })
                    .collect();
                if formats.is_empty() {
                    Self::default_video_formats()
                } else {
                    formats
                }
            }
            _ => Self::default_video_formats(),
        }
    }

    fn default_video_formats() -> Vec<String> {
        DEFAULT_VIDEO_FORMATS.iter().map(|s| s.to_string()).collect()
    }

    /// Gets the display identifier, generating one if it doesn't exist
    ///
    /// Several displays may point at the same content tree; the identifier
    /// distinguishes them in logs and status reports. It is generated once
    /// and persisted in the configuration file.
    pub fn get_display_id(&self) -> Result<String> {
        let path = &["display", "id"];
        match self.get_value(path) {
            Ok(Value::String(id)) if !id.trim().is_empty() => Ok(id.trim().to_string()),
            _ => {
                let new_id = Uuid::new_v4().to_string();
                self.set_value(path, Value::String(new_id.clone()))?;
                Ok(new_id)
            }
        }
    }

    impl_usize_config!(
        get_playlist_cache_ttl,
        set_playlist_cache_ttl,
        &["playlist", "cache_ttl_secs"],
        DEFAULT_PLAYLIST_CACHE_TTL_SECS
    );

    impl_usize_config!(
        get_slide_duration,
        set_slide_duration,
        &["content", "slide_duration_secs"],
        DEFAULT_SLIDE_DURATION_SECS
    );

    impl_usize_config!(
        get_log_cache_size,
        set_log_cache_size,
        &["host", "logger", "buffer_capacity"],
        DEFAULT_LOG_BUFFER_CAPACITY
    );

    impl_bool_config!(
        get_log_enable_console,
        set_log_enable_console,
        &["host", "logger", "enable_console"],
        DEFAULT_LOG_ENABLE_CONSOLE
    );

    /// Récupère le niveau de log minimum depuis la configuration
    pub fn get_log_min_level(&self) -> Result<String> {
        match self.get_value(&["host", "logger", "min_level"])? {
            Value::String(s) => Ok(s),
            _ => Ok(DEFAULT_LOG_MIN_LEVEL.to_string()),
        }
    }

    /// Définit le niveau de log minimum dans la configuration
    pub fn set_log_min_level(&self, level: String) -> Result<()> {
        self.set_value(&["host", "logger", "min_level"], Value::String(level))
    }
}

/// Returns the global configuration instance
///
/// This function provides access to the singleton configuration instance,
/// which is lazily loaded on first access.
///
/// # Examples
///
/// ```no_run
/// use sigconfig::get_config;
///
/// let config = get_config();
/// let playlist = config.get_playlist_path();
/// ```
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

/// Merges external YAML configuration into default configuration
///
/// This function recursively merges two YAML value trees:
/// - For mappings (objects), it merges keys from external into default
/// - For scalars and sequences, external values replace default values
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(), // pour les scalaires ou séquences, on remplace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(dir: &Path) -> Config {
        Config::load_config(dir.to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_defaults_from_embedded_config() {
        let tmp = tempfile::tempdir().unwrap();
        let config = make_config(tmp.path());

        assert_eq!(config.get_playlist_cache_ttl().unwrap(), 5);
        assert_eq!(config.get_slide_duration().unwrap(), 10);
        assert_eq!(
            config.get_video_formats(),
            vec!["mp4", "avi", "mov", "mkv", "webm"]
        );
        assert_eq!(
            config.get_playlist_path(),
            tmp.path().join("playlist.json")
        );
    }

    #[test]
    fn test_set_and_get_value() {
        let tmp = tempfile::tempdir().unwrap();
        let config = make_config(tmp.path());

        config.set_playlist_cache_ttl(30).unwrap();
        assert_eq!(config.get_playlist_cache_ttl().unwrap(), 30);

        // La valeur survit à un rechargement
        let reloaded = make_config(tmp.path());
        assert_eq!(reloaded.get_playlist_cache_ttl().unwrap(), 30);
    }

    #[test]
    fn test_managed_dir_is_created() {
        let tmp = tempfile::tempdir().unwrap();
        let config = make_config(tmp.path());

        let videos = config.get_videos_dir().unwrap();
        assert!(Path::new(&videos).is_dir());
        assert!(videos.ends_with("content/videos"));
    }

    #[test]
    fn test_display_id_is_stable() {
        let tmp = tempfile::tempdir().unwrap();
        let config = make_config(tmp.path());

        let id = config.get_display_id().unwrap();
        assert!(!id.is_empty());
        assert_eq!(config.get_display_id().unwrap(), id);

        let reloaded = make_config(tmp.path());
        assert_eq!(reloaded.get_display_id().unwrap(), id);
    }

    #[test]
    fn test_absolute_playlist_path_is_kept() {
        let tmp = tempfile::tempdir().unwrap();
        let config = make_config(tmp.path());

        config
            .set_playlist_path("/var/lib/signage/playlist.json".to_string())
            .unwrap();
        assert_eq!(
            config.get_playlist_path(),
            PathBuf::from("/var/lib/signage/playlist.json")
        );
    }
}
