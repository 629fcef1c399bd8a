//! Extension de sigconfig pour le store de contenu

use crate::ContentStore;
use std::time::Duration;

/// Trait d'extension pour sigconfig::Config
pub trait ContentConfigExt {
    /// Construit le store de contenu depuis la configuration
    fn content_store(&self) -> anyhow::Result<ContentStore>;
}

impl ContentConfigExt for sigconfig::Config {
    fn content_store(&self) -> anyhow::Result<ContentStore> {
        // Les répertoires sont créés s'ils n'existent pas encore
        let videos_dir = self.get_videos_dir()?;
        let slides_dir = self.get_slides_cache_dir()?;
        let slide_duration = Duration::from_secs(self.get_slide_duration()? as u64);

        Ok(ContentStore::new(videos_dir, slides_dir)
            .with_video_formats(self.get_video_formats())
            .with_slide_duration(slide_duration))
    }
}
