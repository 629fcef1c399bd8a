use sigcontent::{ContentStore, MediaEntry};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

/// Crée une arborescence de contenu de test :
/// videos/{intro.mp4, promo.MOV, notes.txt}
/// slides/rapport/{slide_001.png, slide_002.png}
/// slides/vide/ (présentation sans planche convertie)
fn create_test_store() -> (TempDir, ContentStore) {
    let temp_dir = tempfile::tempdir().unwrap();
    let videos = temp_dir.path().join("videos");
    let slides = temp_dir.path().join("slides");

    fs::create_dir_all(&videos).unwrap();
    fs::write(videos.join("intro.mp4"), b"video").unwrap();
    fs::write(videos.join("promo.MOV"), b"video").unwrap();
    fs::write(videos.join("notes.txt"), b"not a video").unwrap();

    fs::create_dir_all(slides.join("rapport")).unwrap();
    fs::write(slides.join("rapport").join("slide_001.png"), b"png").unwrap();
    fs::write(slides.join("rapport").join("slide_002.png"), b"png").unwrap();
    fs::create_dir_all(slides.join("vide")).unwrap();

    let store = ContentStore::new(&videos, &slides);
    (temp_dir, store)
}

fn file_names(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_list_videos_filters_and_sorts() {
    let (_temp_dir, store) = create_test_store();

    let videos = store.list_videos().unwrap();
    // notes.txt est ignoré, l'extension est insensible à la casse
    assert_eq!(file_names(&videos), vec!["intro.mp4", "promo.MOV"]);
}

#[test]
fn test_has_video() {
    let (_temp_dir, store) = create_test_store();

    assert!(store.has_video("intro.mp4").unwrap());
    assert!(store.has_video("promo.MOV").unwrap());
    assert!(!store.has_video("notes.txt").unwrap());
    assert!(!store.has_video("absent.mp4").unwrap());
    // Pas de traversée de répertoires
    assert!(!store.has_video("../videos/intro.mp4").unwrap());
}

#[test]
fn test_slides_lookup_by_stem() {
    let (_temp_dir, store) = create_test_store();

    // Par nom de fichier de présentation ou par stem
    assert!(store.has_slides("rapport.pptx").unwrap());
    assert!(store.has_slides("rapport.pdf").unwrap());
    assert!(store.has_slides("rapport").unwrap());

    // Un répertoire sans planche n'est pas du contenu jouable
    assert!(!store.has_slides("vide.pptx").unwrap());
    assert!(!store.has_slides("inconnu.pptx").unwrap());

    let slides = store.slides_for("rapport.pptx").unwrap();
    assert_eq!(file_names(&slides), vec!["slide_001.png", "slide_002.png"]);
}

#[test]
fn test_contains_covers_both_roots() {
    let (_temp_dir, store) = create_test_store();

    assert!(store.contains("intro.mp4").unwrap());
    assert!(store.contains("rapport.pptx").unwrap());
    assert!(!store.contains("vide.pptx").unwrap());
    assert!(!store.contains("absent.mp4").unwrap());
    assert!(!store.contains("notes.txt").unwrap());
}

#[test]
fn test_missing_roots_mean_empty_content() {
    let store = ContentStore::new("/nonexistent/videos", "/nonexistent/slides");

    assert!(store.list_videos().unwrap().is_empty());
    assert!(!store.contains("intro.mp4").unwrap());
    assert!(!store.contains("rapport.pptx").unwrap());
}

#[test]
fn test_expand_video_repeats() {
    let (_temp_dir, store) = create_test_store();

    let media = store.expand("intro.mp4", 3).unwrap();
    assert_eq!(media.len(), 3);
    for entry in &media {
        assert_eq!(entry.url(), "/content/videos/intro.mp4");
        assert_eq!(entry.name(), "intro.mp4");
    }
}

#[test]
fn test_expand_presentation_to_slides() {
    let (_temp_dir, store) = create_test_store();

    let media = store.expand("rapport.pptx", 2).unwrap();
    // 2 planches x 2 répétitions, la séquence complète est répétée
    assert_eq!(media.len(), 4);
    assert_eq!(
        media.iter().map(|m| m.name()).collect::<Vec<_>>(),
        vec![
            "slide_001.png",
            "slide_002.png",
            "slide_001.png",
            "slide_002.png"
        ]
    );
    assert_eq!(media[0].url(), "/content/slides/rapport/slide_001.png");
    match &media[0] {
        MediaEntry::Image { duration, .. } => assert_eq!(*duration, 10),
        other => panic!("expected an image entry, got {:?}", other),
    }
}

#[test]
fn test_expand_orphan_is_empty() {
    let (_temp_dir, store) = create_test_store();

    assert!(store.expand("disparu.mp4", 2).unwrap().is_empty());
    assert!(store.expand("vide.pptx", 1).unwrap().is_empty());
}

#[test]
fn test_expand_honors_configured_slide_duration() {
    let (temp_dir, store) = create_test_store();
    let store = store.with_slide_duration(Duration::from_secs(30));

    let media = store.expand("rapport.pptx", 1).unwrap();
    match &media[0] {
        MediaEntry::Image { duration, .. } => assert_eq!(*duration, 30),
        other => panic!("expected an image entry, got {:?}", other),
    }

    drop(temp_dir);
}

#[test]
fn test_media_entry_serialization() {
    let entry = MediaEntry::Video {
        url: "/content/videos/intro.mp4".to_string(),
        name: "intro.mp4".to_string(),
    };
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["type"], "video");
    assert_eq!(json["url"], "/content/videos/intro.mp4");

    let entry = MediaEntry::Image {
        url: "/content/slides/rapport/slide_001.png".to_string(),
        name: "slide_001.png".to_string(),
        duration: 10,
    };
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["type"], "image");
    assert_eq!(json["duration"], 10);
}

#[test]
fn test_custom_video_formats() {
    let (temp_dir, store) = create_test_store();
    let store = store.with_video_formats(vec!["mp4".to_string()]);

    assert!(store.has_video("intro.mp4").unwrap());
    // .mov n'est plus accepté
    assert!(!store.has_video("promo.MOV").unwrap());
    assert_eq!(
        file_names(&store.list_videos().unwrap()),
        vec!["intro.mp4"]
    );

    drop(temp_dir);
}

#[test]
fn test_store_dirs_are_exposed() {
    let (temp_dir, store) = create_test_store();
    assert_eq!(store.videos_dir(), temp_dir.path().join("videos"));
    assert_eq!(store.slides_dir(), temp_dir.path().join("slides"));
}
