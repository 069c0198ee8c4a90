use super::*;

#[test]
fn list_assets_filters_by_extension_case_insensitively() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.JPG", "a.png", "c.jpeg", "notes.txt", "clip.mp4"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }
    std::fs::create_dir(dir.path().join("nested.png")).unwrap();

    let images = list_assets(dir.path(), IMAGE_EXTENSIONS).unwrap();
    let names: Vec<_> = images
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.png", "b.JPG", "c.jpeg"]);

    let clips = list_assets(dir.path(), TRANSITION_EXTENSIONS).unwrap();
    assert_eq!(clips.len(), 1);
}

#[test]
fn missing_directory_is_an_empty_pool() {
    let dir = tempfile::tempdir().unwrap();
    let gone = dir.path().join("background_music");
    assert!(list_assets(&gone, MUSIC_EXTENSIONS).unwrap().is_empty());
}

#[test]
fn empty_image_pool_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = image_pool(dir.path()).unwrap_err();
    assert!(matches!(err, ReelError::Config(_)));
}
