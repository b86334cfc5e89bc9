use super::*;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::RgbaImage::new(width, height)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[test]
fn download_extension_follows_content_subtype() {
    let file = LocalFile::from_download("image-1700000000000", Some("image/webp"), vec![1]);
    assert_eq!(file.name, "image-1700000000000.webp");
    assert_eq!(file.mime, "image/webp");
}

#[test]
fn download_without_content_type_is_png() {
    let file = LocalFile::from_download("edit-42", None, vec![1]);
    assert_eq!(file.name, "edit-42.png");
    assert_eq!(file.mime, DEFAULT_MIME);
}

#[test]
fn download_strips_content_type_parameters() {
    let file = LocalFile::from_download("filter-1", Some("image/jpeg; charset=binary"), vec![]);
    assert_eq!(file.name, "filter-1.jpeg");
    assert_eq!(file.mime, "image/jpeg");
}

#[test]
fn download_keeps_name_already_ending_with_extension() {
    let file = LocalFile::from_download("snap.png", Some("image/png"), vec![]);
    assert_eq!(file.name, "snap.png");
}

#[test]
fn timestamped_name_has_prefix_and_millis() {
    let name = timestamped_name("compose");
    let millis = name.strip_prefix("compose-").unwrap();
    assert!(millis.parse::<u128>().unwrap() > 1_600_000_000_000);
}

#[test]
fn natural_size_reads_png_header() {
    let file = LocalFile::new("a.png", "image/png", png_bytes(8, 4));
    assert_eq!(file.natural_size().unwrap(), Size::new(8.0, 4.0));
}

#[test]
fn natural_size_of_garbage_fails() {
    let file = LocalFile::new("a.png", "image/png", b"not an image".to_vec());
    assert!(matches!(file.natural_size(), Err(StudioError::Image(_))));
}

#[test]
fn from_path_sniffs_mime_and_save_to_writes_back() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("source.bin");
    std::fs::write(&src, png_bytes(2, 2)).unwrap();

    let file = LocalFile::from_path(&src).unwrap();
    assert_eq!(file.name, "source.bin");
    assert_eq!(file.mime, "image/png");
    assert!(file.is_image());

    let out = file.save_to(&dir.path().join("out")).unwrap();
    assert_eq!(std::fs::read(out).unwrap(), file.bytes);
}

#[test]
fn from_path_of_non_image_is_not_image() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("notes.txt");
    std::fs::write(&src, "hello").unwrap();
    let file = LocalFile::from_path(&src).unwrap();
    assert!(!file.is_image());
}

#[test]
fn debug_hides_bytes() {
    let file = LocalFile::new("a.png", "image/png", vec![0; 1024]);
    let debug = format!("{file:?}");
    assert!(debug.contains("len: 1024"));
}
