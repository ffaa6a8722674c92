mod common;

use cropview_core::error::CropviewError;
use cropview_core::export::encode_png_data_url;
use cropview_core::io::image_io::{load_image, save_png, write_data_url};

use common::gradient;

#[test]
fn test_save_load_roundtrip_png() {
    let img = gradient(12, 7);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.png");

    save_png(&img, &path).unwrap();
    let loaded = load_image(&path).unwrap();
    assert_eq!(loaded, img);
}

#[test]
fn test_load_missing_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_image(&dir.path().join("nope.png")).unwrap_err();
    assert!(matches!(
        err,
        CropviewError::ImageError(_) | CropviewError::Io(_)
    ));
}

#[test]
fn test_load_garbage_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.png");
    std::fs::write(&path, b"definitely not an image").unwrap();
    assert!(load_image(&path).is_err());
}

#[test]
fn test_write_data_url() {
    let img = gradient(5, 5);
    let url = encode_png_data_url(&img).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.png");

    write_data_url(&url, &path).unwrap();
    assert_eq!(load_image(&path).unwrap(), img);
}
