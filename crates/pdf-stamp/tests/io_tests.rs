mod common;

use common::*;
use pdf_stamp::*;
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_save_and_load_pdf() {
    let doc = create_test_pdf(4);
    let temp = NamedTempFile::new().unwrap();

    save_pdf(doc, temp.path()).await.unwrap();
    let loaded = load_pdf(temp.path()).await.unwrap();
    assert_eq!(loaded.get_pages().len(), 4);
}

#[tokio::test]
async fn test_bytes_round_trip_after_stamping() {
    let mut doc = create_test_pdf(2);
    add_page_numbers(&mut doc, &PageNumberOptions::default()).unwrap();

    let bytes = to_bytes(doc).await.unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7"));

    let loaded = load_pdf_bytes(bytes).await.unwrap();
    assert_eq!(loaded.get_pages().len(), 2);
}

#[tokio::test]
async fn test_load_missing_file() {
    let result = load_pdf("/nonexistent/input.pdf").await;
    assert!(matches!(result, Err(StampError::Io(_))));
}

#[tokio::test]
async fn test_load_garbage_bytes() {
    let result = load_pdf_bytes(b"definitely not a pdf".to_vec()).await;
    assert!(matches!(result, Err(StampError::Pdf(_))));
}

#[tokio::test]
async fn test_options_persist_as_json() {
    let mut raw = RawOptions::new();
    raw.set("format", "i");
    raw.set("position", "top-right");
    raw.set("startAt", 3);
    let options = PageNumberOptions::resolve(&raw);

    let temp = NamedTempFile::new().unwrap();
    save_options(&options, temp.path()).await.unwrap();

    let text = std::fs::read_to_string(temp.path()).unwrap();
    assert!(text.contains("\"top-right\""));

    let loaded: PageNumberOptions = load_options(temp.path()).await.unwrap();
    assert_eq!(loaded, options);
}

#[tokio::test]
async fn test_load_options_rejects_bad_json() {
    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), "{ not json").unwrap();

    let result: Result<WatermarkOptions> = load_options(temp.path()).await;
    assert!(matches!(result, Err(StampError::Config(_))));
}
