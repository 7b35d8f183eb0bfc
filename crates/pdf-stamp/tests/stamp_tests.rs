mod common;

use common::*;
use lopdf::{Document, Object};
use pdf_stamp::*;
use serde_json::json;

fn numbering(value: serde_json::Value) -> PageNumberOptions {
    PageNumberOptions::resolve(&RawOptions::from_json(value))
}

fn watermark(value: serde_json::Value) -> WatermarkOptions {
    WatermarkOptions::resolve(&RawOptions::from_json(value))
}

// =============================================================================
// Page Numbers
// =============================================================================

#[test]
fn test_numbers_follow_scope_not_physical_pages() {
    let mut doc = create_test_pdf(10);
    let options = numbering(json!({"range": "1-3,8-10", "startAt": 5, "format": "1"}));

    let report = add_page_numbers(&mut doc, &options).unwrap();
    assert_eq!(report.stamped_pages, vec![1, 2, 3, 8, 9, 10]);

    for (page, label) in [(1, 5), (2, 6), (3, 7), (8, 8), (9, 9), (10, 10)] {
        let ops = page_ops(&doc, page);
        assert!(ops.contains(&format!("({}) Tj", label)), "page {page}: {ops}");
    }
    for page in 4..=7 {
        assert_eq!(page_ops(&doc, page).into_bytes(), page_marker(page as usize));
    }
}

#[test]
fn test_total_uses_last_logical_number() {
    let mut doc = create_test_pdf(3);
    let options = numbering(json!({"format": "I", "template": "page_n_of_total"}));

    add_page_numbers(&mut doc, &options).unwrap();
    assert!(page_ops(&doc, 1).contains("(Page I of III) Tj"));
    assert!(page_ops(&doc, 3).contains("(Page III of III) Tj"));
}

#[test]
fn test_cover_page_skipped_by_default() {
    let mut doc = create_test_pdf(3);
    let options = numbering(json!({"coverIsFirstPage": true}));

    let report = add_page_numbers(&mut doc, &options).unwrap();
    assert_eq!(report.stamped_pages, vec![2, 3]);
    assert!(page_ops(&doc, 2).contains("(1) Tj"));
    assert_eq!(page_ops(&doc, 1).into_bytes(), page_marker(1));
}

#[test]
fn test_single_cover_page_has_nothing_to_number() {
    let mut doc = create_test_pdf(1);
    let options = numbering(json!({"coverIsFirstPage": true}));
    let report = add_page_numbers(&mut doc, &options).unwrap();
    assert!(report.stamped_pages.is_empty());
}

#[test]
fn test_facing_pages_mirror_left_anchor() {
    let mut doc = create_test_pdf(4);
    let options = numbering(json!({
        "pageMode": "facing",
        "coverIsFirstPage": true,
        "range": "2-4",
        "position": "bottom-left"
    }));
    add_page_numbers(&mut doc, &options).unwrap();

    // page 2 is a left sheet, page 3 a right sheet
    let (x2, y2) = stamp_origin(&page_ops(&doc, 2));
    let (x3, y3) = stamp_origin(&page_ops(&doc, 3));
    let (x4, _) = stamp_origin(&page_ops(&doc, 4));
    assert_eq!(x2, 36.0);
    assert!(x3 > 500.0);
    assert_eq!(x4, 36.0);
    assert_eq!(y2, 36.0);
    assert_eq!(y3, 36.0);
}

#[test]
fn test_stamps_offset_by_media_box_origin() {
    let media_box = vec![
        Object::Integer(100),
        Object::Integer(100),
        Object::Integer(712),
        Object::Integer(892),
    ];
    let mut doc = create_test_pdf_with_box(1, media_box);
    add_page_numbers(&mut doc, &PageNumberOptions::default()).unwrap();

    let (x, y) = stamp_origin(&page_ops(&doc, 1));
    assert_eq!(y, 136.0);
    assert!(x > 100.0 + 290.0 && x < 100.0 + 306.0);
}

#[test]
fn test_numbering_shares_one_font() {
    let mut doc = create_test_pdf(5);
    add_page_numbers(&mut doc, &PageNumberOptions::default()).unwrap();

    let fonts = doc
        .objects
        .values()
        .filter_map(|obj| obj.as_dict().ok())
        .filter(|dict| dict.get(b"BaseFont").is_ok())
        .count();
    assert_eq!(fonts, 1);
}

#[test]
fn test_empty_document_rejected() {
    let mut doc = create_test_pdf(0);
    let result = add_page_numbers(&mut doc, &PageNumberOptions::default());
    assert!(matches!(result, Err(StampError::NoPages)));

    let result = add_watermark(&mut doc, &WatermarkOptions::default(), None);
    assert!(matches!(result, Err(StampError::NoPages)));
}

// =============================================================================
// Watermarks
// =============================================================================

#[test]
fn test_over_watermark_applied_twice_draws_twice() {
    let mut doc = create_test_pdf(1);
    let options = WatermarkOptions::default();

    add_watermark(&mut doc, &options, None).unwrap();
    assert_eq!(streams_containing(&doc, "(CONFIDENTIAL) Tj"), 1);

    add_watermark(&mut doc, &options, None).unwrap();
    assert_eq!(streams_containing(&doc, "(CONFIDENTIAL) Tj"), 2);
    assert_eq!(streams_containing(&doc, "(Page 1) Tj"), 1);
}

#[test]
fn test_layer_order() {
    let mut over = create_test_pdf(1);
    add_watermark(&mut over, &watermark(json!({"layer": "over"})), None).unwrap();
    let ops = page_ops(&over, 1);
    assert!(ops.starts_with("q /X1 Do Q\n"));
    assert!(ops.trim_end().ends_with('Q'));

    let mut under = create_test_pdf(1);
    add_watermark(&mut under, &watermark(json!({"layer": "under"})), None).unwrap();
    let ops = page_ops(&under, 1);
    assert!(ops.starts_with("q\n/GS1 gs\n"));
    assert!(ops.ends_with("q /X1 Do Q\n"));
}

#[test]
fn test_watermark_range_is_clamped_and_swapped() {
    let mut doc = create_test_pdf(4);
    let report = add_watermark(&mut doc, &watermark(json!({"rangeFrom": 3, "rangeTo": 2})), None)
        .unwrap();
    assert_eq!(report.stamped_pages, vec![2, 3]);

    let mut doc = create_test_pdf(4);
    let report = add_watermark(&mut doc, &watermark(json!({"rangeFrom": 3, "rangeTo": 40})), None)
        .unwrap();
    assert_eq!(report.stamped_pages, vec![3, 4]);

    let mut doc = create_test_pdf(4);
    let report = add_watermark(&mut doc, &watermark(json!({"rangeFrom": 9})), None).unwrap();
    assert_eq!(report.stamped_pages, vec![4]);

    let mut doc = create_test_pdf(4);
    let report = add_watermark(&mut doc, &watermark(json!({"rangeFrom": 9, "rangeTo": 12})), None)
        .unwrap();
    assert!(report.stamped_pages.is_empty());
}

#[test]
fn test_opaque_watermark_has_no_graphics_state() {
    let mut doc = create_test_pdf(1);
    add_watermark(&mut doc, &watermark(json!({"opacity": 100, "rotation": 0})), None).unwrap();
    let ops = page_ops(&doc, 1);
    assert!(!ops.contains(" gs"));
    assert!(ops.contains("(CONFIDENTIAL) Tj"));
}

#[test]
fn test_mid_center_watermark_is_centered() {
    let mut doc = create_test_pdf(1);
    add_watermark(&mut doc, &watermark(json!({"rotation": 0, "text": "X"})), None).unwrap();

    // Helvetica "X" is 667 units wide
    let width = 0.667 * 48.0;
    let (x, y) = stamp_origin(&page_ops(&doc, 1));
    assert!((x - (612.0 - width) / 2.0).abs() < 0.01);
    assert!((y - (792.0 - 48.0) / 2.0).abs() < 0.01);
}

#[test]
fn test_image_watermark() {
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    let png = {
        let img = RgbaImage::from_pixel(800, 100, Rgba([0, 0, 255, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    };

    let mut doc = create_test_pdf(2);
    let options = watermark(json!({"mode": "image", "rotation": 0}));
    let report = add_watermark(&mut doc, &options, Some(png.as_slice())).unwrap();
    assert_eq!(report.stamped_pages, vec![1, 2]);

    // 800px wide image capped to 45% of the page width
    let ops = page_ops(&doc, 1);
    let line = ops.lines().find(|line| line.ends_with("/X2 Do")).unwrap();
    let values: Vec<f32> = line
        .split_whitespace()
        .take(4)
        .map(|v| v.parse().unwrap())
        .collect();
    assert!((values[0] - 275.4).abs() < 0.01);
    assert!((values[3] - 34.425).abs() < 0.01);

    let images = doc
        .objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|s| s.dict.get(b"Subtype").and_then(|o| o.as_name()).ok() == Some(b"Image".as_slice()))
        .count();
    assert_eq!(images, 1);
}

#[test]
fn test_image_mode_without_image_fails() {
    let mut doc = create_test_pdf(1);
    let result = add_watermark(&mut doc, &watermark(json!({"mode": "image"})), None);
    assert!(matches!(result, Err(StampError::Config(_))));
}

#[test]
fn test_stamped_document_survives_save_and_reload() {
    let mut doc = create_test_pdf(3);
    add_watermark(&mut doc, &WatermarkOptions::default(), None).unwrap();
    add_page_numbers(&mut doc, &PageNumberOptions::default()).unwrap();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    let reloaded = Document::load_mem(&bytes).unwrap();
    assert_eq!(reloaded.get_pages().len(), 3);
}
