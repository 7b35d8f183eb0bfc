#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

pub fn letter_box() -> Vec<Object> {
    vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ]
}

/// Content stream of the n-th (1-based) test page
pub fn page_marker(n: usize) -> Vec<u8> {
    format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", n).into_bytes()
}

pub fn create_test_pdf(num_pages: usize) -> Document {
    create_test_pdf_with_box(num_pages, letter_box())
}

pub fn create_test_pdf_with_box(num_pages: usize, media_box: Vec<Object>) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for i in 0..num_pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), page_marker(i + 1)));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("MediaBox", Object::Array(media_box.clone())),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

/// Page object ID for a 1-based page number
pub fn page_id(doc: &Document, page_number: u32) -> ObjectId {
    *doc.get_pages().get(&page_number).unwrap()
}

/// Content operators of a page's single content stream
pub fn page_ops(doc: &Document, page_number: u32) -> String {
    let page = doc.get_dictionary(page_id(doc, page_number)).unwrap();
    let contents = page.get(b"Contents").unwrap().as_reference().unwrap();
    let stream = doc.get_object(contents).unwrap().as_stream().unwrap();
    String::from_utf8_lossy(&stream.content).into_owned()
}

/// Number of streams in the document whose content contains `needle`
pub fn streams_containing(doc: &Document, needle: &str) -> usize {
    doc.objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|stream| String::from_utf8_lossy(&stream.content).contains(needle))
        .count()
}

/// Translation `(x, y)` of the first `1 0 0 1 x y cm` placing a stamp
pub fn stamp_origin(ops: &str) -> (f32, f32) {
    let line = ops
        .lines()
        .find(|line| line.starts_with("1 0 0 1 ") && line.ends_with(" cm"))
        .unwrap();
    let parts: Vec<f32> = line
        .split_whitespace()
        .skip(4)
        .take(2)
        .map(|v| v.parse().unwrap())
        .collect();
    (parts[0], parts[1])
}
