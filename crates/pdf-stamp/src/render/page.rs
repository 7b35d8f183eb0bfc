//! Reading page geometry and embedding page content
//!
//! Page attributes such as `MediaBox` and `Resources` may be inherited from
//! ancestor `Pages` nodes, so lookups walk the `Parent` chain.

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::types::{Point, Result, Size};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::canvas::{Canvas, Drawable};

/// Guard against malformed, cyclic page trees
const MAX_TREE_DEPTH: usize = 64;

// =============================================================================
// Page Geometry
// =============================================================================

/// A page's MediaBox as origin + size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    pub origin: Point,
    pub size: Size,
}

impl PageBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn letter() -> Self {
        Self::new(0.0, 0.0, DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1)
    }

    /// Translate a point from box-relative to page space.
    pub fn to_page_space(&self, p: Point) -> Point {
        Point::new(self.origin.x + p.x, self.origin.y + p.y)
    }

    pub fn to_array(&self) -> Vec<Object> {
        vec![
            Object::Real(self.origin.x),
            Object::Real(self.origin.y),
            Object::Real(self.origin.x + self.size.width),
            Object::Real(self.origin.y + self.size.height),
        ]
    }
}

/// Look up a page attribute, following `Parent` links for inherited keys.
pub fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(value.clone());
        }
        let parent = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// MediaBox of a page, falling back to US Letter.
pub fn page_box(doc: &Document, page_id: ObjectId) -> PageBox {
    let media_box = inherited_attribute(doc, page_id, b"MediaBox").and_then(|obj| match obj {
        Object::Array(arr) => Some(arr),
        Object::Reference(id) => doc.get_object(id).ok()?.as_array().ok().cloned(),
        _ => None,
    });

    let Some(mb) = media_box else {
        return PageBox::letter();
    };
    let nums: Vec<f32> = mb.iter().filter_map(extract_number).collect();
    if nums.len() != 4 {
        return PageBox::letter();
    }

    let (llx, urx) = (nums[0].min(nums[2]), nums[0].max(nums[2]));
    let (lly, ury) = (nums[1].min(nums[3]), nums[1].max(nums[3]));
    PageBox::new(llx, lly, urx - llx, ury - lly)
}

/// Extract numeric value from a PDF object
pub(crate) fn extract_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

// =============================================================================
// Page Content
// =============================================================================

/// A page's original content wrapped in a Form XObject.
///
/// The XObject is read-only and can be painted any number of times, on
/// its own page or on others in the same document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageContent {
    pub xobject_id: ObjectId,
}

impl PageContent {
    /// Wrap the current content stream(s) and resources of `page_id`.
    pub fn embed(doc: &mut Document, page_id: ObjectId) -> Result<Self> {
        let bbox = page_box(doc, page_id);
        let resources = inherited_attribute(doc, page_id, b"Resources");
        let content = {
            let page_dict = doc.get_dictionary(page_id)?;
            get_page_content(doc, page_dict)?
        };

        let mut xobject_dict = Dictionary::new();
        xobject_dict.set("Type", Object::Name(b"XObject".to_vec()));
        xobject_dict.set("Subtype", Object::Name(b"Form".to_vec()));
        xobject_dict.set("FormType", Object::Integer(1));
        xobject_dict.set("BBox", Object::Array(bbox.to_array()));
        if let Some(resources) = resources {
            xobject_dict.set("Resources", resources);
        }

        let xobject_id = doc.add_object(Stream::new(xobject_dict, content));
        Ok(Self { xobject_id })
    }
}

impl Drawable for PageContent {
    fn draw_onto(&self, canvas: &mut Canvas) {
        let name = canvas.xobject(self.xobject_id);
        canvas.push(&format!("q /{} Do Q\n", name));
    }
}

/// Get the content stream data from a page.
fn get_page_content(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let contents = match page_dict.get(b"Contents") {
        Ok(c) => c,
        Err(_) => return Ok(Vec::new()), // No content = blank page
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id)? {
            Object::Array(arr) => get_concatenated_content_streams(doc, arr),
            Object::Stream(stream) => Ok(stream_bytes(stream)),
            _ => Ok(Vec::new()),
        },
        Object::Array(arr) => get_concatenated_content_streams(doc, arr),
        _ => Ok(Vec::new()),
    }
}

/// Concatenate multiple content streams
fn get_concatenated_content_streams(doc: &Document, refs: &[Object]) -> Result<Vec<u8>> {
    let mut result = Vec::new();

    for obj in refs {
        if let Object::Reference(id) = obj {
            if let Ok(stream) = doc.get_object(*id)?.as_stream() {
                result.extend_from_slice(&stream_bytes(stream));
                result.push(b'\n');
            }
        }
    }

    Ok(result)
}

fn stream_bytes(stream: &Stream) -> Vec<u8> {
    stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone())
}
