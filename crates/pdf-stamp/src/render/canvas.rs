//! Content-stream canvas for rebuilding a page
//!
//! A [`Canvas`] collects content operators and the resources they name.
//! Anything that can put marks on a page implements [`Drawable`]; the
//! compositor decides the order in which drawables are painted.

use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Something that can be painted onto a page canvas.
pub trait Drawable {
    fn draw_onto(&self, canvas: &mut Canvas);
}

/// Resource category inside a page's `/Resources` dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResourceKind {
    Font,
    XObject,
    ExtGState,
}

impl ResourceKind {
    fn dict_key(self) -> &'static str {
        match self {
            ResourceKind::Font => "Font",
            ResourceKind::XObject => "XObject",
            ResourceKind::ExtGState => "ExtGState",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            ResourceKind::Font => "F",
            ResourceKind::XObject => "X",
            ResourceKind::ExtGState => "GS",
        }
    }
}

/// Accumulates operators and named resources for a single page.
#[derive(Debug, Default)]
pub struct Canvas {
    ops: String,
    resources: Vec<(ResourceKind, ObjectId, String)>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource name for a font object, registering it on first use.
    pub fn font(&mut self, id: ObjectId) -> String {
        self.register(ResourceKind::Font, id)
    }

    /// Resource name for an XObject (form or image).
    pub fn xobject(&mut self, id: ObjectId) -> String {
        self.register(ResourceKind::XObject, id)
    }

    /// Resource name for a graphics state dictionary.
    pub fn graphics_state(&mut self, id: ObjectId) -> String {
        self.register(ResourceKind::ExtGState, id)
    }

    pub fn push(&mut self, ops: &str) {
        self.ops.push_str(ops);
    }

    pub fn ops(&self) -> &str {
        &self.ops
    }

    pub fn paint(&mut self, drawable: &dyn Drawable) {
        drawable.draw_onto(self);
    }

    fn register(&mut self, kind: ResourceKind, id: ObjectId) -> String {
        if let Some((_, _, name)) = self
            .resources
            .iter()
            .find(|(k, existing, _)| *k == kind && *existing == id)
        {
            return name.clone();
        }

        let index = self.resources.iter().filter(|(k, _, _)| *k == kind).count() + 1;
        let name = format!("{}{}", kind.prefix(), index);
        self.resources.push((kind, id, name.clone()));
        name
    }

    fn resources_dict(&self) -> Dictionary {
        let mut resources = Dictionary::new();
        for kind in [ResourceKind::Font, ResourceKind::XObject, ResourceKind::ExtGState] {
            let mut entries = Dictionary::new();
            for (_, id, name) in self.resources.iter().filter(|(k, _, _)| *k == kind) {
                entries.set(name.as_bytes(), Object::Reference(*id));
            }
            if !entries.is_empty() {
                resources.set(kind.dict_key(), Object::Dictionary(entries));
            }
        }
        resources
    }

    /// Replace the page's content stream and resources with this canvas.
    pub fn install(self, doc: &mut Document, page_id: ObjectId) -> Result<()> {
        let resources = self.resources_dict();
        let content_id = doc.add_object(Stream::new(Dictionary::new(), self.ops.into_bytes()));

        let page = doc.get_dictionary_mut(page_id)?;
        page.set("Contents", Object::Reference(content_id));
        page.set("Resources", Object::Dictionary(resources));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker(&'static str);

    impl Drawable for Marker {
        fn draw_onto(&self, canvas: &mut Canvas) {
            canvas.push(self.0);
        }
    }

    #[test]
    fn test_resource_names_are_stable() {
        let mut canvas = Canvas::new();
        assert_eq!(canvas.font((4, 0)), "F1");
        assert_eq!(canvas.font((9, 0)), "F2");
        assert_eq!(canvas.font((4, 0)), "F1");
        assert_eq!(canvas.xobject((4, 0)), "X1");
        assert_eq!(canvas.graphics_state((7, 0)), "GS1");
    }

    #[test]
    fn test_paint_order() {
        let mut canvas = Canvas::new();
        canvas.paint(&Marker("a "));
        canvas.paint(&Marker("b "));
        assert_eq!(canvas.ops(), "a b ");
    }

    #[test]
    fn test_resources_dict() {
        let mut canvas = Canvas::new();
        canvas.font((3, 0));
        canvas.xobject((5, 0));
        let dict = canvas.resources_dict();
        assert!(dict.get(b"Font").is_ok());
        assert!(dict.get(b"XObject").is_ok());
        assert!(dict.get(b"ExtGState").is_err());
    }
}
