//! Page sequence building
//!
//! Produces a new page order from a source document: pages can be
//! reordered, repeated, dropped, rotated and interleaved with blank pages.

use crate::render::{PageBox, inherited_attribute, page_box};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Page attributes that may be inherited from the page tree
const INHERITABLE_KEYS: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// One entry of the output page sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirective {
    /// Copy of the source page at `source_index` (0-based)
    Original {
        source_index: usize,
        rotation: Rotation,
    },
    /// Empty page the size of the first source page
    Blank { rotation: Rotation },
}

impl PageDirective {
    pub fn original(source_index: usize) -> Self {
        PageDirective::Original {
            source_index,
            rotation: Rotation::None,
        }
    }

    pub fn blank() -> Self {
        PageDirective::Blank {
            rotation: Rotation::None,
        }
    }

    pub fn rotated(self, rotation: Rotation) -> Self {
        match self {
            PageDirective::Original { source_index, .. } => PageDirective::Original {
                source_index,
                rotation,
            },
            PageDirective::Blank { .. } => PageDirective::Blank { rotation },
        }
    }
}

/// Keep the directives that can be built from a source of `source_len`
/// pages, in order. Out-of-range source indices are dropped.
pub fn plan_sequence(source_len: usize, directives: &[PageDirective]) -> Vec<PageDirective> {
    directives
        .iter()
        .copied()
        .filter(|directive| match directive {
            PageDirective::Original { source_index, .. } if *source_index >= source_len => {
                log::warn!(
                    "Skipping page {} (source has {} pages)",
                    source_index,
                    source_len
                );
                false
            }
            _ => true,
        })
        .collect()
}

/// Build a document whose pages follow `directives`.
///
/// Copied pages carry their inherited attributes so they stay intact when
/// the page tree is rebuilt, and the root `Pages` node keeps none of them.
/// Rotations are added to the page's effective `/Rotate`. When no directive
/// is usable the source is returned as is.
pub fn build_page_sequence(source: &Document, directives: &[PageDirective]) -> Result<Document> {
    let mut doc = source.clone();
    let source_pages: Vec<ObjectId> = doc.get_pages().into_values().collect();

    let plan = plan_sequence(source_pages.len(), directives);
    if plan.is_empty() {
        log::warn!("No usable page directives, keeping source document");
        return Ok(doc);
    }

    let reference = source_pages
        .first()
        .map(|&id| page_box(&doc, id))
        .unwrap_or_else(PageBox::letter);

    let catalog_id = doc.trailer.get(b"Root")?.as_reference()?;
    let pages_id = doc.get_dictionary(catalog_id)?.get(b"Pages")?.as_reference()?;

    let mut kids = Vec::with_capacity(plan.len());
    for directive in &plan {
        let page_id = match *directive {
            PageDirective::Original {
                source_index,
                rotation,
            } => copy_page(&mut doc, source_pages[source_index], pages_id, rotation)?,
            PageDirective::Blank { rotation } => {
                create_blank_page(&mut doc, &reference, pages_id, rotation)
            }
        };
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    let pages_dict = doc.get_dictionary_mut(pages_id)?;
    pages_dict.set("Kids", Object::Array(kids));
    pages_dict.set("Count", Object::Integer(count));
    // every page now carries its own copy
    for key in INHERITABLE_KEYS {
        pages_dict.remove(key);
    }

    doc.prune_objects();
    log::info!(
        "Built {} pages from {} source pages",
        count,
        source_pages.len()
    );
    Ok(doc)
}

/// Add a new page object equivalent to `page_id`, rotated by `rotation`.
fn copy_page(
    doc: &mut Document,
    page_id: ObjectId,
    parent_id: ObjectId,
    rotation: Rotation,
) -> Result<ObjectId> {
    let mut page = doc.get_dictionary(page_id)?.clone();
    for key in INHERITABLE_KEYS {
        if !page.has(key) {
            if let Some(value) = inherited_attribute(doc, page_id, key) {
                page.set(key, value);
            }
        }
    }

    let current = page.get(b"Rotate").and_then(Object::as_i64).unwrap_or(0);
    set_rotation(&mut page, current + rotation.degrees());
    page.set("Parent", Object::Reference(parent_id));

    Ok(doc.add_object(page))
}

/// Create a blank page with the given box
fn create_blank_page(
    doc: &mut Document,
    page_box: &PageBox,
    parent_id: ObjectId,
    rotation: Rotation,
) -> ObjectId {
    let content_id = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));

    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_id));
    page_dict.set("MediaBox", Object::Array(page_box.to_array()));
    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(Dictionary::new()));
    set_rotation(&mut page_dict, rotation.degrees());

    doc.add_object(page_dict)
}

/// Always written, so the page never falls back to a `/Rotate` on the tree.
fn set_rotation(page: &mut Dictionary, degrees: i64) {
    page.set("Rotate", Object::Integer(degrees.rem_euclid(360)));
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Wire form: `{"type": "original", "sourceIndex": 0, "rotation": 90}`
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct DirectiveRepr {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source_index: Option<usize>,
        #[serde(default)]
        rotation: i64,
    }

    impl Serialize for PageDirective {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            let repr = match *self {
                PageDirective::Original {
                    source_index,
                    rotation,
                } => DirectiveRepr {
                    kind: "original".to_string(),
                    source_index: Some(source_index),
                    rotation: rotation.degrees(),
                },
                PageDirective::Blank { rotation } => DirectiveRepr {
                    kind: "blank".to_string(),
                    source_index: None,
                    rotation: rotation.degrees(),
                },
            };
            repr.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for PageDirective {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let repr = DirectiveRepr::deserialize(deserializer)?;
            let rotation = Rotation::from_degrees(repr.rotation).unwrap_or_else(|| {
                log::warn!("Ignoring rotation {} (not a quarter turn)", repr.rotation);
                Rotation::None
            });

            match repr.kind.as_str() {
                "original" => {
                    let source_index = repr
                        .source_index
                        .ok_or_else(|| serde::de::Error::missing_field("sourceIndex"))?;
                    Ok(PageDirective::Original {
                        source_index,
                        rotation,
                    })
                }
                "blank" => Ok(PageDirective::Blank { rotation }),
                other => Err(serde::de::Error::unknown_variant(
                    other,
                    &["original", "blank"],
                )),
            }
        }
    }
}
