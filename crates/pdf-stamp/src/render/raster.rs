//! Raster image embedding

use crate::types::{Point, Result, Size};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::canvas::{Canvas, Drawable};
use super::text::placement_matrix;

/// An image XObject added to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub id: ObjectId,
    pub width_px: u32,
    pub height_px: u32,
}

impl EmbeddedImage {
    /// Natural size, one point per pixel.
    pub fn natural_size(&self) -> Size {
        Size::new(self.width_px as f32, self.height_px as f32)
    }
}

/// Decode PNG/JPEG bytes and add them as an RGB image XObject.
///
/// Transparency is kept through a soft mask when any pixel is not opaque.
pub fn embed_image(doc: &mut Document, bytes: &[u8]) -> Result<EmbeddedImage> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = img.dimensions();

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    for pixel in img.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }

    let mut dict = image_dict(width, height, b"DeviceRGB");
    if alpha.iter().any(|&a| a != u8::MAX) {
        let smask_id = doc.add_object(Stream::new(image_dict(width, height, b"DeviceGray"), alpha));
        dict.set("SMask", Object::Reference(smask_id));
    }

    let mut stream = Stream::new(dict, rgb);
    if let Err(e) = stream.compress() {
        log::debug!("Keeping {width}x{height} image uncompressed: {e}");
    }
    let id = doc.add_object(stream);

    log::debug!("Embedded {width}x{height} image as {id:?}");
    Ok(EmbeddedImage {
        id,
        width_px: width,
        height_px: height,
    })
}

fn image_dict(width: u32, height: u32, color_space: &[u8]) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(color_space.to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));
    dict
}

/// An embedded image placed at a given size.
#[derive(Debug, Clone, Copy)]
pub struct ImageStamp {
    pub image: EmbeddedImage,
    pub origin: Point,
    pub size: Size,
    pub rotation_degrees: f32,
    pub opacity_state: Option<ObjectId>,
}

impl Drawable for ImageStamp {
    fn draw_onto(&self, canvas: &mut Canvas) {
        let name = canvas.xobject(self.image.id);
        let mut ops = String::from("q\n");
        if let Some(gs) = self.opacity_state {
            ops.push_str(&format!("/{} gs\n", canvas.graphics_state(gs)));
        }
        ops.push_str(&placement_matrix(self.origin, self.size, self.rotation_degrees));
        ops.push_str(&format!(
            "{} 0 0 {} 0 0 cm /{} Do\nQ\n",
            self.size.width, self.size.height, name
        ));
        canvas.push(&ops);
    }
}

/// Add a constant-alpha graphics state for fills and strokes.
pub fn add_opacity_state(doc: &mut Document, opacity: f32) -> ObjectId {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"ExtGState".to_vec()));
    dict.set("ca", Object::Real(opacity));
    dict.set("CA", Object::Real(opacity));
    doc.add_object(dict)
}
