//! Single-line text stamps

use crate::constants::{
    UNDERLINE_BOLD_OFFSET_RATIO, UNDERLINE_BOLD_WIDTH_RATIO, UNDERLINE_OFFSET_RATIO,
    UNDERLINE_WIDTH_RATIO,
};
use crate::types::{Point, Rgb, Size, StampStyle};
use lopdf::ObjectId;

use super::canvas::{Canvas, Drawable};
use super::fonts::{StandardFont, encode_win_ansi, pdf_literal};

/// A measured line of text ready to be placed.
#[derive(Debug, Clone)]
pub struct TextStamp {
    encoded: Vec<u8>,
    font_id: ObjectId,
    style: StampStyle,
    width: f32,
    origin: Point,
    opacity_state: Option<ObjectId>,
}

impl TextStamp {
    /// Measure `text` with the font selected by `style`.
    pub fn new(text: &str, font: StandardFont, font_id: ObjectId, style: &StampStyle) -> Self {
        Self {
            encoded: encode_win_ansi(text),
            font_id,
            width: font.text_width(text, style.size_pt),
            style: style.clone(),
            origin: Point::new(0.0, 0.0),
            opacity_state: None,
        }
    }

    /// Block occupied by the text: measured width × font size.
    pub fn block(&self) -> Size {
        Size::new(self.width, self.style.size_pt)
    }

    pub fn at(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_opacity_state(mut self, state: Option<ObjectId>) -> Self {
        self.opacity_state = state;
        self
    }
}

impl Drawable for TextStamp {
    fn draw_onto(&self, canvas: &mut Canvas) {
        let font_name = canvas.font(self.font_id);
        let mut ops = String::from("q\n");

        if let Some(gs) = self.opacity_state {
            ops.push_str(&format!("/{} gs\n", canvas.graphics_state(gs)));
        }
        ops.push_str(&color_ops(self.style.color));
        ops.push_str(&placement_matrix(
            self.origin,
            self.block(),
            self.style.rotation_degrees,
        ));

        ops.push_str(&format!(
            "BT /{} {} Tf 0 0 Td {} Tj ET\n",
            font_name,
            self.style.size_pt,
            pdf_literal(&self.encoded)
        ));

        if self.style.underline {
            let (offset, line_width) = if self.style.bold {
                (UNDERLINE_BOLD_OFFSET_RATIO, UNDERLINE_BOLD_WIDTH_RATIO)
            } else {
                (UNDERLINE_OFFSET_RATIO, UNDERLINE_WIDTH_RATIO)
            };
            let y = -offset * self.style.size_pt;
            ops.push_str(&format!(
                "{} w 0 {} m {} {} l S\n",
                line_width * self.style.size_pt,
                y,
                self.width,
                y
            ));
        }

        ops.push_str("Q\n");
        canvas.push(&ops);
    }
}

/// Fill and stroke color operators
pub(crate) fn color_ops(color: Rgb) -> String {
    format!(
        "{r} {g} {b} rg {r} {g} {b} RG\n",
        r = color.r,
        g = color.g,
        b = color.b
    )
}

/// `cm` operators moving the coordinate origin to the block's lower-left
/// corner. A non-zero rotation (counter-clockwise, degrees) turns the block
/// around its own center.
pub(crate) fn placement_matrix(origin: Point, block: Size, rotation_degrees: f32) -> String {
    if rotation_degrees.rem_euclid(360.0) == 0.0 {
        return format!("1 0 0 1 {} {} cm\n", origin.x, origin.y);
    }

    let (sin, cos) = rotation_degrees.to_radians().sin_cos();
    let cx = origin.x + block.width / 2.0;
    let cy = origin.y + block.height / 2.0;
    format!(
        "1 0 0 1 {} {} cm\n{} {} {} {} 0 0 cm\n1 0 0 1 {} {} cm\n",
        cx,
        cy,
        cos,
        sin,
        -sin,
        cos,
        -block.width / 2.0,
        -block.height / 2.0
    )
}
