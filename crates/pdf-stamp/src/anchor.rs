//! Anchor resolution for stamped blocks
//!
//! A stamp is a rectangular block (text run or image) placed on a 3×3 grid
//! of anchor cells. This module computes the lower-left draw origin of the
//! block in page space, including:
//! - Left/right mirroring for facing-page (two-up) layouts
//! - Proportional margins and edge clamping for watermarks
//! - Size capping for image watermarks
//!
//! Everything here is pure geometry over plain values.

use crate::constants::{
    WATERMARK_IMAGE_MAX_RATIO, WATERMARK_IMAGE_ROTATED_MAX_RATIO, WATERMARK_MARGIN_RATIO,
    WATERMARK_ROTATED_MARGIN_RATIO,
};
use crate::types::{PageMode, Point, Size, StampError};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Position Keys
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAnchor {
    Top,
    Mid,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
    Left,
    Center,
    Right,
}

impl HorizontalAnchor {
    fn mirrored(self) -> Self {
        match self {
            HorizontalAnchor::Left => HorizontalAnchor::Right,
            HorizontalAnchor::Right => HorizontalAnchor::Left,
            HorizontalAnchor::Center => HorizontalAnchor::Center,
        }
    }
}

/// One of the nine grid cells a stamp can be anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionKey {
    pub vertical: VerticalAnchor,
    pub horizontal: HorizontalAnchor,
}

impl PositionKey {
    pub const BOTTOM_CENTER: PositionKey =
        PositionKey::new(VerticalAnchor::Bottom, HorizontalAnchor::Center);
    pub const MID_CENTER: PositionKey =
        PositionKey::new(VerticalAnchor::Mid, HorizontalAnchor::Center);

    pub const fn new(vertical: VerticalAnchor, horizontal: HorizontalAnchor) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// Page numbers may only sit in the top or bottom row.
    pub fn allowed_for_page_numbers(self) -> bool {
        self.vertical != VerticalAnchor::Mid
    }

    pub fn is_mid_center(self) -> bool {
        self == Self::MID_CENTER
    }
}

impl FromStr for PositionKey {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let (v, h) = key
            .split_once('-')
            .ok_or_else(|| StampError::Config(format!("Invalid position: {s}")))?;

        let vertical = match v {
            "top" => VerticalAnchor::Top,
            "mid" | "middle" => VerticalAnchor::Mid,
            "bottom" => VerticalAnchor::Bottom,
            _ => return Err(StampError::Config(format!("Invalid position: {s}"))),
        };
        let horizontal = match h {
            "left" => HorizontalAnchor::Left,
            "center" => HorizontalAnchor::Center,
            "right" => HorizontalAnchor::Right,
            _ => return Err(StampError::Config(format!("Invalid position: {s}"))),
        };

        Ok(Self::new(vertical, horizontal))
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = match self.vertical {
            VerticalAnchor::Top => "top",
            VerticalAnchor::Mid => "mid",
            VerticalAnchor::Bottom => "bottom",
        };
        let h = match self.horizontal {
            HorizontalAnchor::Left => "left",
            HorizontalAnchor::Center => "center",
            HorizontalAnchor::Right => "right",
        };
        write!(f, "{v}-{h}")
    }
}

// =============================================================================
// Facing Pages
// =============================================================================

/// Side of a two-page spread a physical page lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetRole {
    Left,
    Right,
}

/// Facing-page information for one physical page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacingContext {
    pub page_mode: PageMode,
    pub cover_is_first_page: bool,
    /// 1-based physical page number
    pub page_number: u32,
}

impl FacingContext {
    /// Spread side of this page, or `None` in single mode and for the cover.
    ///
    /// With a cover, spreads start at page 2 and even pages are left sheets.
    /// Without a cover, spreads start at page 1 and odd pages are left sheets.
    pub fn sheet_role(&self) -> Option<SheetRole> {
        if self.page_mode != PageMode::Facing {
            return None;
        }
        if self.cover_is_first_page && self.page_number == 1 {
            return None;
        }

        let even = self.page_number % 2 == 0;
        let left = if self.cover_is_first_page { even } else { !even };
        Some(if left { SheetRole::Left } else { SheetRole::Right })
    }

    /// Apply spread mirroring to a horizontal anchor.
    pub fn horizontal_anchor(&self, anchor: HorizontalAnchor) -> HorizontalAnchor {
        match self.sheet_role() {
            Some(SheetRole::Right) => anchor.mirrored(),
            _ => anchor,
        }
    }
}

// =============================================================================
// Grid Placement
// =============================================================================

fn grid_x(page_width: f32, anchor: HorizontalAnchor, margin: f32, block_width: f32) -> f32 {
    match anchor {
        HorizontalAnchor::Left => margin,
        HorizontalAnchor::Center => (page_width - block_width) / 2.0,
        HorizontalAnchor::Right => page_width - margin - block_width,
    }
}

fn grid_y(page_height: f32, anchor: VerticalAnchor, margin: f32, block_height: f32) -> f32 {
    match anchor {
        VerticalAnchor::Top => page_height - margin - block_height,
        VerticalAnchor::Mid => (page_height - block_height) / 2.0,
        VerticalAnchor::Bottom => margin,
    }
}

/// Resolve the lower-left origin of a block anchored at `key`.
///
/// When a facing context is supplied, left/right anchors mirror on
/// right-hand sheets of a spread. Center and vertical placement never
/// mirror.
pub fn resolve_anchor(
    page: Size,
    key: PositionKey,
    margin: f32,
    block: Size,
    facing: Option<&FacingContext>,
) -> Point {
    let horizontal = match facing {
        Some(ctx) => ctx.horizontal_anchor(key.horizontal),
        None => key.horizontal,
    };

    Point::new(
        grid_x(page.width, horizontal, margin, block.width),
        grid_y(page.height, key.vertical, margin, block.height),
    )
}

// =============================================================================
// Watermark Placement
// =============================================================================

/// Horizontal and vertical watermark margins for a page.
pub fn watermark_margins(page: Size, rotated: bool) -> (f32, f32) {
    let ratio = if rotated {
        WATERMARK_ROTATED_MARGIN_RATIO
    } else {
        WATERMARK_MARGIN_RATIO
    };
    (page.width * ratio, page.height * ratio)
}

/// Resolve the origin of a watermark block.
///
/// Margins are proportional to the page. The block is clamped so it stays
/// inside the margins on every side, except for `mid-center` which is
/// always the exact page center. A block larger than the margin box ends
/// up past the near margin; that is accepted.
pub fn resolve_watermark_anchor(page: Size, key: PositionKey, block: Size, rotated: bool) -> Point {
    if key.is_mid_center() {
        return Point::new(
            (page.width - block.width) / 2.0,
            (page.height - block.height) / 2.0,
        );
    }

    let (mx, my) = watermark_margins(page, rotated);
    let x = grid_x(page.width, key.horizontal, mx, block.width);
    let y = grid_y(page.height, key.vertical, my, block.height);

    Point::new(
        x.max(mx).min(page.width - mx - block.width),
        y.max(my).min(page.height - my - block.height),
    )
}

/// Scale an image down (never up) to the watermark size cap.
pub fn cap_image_size(page: Size, image: Size, rotated: bool) -> Size {
    if image.width <= 0.0 || image.height <= 0.0 {
        return image;
    }

    let ratio = if rotated {
        WATERMARK_IMAGE_ROTATED_MAX_RATIO
    } else {
        WATERMARK_IMAGE_MAX_RATIO
    };
    let scale = (page.width * ratio / image.width)
        .min(page.height * ratio / image.height)
        .min(1.0);

    Size::new(image.width * scale, image.height * scale)
}
