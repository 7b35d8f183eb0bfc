use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StampError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Document has no pages")]
    NoPages,
}

pub type Result<T> = std::result::Result<T, StampError>;

/// Quarter-turn page rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    pub fn degrees(self) -> i64 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    /// Map any multiple of 90 (negative values included) onto a quarter turn.
    /// Returns `None` for angles that are not multiples of 90.
    pub fn from_degrees(degrees: i64) -> Option<Self> {
        if degrees % 90 != 0 {
            return None;
        }
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::None),
            90 => Some(Rotation::Clockwise90),
            180 => Some(Rotation::Clockwise180),
            _ => Some(Rotation::Clockwise270),
        }
    }
}

/// Draw order of a stamp relative to the original page content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layer {
    /// Stamp drawn on top of the page content
    #[default]
    Over,
    /// Stamp drawn first, page content re-drawn on top of it
    Under,
}

impl FromStr for Layer {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "over" => Ok(Layer::Over),
            "under" => Ok(Layer::Under),
            other => Err(StampError::Config(format!("Unknown layer: {other}"))),
        }
    }
}

/// Page layout used when resolving left/right anchors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageMode {
    #[default]
    Single,
    /// Two-up spreads; left/right anchors mirror on right-hand sheets
    Facing,
}

impl FromStr for PageMode {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(PageMode::Single),
            "facing" => Ok(PageMode::Facing),
            other => Err(StampError::Config(format!("Unknown page mode: {other}"))),
        }
    }
}

/// Font family of the stamped text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
    Mono,
}

impl FontFamily {
    /// Unrecognized names resolve to `Sans`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "serif" | "times" | "times-roman" => FontFamily::Serif,
            "mono" | "monospace" | "courier" => FontFamily::Mono,
            _ => FontFamily::Sans,
        }
    }
}

/// RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const GRAY: Rgb = Rgb::new(128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);

        match hex.len() {
            3 => {
                let mut chans = hex.chars().map(|c| channel(&format!("{c}{c}")));
                Some(Self::new(chans.next()??, chans.next()??, chans.next()??))
            }
            6 if hex.is_ascii() => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => None,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(f, "#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }
}

/// Visual style of a text stamp
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StampStyle {
    pub font_family: FontFamily,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub size_pt: f32,
    pub color: Rgb,
    /// `0.0` transparent, `1.0` opaque
    pub opacity: f32,
    pub rotation_degrees: f32,
}

impl Default for StampStyle {
    fn default() -> Self {
        Self {
            font_family: FontFamily::Sans,
            bold: false,
            italic: false,
            underline: false,
            size_pt: 12.0,
            color: Rgb::BLACK,
            opacity: 1.0,
            rotation_degrees: 0.0,
        }
    }
}

impl StampStyle {
    pub fn is_rotated(&self) -> bool {
        self.rotation_degrees.rem_euclid(360.0).abs() > f32::EPSILON
    }
}

/// Width and height in points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A point in page space (origin bottom-left, y up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Which pages an operation touched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StampReport {
    /// 1-based page numbers, ascending
    pub stamped_pages: Vec<u32>,
}
