//! Option resolution
//!
//! Requests arrive as loosely typed option bags (JSON objects whose values
//! may be strings, numbers or booleans, or missing entirely). Each feature
//! resolves its bag exactly once into a fully defaulted, typed options
//! struct. Invalid values never fail: they fall back to the documented
//! default and are logged.

use crate::anchor::PositionKey;
use crate::constants::{
    PAGE_NUMBER_FONT_SIZE_RANGE, PAGE_NUMBER_MARGIN_RANGE, WATERMARK_FONT_SIZE_RANGE,
};
use crate::numbering::{NumberStyle, NumberTemplate};
use crate::range::Interval;
use crate::types::*;
use serde_json::{Map, Value};
use std::str::FromStr;

// =============================================================================
// Raw Option Bags
// =============================================================================

/// A loosely typed option bag keyed by camelCase names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOptions(Map<String, Value>);

impl RawOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value. Anything but an object yields an empty bag.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| StampError::Config(format!("Failed to parse options: {}", e)))?;
        Ok(Self::from_json(value))
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Overlay `other` on top of this bag.
    pub fn merge(&mut self, other: RawOptions) {
        self.0.extend(other.0);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Text value; numbers and booleans are rendered as text.
    pub fn string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Finite numeric value; numeric strings are accepted.
    pub fn number(&self, key: &str) -> Option<f64> {
        let n = match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        n.is_finite().then_some(n)
    }

    /// Boolean value; accepts `true/false`, `1/0`, `yes/no`, `on/off`.
    pub fn boolean(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|v| v != 0.0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Parse a value with `FromStr`, falling back to `default`.
    fn parsed_or<T: FromStr>(&self, key: &str, default: T) -> T {
        match self.string(key) {
            Some(text) => text.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid value {text:?} for option '{key}'");
                default
            }),
            None => default,
        }
    }

    /// Numeric value clamped into `range`, falling back to `default`.
    fn clamped_or(&self, key: &str, default: f32, range: (f32, f32)) -> f32 {
        match self.number(key) {
            Some(n) => (n as f32).clamp(range.0, range.1),
            None => default,
        }
    }

    fn color_or(&self, key: &str, default: Rgb) -> Rgb {
        match self.string(key) {
            Some(hex) => Rgb::from_hex(&hex).unwrap_or_else(|| {
                log::warn!("Ignoring invalid color {hex:?} for option '{key}'");
                default
            }),
            None => default,
        }
    }

    fn integer(&self, key: &str) -> Option<i64> {
        self.number(key).map(|n| n.floor() as i64)
    }
}

impl From<Value> for RawOptions {
    fn from(value: Value) -> Self {
        Self::from_json(value)
    }
}

/// Text style keys shared by page numbers and watermarks.
fn resolve_text_style(raw: &RawOptions, base: StampStyle, size_range: (f32, f32)) -> StampStyle {
    StampStyle {
        font_family: raw
            .string("fontFamily")
            .map(|name| FontFamily::from_name(&name))
            .unwrap_or(base.font_family),
        bold: raw.boolean("bold").unwrap_or(base.bold),
        italic: raw.boolean("italic").unwrap_or(base.italic),
        underline: raw.boolean("underline").unwrap_or(base.underline),
        size_pt: raw.clamped_or("fontSize", base.size_pt, size_range),
        color: raw.color_or("color", base.color),
        ..base
    }
}

// =============================================================================
// Page Numbers
// =============================================================================

/// Fully resolved page numbering configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageNumberOptions {
    pub style: NumberStyle,
    pub template: NumberTemplate,
    pub page_mode: PageMode,
    pub cover_is_first_page: bool,
    /// Logical number given to the first page in scope
    pub start_at: u32,
    /// Range expression; empty selects every page
    pub range: String,
    pub position: PositionKey,
    pub margin: f32,
    pub text: StampStyle,
}

impl Default for PageNumberOptions {
    fn default() -> Self {
        Self {
            style: NumberStyle::Arabic,
            template: NumberTemplate::Number,
            page_mode: PageMode::Single,
            cover_is_first_page: false,
            start_at: 1,
            range: String::new(),
            position: PositionKey::BOTTOM_CENTER,
            margin: 36.0,
            text: StampStyle::default(),
        }
    }
}

impl PageNumberOptions {
    /// Resolve an option bag, applying defaults and clamping ranges.
    pub fn resolve(raw: &RawOptions) -> Self {
        let defaults = Self::default();

        let mut position = raw.parsed_or("position", defaults.position);
        if !position.allowed_for_page_numbers() {
            log::warn!("Position {position} is not available for page numbers, using default");
            position = defaults.position;
        }

        let start_at = raw
            .integer("startAt")
            .map(|n| n.clamp(1, u32::MAX as i64) as u32)
            .unwrap_or(defaults.start_at);

        Self {
            style: raw.parsed_or("format", defaults.style),
            template: raw.parsed_or("template", defaults.template),
            page_mode: raw.parsed_or("pageMode", defaults.page_mode),
            cover_is_first_page: raw
                .boolean("coverIsFirstPage")
                .unwrap_or(defaults.cover_is_first_page),
            start_at,
            range: raw.string("range").unwrap_or_default(),
            position,
            margin: raw.clamped_or("margin", defaults.margin, PAGE_NUMBER_MARGIN_RANGE),
            text: resolve_text_style(raw, defaults.text, PAGE_NUMBER_FONT_SIZE_RANGE),
        }
    }

    /// First page numbered when the range is empty or invalid.
    pub fn default_start(&self) -> u32 {
        if self.cover_is_first_page { 2 } else { 1 }
    }
}

// =============================================================================
// Watermarks
// =============================================================================

/// What a watermark stamps onto each page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WatermarkMode {
    #[default]
    Text,
    Image,
}

impl FromStr for WatermarkMode {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(WatermarkMode::Text),
            "image" => Ok(WatermarkMode::Image),
            other => Err(StampError::Config(format!("Unknown watermark mode: {other}"))),
        }
    }
}

/// Fully resolved watermark configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WatermarkOptions {
    pub mode: WatermarkMode,
    pub text: String,
    pub position: PositionKey,
    pub layer: Layer,
    /// First page (1-based); `None` means the first page
    pub range_from: Option<i64>,
    /// Last page (1-based); `None` means the last page
    pub range_to: Option<i64>,
    /// Font, color, opacity and rotation; font keys only apply to text mode
    pub style: StampStyle,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            mode: WatermarkMode::Text,
            text: "CONFIDENTIAL".to_string(),
            position: PositionKey::MID_CENTER,
            layer: Layer::Over,
            range_from: None,
            range_to: None,
            style: StampStyle {
                size_pt: 48.0,
                color: Rgb::GRAY,
                opacity: 0.3,
                rotation_degrees: 45.0,
                ..StampStyle::default()
            },
        }
    }
}

impl WatermarkOptions {
    /// Resolve an option bag, applying defaults and clamping ranges.
    pub fn resolve(raw: &RawOptions) -> Self {
        let defaults = Self::default();

        let text = raw
            .string("text")
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(defaults.text);

        let mut style = resolve_text_style(raw, defaults.style.clone(), WATERMARK_FONT_SIZE_RANGE);
        style.opacity = raw
            .number("opacity")
            .map(|pct| (pct as f32).clamp(0.0, 100.0) / 100.0)
            .unwrap_or(defaults.style.opacity);
        style.rotation_degrees = raw
            .number("rotation")
            .map(|deg| deg as f32)
            .unwrap_or(defaults.style.rotation_degrees);

        Self {
            mode: raw.parsed_or("mode", defaults.mode),
            text,
            position: raw.parsed_or("position", defaults.position),
            layer: raw.parsed_or("layer", defaults.layer),
            range_from: raw.integer("rangeFrom"),
            range_to: raw.integer("rangeTo"),
            style,
        }
    }

    /// Pages to watermark in a document of `total_pages` pages.
    pub fn scope(&self, total_pages: u32) -> Option<Interval> {
        Interval::normalized(
            self.range_from.unwrap_or(1),
            self.range_to.unwrap_or(total_pages as i64),
            total_pages,
        )
    }
}

// =============================================================================
// Split
// =============================================================================

/// How custom ranges are chosen in range mode
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RangeSelection {
    /// Explicit `(from, to)` pairs, possibly inverted or out of bounds
    Custom(Vec<(i64, i64)>),
    /// Consecutive chunks of the given size
    Fixed(i64),
}

/// How a document is split into several documents
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SplitMode {
    Range(RangeSelection),
    /// One document per page
    Each,
    /// First half and second half
    Half,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitOptions {
    pub mode: SplitMode,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            mode: SplitMode::Range(RangeSelection::Custom(Vec::new())),
        }
    }
}

impl SplitOptions {
    /// Resolve an option bag. `ranges` accepts `[[1, 3], [5, 5]]`,
    /// `[{"from": 1, "to": 3}]` or a range expression string.
    pub fn resolve(raw: &RawOptions) -> Self {
        let mode = match raw.string("mode").as_deref().map(str::trim) {
            Some("each") => SplitMode::Each,
            Some("half") => SplitMode::Half,
            Some("range") | None => {
                let fixed = raw.string("rangeMode").as_deref().map(str::trim) == Some("fixed");
                if fixed {
                    SplitMode::Range(RangeSelection::Fixed(raw.integer("chunkSize").unwrap_or(1)))
                } else {
                    SplitMode::Range(RangeSelection::Custom(raw_ranges(raw.get("ranges"))))
                }
            }
            Some(other) => {
                log::warn!("Unknown split mode {other:?}, splitting by range");
                SplitMode::Range(RangeSelection::Custom(raw_ranges(raw.get("ranges"))))
            }
        };
        Self { mode }
    }

    /// Reject values the planner cannot work with.
    pub fn validate(&self) -> Result<()> {
        if let SplitMode::Range(RangeSelection::Fixed(chunk)) = self.mode {
            if chunk <= 0 {
                return Err(StampError::Config(format!(
                    "Chunk size must be positive, got {chunk}"
                )));
            }
        }
        Ok(())
    }
}

fn raw_ranges(value: Option<&Value>) -> Vec<(i64, i64)> {
    let number = |v: &Value| match v {
        Value::Number(n) => n.as_f64().map(|f| f.floor() as i64),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Array(pair) if pair.len() == 2 => Some((number(&pair[0])?, number(&pair[1])?)),
                Value::Object(obj) => Some((number(obj.get("from")?)?, number(obj.get("to")?)?)),
                _ => None,
            })
            .collect(),
        Some(Value::String(expr)) => expr
            .split(',')
            .filter_map(|token| {
                let token = token.trim();
                match token.split_once('-') {
                    Some((a, b)) => Some((a.trim().parse().ok()?, b.trim().parse().ok()?)),
                    None => {
                        let page = token.parse().ok()?;
                        Some((page, page))
                    }
                }
            })
            .collect(),
        _ => Vec::new(),
    }
}

// =============================================================================
// Persistence
// =============================================================================

/// Load typed options from a JSON file
#[cfg(feature = "serde")]
pub async fn load_options<T: serde::de::DeserializeOwned>(
    path: impl AsRef<std::path::Path>,
) -> Result<T> {
    let bytes = tokio::fs::read(path).await?;
    let options = serde_json::from_slice(&bytes)
        .map_err(|e| StampError::Config(format!("Failed to parse config: {}", e)))?;
    Ok(options)
}

/// Save typed options to a JSON file
#[cfg(feature = "serde")]
pub async fn save_options<T: serde::Serialize>(
    options: &T,
    path: impl AsRef<std::path::Path>,
) -> Result<()> {
    let json = serde_json::to_string_pretty(options)
        .map_err(|e| StampError::Config(format!("Failed to serialize config: {}", e)))?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    // Position keys travel as their textual form, e.g. "bottom-center"
    impl Serialize for PositionKey {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&self.to_string())
        }
    }

    impl<'de> Deserialize<'de> for PositionKey {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawOptions {
        RawOptions::from_json(value)
    }

    #[test]
    fn test_lenient_accessors() {
        let bag = raw(json!({
            "a": "12.5", "b": 3, "c": "on", "d": "nope", "e": null, "f": false
        }));
        assert_eq!(bag.number("a"), Some(12.5));
        assert_eq!(bag.number("b"), Some(3.0));
        assert_eq!(bag.boolean("c"), Some(true));
        assert_eq!(bag.boolean("d"), None);
        assert_eq!(bag.number("d"), None);
        assert_eq!(bag.string("e"), None);
        assert_eq!(bag.boolean("f"), Some(false));
        assert_eq!(bag.string("b").as_deref(), Some("3"));
    }

    #[test]
    fn test_page_number_defaults() {
        let options = PageNumberOptions::resolve(&RawOptions::new());
        assert_eq!(options, PageNumberOptions::default());
        assert_eq!(options.default_start(), 1);
    }

    #[test]
    fn test_page_number_resolution() {
        let options = PageNumberOptions::resolve(&raw(json!({
            "format": "I",
            "template": "page_n_of_total",
            "pageMode": "facing",
            "coverIsFirstPage": "true",
            "startAt": "0",
            "range": "1-3",
            "position": "top-right",
            "fontSize": 100,
            "margin": 1,
            "color": "#ff0000",
            "fontFamily": "serif",
            "bold": true,
            "underline": 1
        })));

        assert_eq!(options.style, NumberStyle::RomanUpper);
        assert_eq!(options.template, NumberTemplate::PageNOfTotal);
        assert_eq!(options.page_mode, PageMode::Facing);
        assert!(options.cover_is_first_page);
        assert_eq!(options.default_start(), 2);
        assert_eq!(options.start_at, 1);
        assert_eq!(options.range, "1-3");
        assert_eq!(options.position.to_string(), "top-right");
        assert_eq!(options.text.size_pt, 48.0);
        assert_eq!(options.margin, 4.0);
        assert_eq!(options.text.color, Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(options.text.font_family, FontFamily::Serif);
        assert!(options.text.bold && options.text.underline && !options.text.italic);
    }

    #[test]
    fn test_page_number_invalid_values_fall_back() {
        let options = PageNumberOptions::resolve(&raw(json!({
            "format": "A",
            "position": "mid-center",
            "fontSize": "big",
            "color": "zzz",
            "fontFamily": "fantasy"
        })));
        assert_eq!(options.style, NumberStyle::Arabic);
        assert_eq!(options.position, PositionKey::BOTTOM_CENTER);
        assert_eq!(options.text.size_pt, 12.0);
        assert_eq!(options.text.color, Rgb::BLACK);
        assert_eq!(options.text.font_family, FontFamily::Sans);
    }

    #[test]
    fn test_watermark_resolution() {
        let options = WatermarkOptions::resolve(&raw(json!({
            "mode": "image",
            "text": "   ",
            "opacity": 150,
            "rotation": "0",
            "position": "bottom-left",
            "layer": "under",
            "rangeFrom": 9,
            "rangeTo": "3",
            "fontSize": 2
        })));

        assert_eq!(options.mode, WatermarkMode::Image);
        assert_eq!(options.text, "CONFIDENTIAL");
        assert_eq!(options.style.opacity, 1.0);
        assert_eq!(options.style.rotation_degrees, 0.0);
        assert_eq!(options.position.to_string(), "bottom-left");
        assert_eq!(options.layer, Layer::Under);
        assert_eq!(options.style.size_pt, 8.0);
        assert_eq!(options.scope(5), Some(Interval::new(3, 5)));
    }

    #[test]
    fn test_watermark_default_scope_is_whole_document() {
        let options = WatermarkOptions::resolve(&RawOptions::new());
        assert_eq!(options.scope(7), Some(Interval::new(1, 7)));
        assert_eq!(options.scope(0), None);
        assert!((options.style.opacity - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_split_resolution() {
        let each = SplitOptions::resolve(&raw(json!({"mode": "each"})));
        assert_eq!(each.mode, SplitMode::Each);

        let fixed = SplitOptions::resolve(&raw(json!({
            "mode": "range", "rangeMode": "fixed", "chunkSize": "0"
        })));
        assert_eq!(fixed.mode, SplitMode::Range(RangeSelection::Fixed(0)));
        assert!(fixed.validate().is_err());

        let custom = SplitOptions::resolve(&raw(json!({
            "ranges": [[1, 3], {"from": 7, "to": 5}, ["x", 2]]
        })));
        assert_eq!(
            custom.mode,
            SplitMode::Range(RangeSelection::Custom(vec![(1, 3), (7, 5)]))
        );
        assert!(custom.validate().is_ok());

        let text = SplitOptions::resolve(&raw(json!({"ranges": "1-2, 4, q"})));
        assert_eq!(
            text.mode,
            SplitMode::Range(RangeSelection::Custom(vec![(1, 2), (4, 4)]))
        );
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = raw(json!({"format": "1", "range": "1-2"}));
        base.merge(raw(json!({"format": "i"})));
        let options = PageNumberOptions::resolve(&base);
        assert_eq!(options.style, NumberStyle::RomanLower);
        assert_eq!(options.range, "1-2");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_position_key_serializes_as_text() {
        let json = serde_json::to_string(&PositionKey::MID_CENTER).unwrap();
        assert_eq!(json, "\"mid-center\"");
        let back: PositionKey = serde_json::from_str("\"top-left\"").unwrap();
        assert_eq!(back.to_string(), "top-left");
    }
}
