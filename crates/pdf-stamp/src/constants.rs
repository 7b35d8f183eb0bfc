//! Shared constants for page stamping
//!
//! This module centralizes magic numbers used by anchor resolution,
//! option defaults and page synthesis.

// =============================================================================
// Default Page Dimensions
// =============================================================================

/// Default page width in points (US Letter: 8.5" × 11")
pub const DEFAULT_PAGE_WIDTH_PT: f32 = 612.0;

/// Default page height in points (US Letter)
pub const DEFAULT_PAGE_HEIGHT_PT: f32 = 792.0;

/// Default page dimensions as tuple (width, height)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (DEFAULT_PAGE_WIDTH_PT, DEFAULT_PAGE_HEIGHT_PT);

// =============================================================================
// Watermark Geometry
// =============================================================================

/// Margin as a fraction of page width/height for upright watermarks
pub const WATERMARK_MARGIN_RATIO: f32 = 0.09;

/// Wider margin so rotated text stays inside the page
pub const WATERMARK_ROTATED_MARGIN_RATIO: f32 = 0.13;

/// Largest image stamp as a fraction of page width/height
pub const WATERMARK_IMAGE_MAX_RATIO: f32 = 0.45;

/// Largest image stamp when rotated
pub const WATERMARK_IMAGE_ROTATED_MAX_RATIO: f32 = 0.36;

// =============================================================================
// Text Metrics
// =============================================================================

/// Underline offset below the baseline as a fraction of font size
pub const UNDERLINE_OFFSET_RATIO: f32 = 0.1;

/// Underline offset for bold text
pub const UNDERLINE_BOLD_OFFSET_RATIO: f32 = 0.13;

/// Underline stroke width as a fraction of font size
pub const UNDERLINE_WIDTH_RATIO: f32 = 0.05;

/// Underline stroke width for bold text
pub const UNDERLINE_BOLD_WIDTH_RATIO: f32 = 0.08;

// =============================================================================
// Option Ranges
// =============================================================================

/// Page number font size bounds (points)
pub const PAGE_NUMBER_FONT_SIZE_RANGE: (f32, f32) = (6.0, 48.0);

/// Page number margin bounds (points)
pub const PAGE_NUMBER_MARGIN_RANGE: (f32, f32) = (4.0, 200.0);

/// Watermark font size bounds (points)
pub const WATERMARK_FONT_SIZE_RANGE: (f32, f32) = (8.0, 96.0);
