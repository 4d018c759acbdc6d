//! Signature pad value types.

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Smallest CSS width the pad will lay itself out at.
pub const MIN_CSS_WIDTH: u32 = 300;

/// Smallest CSS height the pad will lay itself out at.
pub const MIN_CSS_HEIGHT: u32 = 150;

/// Displayed size of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
    /// Device pixels per CSS pixel, never below 1
    pub pixel_ratio: f32,
}

impl SurfaceSize {
    /// Build a surface size from measured layout values.
    ///
    /// Dimensions are floored and clamped to the pad minimums; a missing or
    /// sub-unity pixel ratio is treated as 1.
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        let ratio = if pixel_ratio.is_finite() && pixel_ratio > 1.0 {
            pixel_ratio
        } else {
            1.0
        };

        Self {
            width: clamp_dimension(width, MIN_CSS_WIDTH),
            height: clamp_dimension(height, MIN_CSS_HEIGHT),
            pixel_ratio: ratio,
        }
    }

    /// Raster width in device pixels.
    pub fn device_width(&self) -> u32 {
        (self.width as f32 * self.pixel_ratio).floor() as u32
    }

    /// Raster height in device pixels.
    pub fn device_height(&self) -> u32 {
        (self.height as f32 * self.pixel_ratio).floor() as u32
    }
}

fn clamp_dimension(value: f32, min: u32) -> u32 {
    if value.is_finite() && value > min as f32 {
        value.floor() as u32
    } else {
        min
    }
}

/// A contact point in CSS pixels, relative to the surface's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Input from any pointer source.
///
/// Mouse down, touch start and pen down map to `Begin`; mouse move and touch
/// move map to `Move`; mouse up, mouse leave and touch end map to `End`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PadInput {
    Begin(Point),
    Move(Point),
    End,
}

/// Whether the pad used an input event.
///
/// `Consumed` tells the host to suppress default scrolling and gesture
/// handling for the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Consumed,
    Ignored,
}

/// Drawing state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PadState {
    #[default]
    Idle,
    Drawing {
        /// End of the path drawn so far
        last: Point,
    },
}

/// A PNG snapshot of the pad contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl Snapshot {
    pub(crate) fn new(png: Vec<u8>, width: u32, height: u32) -> Self {
        Self { png, width, height }
    }

    /// Encoded PNG bytes.
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn into_png(self) -> Vec<u8> {
        self.png
    }

    /// Embedded-image string suitable for an image source or form field.
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}
