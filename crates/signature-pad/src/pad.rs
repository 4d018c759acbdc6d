//! Raster-backed signature pad.

use crate::error::{PadError, PadResult};
use crate::types::{InputOutcome, PadInput, PadState, Point, Snapshot, SurfaceSize};
use tiny_skia::{
    Color, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    Transform,
};
use tracing::{debug, error};

/// Stroke width in CSS pixels.
pub const STROKE_WIDTH: f32 = 2.0;

/// Builder for [`SignaturePad`].
#[derive(Debug, Default)]
pub struct SignaturePadBuilder {
    surface: Option<SurfaceSize>,
}

impl SignaturePadBuilder {
    /// Attach the surface the pad draws on.
    pub fn surface(mut self, size: SurfaceSize) -> Self {
        self.surface = Some(size);
        self
    }

    /// Build the pad. The raster starts opaque white.
    pub fn build(self) -> PadResult<SignaturePad> {
        let size = self.surface.ok_or_else(|| {
            error!("Signature pad set up without a drawing surface");
            PadError::MissingSurface
        })?;

        let pixmap = blank_pixmap(size)?;
        debug!(
            width = size.width,
            height = size.height,
            ratio = size.pixel_ratio,
            "Signature pad initialized"
        );

        Ok(SignaturePad {
            size,
            pixmap,
            state: PadState::Idle,
            visible: false,
        })
    }
}

/// Freehand signature pad.
pub struct SignaturePad {
    size: SurfaceSize,
    pixmap: Pixmap,
    state: PadState,
    visible: bool,
}

impl SignaturePad {
    pub fn builder() -> SignaturePadBuilder {
        SignaturePadBuilder::default()
    }

    /// Current surface size.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Raster dimensions in device pixels.
    pub fn device_size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    pub fn state(&self) -> PadState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Feed one input event through the state machine.
    pub fn handle(&mut self, input: PadInput) -> InputOutcome {
        match (input, self.state) {
            (PadInput::Begin(point), _) => {
                self.state = PadState::Drawing { last: point };
                InputOutcome::Consumed
            }
            (PadInput::Move(point), PadState::Drawing { last }) => {
                self.stroke_segment(last, point);
                self.state = PadState::Drawing { last: point };
                InputOutcome::Consumed
            }
            (PadInput::Move(_), PadState::Idle) => InputOutcome::Ignored,
            (PadInput::End, _) => {
                self.state = PadState::Idle;
                InputOutcome::Consumed
            }
        }
    }

    fn stroke_segment(&mut self, from: Point, to: Point) {
        let mut builder = PathBuilder::new();
        builder.move_to(from.x, from.y);
        builder.line_to(to.x, to.y);
        let Some(path) = builder.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(Color::BLACK);
        paint.anti_alias = true;

        let stroke = Stroke {
            width: STROKE_WIDTH,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        let ratio = self.size.pixel_ratio;
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::from_scale(ratio, ratio), None);
    }

    /// Show the pad at the given size, rescaling any existing drawing.
    pub fn show(&mut self, size: SurfaceSize) -> PadResult<()> {
        self.visible = true;
        self.resize(size)
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// React to a window resize or orientation change.
    ///
    /// Only a visible pad resizes. Returns whether the raster was rebuilt.
    pub fn viewport_changed(&mut self, size: SurfaceSize) -> PadResult<bool> {
        if !self.visible {
            return Ok(false);
        }
        self.resize(size)?;
        Ok(true)
    }

    /// Rebuild the raster at a new size, redrawing the old contents scaled
    /// to fill it.
    pub fn resize(&mut self, size: SurfaceSize) -> PadResult<()> {
        let previous = std::mem::replace(&mut self.pixmap, blank_pixmap(size)?);

        let scale_x = self.pixmap.width() as f32 / previous.width() as f32;
        let scale_y = self.pixmap.height() as f32 / previous.height() as f32;
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap.draw_pixmap(
            0,
            0,
            previous.as_ref(),
            &paint,
            Transform::from_scale(scale_x, scale_y),
            None,
        );

        debug!(
            from_width = previous.width(),
            from_height = previous.height(),
            to_width = self.pixmap.width(),
            to_height = self.pixmap.height(),
            "Signature pad resized"
        );
        self.size = size;
        Ok(())
    }

    /// Repaint the whole raster white and drop any active path.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::WHITE);
        self.state = PadState::Idle;
    }

    /// Take a PNG snapshot of the current contents.
    pub fn accept(&self) -> PadResult<Snapshot> {
        let png = self
            .pixmap
            .encode_png()
            .map_err(|e| PadError::Encode(e.to_string()))?;
        Ok(Snapshot::new(png, self.pixmap.width(), self.pixmap.height()))
    }

    /// RGBA value of a device pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// True when nothing but background is on the raster.
    pub fn is_blank(&self) -> bool {
        self.pixmap
            .pixels()
            .iter()
            .all(|p| p.red() == 255 && p.green() == 255 && p.blue() == 255 && p.alpha() == 255)
    }
}

fn blank_pixmap(size: SurfaceSize) -> PadResult<Pixmap> {
    let (width, height) = (size.device_width(), size.device_height());
    let mut pixmap = Pixmap::new(width, height).ok_or(PadError::Allocation { width, height })?;
    pixmap.fill(Color::WHITE);
    Ok(pixmap)
}
