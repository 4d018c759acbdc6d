//! Freehand signature capture.
//!
//! A [`SignaturePad`] owns an opaque raster sized to the displayed surface
//! times its device pixel ratio. Hosts feed it [`PadInput`] events from any
//! pointer source (mouse, touch, pen) and call [`SignaturePad::accept`] to
//! obtain a PNG [`Snapshot`] for submission.

mod error;
mod pad;
mod types;

pub use error::{PadError, PadResult};
pub use pad::{SignaturePad, SignaturePadBuilder};
pub use types::*;
