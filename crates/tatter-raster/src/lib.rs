//! Tatter Raster - drawing surfaces
//!
//! The destruction engines draw through the [`Surface`] trait, which mirrors
//! the subset of a 2D canvas they need: a state stack with affine transforms,
//! global alpha, the composite operations `source-over`, `source-atop`,
//! `destination-out` and `lighter`, polygon clipping, and off-screen layers.
//!
//! Two implementations ship with the crate:
//! - [`Canvas`] - a software rasterizer over premultiplied RGBA, with PNG export
//! - [`RecordingSurface`] - logs every command for headless tests

mod canvas;
mod composite;
mod recording;
mod surface;
mod texture;

pub use canvas::Canvas;
pub use composite::CompositeOp;
pub use recording::{DrawCommand, PaintState, RecordingSurface};
pub use surface::{GradientStop, RadialGradient, Surface};
pub use texture::{RasterImage, Rgba};
