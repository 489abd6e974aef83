//! Rendering capability.
//!
//! The core never touches pixels directly: it pushes a background color
//! and a stream of 8×8 tile blits into a [`RenderingBackend`], then flushes
//! with `draw()`. Pixel bytes are NES palette indices; bit 7 is set on
//! nonzero entries as an opaqueness marker so a backend can composite
//! layers without knowing palette semantics.

/// Layer a tile is blitted to, back to front:
/// background, sprites behind the background, sprites in front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    Behind,
    Front,
}

/// Consumer of rendered frames.
pub trait RenderingBackend {
    /// Set the frame's backdrop color (a NES palette index).
    fn set_background(&mut self, color: u8);

    /// Blit one 8×8 tile at screen coordinates `(x, y)`.
    ///
    /// `pixels` is 64 bytes in row-major order. Zero means transparent;
    /// nonzero entries are palette indices with bit 7 set.
    fn set_symbol(&mut self, layer: Layer, x: i32, y: i32, pixels: &[u8; 64]);

    /// Present the completed frame.
    fn draw(&mut self);
}

/// Backend that discards everything, for headless operation.
#[derive(Debug, Default)]
pub struct NullBackend;

impl RenderingBackend for NullBackend {
    fn set_background(&mut self, _color: u8) {}

    fn set_symbol(&mut self, _layer: Layer, _x: i32, _y: i32, _pixels: &[u8; 64]) {}

    fn draw(&mut self) {}
}
