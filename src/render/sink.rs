use crate::foundation::core::{IRect, Size};
use crate::foundation::error::BootResult;

/// Opaque handle to a texture owned by a [`FrameSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Texel layouts a sink must accept for uploads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// 8-bit alpha only.
    Alpha8,
    /// 16-bit RGBA, four bits per channel, packed native-endian.
    Rgba4444,
    /// 32-bit RGBA, one byte per channel.
    Rgba8888,
    /// 16-bit RGB, 5-6-5 bits, packed native-endian.
    Rgb565,
}

impl PixelFormat {
    /// Bytes per texel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Alpha8 => 1,
            Self::Rgba4444 | Self::Rgb565 => 2,
            Self::Rgba8888 => 4,
        }
    }

    /// Expected buffer length for a `width x height` image.
    pub fn buffer_len(self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.bytes_per_pixel()
    }
}

/// Texture sampling filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFilter {
    /// Nearest texel.
    Nearest,
    /// Bilinear. Sinks without filtering support may treat this as nearest.
    Linear,
}

/// GPU-facing drawing surface, the engine's only output.
///
/// Coordinates are top-left origin surface pixels. Texture draws sample the texture's crop rect
/// and stretch it over the destination; repeated wrapping applies outside the texture.
/// State set here (scissor, blend, crop) persists until changed, as on a GL context.
pub trait FrameSink: Send {
    /// Surface dimensions.
    fn size(&self) -> Size;

    /// Allocate a texture name.
    fn create_texture(&mut self) -> BootResult<TextureId>;

    /// Define texture storage. `None` allocates zeroed storage for a later sub-image upload.
    fn tex_image(
        &mut self,
        id: TextureId,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Option<&[u8]>,
    ) -> BootResult<()>;

    /// Replace a sub-rectangle of previously defined storage.
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image(
        &mut self,
        id: TextureId,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: &[u8],
    ) -> BootResult<()>;

    /// Region of the texture sampled by [`FrameSink::draw_texture`].
    fn set_crop_rect(&mut self, id: TextureId, crop: IRect);

    /// Sampling filter for minification and magnification.
    fn set_filter(&mut self, id: TextureId, filter: TextureFilter);

    /// Release a texture. Unknown ids are ignored.
    fn delete_texture(&mut self, id: TextureId);

    /// Restrict clears and draws to `rect`; `None` disables the scissor test.
    fn set_scissor(&mut self, rect: Option<IRect>);

    /// Toggle source-alpha blending for texture draws.
    fn set_blend(&mut self, enabled: bool);

    /// Clear the back buffer (inside the scissor, if enabled) to black.
    fn clear(&mut self);

    /// Draw the texture's crop rect into `dst`.
    fn draw_texture(&mut self, id: TextureId, dst: IRect);

    /// Present the back buffer. Failure is fatal to the run.
    fn swap_buffers(&mut self) -> BootResult<()>;

    /// Destroy context and surface. Called once after the final clear.
    fn release(&mut self);
}
