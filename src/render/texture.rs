//! Texture upload policy shared by the logo, movie and font paths.

use crate::foundation::core::IRect;
use crate::foundation::error::BootResult;
use crate::render::decode::DecodedImage;
use crate::render::sink::{FrameSink, TextureFilter, TextureId};

/// A texture holding an image of known size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Texture {
    /// Sink handle.
    pub id: TextureId,
    /// Image width (not the padded storage width).
    pub width: u32,
    /// Image height (not the padded storage height).
    pub height: u32,
}

/// Storage size for an image: each dimension rounded up to a power of two.
pub fn storage_size(width: u32, height: u32) -> (u32, u32) {
    (width.max(1).next_power_of_two(), height.max(1).next_power_of_two())
}

/// Create a texture and upload `image` into it.
pub fn upload_new(
    sink: &mut dyn FrameSink,
    image: &DecodedImage,
    filter: TextureFilter,
) -> BootResult<Texture> {
    let id = sink.create_texture()?;
    sink.set_filter(id, filter);
    if let Err(e) = upload_into(sink, id, image) {
        sink.delete_texture(id);
        return Err(e);
    }
    Ok(Texture {
        id,
        width: image.width,
        height: image.height,
    })
}

/// Upload `image` into an existing texture, replacing its storage.
///
/// Non-power-of-two images get power-of-two storage and a sub-image copy; the crop rect always
/// covers exactly the image so padding is never sampled.
pub fn upload_into(sink: &mut dyn FrameSink, id: TextureId, image: &DecodedImage) -> BootResult<()> {
    let (tw, th) = storage_size(image.width, image.height);
    if tw != image.width || th != image.height {
        sink.tex_image(id, tw, th, image.format, None)?;
        sink.tex_sub_image(
            id,
            0,
            0,
            image.width,
            image.height,
            image.format,
            &image.pixels,
        )?;
    } else {
        sink.tex_image(id, tw, th, image.format, Some(&image.pixels))?;
    }
    sink.set_crop_rect(
        id,
        IRect::new(0, 0, image.width as i32, image.height as i32),
    );
    Ok(())
}
