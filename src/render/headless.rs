use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use image::{Rgba, RgbaImage};

use crate::foundation::core::{IRect, Size};
use crate::foundation::error::{BootError, BootResult};
use crate::render::pixels::unpack_to_rgba8;
use crate::render::sink::{FrameSink, PixelFormat, TextureFilter, TextureId};

/// Counters describing what a [`HeadlessSink`] was asked to do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SinkStats {
    /// Presented frames.
    pub swaps: u64,
    /// Clear calls (scissored or not).
    pub clears: u64,
    /// Pixel transfers: `tex_image` with data plus `tex_sub_image`.
    pub uploads: u64,
    /// Texture names handed out.
    pub textures_created: u64,
    /// Texture names released.
    pub textures_deleted: u64,
    /// Texture draws that touched at least one pixel.
    pub draws: u64,
    /// Whether `release` was called.
    pub released: bool,
}

impl SinkStats {
    /// Textures created but not yet deleted.
    pub fn live_textures(&self) -> u64 {
        self.textures_created.saturating_sub(self.textures_deleted)
    }
}

#[derive(Debug, Default)]
struct ProbeInner {
    stats: SinkStats,
    front: Option<RgbaImage>,
}

/// Shared view of a [`HeadlessSink`] that outlives the sink being moved into an engine.
#[derive(Clone, Debug, Default)]
pub struct HeadlessProbe {
    inner: Arc<Mutex<ProbeInner>>,
}

impl HeadlessProbe {
    /// Snapshot of the counters.
    pub fn stats(&self) -> SinkStats {
        self.inner.lock().map(|i| i.stats).unwrap_or_default()
    }

    /// Copy of the most recently presented frame.
    pub fn front(&self) -> Option<RgbaImage> {
        self.inner.lock().ok().and_then(|i| i.front.clone())
    }

    fn update(&self, f: impl FnOnce(&mut ProbeInner)) {
        if let Ok(mut inner) = self.inner.lock() {
            f(&mut inner);
        }
    }
}

/// Periodic PNG dumps of presented frames.
#[derive(Clone, Debug)]
pub struct SnapshotOpts {
    /// Output directory, created on first write.
    pub dir: PathBuf,
    /// Write every `every`-th presented frame (1 = all).
    pub every: u64,
}

#[derive(Debug)]
struct SoftTexture {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    crop: IRect,
}

impl SoftTexture {
    fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }
}

/// Software [`FrameSink`] rasterising into an RGBA8 back buffer.
///
/// Sampling is nearest-neighbour regardless of the requested filter. Presented frames are opaque,
/// like an RGB565 window surface.
pub struct HeadlessSink {
    size: Size,
    back: RgbaImage,
    textures: BTreeMap<TextureId, SoftTexture>,
    next_id: u32,
    scissor: Option<IRect>,
    blend: bool,
    probe: HeadlessProbe,
    snapshots: Option<SnapshotOpts>,
    fail_swaps_from: Option<u64>,
}

impl HeadlessSink {
    /// Create a sink of the given surface size.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            back: RgbaImage::from_pixel(size.width, size.height, Rgba([0, 0, 0, 255])),
            textures: BTreeMap::new(),
            next_id: 1,
            scissor: None,
            blend: false,
            probe: HeadlessProbe::default(),
            snapshots: None,
            fail_swaps_from: None,
        }
    }

    /// Write presented frames as PNGs.
    pub fn with_snapshots(mut self, opts: SnapshotOpts) -> Self {
        self.snapshots = Some(opts);
        self
    }

    /// Make the `n`-th and later swaps fail, simulating a lost surface.
    pub fn fail_swaps_from(mut self, n: u64) -> Self {
        self.fail_swaps_from = Some(n);
        self
    }

    /// Handle for inspecting the sink after it has been handed off.
    pub fn probe(&self) -> HeadlessProbe {
        self.probe.clone()
    }

    fn texture_mut(&mut self, id: TextureId) -> BootResult<&mut SoftTexture> {
        self.textures
            .get_mut(&id)
            .ok_or_else(|| BootError::validation(format!("unknown texture {id:?}")))
    }

    fn clip_rect(&self, rect: IRect) -> IRect {
        let clip = rect.intersect(self.size.to_rect());
        match self.scissor {
            Some(s) => clip.intersect(s),
            None => clip,
        }
    }

    fn write_snapshot(&self, frame_no: u64) -> BootResult<()> {
        let Some(opts) = &self.snapshots else {
            return Ok(());
        };
        if opts.every == 0 || frame_no % opts.every != 0 {
            return Ok(());
        }
        std::fs::create_dir_all(&opts.dir)
            .with_context(|| format!("create snapshot dir '{}'", opts.dir.display()))?;
        let path = opts.dir.join(format!("frame_{frame_no:06}.png"));
        self.back
            .save(&path)
            .with_context(|| format!("write snapshot '{}'", path.display()))?;
        Ok(())
    }
}

impl FrameSink for HeadlessSink {
    fn size(&self) -> Size {
        self.size
    }

    fn create_texture(&mut self) -> BootResult<TextureId> {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.textures.insert(
            id,
            SoftTexture {
                width: 0,
                height: 0,
                rgba: Vec::new(),
                crop: IRect::default(),
            },
        );
        self.probe.update(|p| p.stats.textures_created += 1);
        Ok(id)
    }

    fn tex_image(
        &mut self,
        id: TextureId,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Option<&[u8]>,
    ) -> BootResult<()> {
        let rgba = match pixels {
            Some(p) => unpack_to_rgba8(format, width, height, p)?,
            None => vec![0; width as usize * height as usize * 4],
        };
        let tex = self.texture_mut(id)?;
        tex.width = width;
        tex.height = height;
        tex.rgba = rgba;
        tex.crop = IRect::new(0, 0, width as i32, height as i32);
        if pixels.is_some() {
            self.probe.update(|p| p.stats.uploads += 1);
        }
        Ok(())
    }

    fn tex_sub_image(
        &mut self,
        id: TextureId,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: &[u8],
    ) -> BootResult<()> {
        let src = unpack_to_rgba8(format, width, height, pixels)?;
        let tex = self.texture_mut(id)?;
        if x + width > tex.width || y + height > tex.height {
            return Err(BootError::validation(format!(
                "sub-image {width}x{height}+{x}+{y} exceeds {}x{} storage",
                tex.width, tex.height
            )));
        }
        let row_bytes = width as usize * 4;
        for row in 0..height as usize {
            let dst = ((y as usize + row) * tex.width as usize + x as usize) * 4;
            tex.rgba[dst..dst + row_bytes]
                .copy_from_slice(&src[row * row_bytes..(row + 1) * row_bytes]);
        }
        self.probe.update(|p| p.stats.uploads += 1);
        Ok(())
    }

    fn set_crop_rect(&mut self, id: TextureId, crop: IRect) {
        if let Some(tex) = self.textures.get_mut(&id) {
            tex.crop = crop;
        }
    }

    fn set_filter(&mut self, _id: TextureId, _filter: TextureFilter) {}

    fn delete_texture(&mut self, id: TextureId) {
        if self.textures.remove(&id).is_some() {
            self.probe.update(|p| p.stats.textures_deleted += 1);
        }
    }

    fn set_scissor(&mut self, rect: Option<IRect>) {
        self.scissor = rect;
    }

    fn set_blend(&mut self, enabled: bool) {
        self.blend = enabled;
    }

    fn clear(&mut self) {
        let clip = self.clip_rect(self.size.to_rect());
        for py in clip.y..clip.bottom() {
            for px in clip.x..clip.right() {
                self.back.put_pixel(px as u32, py as u32, Rgba([0, 0, 0, 255]));
            }
        }
        self.probe.update(|p| p.stats.clears += 1);
    }

    fn draw_texture(&mut self, id: TextureId, dst: IRect) {
        let clip = self.clip_rect(dst);
        let Some(tex) = self.textures.get(&id) else {
            return;
        };
        if clip.is_empty() || tex.width == 0 || tex.height == 0 {
            return;
        }

        let crop = tex.crop;
        for py in clip.y..clip.bottom() {
            let v = crop.y + (i64::from(py - dst.y) * i64::from(crop.height) / i64::from(dst.height)) as i32;
            let ty = v.rem_euclid(tex.height as i32) as u32;
            for px in clip.x..clip.right() {
                let u = crop.x
                    + (i64::from(px - dst.x) * i64::from(crop.width) / i64::from(dst.width)) as i32;
                let tx = u.rem_euclid(tex.width as i32) as u32;
                let [r, g, b, a] = tex.texel(tx, ty);
                let out = self.back.get_pixel_mut(px as u32, py as u32);
                if self.blend {
                    let a = u16::from(a);
                    let mix = |s: u8, d: u8| ((u16::from(s) * a + u16::from(d) * (255 - a) + 127) / 255) as u8;
                    *out = Rgba([mix(r, out[0]), mix(g, out[1]), mix(b, out[2]), 255]);
                } else {
                    *out = Rgba([r, g, b, 255]);
                }
            }
        }
        self.probe.update(|p| p.stats.draws += 1);
    }

    fn swap_buffers(&mut self) -> BootResult<()> {
        let frame_no = self.probe.stats().swaps + 1;
        if self.fail_swaps_from.is_some_and(|n| frame_no >= n) {
            return Err(BootError::surface(format!("swap {frame_no} failed: surface lost")));
        }
        self.write_snapshot(frame_no)?;
        let front = self.back.clone();
        self.probe.update(|p| {
            p.stats.swaps = frame_no;
            p.front = Some(front);
        });
        Ok(())
    }

    fn release(&mut self) {
        self.textures.clear();
        self.scissor = None;
        self.probe.update(|p| p.stats.released = true);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/headless.rs"]
mod tests;
