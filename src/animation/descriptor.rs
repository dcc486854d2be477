use std::ops::Range;

use crate::foundation::core::{Fps, Size};
use crate::foundation::error::{BootError, BootResult};
use crate::render::sink::TextureId;

/// One image of a part: a stored archive entry, plus its texture while the part caches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Leaf name inside the part directory.
    pub name: String,
    /// Byte span of the encoded image inside the archive arena.
    pub span: Range<usize>,
    /// Cached texture for parts that repeat.
    pub texture: Option<TextureId>,
}

/// A directory of frames played `repeat_count` times (0 = forever).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Part {
    /// Number of passes; zero loops until cancelled or switched.
    pub repeat_count: u32,
    /// Frames to hold the last image after each pass.
    pub pause_frames: u32,
    /// Archive directory holding the frames, without a trailing slash.
    pub path: String,
    /// Frames ordered by name.
    pub frames: Vec<Frame>,
}

impl Part {
    /// Whether the part loops forever.
    pub fn is_infinite(&self) -> bool {
        self.repeat_count == 0
    }

    /// Whether frames are uploaded once and reused across passes.
    pub fn caches_textures(&self) -> bool {
        self.repeat_count != 1
    }
}

/// Parsed `desc.txt`: canvas geometry, frame rate and parts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnimationDescriptor {
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Frames per second.
    pub fps: u32,
    /// Parts in play order.
    pub parts: Vec<Part>,
    /// Lines that were neither geometry nor part lines, as `(line number, text)`.
    pub skipped_lines: Vec<(usize, String)>,
}

impl AnimationDescriptor {
    /// Parse manifest text.
    ///
    /// `W H FPS` sets the geometry (the last such line wins), `p COUNT PAUSE PATH` adds a part.
    /// Blank lines are ignored; anything else is skipped with a warning. Never fails.
    #[tracing::instrument(skip_all)]
    pub fn parse(text: &str) -> Self {
        let mut desc = Self::default();
        for (idx, line) in text.lines().enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }
            if let Some((w, h, fps)) = parse_geometry(&tokens) {
                desc.width = w;
                desc.height = h;
                desc.fps = fps;
            } else if let Some(part) = parse_part(&tokens) {
                desc.parts.push(part);
            } else {
                tracing::warn!(line = idx + 1, text = line, "skipping malformed manifest line");
                desc.skipped_lines.push((idx + 1, line.to_owned()));
            }
        }
        desc
    }

    /// Canvas size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Frame rate as an [`Fps`].
    pub fn frame_rate(&self) -> BootResult<Fps> {
        Fps::per_second(self.fps)
    }

    /// Reject descriptors that cannot be played: missing or oversized geometry, or a zero frame
    /// rate.
    pub fn validate(&self) -> BootResult<()> {
        if self.size().is_empty() {
            return Err(BootError::validation(format!(
                "animation canvas {}x{} is empty or missing",
                self.width, self.height
            )));
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(BootError::validation(format!(
                "animation canvas {}x{} is too large",
                self.width, self.height
            )));
        }
        if self.fps == 0 {
            return Err(BootError::validation("animation fps must be > 0"));
        }
        Ok(())
    }

    /// Total frames across all parts.
    pub fn frame_count(&self) -> usize {
        self.parts.iter().map(|p| p.frames.len()).sum()
    }
}

fn parse_geometry(tokens: &[&str]) -> Option<(u32, u32, u32)> {
    match tokens {
        [w, h, fps, ..] => Some((w.parse().ok()?, h.parse().ok()?, fps.parse().ok()?)),
        _ => None,
    }
}

fn parse_part(tokens: &[&str]) -> Option<Part> {
    match tokens {
        ["p", count, pause, path, ..] => Some(Part {
            repeat_count: count.parse().ok()?,
            pause_frames: pause.parse().ok()?,
            path: path.trim_end_matches('/').to_owned(),
            frames: Vec::new(),
        }),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/descriptor.rs"]
mod tests;
