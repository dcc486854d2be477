use std::time::Duration;

use smallvec::SmallVec;

use crate::foundation::error::{BootError, BootResult};

/// Frames-per-second represented as a rational `num/den`. Both parts are always non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fps {
    num: u32,
    den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> BootResult<Self> {
        if den == 0 {
            return Err(BootError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(BootError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole frames per second.
    pub fn per_second(num: u32) -> BootResult<Self> {
        Self::new(num, 1)
    }

    /// Whole frames per second for constants; zero is raised to one.
    pub const fn whole(num: u32) -> Self {
        Self {
            num: if num == 0 { 1 } else { num },
            den: 1,
        }
    }

    /// Numerator (frames).
    pub fn num(self) -> u32 {
        self.num
    }

    /// Denominator (seconds).
    pub fn den(self) -> u32 {
        self.den
    }

    /// Wall-clock duration of one frame.
    pub fn frame_duration(self) -> Duration {
        Duration::from_nanos(1_000_000_000u64 * u64::from(self.den) / u64::from(self.num))
    }
}

/// Surface or image dimensions in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Build a size from width and height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Return `true` when either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Rectangle covering the whole size, anchored at the origin.
    pub fn to_rect(self) -> IRect {
        IRect::new(0, 0, clamp_i32(self.width.into()), clamp_i32(self.height.into()))
    }
}

/// Integer rectangle in top-left-origin surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width, never negative for well-formed rects.
    pub width: i32,
    /// Height, never negative for well-formed rects.
    pub height: i32,
}

impl IRect {
    /// Build a rect from origin and extent.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Return `true` when the rect covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Center `inner` inside `outer`. Offsets go negative when `inner` is larger.
    /// Dimensions beyond `i32::MAX` saturate.
    pub fn centered(outer: Size, inner: Size) -> Self {
        let x = (i64::from(outer.width) - i64::from(inner.width)) / 2;
        let y = (i64::from(outer.height) - i64::from(inner.height)) / 2;
        Self::new(
            clamp_i32(x),
            clamp_i32(y),
            clamp_i32(inner.width.into()),
            clamp_i32(inner.height.into()),
        )
    }

    /// Intersection of two rects; empty rects collapse to the default.
    pub fn intersect(self, other: IRect) -> IRect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return IRect::default();
        }
        IRect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    /// Return `true` when `(px, py)` lies inside the rect.
    pub fn contains(self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Region `self - hole` as at most four non-overlapping bands (top, bottom, left, right).
    pub fn subtract(self, hole: IRect) -> SmallVec<[IRect; 4]> {
        let mut out = SmallVec::new();
        if self.is_empty() {
            return out;
        }
        let hole = self.intersect(hole);
        if hole.is_empty() {
            out.push(self);
            return out;
        }

        let bands = [
            IRect::new(self.x, self.y, self.width, hole.y - self.y),
            IRect::new(self.x, hole.bottom(), self.width, self.bottom() - hole.bottom()),
            IRect::new(self.x, hole.y, hole.x - self.x, hole.height),
            IRect::new(hole.right(), hole.y, self.right() - hole.right(), hole.height),
        ];
        out.extend(bands.into_iter().filter(|r| !r.is_empty()));
        out
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
