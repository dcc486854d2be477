//! Drawing the log overlay through the frame sink, one glyph quad at a time.

use crate::foundation::core::IRect;
use crate::render::sink::FrameSink;
use crate::text::font::FontAtlas;
use crate::text::line_buffer::LogLineBuffer;

/// Draw one NUL-terminated row at text row `line`.
///
/// Bytes without a glyph still advance the pen so columns stay aligned.
pub fn draw_row(sink: &mut dyn FrameSink, font: &FontAtlas, row: &[u8], line: u32) {
    let tex = font.texture().id;
    let gw = font.glyph_width() as i32;
    let gh = font.glyph_height() as i32;
    let y = line as i32 * gh;

    for (col, &b) in row.iter().take_while(|&&b| b != 0).enumerate() {
        if b == b' ' {
            continue;
        }
        let Some(crop) = font.glyph_crop(b) else {
            continue;
        };
        sink.set_crop_rect(tex, crop);
        sink.draw_texture(tex, IRect::new(col as i32 * gw, y, gw, gh));
    }
}

/// Draw the whole overlay: the optional warning banner on the top row, then the buffered rows
/// oldest first. With a banner the oldest row is dropped so the newest stays on screen.
///
/// Leaves blending and scissoring disabled.
pub fn draw_overlay(
    sink: &mut dyn FrameSink,
    font: &FontAtlas,
    buffer: &LogLineBuffer,
    banner: Option<&str>,
) {
    sink.set_scissor(None);
    sink.set_blend(true);

    let mut line = 0;
    let skip = match banner {
        Some(text) => {
            draw_row(sink, font, text.as_bytes(), line);
            line += 1;
            1
        }
        None => 0,
    };
    for row in buffer.lines_for_display().skip(skip) {
        draw_row(sink, font, row, line);
        line += 1;
    }

    sink.set_blend(false);
}

#[cfg(test)]
#[path = "../../tests/unit/text/overlay.rs"]
mod tests;
