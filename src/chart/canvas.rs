// src/chart/canvas.rs
use image::{Rgb, RgbImage};

use super::font::{self, ADVANCE, GLYPH_H, GLYPH_W};

/// Clipped drawing primitives over an RGB buffer. Coordinates are signed so
/// callers can draw partly off-canvas without checks.
pub struct Canvas {
    img: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Self { img: RgbImage::from_pixel(width, height, background) }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        self.img.put_pixel(x as u32, y as u32, color);
    }

    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: Rgb<u8>) {
        for dy in 0..h as i64 {
            for dx in 0..w as i64 {
                self.put(x + dx, y + dy, color);
            }
        }
    }

    pub fn outline_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: Rgb<u8>) {
        let (x1, y1) = (x + w as i64 - 1, y + h as i64 - 1);
        self.line(x, y, x1, y, 1, color);
        self.line(x, y1, x1, y1, 1, color);
        self.line(x, y, x, y1, 1, color);
        self.line(x1, y, x1, y1, 1, color);
    }

    /// Bresenham line with a square brush `width` pixels wide.
    pub fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, width: u32, color: Rgb<u8>) {
        let w = width.max(1) as i64;
        let off = (w - 1) / 2;
        let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
        let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.fill_rect(x - off, y - off, w as u32, w as u32, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    pub fn disc(&mut self, cx: i64, cy: i64, r: u32, color: Rgb<u8>) {
        let r = r as i64;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.put(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// Draw `text` with its top-left corner at (x, y).
    pub fn text(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let s = scale.max(1);
        for (i, ch) in text.chars().enumerate() {
            let gx = x + (i as u32 * ADVANCE * s) as i64;
            for row in 0..GLYPH_H {
                for col in 0..GLYPH_W {
                    if font::lit(ch, col, row) {
                        self.fill_rect(gx + (col * s) as i64, y + (row * s) as i64, s, s, color);
                    }
                }
            }
        }
    }

    /// Text drawn twice, one pixel apart.
    pub fn bold_text(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        self.text(x, y, text, scale, color);
        self.text(x + 1, y, text, scale, color);
    }

    pub fn into_image(self) -> RgbImage {
        self.img
    }
}
