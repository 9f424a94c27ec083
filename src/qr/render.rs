//! Rasterises an encoded symbol into a bitmap

use crate::error::{Error, Result};
use crate::qr::EncodedQr;
use image::{DynamicImage, ImageBuffer, Luma, Rgb};
use std::fmt;

/// An opaque RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 128, 0)),
    ("lime", Color::rgb(0, 255, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("orange", Color::rgb(255, 165, 0)),
    ("purple", Color::rgb(128, 0, 128)),
    ("navy", Color::rgb(0, 0, 128)),
    ("teal", Color::rgb(0, 128, 128)),
    ("maroon", Color::rgb(128, 0, 0)),
    ("gray", Color::rgb(128, 128, 128)),
    ("grey", Color::rgb(128, 128, 128)),
    ("silver", Color::rgb(192, 192, 192)),
];

impl Color {
    /// Black
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// White
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Build a colour from its channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a colour name (`black`, `navy`, ...) or a `#rgb` / `#rrggbb` hex string.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();

        if let Some((_, color)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
            return Ok(*color);
        }

        let invalid = || Error::InvalidColor(value.to_string());
        let hex = lower.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = channel(&c.to_string())?;
                    rgb[i] = v * 17;
                }
                Ok(Self::rgb(rgb[0], rgb[1], rgb[2]))
            }
            6 => Ok(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Grey level if all channels are equal
    pub fn as_gray(&self) -> Option<u8> {
        (self.r == self.g && self.g == self.b).then_some(self.r)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Modules per side of a version 40 symbol
const MAX_MODULES: u32 = 177;
/// Largest image side the renderer will allocate
pub const MAX_SIDE: u32 = 16_384;

/// Paints modules as `box_size` squares inside a `border`-module quiet zone
#[derive(Debug, Clone, Copy)]
pub struct QrRenderer {
    box_size: u32,
    border: u32,
    fill: Color,
    back: Color,
}

impl QrRenderer {
    /// Create a renderer.
    ///
    /// `box_size` must be non-zero and a version 40 symbol with this border
    /// must fit within [`MAX_SIDE`] pixels per side.
    pub fn new(box_size: u32, border: u32, fill: Color, back: Color) -> Result<Self> {
        if box_size == 0 {
            return Err(Error::Config("box size must be at least 1 pixel".to_string()));
        }
        let largest = border
            .checked_mul(2)
            .and_then(|quiet| quiet.checked_add(MAX_MODULES))
            .and_then(|modules| modules.checked_mul(box_size))
            .filter(|side| *side <= MAX_SIDE);
        if largest.is_none() {
            return Err(Error::Config(format!(
                "box size {box_size} with border {border} exceeds {MAX_SIDE} pixels per side"
            )));
        }
        Ok(Self {
            box_size,
            border,
            fill,
            back,
        })
    }

    /// Side length in pixels of the image for a symbol `modules` wide.
    /// Bounded by [`MAX_SIDE`] for any valid symbol width.
    pub fn side(&self, modules: u32) -> u32 {
        (modules + 2 * self.border) * self.box_size
    }

    /// Render the symbol. Greyscale output when both colours are greys, RGB otherwise.
    pub fn render(&self, qr: &EncodedQr) -> DynamicImage {
        let modules = qr.width() as u32;
        let colors = qr.modules();
        let side = self.side(modules);
        let (box_size, border) = (self.box_size, self.border);

        let is_dark = |px: u32, py: u32| -> bool {
            let (mx, my) = (px / box_size, py / box_size);
            if mx < border || my < border {
                return false;
            }
            let (x, y) = (mx - border, my - border);
            x < modules
                && y < modules
                && colors[(y * modules + x) as usize] == qrcode::Color::Dark
        };

        tracing::debug!(modules, side, box_size, border, "Rendering QR bitmap");

        match (self.fill.as_gray(), self.back.as_gray()) {
            (Some(fill), Some(back)) => DynamicImage::ImageLuma8(ImageBuffer::from_fn(
                side,
                side,
                |x, y| Luma([if is_dark(x, y) { fill } else { back }]),
            )),
            _ => {
                let (fill, back) = (self.fill, self.back);
                DynamicImage::ImageRgb8(ImageBuffer::from_fn(side, side, |x, y| {
                    let c = if is_dark(x, y) { fill } else { back };
                    Rgb([c.r, c.g, c.b])
                }))
            }
        }
    }
}
