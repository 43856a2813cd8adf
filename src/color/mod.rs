//! Color parsing, color space conversions and statistical color transfer.

mod hsv;
mod lab;
mod transfer;

pub use hsv::Hsv;
pub use lab::Lab;
pub use transfer::*;

use crate::{error::ErrorKind, image::Color};

/// The color substituted for malformed color specifications.
pub const DEFAULT_COLOR: Color = Color::RED;

/// Parses a `#RRGGBB` or `#RGB` hex color specification.
///
/// The leading `#` is optional and case is ignored.
pub fn parse_hex(spec: &str) -> Result<Color, ErrorKind> {
    let invalid = || ErrorKind::InvalidColorSpec(spec.to_string());

    let digits = spec.trim().trim_start_matches('#');
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let nibble = |i: usize| -> u8 {
        // validated as an ASCII hex digit above
        (digits.as_bytes()[i] as char).to_digit(16).unwrap_or(0) as u8
    };
    match digits.len() {
        3 => {
            let [r, g, b] = [0, 1, 2].map(|i| nibble(i) * 0x11);
            Ok(Color::from_rgb8(r, g, b))
        }
        6 => {
            let [r, g, b] = [0, 2, 4].map(|i| nibble(i) << 4 | nibble(i + 1));
            Ok(Color::from_rgb8(r, g, b))
        }
        _ => Err(invalid()),
    }
}

/// Parses a hex color specification, substituting [`DEFAULT_COLOR`] for invalid ones.
///
/// The substitution is logged. Use [`parse_hex`] to handle the error instead.
pub fn hex_to_rgb(spec: &str) -> Color {
    parse_hex(spec).unwrap_or_else(|e| {
        log::warn!("{e}, using {DEFAULT_COLOR:?}");
        DEFAULT_COLOR
    })
}
