//! Catalogue color encoding
//!
//! Catalogue colors are persisted as hex strings. Encoding writes "#RRGGBB"
//! (opacity is not stored); decoding accepts 3, 6 or 8 hex digits, the last
//! form being "#AARRGGBB". Anything else decodes to opaque black.

use serde::{Deserialize, Serialize};

/// An sRGB color with channels in the 0.0–1.0 range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub opacity: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        opacity: 1.0,
    };

    /// Build a color from 8-bit channels
    pub fn from_rgba8(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red: f64::from(red) / 255.0,
            green: f64::from(green) / 255.0,
            blue: f64::from(blue) / 255.0,
            opacity: f64::from(alpha) / 255.0,
        }
    }

    /// Sample the channels as 8-bit values, `[red, green, blue, alpha]`.
    ///
    /// Scaling truncates, it does not round.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            channel_to_u8(self.red),
            channel_to_u8(self.green),
            channel_to_u8(self.blue),
            channel_to_u8(self.opacity),
        ]
    }

    /// Decode a hex string.
    ///
    /// Case and prefix are ignored and every non-hex character is stripped
    /// before the digit count is inspected. Unrecognised lengths give opaque black.
    pub fn from_hex(hex: &str) -> Self {
        let digits: String = hex.chars().filter(|c| c.is_ascii_hexdigit()).collect();

        let value = match digits.len() {
            3 | 6 | 8 => match u64::from_str_radix(&digits, 16) {
                Ok(value) => value,
                Err(_) => return Self::BLACK,
            },
            _ => return Self::BLACK,
        };

        let (a, r, g, b) = match digits.len() {
            3 => (
                255,
                (value >> 8) * 17,
                (value >> 4 & 0xF) * 17,
                (value & 0xF) * 17,
            ),
            6 => (255, value >> 16, value >> 8 & 0xFF, value & 0xFF),
            _ => (value >> 24, value >> 16 & 0xFF, value >> 8 & 0xFF, value & 0xFF),
        };

        Self::from_rgba8(r as u8, g as u8, b as u8, a as u8)
    }

    /// Encode as uppercase "#RRGGBB"
    pub fn to_hex(&self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

fn channel_to_u8(channel: f64) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_short_form() {
        assert_eq!(Color::from_hex("#FFF").to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(Color::from_hex("#F80").to_rgba8(), [255, 136, 0, 255]);
    }

    #[test]
    fn test_decode_rgb() {
        assert_eq!(Color::from_hex("#FF0000").to_rgba8(), [255, 0, 0, 255]);
        assert_eq!(Color::from_hex("ff9500").to_rgba8(), [255, 149, 0, 255]);
    }

    #[test]
    fn test_decode_argb() {
        assert_eq!(Color::from_hex("#80FF0000").to_rgba8(), [255, 0, 0, 128]);
    }

    #[test]
    fn test_invalid_hex_is_opaque_black() {
        assert_eq!(Color::from_hex("zz"), Color::BLACK);
        assert_eq!(Color::from_hex(""), Color::BLACK);
        assert_eq!(Color::from_hex("#12345"), Color::BLACK);
        assert_eq!(Color::from_hex("#123456789"), Color::BLACK);
    }

    #[test]
    fn test_non_hex_characters_are_stripped() {
        assert_eq!(Color::from_hex("  #00-7a-FF  ").to_rgba8(), [0, 122, 255, 255]);
    }

    #[test]
    fn test_encode_is_uppercase_and_drops_alpha() {
        let color = Color::from_rgba8(0, 122, 255, 64);
        assert_eq!(color.to_hex(), "#007AFF");
    }

    #[test]
    fn test_encode_truncates() {
        let color = Color {
            red: 0.999,
            green: 0.5,
            blue: 0.0,
            opacity: 1.0,
        };
        // 0.999 * 255 = 254.745, 0.5 * 255 = 127.5
        assert_eq!(color.to_hex(), "#FE7F00");
    }

    #[test]
    fn test_round_trip_preserves_integer_channels() {
        for value in 0..=255u8 {
            let color = Color::from_rgba8(value, 255 - value, value / 2, 255);
            let decoded = Color::from_hex(&color.to_hex());
            assert_eq!(decoded.to_rgba8(), [value, 255 - value, value / 2, 255]);
        }
    }
}
