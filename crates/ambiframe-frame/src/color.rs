use std::fmt;
use std::str::FromStr;

/// Color of a single LED.
///
/// Channels are sent on the wire in field order: red, green, blue.
/// With the `serde` feature a color is represented as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "[u8; 3]", into = "[u8; 3]")
)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    /// All channels off.
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Channels in wire order.
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}

impl From<[u8; 3]> for Color {
    fn from(bytes: [u8; 3]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        color.to_bytes()
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.red, self.green, self.blue)
    }
}

/// Errors from parsing a [`Color`] out of text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseColorError {
    /// Hex form must be `#rrggbb`.
    #[error("invalid hex color {0:?} (expected #rrggbb)")]
    InvalidHex(String),

    /// Decimal form must be three comma-separated values.
    #[error("invalid color {0:?} (expected r,g,b or #rrggbb)")]
    InvalidFormat(String),

    /// A decimal channel is not in `0..=255`.
    #[error("invalid color channel {0:?} (expected 0-255)")]
    InvalidChannel(String),
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Parses `r,g,b` (decimal) or `#rrggbb` (hex).
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();

        if let Some(hex) = input.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(ParseColorError::InvalidHex(input.to_string()));
            }
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16)
                    .map_err(|_| ParseColorError::InvalidHex(input.to_string()))
            };
            return Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?));
        }

        let parts: Vec<&str> = input.split(',').map(str::trim).collect();
        let [red, green, blue] = parts.as_slice() else {
            return Err(ParseColorError::InvalidFormat(input.to_string()));
        };
        let channel = |part: &str| {
            part.parse::<u8>()
                .map_err(|_| ParseColorError::InvalidChannel(part.to_string()))
        };
        Ok(Self::new(channel(*red)?, channel(*green)?, channel(*blue)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decimal() {
        assert_eq!("10,20,30".parse::<Color>().unwrap(), Color::new(10, 20, 30));
        assert_eq!(
            " 255, 0 ,7 ".parse::<Color>().unwrap(),
            Color::new(255, 0, 7)
        );
    }

    #[test]
    fn parse_hex() {
        assert_eq!("#ff8000".parse::<Color>().unwrap(), Color::new(255, 128, 0));
        assert_eq!("#0A0b0C".parse::<Color>().unwrap(), Color::new(10, 11, 12));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(matches!(
            "#fff".parse::<Color>(),
            Err(ParseColorError::InvalidHex(_))
        ));
        assert!(matches!(
            "#gg0000".parse::<Color>(),
            Err(ParseColorError::InvalidHex(_))
        ));
        assert!(matches!(
            "1,2".parse::<Color>(),
            Err(ParseColorError::InvalidFormat(_))
        ));
        assert!(matches!(
            "1,2,256".parse::<Color>(),
            Err(ParseColorError::InvalidChannel(_))
        ));
    }

    #[test]
    fn display_and_bytes() {
        let color = Color::from((1, 2, 3));
        assert_eq!(color.to_string(), "(1, 2, 3)");
        assert_eq!(color.to_bytes(), [1, 2, 3]);
        assert_eq!(Color::from([1, 2, 3]), color);
        assert_eq!(Color::default(), Color::BLACK);
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serde_uses_array_form() {
        let json = serde_json::to_string(&Color::new(1, 2, 3)).unwrap();
        assert_eq!(json, "[1,2,3]");
        let back: Color = serde_json::from_str("[4,5,6]").unwrap();
        assert_eq!(back, Color::new(4, 5, 6));
    }
}
