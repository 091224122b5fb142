use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::LeafError;

/// Four channel colour value understood by the panels.
///
/// The textual form is the space separated channel list used by the device,
/// e.g. `"204 255 0 0"`, and that is also how the colour is serialised in
/// configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgbw {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub w: u8,
}

impl Rgbw {
    pub const fn new(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self { r, g, b, w }
    }

    /// Converts a hue/saturation/brightness triple into an RGB colour with an
    /// unlit white channel. Hue is in degrees, saturation and brightness are
    /// percentages; out of range values are clamped.
    pub fn from_hsb(hue: f32, saturation: f32, brightness: f32) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let v = (brightness / 100.0).clamp(0.0, 1.0);

        let c = v * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let channel = |value: f32| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(channel(r), channel(g), channel(b), 0)
    }
}

impl fmt::Display for Rgbw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.r, self.g, self.b, self.w)
    }
}

impl FromStr for Rgbw {
    type Err = LeafError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let channels = s
            .split_whitespace()
            .map(|part| {
                part.parse::<u8>()
                    .map_err(|_| LeafError::Config(format!("invalid colour channel `{part}` in `{s}`")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match channels.as_slice() {
            [r, g, b] => Ok(Self::new(*r, *g, *b, 0)),
            [r, g, b, w] => Ok(Self::new(*r, *g, *b, *w)),
            _ => Err(LeafError::Config(format!(
                "colour `{s}` must have three or four channels"
            ))),
        }
    }
}

impl TryFrom<String> for Rgbw {
    type Error = LeafError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgbw> for String {
    fn from(value: Rgbw) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_device_notation() {
        let colour: Rgbw = "251 184 41 0".parse().unwrap();
        assert_eq!(colour, Rgbw::new(251, 184, 41, 0));
        assert_eq!(colour.to_string(), "251 184 41 0");

        let rgb: Rgbw = "  1 2 3 ".parse().unwrap();
        assert_eq!(rgb, Rgbw::new(1, 2, 3, 0));
    }

    #[test]
    fn rejects_malformed_colours() {
        assert!("1 2".parse::<Rgbw>().is_err());
        assert!("1 2 3 4 5".parse::<Rgbw>().is_err());
        assert!("256 0 0 0".parse::<Rgbw>().is_err());
        assert!("red".parse::<Rgbw>().is_err());
    }

    #[test]
    fn serialises_as_string() {
        let json = serde_json::to_string(&Rgbw::new(5, 218, 254, 0)).unwrap();
        assert_eq!(json, "\"5 218 254 0\"");

        let back: Rgbw = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgbw::new(5, 218, 254, 0));
        assert!(serde_json::from_str::<Rgbw>("\"nope\"").is_err());
    }

    #[test]
    fn converts_hsb() {
        assert_eq!(Rgbw::from_hsb(0.0, 0.0, 100.0), Rgbw::new(255, 255, 255, 0));
        assert_eq!(Rgbw::from_hsb(0.0, 100.0, 100.0), Rgbw::new(255, 0, 0, 0));
        assert_eq!(Rgbw::from_hsb(200.0, 100.0, 100.0), Rgbw::new(0, 170, 255, 0));
        assert_eq!(Rgbw::from_hsb(120.0, 100.0, 0.0), Rgbw::new(0, 0, 0, 0));
    }
}
