use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    White,
    Spectrum,
    Ocean,
    Fire,
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "white" | "mono" => Ok(Self::White),
            "spectrum" => Ok(Self::Spectrum),
            "ocean" => Ok(Self::Ocean),
            "fire" => Ok(Self::Fire),
            _ => Err(format!("Unknown color scheme: {}", s)),
        }
    }
}

impl ColorScheme {
    /// Color for a bar at `position` round the ring (0.0 to 1.0), brightened
    /// by `intensity` (the glow opacity, 0.0 to 0.9).
    pub fn bar_color(&self, position: f32, intensity: f32) -> (u8, u8, u8) {
        let position = position.clamp(0.0, 1.0);
        let intensity = intensity.clamp(0.0, 1.0);

        let (h, s, l) = match self {
            // Plain white bars, pushed towards grey when the glow is out
            ColorScheme::White => (0.0, 0.0, 0.75 + intensity * 0.25),
            ColorScheme::Spectrum => (270.0 - position * 270.0, 0.9, 0.45 + intensity * 0.25),
            ColorScheme::Ocean => (180.0 + position * 60.0, 0.8, 0.4 + intensity * 0.3),
            ColorScheme::Fire => (position * 60.0, 0.95, 0.4 + intensity * 0.3),
        };

        to_rgb(h, s, l)
    }

    /// Halo color around the shape; fades to black as the glow decays.
    pub fn glow_color(&self, opacity: f32) -> (u8, u8, u8) {
        let (r, g, b) = self.bar_color(0.5, opacity);
        let t = opacity.clamp(0.0, 1.0);
        (
            (r as f32 * t) as u8,
            (g as f32 * t) as u8,
            (b as f32 * t) as u8,
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorScheme::White => "white",
            ColorScheme::Spectrum => "spectrum",
            ColorScheme::Ocean => "ocean",
            ColorScheme::Fire => "fire",
        }
    }
}

fn to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let rgb: Srgb = Hsl::new(h, s, l).into_color();
    (
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("white".parse::<ColorScheme>(), Ok(ColorScheme::White));
        assert_eq!("Ocean".parse::<ColorScheme>(), Ok(ColorScheme::Ocean));
        assert!("plaid".parse::<ColorScheme>().is_err());
    }

    #[test]
    fn test_white_is_grey_scale() {
        let (r, g, b) = ColorScheme::White.bar_color(0.3, 0.9);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert!(r > 200);
    }

    #[test]
    fn test_intensity_brightens() {
        for scheme in [ColorScheme::Spectrum, ColorScheme::Ocean, ColorScheme::Fire] {
            let dim = scheme.bar_color(0.5, 0.0);
            let bright = scheme.bar_color(0.5, 0.9);
            let sum = |c: (u8, u8, u8)| c.0 as u32 + c.1 as u32 + c.2 as u32;
            assert!(sum(bright) > sum(dim), "{:?}", scheme);
        }
    }

    #[test]
    fn test_glow_fades_to_black() {
        assert_eq!(ColorScheme::Spectrum.glow_color(0.0), (0, 0, 0));
        assert_ne!(ColorScheme::Spectrum.glow_color(0.9), (0, 0, 0));
    }

    #[test]
    fn test_name_round_trips_through_parse() {
        for scheme in [
            ColorScheme::White,
            ColorScheme::Spectrum,
            ColorScheme::Ocean,
            ColorScheme::Fire,
        ] {
            assert_eq!(scheme.name().parse::<ColorScheme>(), Ok(scheme));
        }
    }
}
