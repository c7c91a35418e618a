//! Colors for the weather statuses on the map.

use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ColorBrewer "Spectral" (11 classes), red to blue.
const SPECTRAL: [Rgb; 11] = [
    Rgb(158, 1, 66),
    Rgb(213, 62, 79),
    Rgb(244, 109, 67),
    Rgb(253, 174, 97),
    Rgb(254, 224, 139),
    Rgb(255, 255, 191),
    Rgb(230, 245, 152),
    Rgb(171, 221, 164),
    Rgb(102, 194, 165),
    Rgb(50, 136, 189),
    Rgb(94, 79, 162),
];

/// Samples the Spectral colormap at `t` in `[0, 1]`, interpolating linearly
/// between the anchor colors.
pub fn spectral(t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let pos = t * (SPECTRAL.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = (lower + 1).min(SPECTRAL.len() - 1);
    let frac = pos - lower as f64;

    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    let (a, b) = (SPECTRAL[lower], SPECTRAL[upper]);
    Rgb(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// `n` colors spread across the colormap, skipping both extremes.
pub fn spectral_palette(n: usize) -> Vec<Rgb> {
    (1..=n)
        .map(|k| spectral(k as f64 / (n + 1) as f64))
        .collect()
}

/// Status → color assignment.
///
/// Statuses are sorted before colors are handed out, so the same set of statuses
/// always gets the same colors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusPalette {
    entries: Vec<(String, Rgb)>,
}

impl StatusPalette {
    pub fn new<'a>(statuses: impl IntoIterator<Item = &'a str>) -> Self {
        let unique: BTreeSet<&str> = statuses.into_iter().collect();
        let colors = spectral_palette(unique.len());
        Self {
            entries: unique
                .into_iter()
                .map(str::to_string)
                .zip(colors)
                .collect(),
        }
    }

    pub fn color(&self, status: &str) -> Option<Rgb> {
        self.entries
            .iter()
            .find(|(s, _)| s == status)
            .map(|(_, color)| *color)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Legend entries: each status once, in the order it first shows up.
pub fn legend_order<'a>(statuses: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    statuses
        .into_iter()
        .filter(|s| seen.insert(*s))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectral_endpoints_and_middle() {
        assert_eq!(spectral(0.0), Rgb(158, 1, 66));
        assert_eq!(spectral(1.0), Rgb(94, 79, 162));
        assert_eq!(spectral(0.5), Rgb(255, 255, 191));
        assert_eq!(spectral(0.25), Rgb(249, 142, 82));
    }

    #[test]
    fn test_palette_skips_extremes() {
        assert_eq!(spectral_palette(1), vec![Rgb(255, 255, 191)]);
        let three = spectral_palette(3);
        assert_eq!(three.len(), 3);
        assert_eq!(three[1], Rgb(255, 255, 191));
        assert_ne!(three[0], SPECTRAL[0]);
        assert_ne!(three[2], SPECTRAL[10]);
        assert!(spectral_palette(0).is_empty());
    }

    #[test]
    fn test_status_palette_is_order_independent() {
        let a = StatusPalette::new(["Sunny", "Rain", "Sunny", "Undetermined"]);
        let b = StatusPalette::new(["Undetermined", "Sunny", "Rain"]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.color("Sunny"), b.color("Sunny"));
        assert!(a.color("Snow").is_none());
    }

    #[test]
    fn test_legend_keeps_first_appearance() {
        let legend = legend_order(["Undetermined", "Sunny", "Undetermined", "Haze", "Sunny"]);
        assert_eq!(legend, ["Undetermined", "Sunny", "Haze"]);
    }

    #[test]
    fn test_hex_display() {
        assert_eq!(Rgb(255, 255, 191).to_string(), "#ffffbf");
        assert_eq!(
            serde_json::to_string(&Rgb(0, 16, 255)).unwrap(),
            "\"#0010ff\""
        );
    }
}
