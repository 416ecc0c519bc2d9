//! Color maps for scalar-driven coloring.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A color map for mapping scalar values to colors.
///
/// Stores color samples evenly spaced over `[0, 1]`; lookups interpolate
/// linearly between neighboring samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorMap {
    /// Color map name.
    pub name: String,
    /// Color samples (evenly spaced from 0 to 1).
    pub colors: Vec<Vec3>,
}

impl ColorMap {
    /// Creates a new color map.
    pub fn new(name: impl Into<String>, colors: Vec<Vec3>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    /// Creates a color map sweeping the HSV hue circle from `hue_start` to
    /// `hue_end` (both in `[0, 1]`, full saturation and value).
    ///
    /// `hue_range(2.0 / 3.0, 0.0)` reproduces the classic blue-to-red
    /// distance lookup table.
    #[must_use]
    pub fn hue_range(hue_start: f32, hue_end: f32) -> Self {
        const STOPS: usize = 32;
        let colors = (0..STOPS)
            .map(|i| {
                let t = i as f32 / (STOPS - 1) as f32;
                let hue = hue_start + t * (hue_end - hue_start);
                hsv_to_rgb(hue, 1.0, 1.0)
            })
            .collect();
        Self::new("hue_range", colors)
    }

    /// Samples the color map at a given value (0 to 1).
    #[must_use]
    pub fn sample(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);

        if self.colors.is_empty() {
            return Vec3::ZERO;
        }

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let n = self.colors.len() - 1;
        let idx = (t * n as f32).floor() as usize;
        let idx = idx.min(n - 1);
        let frac = t * n as f32 - idx as f32;

        self.colors[idx].lerp(self.colors[idx + 1], frac)
    }

    /// Maps a scalar with the given range into a color.
    ///
    /// Degenerate ranges (`max == min`) map everything to the low end.
    #[must_use]
    pub fn map(&self, value: f32, min: f32, max: f32) -> Vec3 {
        let span = max - min;
        if span.abs() < 1e-10 {
            return self.sample(0.0);
        }
        self.sample((value - min) / span)
    }
}

/// Converts an HSV triple (all components in `[0, 1]`) to RGB.
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let h = (h.rem_euclid(1.0)) * 6.0;
    let i = h.floor();
    let f = h - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match i as u32 % 6 {
        0 => Vec3::new(v, t, p),
        1 => Vec3::new(q, v, p),
        2 => Vec3::new(p, v, t),
        3 => Vec3::new(p, q, v),
        4 => Vec3::new(t, p, v),
        _ => Vec3::new(v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_endpoints() {
        let map = ColorMap::new("test", vec![Vec3::ZERO, Vec3::ONE]);
        assert!((map.sample(0.0) - Vec3::ZERO).length() < 1e-6);
        assert!((map.sample(1.0) - Vec3::ONE).length() < 1e-6);
        assert!((map.sample(0.5) - Vec3::splat(0.5)).length() < 1e-6);
    }

    #[test]
    fn test_sample_clamps() {
        let map = ColorMap::new("test", vec![Vec3::ZERO, Vec3::ONE]);
        assert!((map.sample(-3.0) - Vec3::ZERO).length() < 1e-6);
        assert!((map.sample(42.0) - Vec3::ONE).length() < 1e-6);
    }

    #[test]
    fn test_hue_range_blue_to_red() {
        let map = ColorMap::hue_range(2.0 / 3.0, 0.0);
        let low = map.sample(0.0);
        let high = map.sample(1.0);
        assert!((low - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-4);
        assert!((high - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_map_degenerate_range() {
        let map = ColorMap::hue_range(2.0 / 3.0, 0.0);
        let c = map.map(5.0, 5.0, 5.0);
        assert!((c - map.sample(0.0)).length() < 1e-6);
    }
}
