//! Colors shared by the interactive plotter and the static renderer.

use egui::Color32;

pub type Rgb = [u8; 3];

/// Warm accent used for single-series pages.
pub const WARM_LINE: Rgb = [255, 87, 51];

/// Reference marker color.
pub const MARKER: Rgb = [52, 73, 94];

/// Series colors in draw order.
pub const PALETTE: [Rgb; 6] = [
    WARM_LINE,
    [52, 152, 219],  // Blue
    [243, 156, 18],  // Orange
    [155, 89, 182],  // Purple
    [46, 204, 113],  // Green
    [233, 30, 99],   // Pink
];

/// Sequential orange-red scale, low to high.
const OR_RD: [Rgb; 5] = [
    [254, 240, 217],
    [253, 204, 138],
    [252, 141, 89],
    [227, 74, 51],
    [179, 0, 0],
];

/// Color for the n-th series.
pub fn series_rgb(index: usize) -> Rgb {
    PALETTE[index % PALETTE.len()]
}

/// Scale color for `value` within `(min, max)`, clamped at both ends.
pub fn scale_rgb(value: f64, (min, max): (f64, f64)) -> Rgb {
    let t = if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let scaled = t * (OR_RD.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    let upper = (lower + 1).min(OR_RD.len() - 1);
    let frac = scaled - lower as f64;

    let mut out = [0u8; 3];
    for (channel, slot) in out.iter_mut().enumerate() {
        let a = OR_RD[lower][channel] as f64;
        let b = OR_RD[upper][channel] as f64;
        *slot = (a + (b - a) * frac).round() as u8;
    }
    out
}

pub fn to_color32([r, g, b]: Rgb) -> Color32 {
    Color32::from_rgb(r, g, b)
}
