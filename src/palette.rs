use plotters::style::RGBColor;

/// Neighbourhood group colors, assigned in group order.
pub const GROUP_COLORS: [&str; 5] = ["#1a535c", "#4ecdc4", "#b2ff66", "#ff6b6b", "#ffe66d"];

pub const PRIMARY: RGBColor = RGBColor(0x1f, 0x77, 0xb4);
pub const SECONDARY: RGBColor = RGBColor(0xff, 0x7f, 0x0e);

/// Anchor colors of the heatmap ramp, low to high.
const HEAT_RAMP: [RGBColor; 5] = [
    RGBColor(0x44, 0x01, 0x54),
    RGBColor(0x3b, 0x52, 0x8b),
    RGBColor(0x21, 0x91, 0x8c),
    RGBColor(0x5e, 0xc9, 0x62),
    RGBColor(0xfd, 0xe7, 0x25),
];

/// Parse `#rrggbb`.
pub fn parse_hex(s: &str) -> Option<RGBColor> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Cycling list of colors for discrete series.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    colors: Vec<RGBColor>,
}

impl ColorPalette {
    pub fn new(colors: Vec<RGBColor>) -> Self {
        Self { colors }
    }

    pub fn groups() -> Self {
        Self::new(GROUP_COLORS.iter().filter_map(|c| parse_hex(c)).collect())
    }

    pub fn get(&self, idx: usize) -> RGBColor {
        if self.colors.is_empty() {
            return PRIMARY;
        }
        self.colors[idx % self.colors.len()]
    }
}

/// Ramp color for `t` in `[0, 1]`; values outside are clamped.
pub fn heat_color(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (HEAT_RAMP.len() - 1) as f64;
    let lo = (scaled.floor() as usize).min(HEAT_RAMP.len() - 2);
    let frac = scaled - lo as f64;
    let (a, b) = (HEAT_RAMP[lo], HEAT_RAMP[lo + 1]);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}
