use ratatui::style::Color;

/// A hue on the fixed 50% saturation / 50% lightness wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameColor {
    pub hue: u16,
}

impl NameColor {
    pub fn css(&self) -> String {
        format!("hsl({}, 50%, 50%)", self.hue)
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        hsl_to_rgb(self.hue as f64, 0.5, 0.5)
    }

    pub fn terminal(&self) -> Color {
        let (r, g, b) = self.rgb();
        Color::Rgb(r, g, b)
    }
}

/// `h = (h << 5) + h + c` over UTF-16 code units. The shift wraps at 32 bits
/// while the running sum does not.
fn name_hash(name: &str) -> i64 {
    name.encode_utf16().fold(0i64, |hash, unit| {
        let shifted = (hash as i32).wrapping_shl(5) as i64;
        shifted + hash + unit as i64
    })
}

/// Stable colour for a grouping name, so a grouping keeps its colour across
/// the summary bars and the chart.
pub fn name_color(name: &str) -> NameColor {
    NameColor {
        hue: name_hash(name).rem_euclid(360) as u16,
    }
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r1, g1, b1) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let to_byte = |v: f64| ((v + m) * 255.0).round() as u8;
    (to_byte(r1), to_byte(g1), to_byte(b1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_matches_shift_add() {
        assert_eq!(name_hash(""), 0);
        assert_eq!(name_hash("a"), 97);
        // (97 << 5) + 97 + 98
        assert_eq!(name_hash("ab"), 3299);
    }

    #[test]
    fn test_name_color_is_stable() {
        assert_eq!(name_color("Food"), name_color("Food"));
        assert_eq!(name_color("ab").hue, (3299 % 360) as u16);
        assert_eq!(name_color("ab").css(), "hsl(59, 50%, 50%)");
    }

    #[test]
    fn test_long_names_stay_in_range() {
        let c = name_color("A very long grouping name with åäö and more words");
        assert!(c.hue < 360);
    }

    #[test]
    fn test_hsl_to_rgb_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), (0, 0, 255));
        assert_eq!(hsl_to_rgb(0.0, 0.5, 0.5), (191, 64, 64));
    }
}
