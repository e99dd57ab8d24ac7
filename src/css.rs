//! Small helpers shared by effect templates and the base stylesheet

/// Convert `#rrggbb` to an `r, g, b` triple for use inside `rgba()`
///
/// Anything that isn't a six-digit hex color maps to white.
pub fn hex_to_rgb(hex: &str) -> String {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return "255,255,255".to_string();
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or(255);
    format!("{}, {}, {}", channel(0), channel(2), channel(4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#00ffcc"), "0, 255, 204");
        assert_eq!(hex_to_rgb("333333"), "51, 51, 51");
        assert_eq!(hex_to_rgb("#FFF"), "255,255,255");
        assert_eq!(hex_to_rgb("not a color"), "255,255,255");
    }
}
