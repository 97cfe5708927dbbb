//! CSS custom-property export.

use crate::color::Color;
use crate::error::ColorError;

/// Render colors as a `:root` block of positional custom properties.
///
/// ```
/// use n_color::{Color, to_css_block};
///
/// let css = to_css_block(&[Color::parse("#3498db").unwrap()]).unwrap();
/// assert_eq!(css, ":root {\n  --color-1: #3498db;\n}");
/// ```
///
/// # Errors
///
/// [`ColorError::EmptyPalette`] when `colors` is empty.
pub fn to_css_block(colors: &[Color]) -> Result<String, ColorError> {
    if colors.is_empty() {
        return Err(ColorError::EmptyPalette);
    }
    let lines: Vec<String> = colors
        .iter()
        .enumerate()
        .map(|(i, color)| format!("  --color-{}: {color};", i + 1))
        .collect();
    Ok(format!(":root {{\n{}\n}}", lines.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use pretty_assertions::assert_eq;

    fn colors(hexes: &[&str]) -> Vec<Color> {
        hexes.iter().map(|h| Color::parse(h).unwrap()).collect()
    }

    #[test]
    fn empty_palette_is_an_error() {
        assert_eq!(to_css_block(&[]), Err(ColorError::EmptyPalette));
    }

    #[test]
    fn two_colors() {
        let css = to_css_block(&colors(&["#3498db", "#66cb0e"])).unwrap();
        assert_eq!(css, ":root {\n  --color-1: #3498db;\n  --color-2: #66cb0e;\n}");
    }

    #[test]
    fn full_palette_is_one_indexed_in_order() {
        let p = Palette::from_hex("#3498db").unwrap();
        let css = to_css_block(&p).unwrap();
        assert_eq!(
            css,
            "\
:root {
  --color-1: #3498db;
  --color-2: #67cc0e;
  --color-3: #0165a8;
  --color-4: #cb6724;
}"
        );
    }

    #[test]
    fn hex_is_lowercased() {
        let css = to_css_block(&colors(&["#ABCDEF"])).unwrap();
        assert!(css.contains("--color-1: #abcdef;"));
    }

    #[test]
    fn closing_brace_has_no_trailing_newline() {
        let css = to_css_block(&colors(&["#000000"])).unwrap();
        assert!(css.ends_with("\n}"));
    }
}
