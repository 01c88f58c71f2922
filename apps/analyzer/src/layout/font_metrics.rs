//! Static font metrics and panel geometry for gig panels.
//!
//! Character widths are in em units (relative to font size), taken from the
//! regular Arial/Helvetica AFM widths the analysis page is styled with. Bold
//! titles are approximated by scaling the regular widths. This is an
//! approximation of browser layout: expect ±1 line per text block against a
//! real render, which is why the estimate is expressed in whole lines.
//!
//! The table covers ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Panel configuration
// ────────────────────────────────────────────────────────────────────────────

/// Geometry of one gig panel. Heights are whole pixels, the same unit as
/// slide capacity.
///
/// Panel height model:
/// ```text
/// chrome_px
///   + title_lines  × title_line_px + title_gap_px
///   + venue_lines  × body_line_px
///   + detail_lines × body_line_px
/// ```
/// Every block counts at least one line, even when its text is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Usable text width inside the panel's padding and border.
    pub content_width_px: f32,
    pub title_font_px: f32,
    /// Width multiplier applied to regular metrics for the bold title face.
    pub title_bold_scale: f32,
    pub title_line_px: u32,
    /// Margin under the title.
    pub title_gap_px: u32,
    pub body_font_px: f32,
    pub body_line_px: u32,
    /// Vertical padding + border + bottom margin of the panel box.
    pub chrome_px: u32,
}

/// Panel geometry of the analysis page. The HTML report takes its panel
/// width, font sizes and line heights from this same config.
///
/// 10px padding and 1px border on both sides plus a 10px bottom margin give
/// 32px of chrome. A panel with one line per block measures 95px, so the
/// default 476px slide holds five typical gigs.
pub fn default_panel_config() -> PanelConfig {
    PanelConfig {
        content_width_px: 300.0,
        title_font_px: 18.0,
        title_bold_scale: 1.08,
        title_line_px: 22,
        title_gap_px: 5,
        body_font_px: 14.0,
        body_line_px: 18,
        chrome_px: 32,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table.
///
/// `widths[i]` = width of ASCII character `(i + 32)` at 1em.
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    ///
    /// Non-ASCII characters fall back to `average_char_width`.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }

    /// Counts the lines `text` occupies when greedily word-wrapped at
    /// `max_width_px`, rendered at `font_px`.
    ///
    /// A word wider than a whole line is broken between characters. Empty or
    /// whitespace-only text returns 0.
    pub fn wrapped_lines(&self, text: &str, font_px: f32, max_width_px: f32) -> u32 {
        let mut words = text.split_whitespace().peekable();
        if words.peek().is_none() {
            return 0;
        }

        let space_w = self.space_width * font_px;
        let mut line_count = 1u32;
        let mut current_width = 0.0_f32;
        let mut first_on_line = true;

        for word in words {
            let word_w = self.measure_str(word) * font_px;

            if word_w > max_width_px {
                if !first_on_line {
                    line_count += 1;
                    current_width = 0.0;
                }
                for c in word.chars() {
                    let char_w = self.char_width(c) * font_px;
                    if current_width > 0.0 && current_width + char_w > max_width_px {
                        line_count += 1;
                        current_width = char_w;
                    } else {
                        current_width += char_w;
                    }
                }
                first_on_line = false;
                continue;
            }

            let gap = if first_on_line { 0.0 } else { space_w };
            if !first_on_line && current_width + gap + word_w > max_width_px {
                line_count += 1;
                current_width = word_w;
            } else {
                current_width += gap + word_w;
                first_on_line = false;
            }
        }
        line_count
    }
}

/// Arial / Helvetica regular.
static SANS_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.55,
    space_width: 0.278,
};

/// Returns the metric table used for every panel text block.
pub fn sans_metrics() -> &'static FontMetricTable {
    &SANS_TABLE
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_str_empty_returns_zero() {
        assert_eq!(sans_metrics().measure_str(""), 0.0);
    }

    #[test]
    fn test_measure_str_known_widths() {
        let w = sans_metrics().measure_str("Mi");
        assert!((w - (0.833 + 0.222)).abs() < 1e-4, "got {w}");
    }

    #[test]
    fn test_non_ascii_uses_average_width() {
        let metrics = sans_metrics();
        assert!((metrics.measure_str("•") - metrics.average_char_width).abs() < 1e-6);
        assert!((metrics.measure_str("é") - metrics.average_char_width).abs() < 1e-6);
    }

    #[test]
    fn test_wrapped_lines_empty_is_zero() {
        assert_eq!(sans_metrics().wrapped_lines("", 14.0, 300.0), 0);
        assert_eq!(sans_metrics().wrapped_lines("   \t ", 14.0, 300.0), 0);
    }

    #[test]
    fn test_wrapped_lines_short_text_is_one_line() {
        assert_eq!(sans_metrics().wrapped_lines("Corner Hotel", 14.0, 300.0), 1);
    }

    #[test]
    fn test_wrapped_lines_wraps_at_width() {
        // "mmmm" is 4 × 0.833em; at 10px that's 33.32px per word, 2.78px per space.
        let metrics = sans_metrics();
        assert_eq!(metrics.wrapped_lines("mmmm mmmm", 10.0, 70.0), 1);
        assert_eq!(metrics.wrapped_lines("mmmm mmmm", 10.0, 69.0), 2);
        assert_eq!(metrics.wrapped_lines("mmmm mmmm mmmm", 10.0, 40.0), 3);
    }

    #[test]
    fn test_wrapped_lines_breaks_overlong_word() {
        // 30 × 8.33px = 249.9px, 100px lines → 3 lines.
        let word = "m".repeat(30);
        assert_eq!(sans_metrics().wrapped_lines(&word, 10.0, 100.0), 3);
        // The overlong word starts on its own line after a short word.
        let text = format!("a {word}");
        assert_eq!(sans_metrics().wrapped_lines(&text, 10.0, 100.0), 4);
    }

    #[test]
    fn test_larger_font_never_needs_fewer_lines() {
        let text = "An Evening Of Extended Psychedelic Jams With Friends From Out Of Town";
        let metrics = sans_metrics();
        let small = metrics.wrapped_lines(text, 14.0, 300.0);
        let large = metrics.wrapped_lines(text, 18.0, 300.0);
        assert!(large >= small, "18px: {large} lines, 14px: {small} lines");
    }

    #[test]
    fn test_default_panel_config_sanity() {
        let config = default_panel_config();
        assert_eq!(config.chrome_px, 32);
        assert_eq!(
            config.chrome_px + config.title_line_px + config.title_gap_px + 2 * config.body_line_px,
            95
        );
        assert!(config.title_font_px > config.body_font_px);
    }
}
