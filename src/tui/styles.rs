//! Medical-themed color palette and styles.
//!
//! Colors chosen for:
//! - Professional healthcare appearance
//! - High contrast for accessibility
//! - Outcome colors that match the charts (green negative, red positive)

use ratatui::style::{Color, Modifier, Style};

use crate::domain::chart::ChartColor;
use crate::domain::Prediction;

/// Medical theme color palette.
pub struct MedicalTheme;

impl MedicalTheme {
    // === Primary Colors ===

    /// Deep teal - Primary color (trust, medical)
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488

    /// Lighter teal for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    /// Darker teal for accents
    pub const PRIMARY_DARK: Color = Color::Rgb(15, 118, 110); // #0F766E

    // === Secondary Colors ===

    /// Light slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    // === Semantic Colors ===

    /// Emerald - negative outcome
    pub const SUCCESS: Color = Color::Rgb(16, 185, 129); // #10B981

    /// Amber - Warning
    pub const WARNING: Color = Color::Rgb(251, 191, 36); // #FBBF24

    /// Rose - positive outcome / error
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    /// Blue - Info
    pub const INFO: Color = Color::Rgb(59, 130, 246); // #3B82F6

    // === Background Colors ===

    /// Near-black with blue tint
    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A

    // === Text Colors ===

    /// Primary text (white)
    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC

    /// Secondary text (gray)
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8

    /// Muted text
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    // === Diverging scale anchors (RdBu reversed) ===

    const SCALE_NEGATIVE: (u8, u8, u8) = (33, 102, 172); // #2166AC
    const SCALE_MID: (u8, u8, u8) = (247, 247, 247); // #F7F7F7
    const SCALE_POSITIVE: (u8, u8, u8) = (178, 24, 43); // #B2182B

    // === Preset Styles ===

    /// Style for titles
    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for subtitles
    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for normal text
    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    /// Style for secondary text
    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Style for muted text
    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    #[must_use]
    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    #[must_use]
    pub fn info() -> Style {
        Style::default().fg(Self::INFO)
    }

    /// Style for selected items
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for focused elements
    #[must_use]
    pub fn focused() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for borders
    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    /// Style for focused borders
    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    /// Style for table headers
    #[must_use]
    pub fn header() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .bg(Self::PRIMARY_DARK)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key hints
    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for key descriptions
    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Get prediction outcome style
    #[must_use]
    pub fn prediction(outcome: Prediction) -> Style {
        let (r, g, b) = outcome.color();
        Style::default()
            .fg(Color::Rgb(r, g, b))
            .add_modifier(Modifier::BOLD)
    }

    /// Terminal color for a chart category color
    #[must_use]
    pub fn chart_color(color: ChartColor) -> Color {
        match color {
            ChartColor::Green => Self::SUCCESS,
            ChartColor::Red => Self::DANGER,
        }
    }

    /// Diverging heatmap color for a value in [-1, 1]; `None` maps to muted.
    #[must_use]
    pub fn diverging(value: Option<f64>) -> Color {
        let Some(v) = value else {
            return Self::TEXT_MUTED;
        };
        let v = v.clamp(-1.0, 1.0);
        let (from, to, t) = if v < 0.0 {
            (Self::SCALE_MID, Self::SCALE_NEGATIVE, -v)
        } else {
            (Self::SCALE_MID, Self::SCALE_POSITIVE, v)
        };
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Color::Rgb(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
    }

    /// Readable text color on top of a diverging cell.
    #[must_use]
    pub fn diverging_text(value: Option<f64>) -> Color {
        match value {
            Some(v) if v.abs() > 0.5 => Self::TEXT_PRIMARY,
            _ => Self::BG_DARK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diverging_endpoints() {
        assert_eq!(MedicalTheme::diverging(Some(0.0)), Color::Rgb(247, 247, 247));
        assert_eq!(MedicalTheme::diverging(Some(1.0)), Color::Rgb(178, 24, 43));
        assert_eq!(MedicalTheme::diverging(Some(-1.0)), Color::Rgb(33, 102, 172));
        assert_eq!(MedicalTheme::diverging(Some(5.0)), Color::Rgb(178, 24, 43));
        assert_eq!(MedicalTheme::diverging(None), MedicalTheme::TEXT_MUTED);
    }

    #[test]
    fn test_chart_colors_match_outcomes() {
        assert_eq!(
            MedicalTheme::chart_color(ChartColor::Green),
            MedicalTheme::SUCCESS
        );
        assert_eq!(
            MedicalTheme::chart_color(ChartColor::Red),
            MedicalTheme::DANGER
        );
    }
}
