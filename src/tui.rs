use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::fmt::amount;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const AMOUNT_POS_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const AMOUNT_NEG_STYLE: Style = Style::new().fg(Color::Red);
pub const AMOUNT_NAN_STYLE: Style = Style::new()
    .fg(Color::Magenta)
    .add_modifier(Modifier::BOLD);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

pub const WORD_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Yellow);

pub const ERROR_STYLE: Style = Style::new().fg(Color::Red);

/// Amount as a coloured span: green for money in, red for money out, and a
/// loud style for amounts that failed to parse.
pub fn amount_span(value: f64) -> Span<'static> {
    let style = if value.is_nan() {
        AMOUNT_NAN_STYLE
    } else if value < 0.0 {
        AMOUNT_NEG_STYLE
    } else {
        AMOUNT_POS_STYLE
    };
    Span::styled(amount(value), style)
}

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}

/// Scale a length on a `from`-unit axis to `to` terminal cells.
pub fn scale_to_cells(value: f64, from: f64, to: u16) -> u16 {
    if !(from > 0.0) || !value.is_finite() {
        return 0;
    }
    ((value / from) * to as f64).round().clamp(0.0, to as f64) as u16
}
