//! # Primitive Widgets
//!
//! Stateless building blocks shared by every section: [`Card`] containers,
//! tone-colored badges and [`Button`] labels.
//!
//! Buttons are drawn, not focused: a section binds its actions to keys and
//! the button label shows the key hint.

use std::time::Duration;

use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding},
};

use super::theme::{blend, Theme};

/// Semantic color of a badge or status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    Warn,
    Danger,
    Neutral,
}

impl Tone {
    pub fn color(self, theme: &Theme) -> ratatui::style::Color {
        match self {
            Self::Success => theme.success,
            Self::Info => theme.accent,
            Self::Warn => theme.warn,
            Self::Danger => theme.danger,
            Self::Neutral => theme.fg,
        }
    }
}

/// A pill-shaped label, `" label "` on a faint tone-tinted background.
pub fn badge(label: impl Into<String>, tone: Tone, theme: &Theme) -> Span<'static> {
    let color = tone.color(theme);
    let bg = match tone {
        Tone::Neutral => blend(theme.bg, theme.fg, 0.07),
        _ => blend(theme.bg, color, 0.12),
    };
    Span::styled(
        format!(" {} ", label.into()),
        Style::default()
            .fg(color)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    Primary,
    #[default]
    Secondary,
    Ghost,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl ButtonSize {
    fn padding(self) -> usize {
        match self {
            Self::Sm => 1,
            Self::Md => 2,
            Self::Lg => 3,
        }
    }
}

/// A button label with optional icons and key hint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Button {
    label: String,
    variant: ButtonVariant,
    size: ButtonSize,
    left_icon: Option<&'static str>,
    right_icon: Option<&'static str>,
    key: Option<&'static str>,
    disabled: bool,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn size(mut self, size: ButtonSize) -> Self {
        self.size = size;
        self
    }

    pub fn left_icon(mut self, icon: &'static str) -> Self {
        self.left_icon = Some(icon);
        self
    }

    pub fn right_icon(mut self, icon: &'static str) -> Self {
        self.right_icon = Some(icon);
        self
    }

    /// Key that triggers this button, shown as `[k]`.
    pub fn key(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn span(&self, theme: &Theme) -> Span<'static> {
        let pad = " ".repeat(self.size.padding());
        let mut text = pad.clone();
        if let Some(key) = self.key {
            text.push_str(&format!("[{key}] "));
        }
        if let Some(icon) = self.left_icon {
            text.push_str(icon);
            text.push(' ');
        }
        text.push_str(&self.label);
        if let Some(icon) = self.right_icon {
            text.push(' ');
            text.push_str(icon);
        }
        text.push_str(&pad);

        let style = match self.variant {
            ButtonVariant::Primary => Style::default()
                .fg(theme.bg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
            ButtonVariant::Secondary => Style::default()
                .fg(theme.fg)
                .bg(blend(theme.bg, theme.fg, 0.12))
                .add_modifier(Modifier::BOLD),
            ButtonVariant::Ghost => Style::default().fg(theme.fg_dim),
            ButtonVariant::Danger => Style::default()
                .fg(theme.bg)
                .bg(theme.danger)
                .add_modifier(Modifier::BOLD),
        };
        let style = if self.disabled {
            style.add_modifier(Modifier::DIM)
        } else {
            style
        };
        Span::styled(text, style)
    }
}

/// A rounded, titled container.
#[derive(Debug, Clone, Default)]
pub struct Card {
    title: Option<String>,
    subtitle: Option<String>,
    title_color: Option<ratatui::style::Color>,
    badge: Option<Span<'static>>,
    highlighted: bool,
}

impl Card {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn title_color(mut self, color: ratatui::style::Color) -> Self {
        self.title_color = Some(color);
        self
    }

    /// Badge drawn at the right end of the top border.
    pub fn badge(mut self, badge: Span<'static>) -> Self {
        self.badge = Some(badge);
        self
    }

    /// Use the accent color for the border.
    pub fn highlighted(mut self, highlighted: bool) -> Self {
        self.highlighted = highlighted;
        self
    }

    pub fn block(self, theme: &Theme) -> Block<'static> {
        let border_color = if self.highlighted {
            theme.accent
        } else {
            theme.border
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .padding(Padding::horizontal(1))
            .style(Style::default().bg(theme.bg).fg(theme.fg));

        if let Some(title) = self.title {
            let mut spans = vec![Span::styled(
                format!(" {title} "),
                Style::default()
                    .fg(self.title_color.unwrap_or(theme.fg))
                    .add_modifier(Modifier::BOLD),
            )];
            if let Some(subtitle) = self.subtitle {
                spans.push(Span::styled(
                    format!("{subtitle} "),
                    Style::default().fg(theme.fg_dim),
                ));
            }
            block = block.title_top(Line::from(spans));
        }
        if let Some(badge) = self.badge {
            block = block.title_top(Line::from(badge).alignment(Alignment::Right));
        }
        block
    }
}

/// `label ........ value` spread across `width` columns.
pub fn key_value(
    label: &str,
    value: &str,
    width: u16,
    theme: &Theme,
    value_style: Style,
) -> Line<'static> {
    let used = label.chars().count() + value.chars().count();
    let gap = usize::from(width).saturating_sub(used).max(1);
    Line::from(vec![
        Span::styled(label.to_string(), Style::default().fg(theme.fg_dim)),
        Span::raw(" ".repeat(gap)),
        Span::styled(value.to_string(), value_style),
    ])
}

/// Word-wrap `text` to `width` columns, keeping explicit line breaks.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();

    for raw in text.lines() {
        if raw.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        let mut current_len = 0;
        for word in raw.split_whitespace() {
            let mut word_chars: Vec<char> = word.chars().collect();
            // hard-split words longer than a whole line
            while word_chars.len() > width {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word_chars.split_off(width);
                lines.push(word_chars.into_iter().collect());
                word_chars = rest;
            }
            let len = word_chars.len();
            if len == 0 {
                continue;
            }
            if current_len > 0 && current_len + 1 + len > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word_chars);
            current_len += len;
        }
        if current_len > 0 {
            lines.push(current);
        }
    }

    lines
}

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner glyph for the given elapsed time (80ms per frame).
pub fn spinner(elapsed: Duration) -> &'static str {
    let frame = (elapsed.as_millis() / 80) as usize % SPINNER_FRAMES.len();
    SPINNER_FRAMES[frame]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_pads_label_with_tone_color() {
        let theme = Theme::default_theme();
        let span = badge("Paid", Tone::Success, theme);
        assert_eq!(span.content, " Paid ");
        assert_eq!(span.style.fg, Some(theme.success));
    }

    #[test]
    fn test_button_label_with_key_and_icons() {
        let theme = Theme::default_theme();
        let span = Button::new("Run Security Audit")
            .key("a")
            .left_icon("◉")
            .size(ButtonSize::Sm)
            .span(theme);
        assert_eq!(span.content, " [a] ◉ Run Security Audit ");
    }

    #[test]
    fn test_disabled_button_is_dimmed() {
        let theme = Theme::default_theme();
        let span = Button::new("Sync").disabled(true).span(theme);
        assert!(span.style.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_primary_button_uses_accent_background() {
        let theme = Theme::default_theme();
        let span = Button::new("Go").variant(ButtonVariant::Primary).span(theme);
        assert_eq!(span.style.bg, Some(theme.accent));
    }

    #[test]
    fn test_key_value_fills_width() {
        let theme = Theme::default_theme();
        let line = key_value("API latency", "210ms", 30, theme, Style::default());
        assert_eq!(line.width(), 30);
        assert!(line.to_string().starts_with("API latency"));
        assert!(line.to_string().ends_with("210ms"));
    }

    #[test]
    fn test_wrap_text_breaks_on_words() {
        let lines = wrap_text("Implement rate limiting on API endpoints.", 16);
        assert_eq!(lines, vec!["Implement rate", "limiting on API", "endpoints."]);
    }

    #[test]
    fn test_wrap_text_keeps_blank_lines_and_splits_long_words() {
        let lines = wrap_text("a\n\nabcdefghij", 4);
        assert_eq!(lines, vec!["a", "", "abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_spinner_cycles() {
        assert_eq!(spinner(Duration::ZERO), "⠋");
        assert_eq!(spinner(Duration::from_millis(80)), "⠙");
        assert_eq!(spinner(Duration::from_millis(800)), "⠋");
    }
}
