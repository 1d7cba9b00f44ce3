//! Config. de Runtime: the local runtime-configuration form.
//!
//! The form edits a [`RuntimeConfig`] held by the view. Nothing is submitted:
//! "Push to Remote" is drawn but inert, and leaving the view discards edits.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::{
    columns, grid_columns, heading_style, render_card, render_header, ContentBlock, HEADER_HEIGHT,
};
use crate::data::{ConfigUpdate, RuntimeConfig, INFRASTRUCTURE};
use crate::ui::reveal::RevealSpec;
use crate::ui::theme::Theme;
use crate::ui::widgets::{badge, wrap_text, Button, ButtonSize, ButtonVariant, Card, Tone};

const CAUTION: &str = "Changes to apiBaseUrl will affect all connected Mobile Apps and PWAs immediately via the runtime-config endpoint. Use with caution.";

/// Editable fields in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    ApiBaseUrl,
    Environment,
    MaintenanceMode,
    AllowPublicSignups,
}

impl SettingsField {
    pub const ALL: [SettingsField; 4] = [
        Self::ApiBaseUrl,
        Self::Environment,
        Self::MaintenanceMode,
        Self::AllowPublicSignups,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Local state of the settings view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    config: RuntimeConfig,
    focus: SettingsField,
    editing: bool,
}

impl Default for SettingsView {
    fn default() -> Self {
        Self {
            config: RuntimeConfig::default(),
            focus: SettingsField::ApiBaseUrl,
            editing: false,
        }
    }
}

impl SettingsView {
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn focus(&self) -> SettingsField {
        self.focus
    }

    /// True while the API base URL field captures typed text.
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn focus_next(&mut self) {
        let i = (self.focus.index() + 1) % SettingsField::ALL.len();
        self.focus = SettingsField::ALL[i];
    }

    pub fn focus_previous(&mut self) {
        let len = SettingsField::ALL.len();
        let i = (self.focus.index() + len - 1) % len;
        self.focus = SettingsField::ALL[i];
    }

    /// Enter on the focused field: edit the text field, cycle the
    /// environment or flip a switch.
    pub fn activate(&mut self) {
        let update = match self.focus {
            SettingsField::ApiBaseUrl => {
                self.editing = !self.editing;
                return;
            }
            SettingsField::Environment => ConfigUpdate::Environment(self.config.environment.next()),
            SettingsField::MaintenanceMode => {
                ConfigUpdate::MaintenanceMode(!self.config.maintenance_mode)
            }
            SettingsField::AllowPublicSignups => {
                ConfigUpdate::AllowPublicSignups(!self.config.allow_public_signups)
            }
        };
        self.config.apply(update);
    }

    /// Handle a key while the text field is being edited. Returns false when
    /// not editing.
    pub fn handle_edit_key(&mut self, key: KeyEvent) -> bool {
        if !self.editing {
            return false;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.editing = false,
            KeyCode::Backspace => {
                let mut url = self.config.api_base_url.clone();
                url.pop();
                self.config.apply(ConfigUpdate::ApiBaseUrl(url));
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.config.apply(ConfigUpdate::ApiBaseUrl(String::new()));
            }
            KeyCode::Char(c) => {
                let mut url = self.config.api_base_url.clone();
                url.push(c);
                self.config.apply(ConfigUpdate::ApiBaseUrl(url));
            }
            _ => {}
        }
        true
    }
}

pub fn blocks(view: &SettingsView, width: u16) -> Vec<ContentBlock<'_>> {
    vec![
        header(),
        caution(width),
        endpoints(view),
        security(view),
        infrastructure(width),
    ]
}

fn header<'a>() -> ContentBlock<'a> {
    ContentBlock::new(HEADER_HEIGHT, RevealSpec::block(), |rect, buf, frame| {
        let theme = frame.ctx.theme;
        let title = Line::from(Span::styled("System Configuration", heading_style(theme)));
        let actions = vec![Button::new("Push to Remote")
            .variant(ButtonVariant::Primary)
            .size(ButtonSize::Sm)
            .left_icon("⇪")
            .span(theme)];
        render_header(
            rect,
            buf,
            title,
            "Runtime config • environment variables • access controls",
            actions,
            theme,
        );
    })
}

fn caution<'a>(width: u16) -> ContentBlock<'a> {
    let rows = wrap_text(CAUTION, width.saturating_sub(6)).len() as u16;
    ContentBlock::new(rows + 2, RevealSpec::block(), |rect, buf, frame| {
        let theme = frame.ctx.theme;
        let inner = render_card(Card::new(), rect, buf, theme);
        let [icon, text] =
            Layout::horizontal([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
        Span::styled("⚠", Style::default().fg(theme.warn)).render(icon, buf);
        let lines: Vec<Line<'_>> = wrap_text(CAUTION, text.width)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.fg_dim))))
            .collect();
        Paragraph::new(lines).render(text, buf);
    })
}

fn field_style(view: &SettingsView, field: SettingsField, theme: &Theme) -> Style {
    if view.focus == field {
        Style::default()
            .fg(theme.fg)
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.fg)
    }
}

fn marker(view: &SettingsView, field: SettingsField, theme: &Theme) -> Span<'static> {
    if view.focus == field {
        Span::styled("› ", Style::default().fg(theme.accent))
    } else {
        Span::raw("  ")
    }
}

fn endpoints(view: &SettingsView) -> ContentBlock<'_> {
    ContentBlock::new(7, RevealSpec::block(), move |rect, buf, frame| {
        let theme = frame.ctx.theme;
        let card = Card::titled("◍ Core Endpoints").badge(badge("Live", Tone::Info, theme));
        let inner = render_card(card, rect, buf, theme);
        let label = Style::default().fg(theme.fg_dim);

        let cursor = if view.editing { "▏" } else { "" };
        let url = format!(" {}{cursor} ", view.config.api_base_url);
        let env = format!(" ‹ {} › ", view.config.environment.label());
        let lines = vec![
            Line::from(Span::styled("  API Base URL", label)),
            Line::from(vec![
                marker(view, SettingsField::ApiBaseUrl, theme),
                Span::styled(url, field_style(view, SettingsField::ApiBaseUrl, theme)),
            ]),
            Line::default(),
            Line::from(Span::styled("  Environment", label)),
            Line::from(vec![
                marker(view, SettingsField::Environment, theme),
                Span::styled(env, field_style(view, SettingsField::Environment, theme)),
            ]),
        ];
        Paragraph::new(lines).render(inner, buf);
    })
}

fn checkbox(on: bool) -> &'static str {
    if on {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Firebase key with everything after the first six characters hidden.
pub fn mask_key(key: &str) -> String {
    let visible: String = key.chars().take(6).collect();
    if key.chars().count() > 6 {
        format!("{visible}••••••")
    } else {
        visible
    }
}

fn security(view: &SettingsView) -> ContentBlock<'_> {
    ContentBlock::new(9, RevealSpec::block(), move |rect, buf, frame| {
        let theme = frame.ctx.theme;
        let card = Card::titled("⚿ Security & Auth (Firebase)")
            .badge(badge("Protected", Tone::Neutral, theme));
        let inner = render_card(card, rect, buf, theme);
        let dim = Style::default().fg(theme.fg_dim);

        let switch = |field, title: &'static str, hint: &'static str, on: bool| {
            vec![
                Line::from(vec![
                    marker(view, field, theme),
                    Span::styled(format!("{} ", checkbox(on)), field_style(view, field, theme)),
                    Span::styled(title, Style::default().fg(theme.fg)),
                ]),
                Line::from(Span::styled(format!("      {hint}"), dim)),
            ]
        };
        let mut lines = switch(
            SettingsField::MaintenanceMode,
            "Maintenance Mode",
            "Block all incoming requests with a 503 status.",
            view.config.maintenance_mode,
        );
        lines.extend(switch(
            SettingsField::AllowPublicSignups,
            "Public Signups",
            "Allow new users to register via Firebase Auth.",
            view.config.allow_public_signups,
        ));
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("  Firebase API Key  ", dim),
            Span::styled(
                mask_key(&view.config.firebase_api_key),
                dim.add_modifier(Modifier::ITALIC),
            ),
            Span::styled("  (read-only)", dim),
        ]));
        Paragraph::new(lines).render(inner, buf);
    })
}

fn infrastructure<'a>(width: u16) -> ContentBlock<'a> {
    let per_row = grid_columns(width.saturating_sub(4), 18, INFRASTRUCTURE.len());
    let rows = INFRASTRUCTURE.len().div_ceil(per_row) as u16;
    ContentBlock::new(rows * 3 + 2, RevealSpec::block(), move |rect, buf, frame| {
        let theme = frame.ctx.theme;
        let inner = render_card(Card::titled("▤ Infrastructure Info"), rect, buf, theme);
        for (i, fact) in INFRASTRUCTURE.iter().enumerate() {
            let row = (i / per_row) as u16;
            let line = Rect {
                y: inner.y + row * 3,
                height: 2,
                ..inner
            };
            let cell = columns(line, per_row)[i % per_row];
            Paragraph::new(vec![
                Line::from(Span::styled(
                    fact.label.to_uppercase(),
                    Style::default().fg(theme.fg_dim),
                )),
                Line::from(Span::styled(fact.value, Style::default().fg(theme.fg))),
            ])
            .render(cell, buf);
        }
    })
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::super::test_support::{find_row, render_lines};
    use super::super::SectionContext;
    use super::*;
    use crate::data::Environment;
    use crate::ui::motion::MotionPreset;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_focus_wraps_both_ways() {
        let mut view = SettingsView::default();
        view.focus_previous();
        assert_eq!(view.focus(), SettingsField::AllowPublicSignups);
        view.focus_next();
        assert_eq!(view.focus(), SettingsField::ApiBaseUrl);
    }

    #[test]
    fn test_toggle_changes_only_that_field() {
        let mut view = SettingsView::default();
        let before = view.config().clone();
        view.focus_next();
        view.focus_next();
        assert_eq!(view.focus(), SettingsField::MaintenanceMode);
        view.activate();

        let after = view.config();
        assert!(after.maintenance_mode);
        assert_eq!(after.api_base_url, before.api_base_url);
        assert_eq!(after.environment, before.environment);
        assert_eq!(after.allow_public_signups, before.allow_public_signups);
        assert_eq!(after.firebase_api_key, before.firebase_api_key);
    }

    #[test]
    fn test_environment_cycles() {
        let mut view = SettingsView::default();
        view.focus_next();
        view.activate();
        assert_eq!(view.config().environment, Environment::Staging);
        view.activate();
        view.activate();
        assert_eq!(view.config().environment, Environment::Production);
    }

    #[test]
    fn test_text_editing() {
        let mut view = SettingsView::default();
        assert!(!view.handle_edit_key(key(KeyCode::Char('x'))));

        view.activate();
        assert!(view.is_editing());
        for _ in 0..".com".len() {
            view.handle_edit_key(key(KeyCode::Backspace));
        }
        for c in ".dev".chars() {
            view.handle_edit_key(key(KeyCode::Char(c)));
        }
        view.handle_edit_key(key(KeyCode::Enter));
        assert!(!view.is_editing());
        assert_eq!(view.config().api_base_url, "https://api.seliganoponto.dev");
        assert!(view.config().allow_public_signups);
        assert!(!view.config().maintenance_mode);
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("AIzaSyC..."), "AIzaSy••••••");
        assert_eq!(mask_key("abc"), "abc");
    }

    #[test]
    fn test_form_shows_current_values() {
        let mut view = SettingsView::default();
        view.focus_next();
        view.focus_next();
        view.activate();

        let theme = Theme::default_theme();
        let preset = MotionPreset::resolve(true);
        let now = Instant::now();
        let ctx = SectionContext {
            theme,
            preset: &preset,
            now,
            mounted_at: now,
        };
        let lines = render_lines(&blocks(&view, 100), ctx, 100);
        assert!(find_row(&lines, "https://api.seliganoponto.com").is_some());
        let row = find_row(&lines, "Maintenance Mode").unwrap();
        assert!(lines[row].contains("[x]"));
        let row = find_row(&lines, "Public Signups").unwrap();
        assert!(lines[row].contains("[x]"));
        assert!(find_row(&lines, "Coolify / Docker").is_some());
    }
}
