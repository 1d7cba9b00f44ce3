//! Mobile (Capacitor): release guide, launch checklist and build commands.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::{render_card, two_thirds, ContentBlock};
use crate::data::{DeploymentStep, StepStatus, BUILD_COMMANDS, DEPLOYMENT_STEPS};
use crate::ui::reveal::RevealSpec;
use crate::ui::theme::{blend, Theme};
use crate::ui::widgets::{badge, wrap_text, Button, ButtonSize, ButtonVariant, Card, Tone};

const WARNING: &str = "Mobile does NOT use Service Workers. Ensure the runtime-config.json is accessible externally to change apiBaseUrl without store updates.";

const WIDE: u16 = 90;
const STEP_HEIGHT: u16 = 4;
const COMMANDS_HEIGHT: u16 = 12;

pub fn blocks<'a>(width: u16) -> Vec<ContentBlock<'a>> {
    vec![guide(), checklist_row(width)]
}

fn guide<'a>() -> ContentBlock<'a> {
    ContentBlock::new(7, RevealSpec::block(), |rect, buf, frame| {
        let theme = frame.ctx.theme;
        let inner = render_card(Card::new().highlighted(true), rect, buf, theme);
        let dim = Style::default().fg(theme.fg_dim);
        let code = Style::default()
            .fg(theme.accent)
            .bg(blend(theme.bg, theme.fg, 0.06));
        let lines = vec![
            Line::from(Span::styled(
                "Capacitor Deployment Guide",
                Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Move from ", dim),
                Span::styled("localhost", code),
                Span::styled(" to App Stores with a controlled release pipeline.", dim),
            ]),
            Line::default(),
            Line::from(vec![
                Button::new("Open Xcode").size(ButtonSize::Sm).span(theme),
                Span::raw(" "),
                Button::new("Android Studio")
                    .variant(ButtonVariant::Primary)
                    .size(ButtonSize::Sm)
                    .span(theme),
            ]),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    })
}

fn side_heights(width: u16) -> (u16, u16) {
    let side_width = if width >= WIDE {
        width.saturating_sub(1) / 3
    } else {
        width
    };
    // one column of slack for the layout's rounding
    let warning = wrap_text(WARNING, side_width.saturating_sub(5)).len() as u16 + 3;
    (COMMANDS_HEIGHT, warning)
}

fn checklist_height() -> u16 {
    1 + DEPLOYMENT_STEPS.len() as u16 * STEP_HEIGHT
}

/// Checklist on the left, build commands and the runtime-config warning on
/// the right. Narrow terminals stack the two columns.
fn checklist_row<'a>(width: u16) -> ContentBlock<'a> {
    let (commands, warning) = side_heights(width);
    let side = commands + 1 + warning;
    let height = if width >= WIDE {
        checklist_height().max(side)
    } else {
        checklist_height() + 1 + side
    };

    ContentBlock::new(height, RevealSpec::staggered(), move |rect, buf, frame| {
        let theme = frame.ctx.theme;
        let (left, right) = if rect.width >= WIDE {
            two_thirds(rect)
        } else {
            let [left, right] =
                Layout::vertical([Constraint::Length(checklist_height()), Constraint::Fill(1)])
                    .spacing(1)
                    .areas(rect);
            (left, right)
        };

        let mut rows = vec![Constraint::Length(1)];
        rows.extend(DEPLOYMENT_STEPS.iter().map(|_| Constraint::Length(STEP_HEIGHT)));
        let slots = Layout::vertical(rows).split(left);

        let title = Line::from(vec![
            Span::styled(
                "Launch Checklist",
                Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            badge(format!("{} steps", DEPLOYMENT_STEPS.len()), Tone::Info, theme),
        ]);
        title.render(slots[0], buf);
        for (i, step) in DEPLOYMENT_STEPS.iter().enumerate() {
            frame.reveal_child(buf, slots[i + 1], i, |area, buf| step_card(step, area, buf, theme));
        }

        let [cmd_area, warn_area] =
            Layout::vertical([Constraint::Length(commands), Constraint::Length(warning)])
                .spacing(1)
                .areas(right);
        frame.reveal_child(buf, cmd_area, 0, |area, buf| commands_card(area, buf, theme));
        frame.reveal_child(buf, warn_area, 1, |area, buf| warning_card(area, buf, theme));
    })
}

fn step_card(step: &DeploymentStep, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let (icon, color) = match step.status {
        StepStatus::Completed => ("✔", theme.success),
        StepStatus::Blocked => ("⚠", theme.warn),
        StepStatus::Pending => ("○", theme.fg_dim),
    };
    let card = Card::new().badge(
        Button::new("↗")
            .variant(ButtonVariant::Ghost)
            .size(ButtonSize::Sm)
            .span(theme),
    );
    let inner = render_card(card, area, buf, theme);
    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{icon} "), Style::default().fg(color)),
            Span::styled(
                step.title,
                Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("  {}", step.description),
            Style::default().fg(theme.fg_dim),
        )),
    ];
    Paragraph::new(lines).render(inner, buf);
}

fn commands_card(area: Rect, buf: &mut Buffer, theme: &Theme) {
    let card = Card::titled("</> Build Commands").title_color(theme.accent);
    let inner = render_card(card, area, buf, theme);
    let mut lines = Vec::new();
    for (i, (comment, command)) in BUILD_COMMANDS.iter().enumerate() {
        if i > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(*comment, Style::default().fg(theme.fg_dim))));
        lines.push(Line::from(Span::styled(*command, Style::default().fg(theme.accent))));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Run from project root.",
        Style::default()
            .fg(theme.fg_dim)
            .add_modifier(Modifier::ITALIC),
    )));
    Paragraph::new(lines).render(inner, buf);
}

fn warning_card(area: Rect, buf: &mut Buffer, theme: &Theme) {
    let inner = render_card(Card::new(), area, buf, theme);
    let mut lines = vec![Line::from(Span::styled(
        "⚠ Important Warning",
        Style::default().fg(theme.warn).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(
        wrap_text(WARNING, inner.width)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.fg_dim)))),
    );
    Paragraph::new(lines).render(inner, buf);
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::super::test_support::{count_rows, find_row, render_lines};
    use super::super::SectionContext;
    use super::*;
    use crate::ui::motion::MotionPreset;

    fn render(width: u16) -> Vec<String> {
        let theme = Theme::default_theme();
        let preset = MotionPreset::resolve(true);
        let now = Instant::now();
        let ctx = SectionContext {
            theme,
            preset: &preset,
            now,
            mounted_at: now,
        };
        render_lines(&blocks(width), ctx, width)
    }

    #[test]
    fn test_one_row_per_step_in_order() {
        for width in [120, 60] {
            let lines = render(width);
            let rows: Vec<usize> = DEPLOYMENT_STEPS
                .iter()
                .map(|step| find_row(&lines, step.title).unwrap())
                .collect();
            assert!(rows.windows(2).all(|w| w[0] < w[1]), "width {width}");
            for step in &DEPLOYMENT_STEPS {
                assert_eq!(count_rows(&lines, step.title), 1, "{}", step.title);
            }
        }
    }

    #[test]
    fn test_checklist_badge_counts_steps() {
        let lines = render(120);
        assert!(find_row(&lines, "6 steps").is_some());
    }

    #[test]
    fn test_build_commands_listed() {
        let lines = render(120);
        for (_, command) in &BUILD_COMMANDS {
            assert!(find_row(&lines, command).is_some(), "missing {command}");
        }
        assert!(find_row(&lines, "Important Warning").is_some());
    }
}
