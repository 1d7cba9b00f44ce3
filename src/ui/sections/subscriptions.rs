//! Cobrança Asaas: recent transactions, webhook health and integration tasks.

use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::{columns, heading_style, render_card, render_header, ContentBlock, HEADER_HEIGHT};
use crate::data::{Transaction, TransactionStatus, INTEGRATION_TASKS, TRANSACTIONS, WEBHOOKS};
use crate::ui::motion::MotionPreset;
use crate::ui::reveal::{self, RevealSpec};
use crate::ui::theme::Theme;
use crate::ui::widgets::{badge, Button, ButtonSize, ButtonVariant, Card, Tone};

const WIDE: u16 = 90;
const ROW_HEIGHT: u16 = 2;
const HEALTH_HEIGHT: u16 = 8;

pub fn blocks<'a>(width: u16) -> Vec<ContentBlock<'a>> {
    vec![header(), transactions(), health_row(width)]
}

fn header<'a>() -> ContentBlock<'a> {
    ContentBlock::new(HEADER_HEIGHT, RevealSpec::block(), |rect, buf, frame| {
        let theme = frame.ctx.theme;
        let title = Line::from(Span::styled("Billing", heading_style(theme)));
        let actions = vec![
            badge("✔ API Active", Tone::Success, theme),
            Span::raw(" "),
            badge("↻ 5 Pending hooks", Tone::Info, theme),
            Span::raw(" "),
            Button::new("Sync")
                .variant(ButtonVariant::Primary)
                .size(ButtonSize::Sm)
                .left_icon("↻")
                .span(theme),
        ];
        render_header(
            rect,
            buf,
            title,
            "Asaas integration • webhooks • reconciliation",
            actions,
            theme,
        );
    })
}

/// Mount-time entrance of the `index`-th transaction row.
pub fn row_progress(index: usize, mounted_at: Instant, now: Instant, preset: &MotionPreset) -> f32 {
    let delay = preset.stagger * u32::try_from(index).unwrap_or(u32::MAX);
    let elapsed = now.saturating_duration_since(mounted_at);
    elapsed
        .checked_sub(delay)
        .map_or(0.0, |active| preset.transition.progress(active))
}

/// How long the transaction rows keep animating after mount.
pub fn rows_settle_after(preset: &MotionPreset) -> Duration {
    preset.stagger * u32::try_from(TRANSACTIONS.len()).unwrap_or(u32::MAX)
        + preset.transition.duration
}

fn transactions<'a>() -> ContentBlock<'a> {
    let rows = TRANSACTIONS.len() as u16;
    let height = rows * ROW_HEIGHT + rows.saturating_sub(1) + 2;
    ContentBlock::new(height, RevealSpec::block(), |rect, buf, frame| {
        let ctx = frame.ctx;
        let theme = ctx.theme;
        let card = Card::titled("Recent transactions")
            .subtitle("Last 24h • normalized statuses")
            .badge(
                Button::new("Open Asaas Dashboard")
                    .size(ButtonSize::Sm)
                    .right_icon("↗")
                    .span(theme),
            );
        let inner = render_card(card, rect, buf, theme);

        for (i, tx) in TRANSACTIONS.iter().enumerate() {
            let top = inner.y + i as u16 * (ROW_HEIGHT + 1);
            if i > 0 {
                let divider = Rect::new(inner.x, top - 1, inner.width, 1);
                Line::from(Span::styled(
                    "─".repeat(usize::from(inner.width)),
                    Style::default().fg(theme.border),
                ))
                .render(divider, buf);
            }
            let row = Rect::new(inner.x, top, inner.width, ROW_HEIGHT).intersection(inner);
            transaction_row(tx, row, buf, theme);
            let progress = row_progress(i, ctx.mounted_at, ctx.now, ctx.preset);
            reveal::fade(buf, row, progress, theme);
        }
    })
}

fn status_tone(status: TransactionStatus) -> Tone {
    match status {
        TransactionStatus::Paid => Tone::Success,
        TransactionStatus::Pending => Tone::Warn,
        TransactionStatus::Refunded => Tone::Neutral,
    }
}

fn transaction_row(tx: &Transaction, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let [left, right] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(14)]).areas(area);
    Paragraph::new(vec![
        Line::from(vec![
            Span::styled("▣ ", Style::default().fg(theme.fg_dim)),
            Span::styled(
                tx.user,
                Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("  {} • {}", tx.plan, tx.date),
            Style::default().fg(theme.fg_dim),
        )),
    ])
    .render(left, buf);
    Paragraph::new(vec![
        Line::from(Span::styled(
            tx.amount,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(badge(tx.status.to_string(), status_tone(tx.status), theme)),
    ])
    .alignment(ratatui::layout::Alignment::Right)
    .render(right, buf);
}

fn health_row<'a>(width: u16) -> ContentBlock<'a> {
    let height = if width >= WIDE {
        HEALTH_HEIGHT
    } else {
        HEALTH_HEIGHT * 2 + 1
    };
    ContentBlock::new(height, RevealSpec::staggered(), |rect, buf, frame| {
        let theme = frame.ctx.theme;
        let (webhooks, tasks) = if rect.width >= WIDE {
            let cols = columns(rect, 2);
            (cols[0], cols[1])
        } else {
            let [a, b] = Layout::vertical([Constraint::Length(HEALTH_HEIGHT); 2])
                .spacing(1)
                .areas(rect);
            (a, b)
        };
        frame.reveal_child(buf, webhooks, 0, |area, buf| webhook_card(area, buf, theme));
        frame.reveal_child(buf, tasks, 1, |area, buf| tasks_card(area, buf, theme));
    })
}

fn webhook_card(area: Rect, buf: &mut Buffer, theme: &Theme) {
    let card = Card::titled("Webhook health")
        .subtitle("Last 30m • idempotency enabled")
        .badge(badge("Live", Tone::Info, theme));
    let inner = render_card(card, area, buf, theme);
    let mut lines: Vec<Line<'_>> = WEBHOOKS
        .iter()
        .map(|hook| {
            let tone = if hook.healthy { Tone::Success } else { Tone::Danger };
            let status = badge(hook.status, tone, theme);
            let gap = usize::from(inner.width)
                .saturating_sub(hook.event.len() + status.width())
                .max(1);
            Line::from(vec![
                Span::styled(hook.event, Style::default().fg(theme.fg_dim)),
                Span::raw(" ".repeat(gap)),
                status,
            ])
        })
        .collect();
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Button::new("Retest hooks").size(ButtonSize::Sm).span(theme),
        Span::raw(" "),
        Button::new("Reprocess failed")
            .variant(ButtonVariant::Primary)
            .size(ButtonSize::Sm)
            .span(theme),
    ]));
    Paragraph::new(lines).render(inner, buf);
}

fn tasks_card(area: Rect, buf: &mut Buffer, theme: &Theme) {
    let card = Card::titled("Integration tasks").title_color(theme.indigo);
    let inner = render_card(card, area, buf, theme);
    let lines: Vec<Line<'_>> = INTEGRATION_TASKS
        .iter()
        .map(|task| {
            if task.done {
                Line::from(vec![
                    Span::styled("✔ ", Style::default().fg(theme.success)),
                    Span::styled(task.label, Style::default().fg(theme.fg)),
                ])
            } else {
                Line::from(Span::styled(
                    format!("◷ {}", task.label),
                    Style::default().fg(theme.fg_dim),
                ))
            }
        })
        .collect();
    Paragraph::new(lines).render(inner, buf);
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{count_rows, find_row, render_lines};
    use super::super::SectionContext;
    use super::*;

    fn render(width: u16, preset: &MotionPreset, mounted_at: Instant, now: Instant) -> Vec<String> {
        let ctx = SectionContext {
            theme: Theme::default_theme(),
            preset,
            now,
            mounted_at,
        };
        render_lines(&blocks(width), ctx, width)
    }

    #[test]
    fn test_one_row_per_transaction_in_order() {
        let now = Instant::now();
        let lines = render(120, &MotionPreset::resolve(true), now, now);
        let rows: Vec<usize> = TRANSACTIONS
            .iter()
            .map(|tx| find_row(&lines, tx.user).unwrap())
            .collect();
        assert!(rows.windows(2).all(|w| w[0] < w[1]));
        for tx in &TRANSACTIONS {
            assert_eq!(count_rows(&lines, tx.user), 1);
        }
        assert!(find_row(&lines, "Refunded").is_some());
    }

    #[test]
    fn test_rows_enter_one_stagger_apart() {
        let preset = MotionPreset::resolve(false);
        let start = Instant::now();
        let at = start + preset.stagger / 2;
        assert!(row_progress(0, start, at, &preset) > 0.0);
        assert_eq!(row_progress(1, start, at, &preset), 0.0);
        let settled = start + rows_settle_after(&preset);
        for i in 0..TRANSACTIONS.len() {
            assert_eq!(row_progress(i, start, settled, &preset), 1.0);
        }
    }

    #[test]
    fn test_reduced_motion_rows_are_immediate() {
        let preset = MotionPreset::resolve(true);
        let now = Instant::now();
        assert_eq!(row_progress(3, now, now, &preset), 1.0);
        assert_eq!(rows_settle_after(&preset), Duration::ZERO);
    }

    #[test]
    fn test_unsettled_rows_are_hidden_on_mount() {
        let now = Instant::now();
        let lines = render(120, &MotionPreset::resolve(false), now, now);
        assert!(find_row(&lines, "Ana Paula").is_none());
    }

    #[test]
    fn test_webhooks_and_tasks_listed() {
        let now = Instant::now();
        let lines = render(60, &MotionPreset::resolve(true), now, now);
        assert!(find_row(&lines, "SUBSCRIPTION_DELETED").is_some());
        assert!(find_row(&lines, "Automate premium role updates").is_some());
    }
}
