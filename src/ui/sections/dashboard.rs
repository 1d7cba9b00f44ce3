//! Dashboard: revenue, platform SLA, headline stats, weekly activity and the
//! recent pipeline table.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Sparkline, Table, Widget},
};

use super::{columns, grid_columns, render_card, two_thirds, ContentBlock};
use crate::data::{PipelineRun, StatCard, PIPELINE_ACTIVITY, STAT_CARDS, WEEKLY_METRICS};
use crate::ui::motion::interpolate;
use crate::ui::reveal::{self, RevealSpec};
use crate::ui::theme::{blend, Theme};
use crate::ui::widgets::{
    badge, key_value, wrap_text, Button, ButtonSize, ButtonVariant, Card, Tone,
};

pub const HEADLINE: &str = "Real-time ops, with digital agency polish.";
const TAGLINE: &str =
    "Monitor pipelines, payments, and scrapers with immersive motion that syncs to your scroll.";

/// Widths below this stack the two-pane rows.
const WIDE: u16 = 80;
const STAT_HEIGHT: u16 = 4;

pub fn blocks<'a>(width: u16) -> Vec<ContentBlock<'a>> {
    vec![
        hero(width),
        revenue_row(width),
        stats_row(width),
        activity_row(width),
        pipeline_table(),
    ]
}

fn hero<'a>(width: u16) -> ContentBlock<'a> {
    let tagline_rows = wrap_text(TAGLINE, width.saturating_sub(4)).len() as u16;
    ContentBlock::new(4 + tagline_rows, RevealSpec::block().once(), |rect, buf, frame| {
        let ctx = frame.ctx;
        let theme = ctx.theme;
        let inner = render_card(Card::new().highlighted(true), rect, buf, theme);

        // heading fill and tagline opacity follow the block's scroll position
        let (fill, opacity) = if ctx.preset.is_reduced() {
            (1.0, 1.0)
        } else {
            (
                frame.scroll_progress,
                interpolate(frame.scroll_progress, &[0.0, 0.4, 1.0], &[0.0, 0.6, 1.0]),
            )
        };
        let heading_style = Style::default()
            .fg(blend(theme.fg, theme.accent, fill))
            .add_modifier(Modifier::BOLD);
        let mut lines = vec![
            reveal::stagger_text(
                HEADLINE,
                heading_style,
                ctx.mounted_at,
                ctx.now,
                ctx.preset,
                theme,
            ),
            Line::default(),
        ];
        let tagline_fg = blend(theme.bg, theme.fg_dim, opacity.max(0.25));
        lines.extend(
            wrap_text(TAGLINE, inner.width)
                .into_iter()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(tagline_fg)))),
        );
        Paragraph::new(lines).render(inner, buf);
    })
}

fn revenue_row<'a>(width: u16) -> ContentBlock<'a> {
    let height = if width >= WIDE { 11 } else { 23 };
    ContentBlock::new(height, RevealSpec::staggered(), move |rect, buf, frame| {
        let (left, right) = if rect.width >= WIDE {
            two_thirds(rect)
        } else {
            let [top, bottom] =
                Layout::vertical([Constraint::Length(11), Constraint::Length(11)])
                    .spacing(1)
                    .areas(rect);
            (top, bottom)
        };
        let theme = frame.ctx.theme;
        frame.reveal_child(buf, left, 0, |area, buf| revenue_card(area, buf, theme));
        frame.reveal_child(buf, right, 1, |area, buf| sla_card(area, buf, theme));
    })
}

fn revenue_card(area: Rect, buf: &mut Buffer, theme: &Theme) {
    let card = Card::titled("Revenue (MRR)").badge(badge("Asaas Connected", Tone::Info, theme));
    let inner = render_card(card, area, buf, theme);
    let [text, chart] =
        Layout::vertical([Constraint::Length(4), Constraint::Fill(1)]).areas(inner);

    let lines = vec![
        Line::from(Span::styled(
            "R$ 482.910",
            Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "+18.2% vs last 30 days",
            Style::default().fg(theme.fg_dim),
        )),
        Line::default(),
        Line::from(
            Button::new("View billing")
                .variant(ButtonVariant::Primary)
                .size(ButtonSize::Sm)
                .right_icon("→")
                .span(theme),
        ),
    ];
    Paragraph::new(lines).render(text, buf);

    let revenue: Vec<u64> = WEEKLY_METRICS.iter().map(|m| m.revenue).collect();
    Sparkline::default()
        .data(revenue)
        .style(Style::default().fg(theme.accent))
        .render(chart, buf);
}

fn sla_card(area: Rect, buf: &mut Buffer, theme: &Theme) {
    let card = Card::titled("Platform SLA").badge(badge("⛨", Tone::Success, theme));
    let inner = render_card(card, area, buf, theme);
    let value = Style::default().fg(theme.fg).add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(Span::styled("99.97%", value)),
        Line::from(Span::styled(
            "Last 7 days uptime",
            Style::default().fg(theme.fg_dim),
        )),
        Line::default(),
        key_value("API latency", "210ms", inner.width, theme, value),
        key_value("Error rate", "0.12%", inner.width, theme, value.fg(theme.danger)),
        key_value("Deploy window", "22:00–02:00", inner.width, theme, value),
    ];
    Paragraph::new(lines).render(inner, buf);
}

fn stats_row<'a>(width: u16) -> ContentBlock<'a> {
    let per_row = grid_columns(width, 24, STAT_CARDS.len());
    let rows = STAT_CARDS.len().div_ceil(per_row) as u16;
    let height = rows * STAT_HEIGHT + rows.saturating_sub(1);
    ContentBlock::new(height, RevealSpec::staggered(), move |rect, buf, frame| {
        for (i, card) in STAT_CARDS.iter().enumerate() {
            let row = (i / per_row) as u16;
            let line = Rect {
                y: rect.y + row * (STAT_HEIGHT + 1),
                height: STAT_HEIGHT,
                ..rect
            };
            let cell = columns(line, per_row)[i % per_row];
            let theme = frame.ctx.theme;
            frame.reveal_child(buf, cell, i, |area, buf| stat_card(card, area, buf, theme));
        }
    })
}

fn stat_card(stat: &StatCard, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let inner = render_card(
        Card::titled(stat.title).title_color(theme.fg_dim),
        area,
        buf,
        theme,
    );
    let (arrow, tone) = if stat.positive {
        ("↗", theme.success)
    } else {
        ("↘", theme.danger)
    };
    let lines = vec![
        Line::from(Span::styled(
            stat.value,
            Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(format!("{arrow} {}", stat.change), Style::default().fg(tone)),
            Span::styled(" vs last week", Style::default().fg(theme.fg_dim)),
        ]),
    ];
    Paragraph::new(lines).render(inner, buf);
}

fn activity_row<'a>(width: u16) -> ContentBlock<'a> {
    let height = if width >= WIDE { 13 } else { 13 + 1 + 6 + 1 + 6 };
    ContentBlock::new(height, RevealSpec::staggered(), move |rect, buf, frame| {
        let theme = frame.ctx.theme;
        let (chart, side) = if rect.width >= WIDE {
            two_thirds(rect)
        } else {
            let [chart, side] = Layout::vertical([Constraint::Length(13), Constraint::Fill(1)])
                .spacing(1)
                .areas(rect);
            (chart, side)
        };
        let [asaas, ops] = Layout::vertical([Constraint::Length(6), Constraint::Length(6)])
            .spacing(1)
            .areas(side);

        frame.reveal_child(buf, chart, 0, |area, buf| activity_chart(area, buf, theme));
        frame.reveal_child(buf, asaas, 1, |area, buf| {
            queue_card(
                area,
                buf,
                theme,
                ("Asaas pipeline", "R$ 92.4k", "Pending confirmations"),
                [("Pending invoices", "38", theme.fg), ("Overdue", "4", theme.danger)],
            );
        });
        frame.reveal_child(buf, ops, 2, |area, buf| {
            queue_card(
                area,
                buf,
                theme,
                ("Ops queue", "7 jobs", "Scrapers + syncs"),
                [("Queued", "3", theme.fg), ("Running", "2", theme.success)],
            );
        });
    })
}

fn activity_chart(area: Rect, buf: &mut Buffer, theme: &Theme) {
    let card = Card::titled("User activity")
        .subtitle("Last 7 days • engagement & sessions")
        .badge(badge("Realtime", Tone::Neutral, theme));
    let inner = render_card(card, area, buf, theme);

    let bars: Vec<Bar<'_>> = WEEKLY_METRICS
        .iter()
        .map(|m| Bar::default().value(m.active).label(Line::from(m.day)))
        .collect();
    let bar_width = (inner.width / WEEKLY_METRICS.len() as u16)
        .saturating_sub(1)
        .clamp(1, 8);
    BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme.indigo))
        .value_style(Style::default().fg(theme.bg).bg(theme.indigo))
        .label_style(Style::default().fg(theme.fg_dim))
        .render(inner, buf);
}

fn queue_card(
    area: Rect,
    buf: &mut Buffer,
    theme: &Theme,
    (title, value, caption): (&str, &str, &str),
    rows: [(&str, &str, ratatui::style::Color); 2],
) {
    let inner = render_card(Card::titled(title).title_color(theme.fg_dim), area, buf, theme);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(vec![
        Span::styled(value.to_string(), bold.fg(theme.fg)),
        Span::styled(format!("  {caption}"), Style::default().fg(theme.fg_dim)),
    ])];
    lines.extend(
        rows.iter()
            .map(|(label, v, color)| key_value(label, v, inner.width, theme, bold.fg(*color))),
    );
    Paragraph::new(lines).render(inner, buf);
}

fn pipeline_table<'a>() -> ContentBlock<'a> {
    let height = PIPELINE_ACTIVITY.len() as u16 + 4;
    ContentBlock::new(height, RevealSpec::block(), |rect, buf, frame| {
        let theme = frame.ctx.theme;
        let card = Card::titled("Recent pipeline activity")
            .subtitle("Scrapers, webhooks, infra jobs")
            .badge(
                Button::new("View all logs")
                    .size(ButtonSize::Sm)
                    .span(theme),
            );
        let inner = render_card(card, rect, buf, theme);
        pipeline_rows(&PIPELINE_ACTIVITY, theme).render(inner, buf);
    })
}

fn pipeline_rows<'a>(runs: &'a [PipelineRun], theme: &Theme) -> Table<'a> {
    let header = Row::new(["SERVICE", "TYPE", "STATUS", "DURATION", "TIMESTAMP"])
        .style(Style::default().fg(theme.fg_dim))
        .bottom_margin(1);
    let rows = runs.iter().map(|run| {
        let status = if run.succeeded {
            badge("Success", Tone::Success, theme)
        } else {
            badge("Error", Tone::Danger, theme)
        };
        Row::new(vec![
            Cell::from(Span::styled(
                run.service,
                Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
            )),
            Cell::from(Span::styled(run.kind, Style::default().fg(theme.fg_dim))),
            Cell::from(status),
            Cell::from(Span::styled(run.duration, Style::default().fg(theme.fg_dim))),
            Cell::from(Span::styled(run.when, Style::default().fg(theme.fg_dim))),
        ])
    });
    Table::new(
        rows,
        [
            Constraint::Fill(3),
            Constraint::Fill(2),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Fill(2),
        ],
    )
    .header(header)
    .column_spacing(1)
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
    fn test_dashboard_shows_headline_and_cards() {
        let lines = render(120);
        assert!(find_row(&lines, HEADLINE).is_some());
        assert!(find_row(&lines, "R$ 482.910").is_some());
        assert!(find_row(&lines, "99.97%").is_some());
        assert!(find_row(&lines, "Ops queue").is_some());
        for stat in &STAT_CARDS {
            assert!(find_row(&lines, stat.title).is_some(), "missing {}", stat.title);
        }
    }

    #[test]
    fn test_pipeline_rows_render_in_order() {
        let lines = render(120);
        let rows: Vec<usize> = PIPELINE_ACTIVITY
            .iter()
            .map(|run| find_row(&lines, run.service).unwrap())
            .collect();
        assert!(rows.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(count_rows(&lines, "Smiles Engine"), 1);
    }

    #[test]
    fn test_narrow_layout_stacks_panes() {
        let wide = render(120);
        let narrow = render(60);
        assert!(narrow.len() > wide.len());
        assert!(
            find_row(&narrow, "Platform SLA").unwrap() > find_row(&narrow, "Revenue (MRR)").unwrap()
        );
    }
}
