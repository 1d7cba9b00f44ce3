//! Scrapers & Jobs: one card per scraper, a scroll-linked horizontal track
//! and the technical note on how scrapers are invoked.

use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::{
    columns, grid_columns, heading_style, render_card, render_header, ContentBlock, HEADER_HEIGHT,
};
use crate::data::{ScraperRecord, ScraperStatus, SCRAPERS};
use crate::ui::motion::interpolate;
use crate::ui::reveal::{self, RevealSpec};
use crate::ui::theme::{blend, Theme};
use crate::ui::widgets::{badge, spinner, wrap_text, Button, ButtonSize, ButtonVariant, Card, Tone};

pub const TITLE: &str = "Scrapers & Jobs";
const SUBTITLE: &str = "Automation pipelines • Python scrapers • schedulers";
const NOTE: &str = "Scrapers are located in services/scrapers. They are invoked via an HTTP endpoint protected by SCHEDULER_SECRET.";

const CARD_HEIGHT: u16 = 7;
const TRACK_HEIGHT: u16 = 8;

/// Local state of the scrapers view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapersView {
    running_since: Option<Instant>,
}

impl ScrapersView {
    /// Flag every seeder as running. Returns false if they already are.
    ///
    /// Nothing is actually scheduled; the flag stays up until the view is
    /// remounted.
    pub fn trigger_all(&mut self, now: Instant) -> bool {
        if self.running_since.is_some() {
            return false;
        }
        self.running_since = Some(now);
        true
    }

    pub fn is_running_all(&self) -> bool {
        self.running_since.is_some()
    }

    fn trigger_button(&self, now: Instant) -> Button {
        let button = Button::new(if self.is_running_all() {
            "Running All Seeders..."
        } else {
            "Trigger All Seeders"
        })
        .variant(ButtonVariant::Primary)
        .size(ButtonSize::Sm)
        .key("r");
        match self.running_since {
            Some(since) => button
                .left_icon(spinner(now.saturating_duration_since(since)))
                .disabled(true),
            None => button.left_icon("▶"),
        }
    }
}

pub fn blocks(view: &ScrapersView, width: u16) -> Vec<ContentBlock<'_>> {
    vec![
        header(view),
        card_grid(width),
        horizontal_track(),
        technical_note(width),
    ]
}

fn header(view: &ScrapersView) -> ContentBlock<'_> {
    ContentBlock::new(HEADER_HEIGHT, RevealSpec::block(), move |rect, buf, frame| {
        let ctx = frame.ctx;
        let title = reveal::stagger_text(
            TITLE,
            heading_style(ctx.theme),
            ctx.mounted_at,
            ctx.now,
            ctx.preset,
            ctx.theme,
        );
        let actions = vec![view.trigger_button(ctx.now).span(ctx.theme)];
        render_header(rect, buf, title, SUBTITLE, actions, ctx.theme);
    })
}

fn card_grid<'a>(width: u16) -> ContentBlock<'a> {
    let per_row = grid_columns(width, 34, 3);
    let rows = SCRAPERS.len().div_ceil(per_row) as u16;
    let height = rows * CARD_HEIGHT + rows.saturating_sub(1);
    ContentBlock::new(height, RevealSpec::staggered(), move |rect, buf, frame| {
        let theme = frame.ctx.theme;
        for (i, scraper) in SCRAPERS.iter().enumerate() {
            let row = (i / per_row) as u16;
            let line = Rect {
                y: rect.y + row * (CARD_HEIGHT + 1),
                height: CARD_HEIGHT,
                ..rect
            };
            let cell = columns(line, per_row)[i % per_row];
            frame.reveal_child(buf, cell, i, |area, buf| scraper_card(scraper, area, buf, theme));
        }
    })
}

fn scraper_card(scraper: &ScraperRecord, area: Rect, buf: &mut Buffer, theme: &Theme) {
    let tone = match scraper.status {
        ScraperStatus::Success => Tone::Success,
        ScraperStatus::Failed => Tone::Danger,
    };
    let card = Card::titled(scraper.name).badge(badge(scraper.status.to_string(), tone, theme));
    let inner = render_card(card, area, buf, theme);

    let dim = Style::default().fg(theme.fg_dim);
    let (mark, mark_color) = match scraper.status {
        ScraperStatus::Success => ("✔", theme.success),
        ScraperStatus::Failed => ("✘", theme.danger),
    };
    let lines = vec![
        Line::from(Span::styled(format!("◷ Last run: {}", scraper.last_run), dim)),
        Line::from(vec![
            Span::styled(mark, Style::default().fg(mark_color)),
            Span::styled(format!(" {} items parsed to Postgres", scraper.items), dim),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "─".repeat(usize::from(inner.width)),
            Style::default().fg(theme.border),
        )),
        Line::from(vec![
            Button::new("Run now").size(ButtonSize::Sm).span(theme),
            Span::raw(" "),
            Button::new("Logs")
                .variant(ButtonVariant::Ghost)
                .size(ButtonSize::Sm)
                .span(theme),
        ]),
    ];
    Paragraph::new(lines).render(inner, buf);
}

/// Panels laid side by side on a track twice the viewport wide. The track
/// slides left as the block scrolls through the viewport.
fn horizontal_track<'a>() -> ContentBlock<'a> {
    ContentBlock::new(TRACK_HEIGHT, RevealSpec::block(), |rect, buf, frame| {
        let theme = frame.ctx.theme;
        if frame.ctx.preset.is_reduced() {
            let [first, second] =
                Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)])
                    .spacing(1)
                    .areas(rect);
            track_cards(first, buf, theme);
            panorama(second, buf, theme);
            return;
        }

        let track = Rect::new(rect.x, 0, rect.width.saturating_mul(2), rect.height);
        let mut strip = Buffer::empty(track);
        let [first, second] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).areas(track);
        track_cards(first, &mut strip, theme);
        panorama(second, &mut strip, theme);

        let shift = interpolate(frame.scroll_progress, &[0.0, 1.0], &[0.0, f32::from(rect.width)]);
        let shift = shift.round() as u16;
        for y in 0..rect.height {
            for x in 0..rect.width {
                let cell = strip[(track.x + x + shift, y)].clone();
                buf[(rect.x + x, rect.y + y)] = cell;
            }
        }
    })
}

fn track_cards(area: Rect, buf: &mut Buffer, theme: &Theme) {
    let [left, right] = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)])
        .spacing(2)
        .horizontal_margin(2)
        .areas(area);
    for (scraper, cell) in SCRAPERS.iter().take(2).zip([left, right]) {
        let cell = Rect {
            y: cell.y + 2,
            height: 4,
            ..cell
        };
        let inner = render_card(Card::titled(scraper.name), cell, buf, theme);
        Paragraph::new(Line::from(Span::styled(
            "Horizontal track preview",
            Style::default().fg(theme.fg_dim),
        )))
        .render(inner, buf);
    }
}

/// Shaded gradient panel standing in for the panorama image.
fn panorama(area: Rect, buf: &mut Buffer, theme: &Theme) {
    let inner = render_card(Card::titled("Scraper panorama"), area, buf, theme);
    let shades = ['░', '▒', '▓'];
    let width = f32::from(inner.width.max(1));
    for y in inner.top()..inner.bottom() {
        for x in inner.left()..inner.right() {
            let t = f32::from(x - inner.left()) / width;
            let shade = shades[((t * shades.len() as f32) as usize).min(shades.len() - 1)];
            buf[(x, y)]
                .set_char(shade)
                .set_fg(blend(theme.indigo, theme.accent, t));
        }
    }
}

fn technical_note<'a>(width: u16) -> ContentBlock<'a> {
    let note_rows = wrap_text(NOTE, width.saturating_sub(4)).len() as u16;
    ContentBlock::new(note_rows + 7, RevealSpec::block(), move |rect, buf, frame| {
        let theme = frame.ctx.theme;
        let card = Card::titled("Technical note").subtitle("Monorepo • scheduler • secrets");
        let inner = render_card(card, rect, buf, theme);
        let [text, facts] =
            Layout::vertical([Constraint::Length(note_rows + 1), Constraint::Length(4)])
                .areas(inner);

        let dim = Style::default().fg(theme.fg_dim);
        let code = Style::default()
            .fg(theme.accent)
            .bg(blend(theme.bg, theme.fg, 0.06));
        let note = Line::from(vec![
            Span::styled("Scrapers are located in ", dim),
            Span::styled("services/scrapers", code),
            Span::styled(". They are invoked via an HTTP endpoint protected by ", dim),
            Span::styled("SCHEDULER_SECRET", code),
            Span::styled(".", dim),
        ]);
        Paragraph::new(note)
            .wrap(Wrap { trim: true })
            .render(text, buf);

        let [engine, scheduler] = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)])
            .spacing(1)
            .areas(facts);
        for (area, (label, value)) in [engine, scheduler]
            .into_iter()
            .zip([("SCRAPER ENGINE", "Python / FastAPI"), ("SCHEDULER", "GCP / Cron (VPS)")])
        {
            let inner = render_card(Card::new(), area, buf, theme);
            Paragraph::new(vec![
                Line::from(Span::styled(label, dim)),
                Line::from(Span::styled(
                    value,
                    Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
                )),
            ])
            .render(inner, buf);
        }
    })
}
