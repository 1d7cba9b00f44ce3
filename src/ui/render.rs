use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget,
    },
    Frame,
};

use crate::ui::app::{App, Section, SIDEBAR_BREAKPOINT};
use crate::ui::motion::interpolate;
use crate::ui::reveal::{self, RevealState};
use crate::ui::sections::{
    self, dashboard, subscriptions, AuditView, BlockFrame, ContentBlock, ScrapersView,
    SectionContext, SettingsView, BLOCK_GAP,
};
use crate::ui::theme::{blend, Theme};
use crate::ui::widgets::{badge, Button, ButtonSize, Card, Tone};

/// Columns taken by the sidebar.
pub const SIDEBAR_WIDTH: u16 = 30;
const HEADER_HEIGHT: u16 = 3;

/// Highest stagger index a block body uses; a block is settled once this
/// child has finished.
const LAST_CHILD: usize = 8;

pub fn render(frame: &mut Frame, app: &mut App) {
    render_at(frame, app, Instant::now());
}

/// Draw one frame as of `now`.
pub fn render_at(frame: &mut Frame, app: &mut App, now: Instant) {
    app.tick(now);

    let area = frame.area();
    let theme = app.theme;
    let buf = frame.buffer_mut();
    Block::default()
        .style(Style::default().bg(theme.bg).fg(theme.fg))
        .render(area, buf);

    app.sidebar_permanent = area.width >= SIDEBAR_BREAKPOINT;
    if app.sidebar_permanent {
        app.sidebar_open = false;
    }

    let main = if app.sidebar_permanent {
        let [sidebar, main] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)])
                .areas(area);
        render_sidebar(buf, sidebar, app, false);
        main
    } else {
        area
    };

    let [header, content, footer] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(main);

    let content_animating = render_content(buf, content, app, now);
    render_header(buf, header, app);
    render_footer(buf, footer, app);
    if let Some(center) = app.spotlight() {
        render_spotlight(buf, area, center, theme);
    }

    if !app.sidebar_permanent {
        render_overlay_sidebar(buf, area, app);
    }
    if app.show_help {
        render_help(buf, area, theme);
    }

    app.animating = content_animating || app.is_settling() || mount_animating(app, now);
}

/// Half-width of the pointer halo in columns; it is half as tall in rows.
const SPOTLIGHT_RADIUS: f32 = 12.0;
const SPOTLIGHT_STRENGTH: f32 = 0.22;

/// Tint cell backgrounds around `center` toward the accent colour, fading
/// out with distance.
fn render_spotlight(buf: &mut Buffer, area: Rect, center: (f32, f32), theme: &Theme) {
    let (cx, cy) = center;
    let rows = SPOTLIGHT_RADIUS / 2.0;
    let top = (cy - rows).floor().max(f32::from(area.top())) as u16;
    let bottom = (cy + rows).ceil().min(f32::from(area.bottom())) as u16;
    let left = (cx - SPOTLIGHT_RADIUS).floor().max(f32::from(area.left())) as u16;
    let right = (cx + SPOTLIGHT_RADIUS).ceil().min(f32::from(area.right())) as u16;
    let glow = blend(theme.surface, theme.accent, 0.5);

    for y in top..bottom {
        for x in left..right {
            let dx = (f32::from(x) - cx) / SPOTLIGHT_RADIUS;
            let dy = (f32::from(y) - cy) / rows;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance >= 1.0 {
                continue;
            }
            let cell = &mut buf[(x, y)];
            let base = match cell.bg {
                Color::Reset => theme.bg,
                color => color,
            };
            cell.set_bg(blend(base, glow, (1.0 - distance) * SPOTLIGHT_STRENGTH));
        }
    }
}

/// Blocks of the active section.
fn section_blocks<'a>(
    section: Section,
    scrapers: &'a ScrapersView,
    settings: &'a SettingsView,
    audit: &'a AuditView,
    width: u16,
) -> Vec<ContentBlock<'a>> {
    match section {
        Section::Dashboard => sections::dashboard::blocks(width),
        Section::Scrapers => sections::scrapers::blocks(scrapers, width),
        Section::Mobile => sections::mobile::blocks(width),
        Section::Subscriptions => sections::subscriptions::blocks(width),
        Section::Audit => sections::audit::blocks(audit, width),
        Section::Settings => sections::settings::blocks(settings, width),
    }
}

/// Lay the section's blocks out on a virtual page, observe which of them
/// intersect the viewport, draw them and copy the visible rows into `area`.
/// Returns true while any reveal transition is still running.
fn render_content(buf: &mut Buffer, area: Rect, app: &mut App, now: Instant) -> bool {
    if area.width < 3 || area.height == 0 {
        return false;
    }
    let theme = app.theme;
    let preset = *app.preset();
    // one column of margin on the left, the scrollbar on the right
    let page_area = Rect::new(area.x + 1, 0, area.width - 2, 0);

    let blocks = section_blocks(
        app.section,
        &app.scrapers,
        &app.settings,
        &app.audit,
        page_area.width,
    );
    let total = sections::total_height(&blocks);
    let viewport = area.height;
    app.viewport_height = viewport;
    app.scroll.set_limit(total.saturating_sub(viewport));
    let scroll = app.scroll.offset();
    app.reveals.resize(blocks.len(), RevealState::default());

    let ctx = SectionContext {
        theme,
        preset: &preset,
        now,
        mounted_at: app.mounted_at,
    };
    let mut page = Buffer::empty(Rect {
        height: total.max(1),
        ..page_area
    });
    page.set_style(page.area, Style::default().bg(theme.bg).fg(theme.fg));

    let mut animating = false;
    let mut top = 0u16;
    for (block, state) in blocks.iter().zip(app.reveals.iter_mut()) {
        let ratio = reveal::visible_ratio(top, block.height, scroll, viewport);
        if !preset.is_reduced() {
            state.observe(ratio, &block.spec, now);
        }
        if ratio > 0.0 {
            let rect = Rect::new(page_area.x, top, page_area.width, block.height);
            let frame = BlockFrame {
                ctx,
                spec: block.spec,
                state: *state,
                scroll_progress: reveal::scroll_progress(top, block.height, scroll, viewport),
            };
            if block.spec.stagger {
                (block.body)(rect, &mut page, &frame);
                animating |= state.has_entered()
                    && state.child_progress(now, &block.spec, &preset, LAST_CHILD) < 1.0;
            } else {
                let progress = state.progress(now, &block.spec, &preset);
                (block.body)(reveal::slide(rect, progress), &mut page, &frame);
                reveal::fade(&mut page, rect, progress, theme);
                animating |= state.has_entered() && progress < 1.0;
            }
        }
        top = top.saturating_add(block.height + BLOCK_GAP);
    }

    for y in 0..viewport {
        let src = scroll.saturating_add(y);
        if src >= total {
            break;
        }
        for x in page_area.left()..page_area.right() {
            buf[(x, area.y + y)] = page[(x, src)].clone();
        }
    }

    if total > viewport {
        let mut state =
            ScrollbarState::new(usize::from(total - viewport)).position(usize::from(scroll));
        Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None)
            .thumb_style(Style::default().fg(theme.accent))
            .track_style(Style::default().fg(theme.border))
            .render(area, buf, &mut state);
    }

    animating
}

/// Mount-time animations (heading characters, transaction rows) still running.
fn mount_animating(app: &App, now: Instant) -> bool {
    let preset = app.preset();
    if preset.is_reduced() {
        return false;
    }
    let since = now.saturating_duration_since(app.mounted_at);
    reveal::stagger_text_active(dashboard::HEADLINE, app.mounted_at, now, preset)
        || (app.section == Section::Subscriptions
            && since < subscriptions::rows_settle_after(preset))
}

fn render_sidebar(buf: &mut Buffer, area: Rect, app: &App, overlay: bool) {
    let theme = app.theme;
    Clear.render(area, buf);
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.surface).fg(theme.fg));
    let inner = block.inner(area);
    block.render(area, buf);

    let nav_rows = Section::ALL.len() as u16;
    let [brand, health, _, nav, _, owner] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Length(nav_rows + 1),
        Constraint::Fill(1),
        Constraint::Length(5),
    ])
    .areas(inner);

    Paragraph::new(vec![
        Line::from(vec![
            Span::styled(" ◆ ", Style::default().fg(theme.accent)),
            Span::styled(
                "Se Liga No Ponto",
                Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            "   Admin • Unified Ops",
            Style::default().fg(theme.fg_dim),
        )),
    ])
    .render(brand, buf);

    let health_area = health.inner(ratatui::layout::Margin::new(1, 0));
    let card = Card::titled("Platform Health").block(theme);
    let health_inner = card.inner(health_area);
    card.render(health_area, buf);
    Paragraph::new(vec![
        Line::from(vec![
            Span::styled("● ", Style::default().fg(theme.success)),
            Span::styled("All systems nominal", Style::default().fg(theme.fg)),
        ]),
        Line::from(Span::styled("99.97% uptime", Style::default().fg(theme.fg_dim))),
    ])
    .render(health_inner, buf);

    let mut lines = vec![Line::from(Span::styled(
        " NAVIGATION",
        Style::default()
            .fg(theme.fg_dim)
            .add_modifier(Modifier::BOLD),
    ))];
    for (i, section) in Section::ALL.iter().enumerate() {
        let active = *section == app.section;
        let cursor = overlay && i == app.nav_cursor;
        let marker = if active { "▌" } else { " " };
        let style = if active {
            Style::default()
                .fg(theme.accent)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else if cursor {
            Style::default().fg(theme.fg).bg(theme.selection_bg)
        } else {
            Style::default().fg(theme.fg_dim)
        };
        let text = format!("{marker}{} {} {}", i + 1, section.icon(), section.label());
        let pad = usize::from(nav.width).saturating_sub(text.chars().count());
        lines.push(Line::from(Span::styled(format!("{text}{}", " ".repeat(pad)), style)));
    }
    Paragraph::new(lines).render(nav, buf);

    let owner_area = owner.inner(ratatui::layout::Margin::new(1, 0));
    let card = Card::titled("Owner").block(theme);
    let owner_inner = card.inner(owner_area);
    card.render(owner_area, buf);
    Paragraph::new(vec![
        Line::from(Span::styled(
            "Solo admin",
            Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Role ", Style::default().fg(theme.fg_dim)),
            badge("Super Admin", Tone::Info, theme),
        ]),
    ])
    .render(owner_inner, buf);
}

/// Slide the sidebar in from the left edge as its spring opens.
fn render_overlay_sidebar(buf: &mut Buffer, area: Rect, app: &App) {
    let openness = app.sidebar_spring.position.clamp(0.0, 1.0);
    let width = SIDEBAR_WIDTH.min(area.width);
    let visible = (f32::from(width) * openness).round() as u16;
    if visible == 0 {
        return;
    }
    let panel = Rect::new(0, 0, width, area.height);
    let mut scratch = Buffer::empty(panel);
    render_sidebar(&mut scratch, panel, app, true);

    let hidden = width - visible;
    for y in 0..area.height {
        for x in 0..visible {
            buf[(area.x + x, area.y + y)] = scratch[(hidden + x, y)].clone();
        }
    }
}

fn render_header(buf: &mut Buffer, area: Rect, app: &App) {
    let theme = app.theme;
    let progress = app.scroll.progress();
    let tint = interpolate(progress, &[0.0, 0.06], &[0.35, 0.88]);
    let scrolled = app.scroll.offset() > 0;
    let border = if scrolled {
        blend(theme.border, theme.accent, 0.5)
    } else {
        theme.border
    };
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(blend(theme.bg, theme.surface, tint)));
    let inner = block.inner(area);
    block.render(area, buf);

    let menu = if app.sidebar_permanent {
        Span::raw("")
    } else {
        Button::new("Menu").size(ButtonSize::Sm).key("s").span(theme)
    };
    let search = Span::styled(
        " ⌕ Search metrics, logs, users… ",
        Style::default().fg(theme.fg_dim).bg(theme.selection_bg),
    );
    let left = Line::from(vec![Span::raw(" "), menu, Span::raw(" "), search]);
    let right = Line::from(vec![
        Button::new("Alerts").size(ButtonSize::Sm).left_icon("◔").span(theme),
        Span::raw(" "),
        badge("● Environment Live", Tone::Success, theme),
        Span::raw(" "),
    ])
    .alignment(Alignment::Right);
    let row = Rect {
        height: 1,
        y: inner.y + inner.height.saturating_sub(1) / 2,
        ..inner
    };
    if left.width() + right.width() < usize::from(row.width) {
        right.render(row, buf);
    }
    left.render(row, buf);

    // springed scroll progress along the header's bottom border
    if !app.preset().transition.duration.is_zero() && area.height > 0 {
        let filled =
            (app.progress_spring.position.clamp(0.0, 1.0) * f32::from(area.width)).round() as u16;
        let y = area.bottom() - 1;
        for x in area.left()..area.left() + filled.min(area.width) {
            buf[(x, y)].set_char('━').set_fg(theme.accent);
        }
    }
}

fn render_footer(buf: &mut Buffer, area: Rect, app: &App) {
    let theme = app.theme;
    let key = Style::default().fg(theme.accent);
    let text = Style::default().fg(theme.fg_dim);
    let mut spans = Vec::new();
    let mut hint = |k: &'static str, label: &'static str| {
        spans.push(Span::styled(format!(" {k}"), key));
        spans.push(Span::styled(format!(" {label} "), text));
    };
    match app.section {
        Section::Scrapers => hint("r", "run all"),
        Section::Audit => hint("a", "audit"),
        Section::Settings if app.settings.is_editing() => hint("Esc", "done"),
        Section::Settings => {
            hint("j/k", "field");
            hint("Enter", "edit");
        }
        _ => {}
    }
    hint("Tab", "next");
    hint("1-6", "jump");
    hint("↑↓", "scroll");
    hint("m", "motion");
    hint("t", "theme");
    hint("?", "help");
    hint("q", "quit");

    let motion = if app.is_reduced_motion() {
        badge("reduced motion", Tone::Warn, theme)
    } else {
        Span::raw("")
    };
    Line::from(spans).render(area, buf);
    Line::from(vec![motion, Span::styled(format!(" {} ", theme.name), text)])
        .alignment(Alignment::Right)
        .render(area, buf);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

const HELP: [(&str, &str); 12] = [
    ("Tab / Shift-Tab", "Next / previous section"),
    ("1-6", "Jump to section"),
    ("s", "Open the sidebar (narrow terminals)"),
    ("↑↓ j/k PgUp PgDn", "Scroll"),
    ("Home / End", "Top / bottom"),
    ("r", "Scrapers: trigger all seeders"),
    ("a / Enter", "Audit: run security audit"),
    ("j/k Enter", "Settings: move focus, edit"),
    ("m", "Toggle reduced motion"),
    ("t", "Cycle theme"),
    ("?", "Toggle this help"),
    ("q / Ctrl-C", "Quit"),
];

fn render_help(buf: &mut Buffer, area: Rect, theme: &Theme) {
    let rect = centered_rect(60, HELP.len() as u16 + 4, area);
    Clear.render(rect, buf);
    let lines: Vec<Line<'_>> = HELP
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:<18}"), Style::default().fg(theme.accent)),
                Span::styled(*action, Style::default().fg(theme.fg)),
            ])
        })
        .collect();
    Paragraph::new(lines)
        .block(
            Card::titled("Keys")
                .highlighted(true)
                .badge(Span::styled(" any key to close ", Style::default().fg(theme.fg_dim)))
                .block(theme),
        )
        .render(rect, buf);
}

/// How long to wait for input before the next frame.
pub fn poll_timeout(app: &App) -> Duration {
    if app.animating {
        Duration::from_millis(16)
    } else {
        Duration::from_millis(100)
    }
}
