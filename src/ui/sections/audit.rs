//! Segurança & Auditoria: runs the security audit and shows its report.

use std::time::Instant;

use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::{heading_style, render_card, render_header, two_thirds, ContentBlock, HEADER_HEIGHT};
use crate::data::{AUDIT_CRITICAL_FIXES, OBSERVABILITY};
use crate::ui::reveal::RevealSpec;
use crate::ui::theme::Theme;
use crate::ui::widgets::{
    badge, key_value, spinner, wrap_text, Button, ButtonSize, ButtonVariant, Card, Tone,
};

const WIDE: u16 = 90;
const READY_TEXT: &str =
    "Scan your architecture for technical debt and security vulnerabilities before going live.";

/// Local state of the audit view.
///
/// Each mounted instance has its own ticket; a result carrying another
/// ticket belongs to a view that was left and is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditView {
    ticket: u64,
    analyzing_since: Option<Instant>,
    report: Option<String>,
    generated_at: Option<DateTime<Local>>,
}

impl AuditView {
    pub fn new(ticket: u64) -> Self {
        Self {
            ticket,
            analyzing_since: None,
            report: None,
            generated_at: None,
        }
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing_since.is_some()
    }

    pub fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    /// Start an audit. Returns the ticket to hand back to [`AuditView::finish`],
    /// or `None` while a request is already in flight.
    pub fn begin(&mut self, now: Instant) -> Option<u64> {
        if self.is_analyzing() {
            return None;
        }
        self.analyzing_since = Some(now);
        Some(self.ticket)
    }

    /// Store a finished report. Clears the busy flag the first time a result
    /// for this instance arrives; returns false for stale or repeated results.
    pub fn finish(&mut self, ticket: u64, report: String, at: DateTime<Local>) -> bool {
        if ticket != self.ticket || !self.is_analyzing() {
            return false;
        }
        self.analyzing_since = None;
        self.report = Some(report);
        self.generated_at = Some(at);
        true
    }

    fn button(&self, now: Instant) -> Button {
        let button = Button::new(if self.is_analyzing() {
            "Analyzing Infrastructure..."
        } else {
            "Run Security Audit"
        })
        .variant(ButtonVariant::Primary)
        .size(ButtonSize::Sm)
        .key("a");
        match self.analyzing_since {
            Some(since) => button
                .left_icon(spinner(now.saturating_duration_since(since)))
                .disabled(true),
            None => button.left_icon("◉"),
        }
    }
}

pub fn blocks(view: &AuditView, width: u16) -> Vec<ContentBlock<'_>> {
    let body = match view.report.as_deref() {
        None => ready(),
        Some(report) => report_row(view, report, width),
    };
    vec![header(view), body]
}

fn header(view: &AuditView) -> ContentBlock<'_> {
    ContentBlock::new(HEADER_HEIGHT, RevealSpec::block(), move |rect, buf, frame| {
        let ctx = frame.ctx;
        let title = Line::from(Span::styled(
            "Security & Hardening Audit",
            heading_style(ctx.theme),
        ));
        render_header(
            rect,
            buf,
            title,
            "AI-powered risk analysis for the Se Liga No Ponto stack",
            vec![view.button(ctx.now).span(ctx.theme)],
            ctx.theme,
        );
    })
}

fn ready<'a>() -> ContentBlock<'a> {
    ContentBlock::new(10, RevealSpec::block(), |rect, buf, frame| {
        let theme = frame.ctx.theme;
        let inner = render_card(Card::new(), rect, buf, theme);
        let mut lines = vec![
            Line::default(),
            Line::from(Span::styled("⛨", Style::default().fg(theme.fg_dim))),
            Line::from(Span::styled(
                "Ready for Audit",
                Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
            )),
        ];
        lines.extend(
            wrap_text(READY_TEXT, inner.width.min(60))
                .into_iter()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.fg_dim)))),
        );
        lines.push(Line::default());
        lines.push(Line::from(badge("No report generated yet", Tone::Neutral, theme)));
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    })
}

/// Render the report's light markdown: `#` headings, `-`/`*` bullets and
/// `**bold**` markers, wrapped to `width`.
pub fn report_lines(report: &str, width: u16, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for raw in report.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            lines.push(Line::default());
            continue;
        }
        let (text, style, indent) = if trimmed.starts_with('#') {
            (
                trimmed.trim_start_matches('#').trim().to_string(),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                "",
            )
        } else if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            (format!("• {item}"), Style::default().fg(theme.fg), "  ")
        } else {
            (trimmed.to_string(), Style::default().fg(theme.fg), "")
        };
        let text = text.replace("**", "");
        let wrap_width = width.saturating_sub(indent.len() as u16);
        for (i, chunk) in wrap_text(&text, wrap_width).into_iter().enumerate() {
            let lead = if i == 0 { "" } else { indent };
            lines.push(Line::from(Span::styled(format!("{lead}{chunk}"), style)));
        }
    }
    lines
}

fn side_width(width: u16) -> u16 {
    if width >= WIDE {
        width.saturating_sub(1) / 3
    } else {
        width
    }
}

fn fixes_height(width: u16) -> u16 {
    // card borders and padding, the number gutter, one column of slack
    let inner = side_width(width).saturating_sub(9);
    AUDIT_CRITICAL_FIXES
        .iter()
        .map(|fix| wrap_text(fix, inner).len() as u16)
        .sum::<u16>()
        + 2
}

fn observability_height() -> u16 {
    OBSERVABILITY.len() as u16 + 4
}

fn report_row<'a>(view: &'a AuditView, report: &'a str, width: u16) -> ContentBlock<'a> {
    let report_width = if width >= WIDE {
        width - side_width(width) - 1
    } else {
        width
    };
    // one column of slack for the layout's rounding
    let report_rows =
        report_lines(report, report_width.saturating_sub(5), Theme::default_theme()).len() as u16
            + 2;
    let side = fixes_height(width) + 1 + observability_height();
    let height = if width >= WIDE {
        report_rows.max(side)
    } else {
        report_rows + 1 + side
    };

    ContentBlock::new(height, RevealSpec::staggered(), move |rect, buf, frame| {
        let theme = frame.ctx.theme;
        let (main, side) = if rect.width >= WIDE {
            two_thirds(rect)
        } else {
            let [main, side] =
                Layout::vertical([Constraint::Length(report_rows), Constraint::Fill(1)])
                    .spacing(1)
                    .areas(rect);
            (main, side)
        };
        let [fixes, observability] = Layout::vertical([
            Constraint::Length(fixes_height(width)),
            Constraint::Length(observability_height()),
        ])
        .spacing(1)
        .areas(side);

        frame.reveal_child(buf, main, 0, |area, buf| {
            let subtitle = view
                .generated_at
                .map(|at| format!("generated {}", at.format("%H:%M:%S")))
                .unwrap_or_default();
            let card = Card::titled("⛨ AI ANALYSIS REPORT")
                .title_color(theme.accent)
                .subtitle(subtitle);
            let inner = render_card(card, area, buf, theme);
            Paragraph::new(report_lines(report, inner.width, theme)).render(inner, buf);
        });
        frame.reveal_child(buf, fixes, 1, |area, buf| fixes_card(area, buf, theme));
        frame.reveal_child(buf, observability, 2, |area, buf| {
            observability_card(area, buf, theme)
        });
    })
}

fn fixes_card(area: Rect, buf: &mut Buffer, theme: &Theme) {
    let card = Card::titled("☠ Critical Fixes").title_color(theme.danger);
    let inner = render_card(card, area, buf, theme);
    let mut lines = Vec::new();
    for (i, fix) in AUDIT_CRITICAL_FIXES.iter().enumerate() {
        for (j, chunk) in wrap_text(fix, inner.width.saturating_sub(4)).into_iter().enumerate() {
            let lead = if j == 0 {
                Span::styled(
                    format!(" {}  ", i + 1),
                    Style::default()
                        .fg(theme.danger)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw("    ")
            };
            lines.push(Line::from(vec![
                lead,
                Span::styled(chunk, Style::default().fg(theme.fg)),
            ]));
        }
    }
    Paragraph::new(lines).render(inner, buf);
}

fn observability_card(area: Rect, buf: &mut Buffer, theme: &Theme) {
    let inner = render_card(Card::titled("Observability Stack"), area, buf, theme);
    let mut lines: Vec<Line<'_>> = OBSERVABILITY
        .iter()
        .map(|fact| {
            key_value(
                fact.label,
                fact.value,
                inner.width,
                theme,
                Style::default().fg(theme.fg),
            )
        })
        .collect();
    lines.push(Line::default());
    lines.push(Line::from(Button::new("View Health Dashboard").span(theme)));
    Paragraph::new(lines).render(inner, buf);
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{find_row, render_lines};
    use super::super::SectionContext;
    use super::*;
    use crate::audit::FALLBACK_REPORT;
    use crate::ui::motion::MotionPreset;

    fn render(view: &AuditView, width: u16) -> Vec<String> {
        let theme = Theme::default_theme();
        let preset = MotionPreset::resolve(true);
        let now = Instant::now();
        let ctx = SectionContext {
            theme,
            preset: &preset,
            now,
            mounted_at: now,
        };
        render_lines(&blocks(view, width), ctx, width)
    }

    #[test]
    fn test_begin_while_busy_is_ignored() {
        let mut view = AuditView::new(1);
        let now = Instant::now();
        assert_eq!(view.begin(now), Some(1));
        assert!(view.is_analyzing());
        assert_eq!(view.begin(now), None);
    }

    #[test]
    fn test_finish_clears_busy_exactly_once() {
        let mut view = AuditView::new(3);
        let ticket = view.begin(Instant::now()).unwrap();
        assert!(view.finish(ticket, "first".to_string(), Local::now()));
        assert!(!view.is_analyzing());
        assert!(!view.finish(ticket, "second".to_string(), Local::now()));
        assert_eq!(view.report(), Some("first"));
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut view = AuditView::new(5);
        view.begin(Instant::now());
        assert!(!view.finish(4, "old".to_string(), Local::now()));
        assert!(view.is_analyzing());
        assert_eq!(view.report(), None);
    }

    #[test]
    fn test_ready_state_before_report() {
        let lines = render(&AuditView::new(1), 120);
        assert!(find_row(&lines, "Ready for Audit").is_some());
        assert!(find_row(&lines, "No report generated yet").is_some());
        assert!(find_row(&lines, "Run Security Audit").is_some());
    }

    #[test]
    fn test_busy_button_label() {
        let mut view = AuditView::new(1);
        view.begin(Instant::now());
        let lines = render(&view, 120);
        assert!(find_row(&lines, "Analyzing Infrastructure...").is_some());
    }

    #[test]
    fn test_report_renders_with_side_cards() {
        let mut view = AuditView::new(1);
        let ticket = view.begin(Instant::now()).unwrap();
        view.finish(ticket, FALLBACK_REPORT.to_string(), Local::now());
        for width in [120, 60] {
            let lines = render(&view, width);
            assert!(find_row(&lines, "Ready for Audit").is_none());
            assert!(find_row(&lines, "Hardening Recommendations:").is_some());
            assert!(find_row(&lines, "Critical Fixes").is_some());
            assert!(find_row(&lines, "Sentry (Ready)").is_some());
            let first = find_row(&lines, "1. Implement rate limiting").unwrap();
            let last = find_row(&lines, "5. Audit PWA manifest").unwrap();
            assert!(first < last, "width {width}");
        }
    }

    #[test]
    fn test_report_lines_markdown() {
        let theme = Theme::default_theme();
        let lines = report_lines("## Risks\n- **CORS** open\n\nplain", 40, theme);
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(text, vec!["Risks", "• CORS open", "", "plain"]);
        assert!(lines[0].spans[0].style.add_modifier.contains(Modifier::BOLD));
    }
}
