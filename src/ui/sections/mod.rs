//! # Section Views
//!
//! Each top-level screen of the dashboard builds a column of
//! [`ContentBlock`]s. The shell stacks them in a virtual buffer, observes
//! which ones intersect the scroll viewport, drives their reveal animation
//! and copies the visible rows into the content slot.
//!
//! Views never talk to each other. Three of them keep local state
//! ([`ScrapersView`], [`SettingsView`], [`AuditView`]); the rest are pure
//! functions of the static data in [`crate::data`].

pub mod audit;
pub mod dashboard;
pub mod mobile;
pub mod scrapers;
pub mod settings;
pub mod subscriptions;

pub use audit::AuditView;
pub use scrapers::ScrapersView;
pub use settings::{SettingsField, SettingsView};

use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::motion::MotionPreset;
use super::reveal::{self, RevealSpec, RevealState};
use super::theme::Theme;
use super::widgets::Card;

/// Everything a view needs to build its blocks.
#[derive(Debug, Clone, Copy)]
pub struct SectionContext<'a> {
    pub theme: &'a Theme,
    pub preset: &'a MotionPreset,
    pub now: Instant,
    /// When the view was (re)mounted, for mount-time animations.
    pub mounted_at: Instant,
}

/// Per-block render context handed to a block body.
#[derive(Debug, Clone, Copy)]
pub struct BlockFrame<'a> {
    pub ctx: SectionContext<'a>,
    pub spec: RevealSpec,
    pub state: RevealState,
    /// Progress of the block through the viewport, from its top edge entering
    /// at the bottom (0) to its bottom edge leaving at the top (1).
    pub scroll_progress: f32,
}

impl BlockFrame<'_> {
    /// Reveal progress of the `index`-th staggered child.
    pub fn child(&self, index: usize) -> f32 {
        self.state
            .child_progress(self.ctx.now, &self.spec, self.ctx.preset, index)
    }

    /// Draw a staggered child: `draw` renders into the slid rect, then the
    /// child's whole `rect` is faded to its progress.
    pub fn reveal_child(
        &self,
        buf: &mut Buffer,
        rect: Rect,
        index: usize,
        draw: impl FnOnce(Rect, &mut Buffer),
    ) {
        let progress = self.child(index);
        draw(reveal::slide(rect, progress), buf);
        reveal::fade(buf, rect, progress, self.ctx.theme);
    }
}

type BlockBody<'a> = Box<dyn Fn(Rect, &mut Buffer, &BlockFrame<'_>) + 'a>;

/// One vertically stacked piece of a section.
pub struct ContentBlock<'a> {
    pub height: u16,
    pub spec: RevealSpec,
    pub body: BlockBody<'a>,
}

impl<'a> ContentBlock<'a> {
    pub fn new(
        height: u16,
        spec: RevealSpec,
        body: impl Fn(Rect, &mut Buffer, &BlockFrame<'_>) + 'a,
    ) -> Self {
        Self {
            height,
            spec,
            body: Box::new(body),
        }
    }
}

/// Rows between stacked blocks.
pub const BLOCK_GAP: u16 = 1;

/// Total virtual height of a column of blocks.
pub fn total_height(blocks: &[ContentBlock<'_>]) -> u16 {
    let gaps = u16::try_from(blocks.len().saturating_sub(1)).unwrap_or(u16::MAX) * BLOCK_GAP;
    blocks
        .iter()
        .fold(gaps, |acc, b| acc.saturating_add(b.height))
}

/// Split `area` into `count` equal columns with a one-cell gutter.
pub fn columns(area: Rect, count: usize) -> Vec<Rect> {
    let count = count.max(1);
    let constraints = vec![Constraint::Fill(1); count];
    Layout::horizontal(constraints)
        .spacing(1)
        .split(area)
        .to_vec()
}

/// Split `area` into a wide left pane (two thirds) and a narrow right pane.
pub fn two_thirds(area: Rect) -> (Rect, Rect) {
    let parts = Layout::horizontal([Constraint::Fill(2), Constraint::Fill(1)])
        .spacing(1)
        .split(area);
    (parts[0], parts[1])
}

/// Grid columns that fit `width` with cards at least `min_width` wide.
pub fn grid_columns(width: u16, min_width: u16, max: usize) -> usize {
    usize::from(width / min_width.max(1)).clamp(1, max.max(1))
}

/// Draw `card` over `rect` and return its inner area.
pub fn render_card(card: Card, rect: Rect, buf: &mut Buffer, theme: &Theme) -> Rect {
    let block = card.block(theme);
    let inner = block.inner(rect);
    block.render(rect, buf);
    inner
}

/// Rows taken by [`render_header`].
pub const HEADER_HEIGHT: u16 = 3;

/// Section heading: title, dimmed subtitle and right-aligned action buttons.
/// Actions share the title row when they fit, otherwise take the third row.
pub fn render_header(
    rect: Rect,
    buf: &mut Buffer,
    title: Line<'static>,
    subtitle: &str,
    actions: Vec<Span<'static>>,
    theme: &Theme,
) {
    let actions = Line::from(actions).alignment(Alignment::Right);
    let fits = title.width() + actions.width() + 2 <= usize::from(rect.width);
    let lines = vec![
        title,
        Line::from(Span::styled(
            subtitle.to_string(),
            Style::default().fg(theme.fg_dim),
        )),
    ];
    Paragraph::new(lines).render(rect, buf);

    let row = if fits { 0 } else { 2 };
    if rect.height > row {
        let action_rect = Rect {
            y: rect.y + row,
            height: 1,
            ..rect
        };
        actions.render(action_rect, buf);
    }
}

/// Bold title style used by section headings.
pub fn heading_style(theme: &Theme) -> Style {
    Style::default().fg(theme.fg).add_modifier(Modifier::BOLD)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_height_includes_gaps() {
        let blocks = vec![
            ContentBlock::new(5, RevealSpec::block(), |_, _, _| {}),
            ContentBlock::new(7, RevealSpec::block(), |_, _, _| {}),
        ];
        assert_eq!(total_height(&blocks), 13);
        assert_eq!(total_height(&[]), 0);
    }

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_columns(120, 30, 4), 4);
        assert_eq!(grid_columns(70, 30, 4), 2);
        assert_eq!(grid_columns(10, 30, 4), 1);
    }

    #[test]
    fn test_two_thirds_split() {
        let (left, right) = two_thirds(Rect::new(0, 0, 91, 5));
        assert_eq!(left.width, 60);
        assert_eq!(right.width, 30);
    }
}
