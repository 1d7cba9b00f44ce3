//! # Reveal Animations
//!
//! Scroll-triggered entrance animations for content blocks.
//!
//! ## Overview
//!
//! Each block of a section carries a [`RevealSpec`]. While rendering, the
//! content pipeline measures how much of the block is inside the scroll
//! viewport and feeds that ratio to the block's [`RevealState`]:
//!
//! - entering (ratio ≥ `amount`) starts the entrance transition
//! - leaving resets it unless `once` is set, so scrolling back replays it
//!
//! Progress maps onto cells through [`slide`] (content starts two rows low,
//! the terminal analogue of a 24px slide) and [`fade`] (blank, then dimmed,
//! then normal ink, the analogue of opacity and blur).
//!
//! With a reduced-motion preset nothing is observed and progress is always
//! complete, so children render directly.

use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::motion::MotionPreset;
use super::theme::{blend, Theme};

/// Length of a block entrance.
pub const REVEAL_DURATION: Duration = Duration::from_millis(550);

/// Minimum spacing between staggered children.
pub const MIN_STAGGER: Duration = Duration::from_millis(60);

/// Rows a block travels while entering.
pub const SLIDE_ROWS: f32 = 2.0;

/// Length of one character entrance in [`stagger_text`].
pub const CHAR_DURATION: Duration = Duration::from_millis(600);

/// Delay between consecutive characters in [`stagger_text`].
pub const CHAR_STAGGER: Duration = Duration::from_millis(20);

/// How a block reveals itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealSpec {
    /// Fraction of the block that must be visible before it animates (0..1).
    pub amount: f32,
    /// Extra delay after entering.
    pub delay: Duration,
    /// Animate only the first time the block enters.
    pub once: bool,
    /// The block's body fades its children itself, one stagger step apart.
    pub stagger: bool,
}

impl Default for RevealSpec {
    fn default() -> Self {
        Self {
            amount: 0.18,
            delay: Duration::ZERO,
            once: false,
            stagger: false,
        }
    }
}

impl RevealSpec {
    /// A plain block reveal.
    pub fn block() -> Self {
        Self::default()
    }

    /// A container whose children enter one after another.
    pub fn staggered() -> Self {
        Self {
            stagger: true,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }
}

/// Observation state of one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevealState {
    entered_at: Option<Instant>,
}

impl RevealState {
    /// Feed the visible ratio of the block at `now`.
    pub fn observe(&mut self, ratio: f32, spec: &RevealSpec, now: Instant) {
        let in_view = if spec.amount <= 0.0 {
            ratio > 0.0
        } else {
            ratio >= spec.amount
        };

        if in_view {
            if self.entered_at.is_none() {
                self.entered_at = Some(now);
            }
        } else if !spec.once {
            self.entered_at = None;
        }
    }

    pub fn has_entered(&self) -> bool {
        self.entered_at.is_some()
    }

    /// Eased progress of the block itself.
    pub fn progress(&self, now: Instant, spec: &RevealSpec, preset: &MotionPreset) -> f32 {
        self.progress_after(now, spec.delay, preset)
    }

    /// Eased progress of the `index`-th staggered child.
    pub fn child_progress(
        &self,
        now: Instant,
        spec: &RevealSpec,
        preset: &MotionPreset,
        index: usize,
    ) -> f32 {
        let step = stagger_step(preset);
        let delay = spec.delay + step * u32::try_from(index).unwrap_or(u32::MAX);
        self.progress_after(now, delay, preset)
    }

    fn progress_after(&self, now: Instant, delay: Duration, preset: &MotionPreset) -> f32 {
        if preset.is_reduced() {
            return 1.0;
        }
        let Some(entered_at) = self.entered_at else {
            return 0.0;
        };
        let elapsed = now.saturating_duration_since(entered_at);
        let Some(active) = elapsed.checked_sub(delay) else {
            return 0.0;
        };
        preset
            .transition
            .easing
            .ease(active.as_secs_f32() / REVEAL_DURATION.as_secs_f32())
    }
}

/// Spacing between staggered children: the preset's stagger, at least
/// [`MIN_STAGGER`], zero under reduced motion.
pub fn stagger_step(preset: &MotionPreset) -> Duration {
    if preset.is_reduced() {
        Duration::ZERO
    } else {
        preset.stagger.max(MIN_STAGGER)
    }
}

/// Fraction of a block `[top, top + height)` visible in the viewport
/// `[scroll, scroll + viewport)`. Measured against the smaller of the block
/// and the viewport, so blocks taller than the screen can still fill it.
pub fn visible_ratio(top: u16, height: u16, scroll: u16, viewport: u16) -> f32 {
    if height == 0 || viewport == 0 {
        return 0.0;
    }
    let start = top.max(scroll);
    let end = top.saturating_add(height).min(scroll.saturating_add(viewport));
    if end <= start {
        return 0.0;
    }
    f32::from(end - start) / f32::from(height.min(viewport))
}

/// Progress of a block through the viewport: 0 while its top edge sits at
/// the viewport's bottom, 1 once its bottom edge has left through the top.
pub fn scroll_progress(top: u16, height: u16, scroll: u16, viewport: u16) -> f32 {
    let travel = f32::from(viewport) + f32::from(height);
    if travel <= 0.0 {
        return 0.0;
    }
    let moved = f32::from(scroll) + f32::from(viewport) - f32::from(top);
    (moved / travel).clamp(0.0, 1.0)
}

/// Rect a body is drawn into at `progress`: shifted down while entering.
pub fn slide(rect: Rect, progress: f32) -> Rect {
    let offset = ((1.0 - progress.clamp(0.0, 1.0)) * SLIDE_ROWS).round() as u16;
    let offset = offset.min(rect.height);
    Rect {
        y: rect.y + offset,
        height: rect.height - offset,
        ..rect
    }
}

/// Apply the entrance look to an already drawn `rect` at `progress`.
pub fn fade(buf: &mut Buffer, rect: Rect, progress: f32, theme: &Theme) {
    if progress >= 0.999 {
        return;
    }
    let area = rect.intersection(buf.area);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let cell = &mut buf[(x, y)];
            if progress < 0.2 {
                cell.reset();
                cell.set_style(Style::default().bg(theme.bg));
            } else {
                let fg = blend(theme.bg, cell.fg, progress);
                cell.set_fg(fg);
                if progress < 0.7 {
                    cell.modifier.insert(Modifier::DIM);
                }
            }
        }
    }
}

/// A line whose characters enter one by one since `mounted_at`.
pub fn stagger_text(
    text: &str,
    style: Style,
    mounted_at: Instant,
    now: Instant,
    preset: &MotionPreset,
    theme: &Theme,
) -> Line<'static> {
    if preset.is_reduced() {
        return Line::from(Span::styled(text.to_string(), style));
    }

    let elapsed = now.saturating_duration_since(mounted_at);
    let spans: Vec<Span<'static>> = text
        .chars()
        .enumerate()
        .map(|(i, c)| {
            let delay = CHAR_STAGGER * u32::try_from(i).unwrap_or(u32::MAX);
            let progress = elapsed.checked_sub(delay).map_or(0.0, |active| {
                preset
                    .transition
                    .easing
                    .ease(active.as_secs_f32() / CHAR_DURATION.as_secs_f32())
            });
            if progress <= 0.0 {
                Span::styled(" ", style)
            } else if progress < 1.0 {
                let fg = style.fg.map_or(theme.fg, |fg| blend(theme.bg, fg, progress));
                Span::styled(c.to_string(), style.fg(fg))
            } else {
                Span::styled(c.to_string(), style)
            }
        })
        .collect();
    Line::from(spans)
}

/// True while [`stagger_text`] of `text` is still animating.
pub fn stagger_text_active(
    text: &str,
    mounted_at: Instant,
    now: Instant,
    preset: &MotionPreset,
) -> bool {
    if preset.is_reduced() {
        return false;
    }
    let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    now.saturating_duration_since(mounted_at) < CHAR_STAGGER * chars + CHAR_DURATION
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> MotionPreset {
        MotionPreset::resolve(false)
    }

    fn reduced() -> MotionPreset {
        MotionPreset::resolve(true)
    }

    #[test]
    fn test_not_entered_has_zero_progress() {
        let state = RevealState::default();
        assert_eq!(state.progress(Instant::now(), &RevealSpec::block(), &full()), 0.0);
    }

    #[test]
    fn test_reduced_motion_is_immediately_complete() {
        let state = RevealState::default();
        let spec = RevealSpec::block().with_delay(Duration::from_secs(5));
        let now = Instant::now();
        assert_eq!(state.progress(now, &spec, &reduced()), 1.0);
        assert_eq!(state.child_progress(now, &RevealSpec::staggered(), &reduced(), 9), 1.0);
    }

    #[test]
    fn test_entering_runs_transition_to_completion() {
        let spec = RevealSpec::block();
        let start = Instant::now();
        let mut state = RevealState::default();
        state.observe(0.5, &spec, start);
        assert!(state.has_entered());

        let mid = state.progress(start + Duration::from_millis(100), &spec, &full());
        assert!(mid > 0.0 && mid < 1.0);
        let done = state.progress(start + REVEAL_DURATION, &spec, &full());
        assert_eq!(done, 1.0);
    }

    #[test]
    fn test_below_threshold_does_not_enter() {
        let mut state = RevealState::default();
        state.observe(0.1, &RevealSpec::block(), Instant::now());
        assert!(!state.has_entered());
    }

    #[test]
    fn test_delay_postpones_start() {
        let spec = RevealSpec::block().with_delay(Duration::from_millis(200));
        let start = Instant::now();
        let mut state = RevealState::default();
        state.observe(1.0, &spec, start);
        assert_eq!(state.progress(start + Duration::from_millis(150), &spec, &full()), 0.0);
        assert!(state.progress(start + Duration::from_millis(300), &spec, &full()) > 0.0);
    }

    #[test]
    fn test_leaving_resets_unless_once() {
        let start = Instant::now();

        let repeat = RevealSpec::block();
        let mut state = RevealState::default();
        state.observe(1.0, &repeat, start);
        state.observe(0.0, &repeat, start + Duration::from_secs(1));
        assert!(!state.has_entered());

        let once = RevealSpec::block().once();
        let mut state = RevealState::default();
        state.observe(1.0, &once, start);
        state.observe(0.0, &once, start + Duration::from_secs(1));
        assert!(state.has_entered());
    }

    #[test]
    fn test_staggered_block_replays_after_leaving() {
        let spec = RevealSpec::staggered();
        assert!(!spec.once);

        let start = Instant::now();
        let mut state = RevealState::default();
        state.observe(1.0, &spec, start);
        state.observe(0.0, &spec, start + Duration::from_secs(1));
        assert!(!state.has_entered());

        let back = start + Duration::from_secs(2);
        state.observe(1.0, &spec, back);
        assert_eq!(state.child_progress(back, &spec, &full(), 0), 0.0);
        assert!(state.child_progress(back + Duration::from_millis(100), &spec, &full(), 0) > 0.0);
    }

    #[test]
    fn test_staying_in_view_keeps_start_time() {
        let spec = RevealSpec::block();
        let start = Instant::now();
        let mut state = RevealState::default();
        state.observe(1.0, &spec, start);
        state.observe(1.0, &spec, start + Duration::from_millis(400));
        assert_eq!(state.progress(start + REVEAL_DURATION, &spec, &full()), 1.0);
    }

    #[test]
    fn test_children_stagger_by_minimum_step() {
        let spec = RevealSpec::staggered();
        let start = Instant::now();
        let mut state = RevealState::default();
        state.observe(1.0, &spec, start);

        let at = start + Duration::from_millis(50);
        assert!(state.child_progress(at, &spec, &full(), 0) > 0.0);
        assert_eq!(state.child_progress(at, &spec, &full(), 1), 0.0);
        assert_eq!(stagger_step(&full()), MIN_STAGGER);
        assert_eq!(stagger_step(&reduced()), Duration::ZERO);
    }

    #[test]
    fn test_visible_ratio() {
        assert_eq!(visible_ratio(0, 10, 0, 20), 1.0);
        assert_eq!(visible_ratio(30, 10, 0, 20), 0.0);
        assert_eq!(visible_ratio(15, 10, 0, 20), 0.5);
        // taller than the viewport: filling it counts as fully visible
        assert_eq!(visible_ratio(0, 100, 10, 20), 1.0);
        assert_eq!(visible_ratio(0, 0, 0, 20), 0.0);
    }

    #[test]
    fn test_scroll_progress_spans_entry_to_exit() {
        // block of 10 rows at row 30, viewport of 20 rows
        assert_eq!(scroll_progress(30, 10, 0, 20), 0.0);
        assert_eq!(scroll_progress(30, 10, 10, 20), 0.0);
        assert_eq!(scroll_progress(30, 10, 25, 20), 0.5);
        assert_eq!(scroll_progress(30, 10, 40, 20), 1.0);
        assert_eq!(scroll_progress(30, 10, 90, 20), 1.0);
    }

    #[test]
    fn test_slide_offsets_rows() {
        let rect = Rect::new(0, 10, 20, 8);
        assert_eq!(slide(rect, 1.0), rect);
        assert_eq!(slide(rect, 0.0), Rect::new(0, 12, 20, 6));
        assert_eq!(slide(Rect::new(0, 0, 5, 1), 0.0).height, 0);
    }

    #[test]
    fn test_fade_blanks_then_restores() {
        let theme = Theme::default_theme();
        let area = Rect::new(0, 0, 4, 1);

        let mut buf = Buffer::empty(area);
        buf.set_string(0, 0, "abcd", Style::default().fg(theme.fg));
        fade(&mut buf, area, 0.0, theme);
        assert_eq!(buf[(0, 0)].symbol(), " ");

        let mut buf = Buffer::empty(area);
        buf.set_string(0, 0, "abcd", Style::default().fg(theme.fg));
        fade(&mut buf, area, 0.5, theme);
        assert_eq!(buf[(0, 0)].symbol(), "a");
        assert!(buf[(0, 0)].modifier.contains(Modifier::DIM));

        let mut buf = Buffer::empty(area);
        buf.set_string(0, 0, "abcd", Style::default().fg(theme.fg));
        fade(&mut buf, area, 1.0, theme);
        assert_eq!(buf[(0, 0)].fg, theme.fg);
    }

    #[test]
    fn test_stagger_text_reduced_renders_whole_text() {
        let now = Instant::now();
        let theme = Theme::default_theme();
        let line = stagger_text("Scrapers", Style::default(), now, now, &reduced(), theme);
        assert_eq!(line.to_string(), "Scrapers");
        assert!(!stagger_text_active("Scrapers", now, now, &reduced()));
    }

    #[test]
    fn test_stagger_text_reveals_left_to_right() {
        let start = Instant::now();
        let theme = Theme::default_theme();
        let line = stagger_text(
            "abc",
            Style::default(),
            start,
            start + Duration::from_millis(30),
            &full(),
            theme,
        );
        let rendered = line.to_string();
        assert!(rendered.starts_with('a'));
        assert!(rendered.ends_with(' '));
        assert!(stagger_text_active("abc", start, start, &full()));
        assert!(!stagger_text_active("abc", start, start + Duration::from_secs(2), &full()));
    }
}
