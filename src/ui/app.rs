//! Shell state: active section, navigation, scrolling and the per-view state
//! of the sections that keep any.

use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use super::motion::{MotionPreference, MotionPreset, MotionProvider, Spring, SpringState};
use super::reveal::RevealState;
use super::scroll::{SmoothScroll, WHEEL_ROWS};
use super::sections::{AuditView, ScrapersView, SettingsView};
use super::theme::Theme;
use crate::audit::AuditOutcome;
use crate::config::Config;

/// Terminals at least this wide keep the sidebar on screen.
pub const SIDEBAR_BREAKPOINT: u16 = 100;

/// Spring of the header's scroll-progress bar.
pub const PROGRESS_SPRING: Spring = Spring {
    stiffness: 220.0,
    damping: 40.0,
    mass: 0.6,
    instant: false,
};

/// Spring of the halo that trails the mouse pointer.
pub const SPOTLIGHT_SPRING: Spring = Spring {
    stiffness: 140.0,
    damping: 24.0,
    mass: 0.8,
    instant: false,
};

/// Top-level screens, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Dashboard,
    Scrapers,
    Mobile,
    Subscriptions,
    Audit,
    Settings,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Self::Dashboard,
        Self::Scrapers,
        Self::Mobile,
        Self::Subscriptions,
        Self::Audit,
        Self::Settings,
    ];

    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Scrapers => "Scrapers & Jobs",
            Self::Mobile => "Mobile (Capacitor)",
            Self::Subscriptions => "Cobrança Asaas",
            Self::Audit => "Segurança & Auditoria",
            Self::Settings => "Config. de Runtime",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Dashboard => "▦",
            Self::Scrapers => "⚙",
            Self::Mobile => "▯",
            Self::Subscriptions => "$",
            Self::Audit => "⛨",
            Self::Settings => "≡",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Section bound to a digit key, `'1'` for the first.
    pub fn from_digit(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
    }
}

/// What the event loop must do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// Start an audit request whose result carries `ticket`.
    RunAudit { ticket: u64 },
    /// Theme or motion preference changed; write the preferences file.
    PersistConfig,
}

pub struct App {
    pub section: Section,
    pub theme: &'static Theme,
    motion: MotionPreference,
    provider: MotionProvider,
    pub scroll: SmoothScroll,
    /// Reveal state of each content block of the current section.
    pub reveals: Vec<RevealState>,
    /// When the current section was mounted.
    pub mounted_at: Instant,
    /// Overlay sidebar on narrow terminals.
    pub sidebar_open: bool,
    /// Highlighted entry while the overlay sidebar has focus.
    pub nav_cursor: usize,
    /// Set by the renderer: the sidebar is always visible.
    pub sidebar_permanent: bool,
    pub sidebar_spring: SpringState,
    pub progress_spring: SpringState,
    /// Last pointer cell reported by the terminal.
    pub pointer: Option<(u16, u16)>,
    pub spotlight_x: SpringState,
    pub spotlight_y: SpringState,
    pub scrapers: ScrapersView,
    pub settings: SettingsView,
    pub audit: AuditView,
    audit_generation: u64,
    pub show_help: bool,
    pub should_quit: bool,
    /// Set by the renderer while anything on screen is still moving.
    pub animating: bool,
    /// Rows of the content viewport from the last frame.
    pub viewport_height: u16,
    last_frame: Option<Instant>,
}

impl App {
    pub fn new(theme: &'static Theme, reduced_motion: bool) -> Self {
        let motion = MotionPreference::new(reduced_motion);
        let provider = motion.subscribe();
        let audit_generation = 1;
        Self {
            section: Section::Dashboard,
            theme,
            motion,
            provider,
            scroll: SmoothScroll::default(),
            reveals: Vec::new(),
            mounted_at: Instant::now(),
            sidebar_open: false,
            nav_cursor: 0,
            sidebar_permanent: false,
            sidebar_spring: SpringState::default(),
            progress_spring: SpringState::default(),
            pointer: None,
            spotlight_x: SpringState::default(),
            spotlight_y: SpringState::default(),
            scrapers: ScrapersView::default(),
            settings: SettingsView::default(),
            audit: AuditView::new(audit_generation),
            audit_generation,
            show_help: false,
            should_quit: false,
            animating: false,
            viewport_height: 0,
            last_frame: None,
        }
    }

    /// Build the app from persisted preferences. A `--reduced-motion` flag wins
    /// over the stored preference; unknown theme names fall back to the default.
    pub fn from_config(config: &Config, force_reduced: bool) -> Self {
        let theme = Theme::by_name(&config.theme).unwrap_or_else(Theme::default_theme);
        let reduced = force_reduced || config.reduced_motion.unwrap_or(false);
        Self::new(theme, reduced)
    }

    /// Preferences to persist.
    pub fn to_config(&self) -> Config {
        Config {
            theme: self.theme.name.to_string(),
            reduced_motion: Some(self.motion.is_reduced()),
        }
    }

    pub fn preset(&self) -> &MotionPreset {
        self.provider.preset()
    }

    pub fn is_reduced_motion(&self) -> bool {
        self.preset().is_reduced()
    }

    pub fn motion(&self) -> &MotionPreference {
        &self.motion
    }

    /// Advance per-frame animation state: motion preference, smooth scroll
    /// and springs.
    pub fn tick(&mut self, now: Instant) {
        if self.provider.refresh() {
            tracing::debug!(reduced = self.is_reduced_motion(), "motion preset changed");
        }
        let dt = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_frame = Some(now);

        let reduced = self.is_reduced_motion();
        let spring = self.preset().spring;
        self.scroll.tick(reduced);
        let sidebar_target = if self.sidebar_open { 1.0 } else { 0.0 };
        self.sidebar_spring.step(sidebar_target, dt, &spring);
        let progress_spring = if reduced { spring } else { PROGRESS_SPRING };
        self.progress_spring
            .step(self.scroll.progress(), dt, &progress_spring);
        if let Some((col, row)) = self.pointer {
            if reduced {
                self.spotlight_x = SpringState::at(f32::from(col));
                self.spotlight_y = SpringState::at(f32::from(row));
            } else {
                self.spotlight_x.step(f32::from(col), dt, &SPOTLIGHT_SPRING);
                self.spotlight_y.step(f32::from(row), dt, &SPOTLIGHT_SPRING);
            }
        }
    }

    /// Centre of the pointer halo, or `None` when it is not drawn.
    pub fn spotlight(&self) -> Option<(f32, f32)> {
        if self.is_reduced_motion() || self.pointer.is_none() {
            return None;
        }
        Some((self.spotlight_x.position, self.spotlight_y.position))
    }

    /// True while springs or the smooth scroll have not come to rest.
    pub fn is_settling(&self) -> bool {
        let sidebar_target = if self.sidebar_open { 1.0 } else { 0.0 };
        let spotlight_moving = self.spotlight().is_some()
            && self.pointer.is_some_and(|(col, row)| {
                !self.spotlight_x.is_settled(f32::from(col))
                    || !self.spotlight_y.is_settled(f32::from(row))
            });
        !self.scroll.is_settled()
            || !self.sidebar_spring.is_settled(sidebar_target)
            || !self.progress_spring.is_settled(self.scroll.progress())
            || spotlight_moving
    }

    /// Show `section`. Switching remounts it: scroll, reveal state and the
    /// view's local state start over, and any pending audit result is dropped.
    pub fn navigate(&mut self, section: Section, now: Instant) {
        self.sidebar_open = false;
        self.nav_cursor = section.index();
        if section == self.section {
            return;
        }
        tracing::info!(from = self.section.label(), to = section.label(), "navigate");
        self.section = section;
        self.scroll.reset();
        self.reveals.clear();
        self.mounted_at = now;
        self.scrapers = ScrapersView::default();
        self.settings = SettingsView::default();
        self.audit_generation += 1;
        self.audit = AuditView::new(self.audit_generation);
    }

    /// Store a finished audit if it belongs to the mounted audit view.
    pub fn finish_audit(&mut self, outcome: AuditOutcome) {
        let ticket = outcome.ticket;
        if self.audit.finish(ticket, outcome.report, Local::now()) {
            tracing::info!(ticket, "audit report received");
        } else {
            tracing::debug!(ticket, "discarding audit result for an unmounted view");
        }
    }

    fn scroll_page(&self) -> f32 {
        f32::from(self.viewport_height.saturating_sub(2).max(1))
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Action::Quit;
        }

        if self.show_help {
            match key.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Action::Quit;
                }
                _ => self.show_help = false,
            }
            return Action::None;
        }

        if self.section == Section::Settings && self.settings.handle_edit_key(key) {
            return Action::None;
        }

        if self.sidebar_open {
            return self.handle_sidebar_key(key, now);
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return Action::Quit;
            }
            KeyCode::Tab => self.navigate(self.section.next(), now),
            KeyCode::BackTab => self.navigate(self.section.previous(), now),
            KeyCode::Char(c @ '1'..='6') => {
                if let Some(section) = Section::from_digit(c) {
                    self.navigate(section, now);
                }
            }
            KeyCode::Char('s') if !self.sidebar_permanent => {
                self.sidebar_open = true;
                self.nav_cursor = self.section.index();
            }
            KeyCode::Char('j') | KeyCode::Char('k') if self.section == Section::Settings => {
                if key.code == KeyCode::Char('j') {
                    self.settings.focus_next();
                } else {
                    self.settings.focus_previous();
                }
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll.scroll_by(1.0),
            KeyCode::Up | KeyCode::Char('k') => self.scroll.scroll_by(-1.0),
            KeyCode::PageDown | KeyCode::Char(' ') => self.scroll.scroll_by(self.scroll_page()),
            KeyCode::PageUp => self.scroll.scroll_by(-self.scroll_page()),
            KeyCode::Home => self.scroll.scroll_by(-self.scroll.target()),
            KeyCode::End => self.scroll.scroll_by(f32::from(u16::MAX)),
            KeyCode::Char('m') => {
                let reduced = self.motion.toggle();
                self.provider.refresh();
                tracing::info!(reduced, "reduced motion toggled");
                return Action::PersistConfig;
            }
            KeyCode::Char('t') => {
                self.theme = self.theme.next();
                tracing::info!(theme = self.theme.name, "theme changed");
                return Action::PersistConfig;
            }
            KeyCode::Char('?') => self.show_help = true,
            _ => return self.handle_section_key(key, now),
        }
        Action::None
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        let len = Section::ALL.len();
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return Action::Quit;
            }
            KeyCode::Esc | KeyCode::Char('s') => self.sidebar_open = false,
            KeyCode::Down | KeyCode::Char('j') => self.nav_cursor = (self.nav_cursor + 1) % len,
            KeyCode::Up | KeyCode::Char('k') => self.nav_cursor = (self.nav_cursor + len - 1) % len,
            KeyCode::Enter => self.navigate(Section::ALL[self.nav_cursor.min(len - 1)], now),
            KeyCode::Char(c @ '1'..='6') => {
                if let Some(section) = Section::from_digit(c) {
                    self.navigate(section, now);
                }
            }
            _ => {}
        }
        Action::None
    }

    fn handle_section_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        match (self.section, key.code) {
            (Section::Scrapers, KeyCode::Char('r')) => {
                if self.scrapers.trigger_all(now) {
                    tracing::info!("triggered all seeders");
                }
            }
            (Section::Audit, KeyCode::Enter | KeyCode::Char('a')) => {
                if let Some(ticket) = self.audit.begin(now) {
                    tracing::info!(ticket, "audit requested");
                    return Action::RunAudit { ticket };
                }
            }
            (Section::Settings, KeyCode::Enter) => self.settings.activate(),
            _ => {}
        }
        Action::None
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.show_help {
            return;
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => self.scroll.scroll_by(WHEEL_ROWS),
            MouseEventKind::ScrollUp => self.scroll.scroll_by(-WHEEL_ROWS),
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                // the halo appears where the pointer first shows up
                if self.pointer.is_none() {
                    self.spotlight_x = SpringState::at(f32::from(mouse.column));
                    self.spotlight_y = SpringState::at(f32::from(mouse.row));
                }
                self.pointer = Some((mouse.column, mouse.row));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn app() -> App {
        App::new(Theme::default_theme(), true)
    }

    #[test]
    fn test_section_order_and_labels() {
        let labels: Vec<&str> = Section::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Dashboard",
                "Scrapers & Jobs",
                "Mobile (Capacitor)",
                "Cobrança Asaas",
                "Segurança & Auditoria",
                "Config. de Runtime",
            ]
        );
    }

    #[test]
    fn test_section_next_previous_wrap() {
        assert_eq!(Section::Settings.next(), Section::Dashboard);
        assert_eq!(Section::Dashboard.previous(), Section::Settings);
        assert_eq!(Section::Mobile.next(), Section::Subscriptions);
    }

    #[test]
    fn test_from_digit() {
        assert_eq!(Section::from_digit('1'), Some(Section::Dashboard));
        assert_eq!(Section::from_digit('6'), Some(Section::Settings));
        assert_eq!(Section::from_digit('0'), None);
        assert_eq!(Section::from_digit('7'), None);
        assert_eq!(Section::from_digit('x'), None);
    }

    #[test]
    fn test_navigate_remounts_views() {
        let mut app = app();
        let now = Instant::now();
        app.navigate(Section::Scrapers, now);
        app.scrapers.trigger_all(now);
        app.reveals.push(RevealState::default());
        app.navigate(Section::Audit, now);
        app.navigate(Section::Scrapers, now);
        assert!(!app.scrapers.is_running_all());
        assert!(app.reveals.is_empty());
        assert_eq!(app.scroll.target(), 0.0);
    }

    #[test]
    fn test_navigate_same_section_keeps_state() {
        let mut app = app();
        let now = Instant::now();
        app.navigate(Section::Scrapers, now);
        app.scrapers.trigger_all(now);
        app.sidebar_open = true;
        app.navigate(Section::Scrapers, now);
        assert!(app.scrapers.is_running_all());
        assert!(!app.sidebar_open);
    }

    #[test]
    fn test_stale_audit_result_is_dropped() {
        let mut app = app();
        let now = Instant::now();
        app.navigate(Section::Audit, now);
        let Action::RunAudit { ticket } = app.handle_key(key(KeyCode::Char('a')), now) else {
            panic!("expected an audit request");
        };
        app.navigate(Section::Dashboard, now);
        app.navigate(Section::Audit, now);
        app.finish_audit(AuditOutcome {
            ticket,
            report: "late".to_string(),
        });
        assert_eq!(app.audit.report(), None);
        assert!(!app.audit.is_analyzing());
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            theme: "no such theme".to_string(),
            reduced_motion: Some(true),
        };
        let app = App::from_config(&config, false);
        assert_eq!(app.theme.name, Theme::default_theme().name);
        assert!(app.is_reduced_motion());

        let app = App::from_config(&Config::default(), true);
        assert!(app.is_reduced_motion());
        assert_eq!(app.to_config().reduced_motion, Some(true));
    }

    #[test]
    fn test_tick_reduced_motion_snaps() {
        let mut app = app();
        app.scroll.set_limit(50);
        app.scroll.scroll_by(10.0);
        app.sidebar_open = true;
        app.tick(Instant::now());
        assert_eq!(app.scroll.offset(), 10);
        assert_eq!(app.sidebar_spring.position, 1.0);
        assert!(!app.is_settling());
    }

    fn moved(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_spotlight_trails_pointer() {
        let mut app = App::new(Theme::default_theme(), false);
        let start = Instant::now();
        app.tick(start);
        assert_eq!(app.spotlight(), None);

        app.handle_mouse(moved(10, 5));
        assert_eq!(app.spotlight(), Some((10.0, 5.0)));

        app.handle_mouse(moved(50, 20));
        app.tick(start + Duration::from_millis(16));
        let (x, y) = app.spotlight().unwrap();
        assert!(x > 10.0 && x < 50.0);
        assert!(y > 5.0 && y < 20.0);
        assert!(app.is_settling());

        app.tick(start + Duration::from_secs(5));
        assert_eq!(app.spotlight(), Some((50.0, 20.0)));
    }

    #[test]
    fn test_spotlight_off_under_reduced_motion() {
        let mut app = app();
        app.handle_mouse(moved(10, 5));
        app.tick(Instant::now());
        assert_eq!(app.spotlight(), None);
        assert!(!app.is_settling());
    }
}
