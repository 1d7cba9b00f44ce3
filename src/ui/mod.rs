//! # UI Module
//!
//! The terminal dashboard: shell state, rendering and the section views.
//!
//! ## Components
//!
//! - [`App`] - Shell state (active section, scroll, sidebar, per-view state)
//! - [`mod@render`] - Draws the shell and the active section
//! - [`sections`] - The six section views
//! - [`motion`], [`reveal`], [`scroll`] - Animation building blocks
//! - [`widgets`], [`theme`] - Card, badge and button primitives and palettes
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────┐
//! │ Brand        │ Search · Alerts · Environment    │
//! │ Health       ├──────────────────────────────────┤
//! │              │                                  │
//! │ Navigation   │   Active section                 │
//! │  1 Dashboard │   (scrollable column of blocks   │
//! │  2 Scrapers  │    revealed as they scroll in)   │
//! │  ...         │                                  │
//! │              │                                  │
//! │ Owner        ├──────────────────────────────────┤
//! │              │ Key hints                        │
//! └──────────────┴──────────────────────────────────┘
//! ```
//!
//! Below 100 columns the sidebar is hidden and slides in over the content
//! with `s`.

pub mod app;
pub mod motion;
pub mod render;
pub mod reveal;
pub mod scroll;
pub mod sections;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use render::render;
