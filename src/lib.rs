//! Ponto TUI - terminal admin dashboard for the Se Liga No Ponto platform
//!
//! This library provides the dashboard's shell and section views, the motion
//! and reveal building blocks they animate with, the mocked operational data
//! they display and the one outbound call: the AI security audit.

pub mod audit;
pub mod config;
pub mod data;
pub mod ui;
