//! Terminal UI rendering using ratatui.
//!
//! This module contains all the view-specific rendering logic for the TUI.
//! Each view is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`vitals`]: Large heart-rate and SpO2 tiles with trend sparklines
//! - [`waveform`]: Scrolling ECG chart fed by the rolling buffer
//! - [`intervals`]: Table of derived ECG interval figures
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! The main loop in `main.rs` calls into these modules based on the
//! current view:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (vitals/waveform/intervals::render)  │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Help overlay rendered on top (common::render_help)
//! ```

pub mod common;
pub mod intervals;
pub mod theme;
pub mod vitals;
pub mod waveform;

pub use theme::Theme;
