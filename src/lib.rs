//! # deptui - Terminal Dependency Annotation Viewer
//!
//! A terminal-based viewer and editor for dependency-grammar annotations
//! using ratatui. Tokens are laid out on one line; dependencies are drawn as
//! brackets packed into lanes above (secondary layer) and below (primary
//! layer) the tokens.
//!
//! ## Architecture
//!
//! The application follows an event-driven architecture with clear separation:
//! - `model`: tokens, dependencies and the two sentence variants
//! - `formats`: tabular and annotated codecs, format detection, document loading
//! - `layout`: token columns, lane packing and the z-ordered drawable list
//! - `interaction`: hit-testing, the edit protocol and the command grammar
//! - `state`: the application state driven by events
//! - `event`: keyboard and mouse handling
//! - `ui`: TUI rendering with ratatui
//! - `controller`: the main loop
//! - `terminal`: raw mode and alternate screen, restored on drop and on panic
//! - `logging`: log file setup

pub mod controller;
pub mod event;
pub mod formats;
pub mod interaction;
pub mod layout;
pub mod logging;
pub mod model;
pub mod state;
pub mod terminal;
pub mod text;
pub mod ui;
