//! Library crate for employee-tui.
//!
//! This crate exposes the building blocks of the TUI:
//! - REST client for the employee API and its transports (`api`)
//! - Application state, actions and the update loop (`app`)
//! - Command-line configuration and logging setup (`config`)
//! - Error and result types (`error`)
//! - Form validation (`validate`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `employee-tui` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod ui;
pub mod validate;

/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
