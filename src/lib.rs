//! # Yeelight Remote
//!
//! Stores named webhook triggers in a local key-value store and fires them
//! against a maker-style webhook relay.

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod notifier;
pub mod repositories;
pub mod shell;
pub mod storage;
pub mod telemetry;
pub mod trigger;
pub mod view;
