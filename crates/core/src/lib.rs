//! Catalog browsing, wheel selection and spin bookkeeping.
//!
//! This crate has no network or storage dependencies so it can be driven by
//! the interactive shell, tests, or any future front end. External metadata
//! and trailer lookups live in `aniwheel-lookup`.

pub mod browse;
pub mod catalog;
pub mod custom;
pub mod error;
pub mod events;
pub mod filter;
pub mod pager;
pub mod registry;
pub mod results;
pub mod session;
pub mod state;
pub mod types;
pub mod wheel;
