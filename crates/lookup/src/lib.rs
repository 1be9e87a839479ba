//! External lookups for catalog entries.
//!
//! Wraps the public anime metadata API (year, episodes, score, with
//! multi-season aggregation) and the video search API used to find a
//! trailer. Every lookup is optional: [`detail::resolve_detail`] never
//! fails and degrades to absent fields when a service misbehaves.

pub mod aggregate;
pub mod detail;
pub mod error;
pub mod jikan;
pub mod source;
pub mod trailer;
pub mod youtube;
