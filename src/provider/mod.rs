//! Session data provider.
//!
//! This module talks to an Ergast-compatible motorsport API (jolpica by
//! default) and maps its response into [`RawResultRecord`]s.

pub mod client;

pub use client::{parse_session, ErgastClient, DEFAULT_BASE_URL};
