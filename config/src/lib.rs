//! # Config Crate
//!
//! Centralized configuration constants for the woodwind solid kernel.
//! All tolerances, sampling resolutions and safety limits are defined here
//! so the geometry, mesh and model crates agree on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_QUALITY, DRAFT_QUALITY, EPSILON};
//!
//! let value: f64 = 1e-11;
//! assert!(value.abs() < EPSILON);
//!
//! let draft = true;
//! let quality = if draft { DRAFT_QUALITY } else { DEFAULT_QUALITY };
//! assert_eq!(quality, 16);
//! ```
//!
//! Runtime choices (for example the loop sampling quality of one build) are
//! carried by `woodwind_geom::BuildConfig`, which takes its defaults from
//! here. Nothing in this crate is mutable.

pub mod constants;
