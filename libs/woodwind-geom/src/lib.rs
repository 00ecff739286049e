//! # Woodwind Geom
//!
//! Planar geometry for the woodwind solid kernel: the pieces that turn a
//! diameter profile into 2D cross-sections.
//!
//! ## Architecture
//!
//! ```text
//! Profile (design subsystem) ──► diameters at z
//!                                    │
//! fresnel / Transition ──────────────┤ (smooth joins)
//!                                    ▼
//!                        Loop generators (BuildConfig.quality)
//!                                    │
//!                                    ▼
//!                        Loop (area, centroid, offsets)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use woodwind_geom::{generators, BuildConfig};
//!
//! let config = BuildConfig::draft();
//! let bore = generators::circle(19.0, &config).unwrap();
//! assert_eq!(bore.len(), 16);
//! assert!(bore.is_counter_clockwise());
//! ```

pub mod config;
pub mod error;
pub mod fresnel;
pub mod lerp;
pub mod loops;
pub mod point;
pub mod profile;
pub mod transition;

pub use config::BuildConfig;
pub use error::{GeomError, GeomResult};
pub use fresnel::{cornu, fresnel};
pub use lerp::lerp;
pub use loops::{generators, Extent, Loop, OffsetMode};
pub use point::Point;
pub use profile::{Diameters, PiecewiseProfile, Profile, SpanShape};
pub use transition::Transition;
