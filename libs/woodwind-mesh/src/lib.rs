//! # Woodwind Mesh
//!
//! Triangle meshes for woodwind bodies: lofting cross-sections, realizing
//! primitives and combining solids with boolean operations.
//!
//! ## Architecture
//!
//! ```text
//! woodwind-geom (Loop, Profile) → extrude (CrossSectionStack) → Mesh
//!                                 primitives (cylinder, block)  → Mesh
//!                                 boolean (BooleanEngine)       → Mesh
//!                                 export (STL)                  → bytes
//! ```
//!
//! ## Algorithms
//!
//! All algorithms are pure Rust:
//! - **Lofting**: quad-split strips between equal-sized loops, fan caps
//! - **Boolean Operations**: BSP trees (csg.js algorithm)
//!
//! ## Usage
//!
//! ```rust
//! use woodwind_geom::{generators, BuildConfig};
//! use woodwind_mesh::CrossSectionStack;
//!
//! let config = BuildConfig::draft();
//! let section = generators::circle(10.0, &config).unwrap();
//!
//! let mut stack = CrossSectionStack::new();
//! stack.push(0.0, section.clone());
//! stack.push(50.0, section);
//! let mesh = stack.build().unwrap();
//!
//! assert_eq!(mesh.vertex_count(), 32);
//! assert_eq!(mesh.triangle_count(), 2 * 16 + 2 * 14);
//! ```

pub mod boolean;
pub mod error;
pub mod export;
pub mod extrude;
pub mod mesh;
pub mod primitives;
pub mod weld;

pub use boolean::{BooleanEngine, BspEngine};
pub use error::{MeshError, MeshResult};
pub use extrude::{profile_stack, CapStyle, CrossSectionStack};
pub use mesh::Mesh;
