//! # Woodwind Model
//!
//! Solid composition, body synthesis and fabrication segmenting.
//!
//! A model is built once as a [`SolidNode`] tree and rendered by a
//! [`SolidBackend`]: [`MeshBackend`] realizes it as a closed mesh through a
//! boolean engine, [`ScriptEmitter`] prints it as OpenSCAD source.
//!
//! ## Example
//!
//! ```rust,no_run
//! use woodwind_geom::{BuildConfig, PiecewiseProfile};
//! use woodwind_model::{BodySpec, Hole, Segmenter, Side};
//!
//! let bore = PiecewiseProfile::cylinder(300.0, 19.0).unwrap();
//! let outer = PiecewiseProfile::cylinder(300.0, 26.0).unwrap();
//!
//! let model = BodySpec::new(&bore, &outer, 300.0)
//!     .with_holes(vec![Hole::new(80.0, 9.0), Hole::new(110.0, 9.5)])
//!     .with_ring_width(1.0)
//!     .synthesize(&BuildConfig::draft())
//!     .unwrap();
//!
//! let mesh = model.to_mesh().unwrap();
//! let halves = Segmenter::new(20.0)
//!     .segment_all(&mesh, &[0.0, 150.0, 300.0], Side::Top)
//!     .unwrap();
//! assert_eq!(halves.len(), 2);
//! ```

pub mod backend;
pub mod body;
pub mod error;
pub mod node;
pub mod segment;

pub use backend::{render, to_script, write_script, MeshBackend, ScriptEmitter, SolidBackend};
pub use body::{BodyModel, BodySpec, CorkSpec, EmbouchureSpec, Hole};
pub use error::{ModelError, ModelResult};
pub use node::{BooleanOperation, Primitive, SolidNode, Transform};
pub use segment::{Segment, Segmenter, Side};
