//! objview core library - mesh ingestion and transform pipeline
//!
//! Parses `v`/`f` mesh descriptions into vertex and index buffers, tracks the
//! user-controlled model transform, and composes validated frames for a
//! render target.

pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod parser;
pub mod projection;
pub mod transform;

// Re-export commonly used types
pub use config::{RenderMode, ViewerConfig};
pub use error::{ConfigError, Error, FrameIssue, LineError, LoadError, Result};
pub use frame::{Frame, FrameComposer, RenderTarget};
pub use geometry::{GeometryStore, Triangle, Vertex};
pub use parser::{parse_mesh, FacePolicy, MeshParser, ParsedMesh, ParserOptions};
pub use projection::{Camera, ProjectionMode};
pub use transform::{Command, Transform, TransformState, TransformSteps};
