//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `appstage-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: copy, symlink, remove, glob
//!   - `VersionControl`: repository detection
//!   - `ProgressSink`: human-readable progress lines
//!   - `CommandRunner`: external build tools
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - `Toolstack` (see `crate::application::services::toolstack`)

pub mod output;

pub use output::{CommandRunner, Filesystem, ProgressSink, VersionControl};
