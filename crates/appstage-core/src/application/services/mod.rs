//! Application services - orchestrate the staging use case.
//!
//! `BuildStager` holds the shared staging logic; `Toolstack` variants drive
//! it for one kind of application.

pub mod build_stager;
pub mod toolstack;

pub use build_stager::{BuildStager, StagingState};
pub use toolstack::{Composer, Toolstack, Vanilla, create_toolstack};
