//! appstage Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the appstage
//! build staging engine, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          appstage-cli (CLI)             │
//! │      (Drives the Toolstack port)        │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │     (Toolstack, Vanilla, Composer)      │
//! │             BuildStager                 │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, VersionControl, Progress,  │
//! │           CommandRunner)                │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    appstage-adapters (Infrastructure)   │
//! │  (LocalFilesystem, GitDetector, LocalShell)│
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (AppDescriptor, IgnoreList, Slug, ...)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use appstage_core::prelude::*;
//!
//! // 1. Describe the app
//! let app = AppDescriptor::builder("/srv/project")
//!     .document_root("public")
//!     .build()?;
//!
//! // 2. Wire the stager with injected adapters
//! let stager = BuildStager::new(filesystem, vcs, progress);
//! let mut toolstack = create_toolstack(ToolstackKind::Vanilla, stager, runner);
//!
//! // 3. Stage
//! toolstack.prepare(build_dir, app, LocalConfig::default(), BuildSettings::default())?;
//! toolstack.build()?;
//! toolstack.install()?;
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, BuildStager, StagingState, Toolstack, create_toolstack,
        ports::{CommandRunner, Filesystem, ProgressSink, VersionControl},
    };
    pub use crate::domain::{
        AppDescriptor, BuildSettings, DestinationTemplate, DomainError, IgnoreList, LinkOptions,
        LocalConfig, Slug, SpecialDestinations, ToolstackKind,
    };
    pub use crate::error::{ErrorCategory, StageError, StageResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
