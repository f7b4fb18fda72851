//! Implementation of the `appstage build` command.
//!
//! Responsibility: turn CLI arguments into an app descriptor and settings,
//! run the toolstack, link the web root, and display results. Staging rules
//! live in `appstage-core`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info, instrument};

use appstage_adapters::{GitDetector, LocalFilesystem, LocalShell};
use appstage_core::{
    application::{BuildStager, Toolstack, create_toolstack, ports::Filesystem},
    domain::{AppDescriptor, BuildSettings, LinkOptions, Slug},
    error::StageError,
};

use crate::{
    cli::{BuildArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// What a finished build looks like; printed as JSON with `--output-format json`.
#[derive(Debug, Serialize)]
struct BuildSummary {
    app: String,
    toolstack: String,
    mode: &'static str,
    build_dir: PathBuf,
    web_root: PathBuf,
    shared_dir: Option<PathBuf>,
    web_root_link: Option<PathBuf>,
    key: Option<String>,
    archivable: bool,
}

/// Execute the `appstage build` command.
///
/// Dispatch sequence:
/// 1. Resolve the app root, source directory and app descriptor
/// 2. Pick the build directory, clearing it with `--force`
/// 3. prepare → build → install through the chosen toolstack
/// 4. Link `<source>/<web_root>` to the build's web root
/// 5. Print the summary
#[instrument(skip_all, fields(toolstack = %args.toolstack))]
pub fn execute(args: BuildArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let cwd = std::env::current_dir().with_cli_context(|| "Failed to read the current directory")?;

    // 1. Resolve paths
    let app_root = existing_dir(&cwd, args.app_root.as_deref().unwrap_or(Path::new(".")))?;
    let source_dir = match &args.source_dir {
        Some(dir) => existing_dir(&cwd, dir)?,
        None => app_root.clone(),
    };

    let mut builder = AppDescriptor::builder(&app_root)
        .document_root(args.document_root.clone())
        .move_to_root(args.move_to_root);
    if let Some(name) = &args.name {
        builder = builder.name(name.clone());
    }
    let app = builder.build().map_err(StageError::from)?;
    let app_name = app.name().to_owned();

    // 2. Build directory
    let build_dir = match &args.build_dir {
        Some(dir) => absolute(&cwd, dir),
        None => default_build_dir(&source_dir, &config, &app_name, Local::now()),
    };
    let filesystem = LocalFilesystem::new();
    if filesystem.exists(&build_dir) {
        if !args.force {
            return Err(CliError::BuildDirExists { path: build_dir });
        }
        output.warning(&format!("Removing existing build at {}", build_dir.display()))?;
        filesystem.remove(&build_dir)?;
    }

    debug!(
        app_root = %app_root.display(),
        source_dir = %source_dir.display(),
        build_dir = %build_dir.display(),
        "Paths resolved"
    );

    // 3. Stage
    let local = config.local.local_config();
    let settings = BuildSettings::default()
        .with_copy(args.copy)
        .with_absolute_links(args.absolute_links)
        .with_source_dir(&source_dir)
        .with_multi_app(args.multi_app);

    let mut stager = BuildStager::new(
        Box::new(filesystem),
        Box::new(GitDetector::new()),
        Box::new(output.clone()),
    );
    if let Some(dir) = &config.local.resources_dir {
        stager = stager.with_resources_dir(absolute(&cwd, dir));
    }
    let mut toolstack = create_toolstack(args.toolstack.into(), stager, Box::new(LocalShell::new()));

    output.info(&format!(
        "Building application {} ({})",
        app_name,
        toolstack.kind()
    ))?;

    toolstack.prepare(build_dir.clone(), app, local.clone(), settings)?;
    toolstack.build()?;
    toolstack.install()?;
    let shared_dir = toolstack.shared_dir()?;
    let web_root = toolstack.web_root()?;

    // 4. Web-root link
    let web_root_link = if args.no_web_root_link {
        None
    } else if !filesystem.exists(&web_root) {
        output.warning(&format!(
            "Web root {} does not exist; not linking it",
            web_root.display()
        ))?;
        None
    } else {
        let link = source_dir.join(&local.web_root);
        let options = LinkOptions {
            relative: !args.absolute_links,
            copy_on_windows: local.copy_on_windows,
        };
        filesystem.symlink(&web_root, &link, options)?;
        Some(link)
    };

    info!(build_dir = %build_dir.display(), "Build complete");

    // 5. Report
    let summary = BuildSummary {
        app: app_name,
        toolstack: toolstack.kind().to_string(),
        mode: if toolstack.stager().state()?.copy() {
            "copy"
        } else {
            "symlink"
        },
        key: toolstack.key()?,
        archivable: toolstack.can_archive(),
        build_dir,
        web_root,
        shared_dir,
        web_root_link,
    };
    print_summary(&summary, &output)
}

fn print_summary(summary: &BuildSummary, output: &OutputManager) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        let value = serde_json::to_value(summary).map_err(|e| CliError::IoError {
            message: "Failed to serialise build summary".into(),
            source: std::io::Error::other(e),
        })?;
        output.print_json(&value)?;
        return Ok(());
    }

    output.success(&format!("Build complete for {}", summary.app))?;
    output.field("Build dir", &summary.build_dir.display().to_string())?;
    output.field("Web root", &summary.web_root.display().to_string())?;
    if let Some(link) = &summary.web_root_link {
        output.field("Linked at", &link.display().to_string())?;
    }
    if let Some(shared) = &summary.shared_dir {
        output.field("Shared dir", &shared.display().to_string())?;
    }
    output.field("Mode", summary.mode)?;
    if let Some(key) = &summary.key {
        output.field("Key", key)?;
    }
    Ok(())
}

/// `<source>/<local_dir>/<build_dir>/<slug>-<timestamp>`.
fn default_build_dir(
    source_dir: &Path,
    config: &AppConfig,
    app_name: &str,
    now: DateTime<Local>,
) -> PathBuf {
    source_dir
        .join(&config.local.local_dir)
        .join(&config.local.build_dir)
        .join(format!(
            "{}-{}",
            Slug::new(app_name),
            now.format("%Y-%m-%d--%H-%M-%S")
        ))
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Canonical form of a directory that must already exist.
fn existing_dir(cwd: &Path, path: &Path) -> CliResult<PathBuf> {
    let path = absolute(cwd, path);
    if !path.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("'{}' is not a directory", path.display()),
            source: None,
        });
    }
    fs::canonicalize(&path)
        .with_cli_context(|| format!("Failed to resolve '{}'", path.display()))
}

// ── tests ─────────────────────────────────────────────────────────────────────
