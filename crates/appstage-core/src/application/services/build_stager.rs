//! Build Stager - shared staging logic for every toolstack.
//!
//! This service decides how an application's source tree becomes a build
//! directory:
//! 1. `prepare` fixes the inputs and the ignore-list snapshot
//! 2. `copy_to_build_dir` stages the whole tree by copy or symlink
//! 3. `process_special_destinations` relocates individual files
//!
//! Toolstacks own one `BuildStager` each and call into it; nothing here
//! knows about a particular framework.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, ProgressSink, VersionControl},
    },
    domain::{
        AppDescriptor, BuildSettings, DomainValidator, IgnoreList, LinkOptions,
        LocalConfig, Slug, SpecialDestinations, builtin_gitignore,
    },
    error::{StageError, StageResult},
};

/// Everything fixed by `prepare` for one build.
#[derive(Debug, Clone)]
pub struct StagingState {
    build_dir: PathBuf,
    app: AppDescriptor,
    config: LocalConfig,
    settings: BuildSettings,
    ignored: IgnoreList,
    links: LinkOptions,
    build_in_place: bool,
}

impl StagingState {
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn app(&self) -> &AppDescriptor {
        &self.app
    }

    pub fn config(&self) -> &LocalConfig {
        &self.config
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    pub fn ignored(&self) -> &IgnoreList {
        &self.ignored
    }

    pub fn links(&self) -> LinkOptions {
        self.links
    }

    /// Copy mode (as opposed to symlink mode).
    pub fn copy(&self) -> bool {
        self.settings.copy
    }

    /// `true` once the whole tree was staged in one step.
    pub fn build_in_place(&self) -> bool {
        self.build_in_place
    }

    /// `<build dir>/<document root>`.
    pub fn web_root(&self) -> PathBuf {
        self.app.document_root().resolve(&self.build_dir)
    }
}

/// Shared staging engine.
///
/// Orchestrates the filesystem, version-control and progress ports on behalf
/// of a toolstack.
pub struct BuildStager {
    filesystem: Box<dyn Filesystem>,
    vcs: Box<dyn VersionControl>,
    output: Box<dyn ProgressSink>,
    resources_dir: Option<PathBuf>,
    added_ignores: Vec<String>,
    special_destinations: SpecialDestinations,
    state: Option<StagingState>,
}

impl BuildStager {
    /// Create a stager with the given adapters.
    ///
    /// `.gitignore` templates come from the binary unless a resources
    /// directory is set with [`Self::with_resources_dir`].
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        vcs: Box<dyn VersionControl>,
        output: Box<dyn ProgressSink>,
    ) -> Self {
        Self {
            filesystem,
            vcs,
            output,
            resources_dir: None,
            added_ignores: Vec::new(),
            special_destinations: SpecialDestinations::default(),
            state: None,
        }
    }

    /// Look up `.gitignore` templates in `dir` before the built-in ones.
    pub fn with_resources_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resources_dir = Some(dir.into());
        self
    }

    /// Replace the progress sink.
    pub fn set_output(&mut self, output: Box<dyn ProgressSink>) {
        self.output = output;
    }

    /// Add patterns to ignore. Takes effect at the next `prepare`.
    pub fn add_ignored_files<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.added_ignores
            .extend(patterns.into_iter().map(Into::into));
    }

    pub fn special_destinations(&self) -> &SpecialDestinations {
        &self.special_destinations
    }

    pub fn filesystem(&self) -> &dyn Filesystem {
        self.filesystem.as_ref()
    }

    pub fn output(&self) -> &dyn ProgressSink {
        self.output.as_ref()
    }

    /// The state fixed by `prepare`.
    pub fn state(&self) -> StageResult<&StagingState> {
        self.state
            .as_ref()
            .ok_or_else(|| ApplicationError::NotPrepared.into())
    }

    /// Fix the inputs of one build.
    ///
    /// Rebuilds the ignore list from the defaults, the patterns added so far
    /// and the configured web root.
    #[instrument(
        skip_all,
        fields(app = %app.name(), build_dir = %build_dir.display(), copy = settings.copy)
    )]
    pub fn prepare(
        &mut self,
        build_dir: PathBuf,
        app: AppDescriptor,
        config: LocalConfig,
        settings: BuildSettings,
    ) -> StageResult<()> {
        DomainValidator::validate_app(&app)?;
        DomainValidator::validate_settings(&settings)?;
        DomainValidator::validate_local_config(&config).map_err(|e| StageError::Configuration {
            message: e.to_string(),
        })?;
        if !build_dir.is_absolute() {
            return Err(StageError::Configuration {
                message: format!(
                    "build directory must be an absolute path: {}",
                    build_dir.display()
                ),
            });
        }

        let ignored = IgnoreList::snapshot(&self.added_ignores, &config.web_root)?;
        let links = LinkOptions {
            relative: !settings.absolute_links,
            copy_on_windows: config.copy_on_windows,
        };
        debug!(ignored = ?ignored.patterns(), ?links, "Build prepared");

        self.state = Some(StagingState {
            build_dir,
            app,
            config,
            settings,
            ignored,
            links,
            build_in_place: false,
        });
        Ok(())
    }

    /// Stage by copying from now on, whatever the prepared settings said.
    ///
    /// For toolstacks that write into the staged tree. Must run before
    /// `copy_to_build_dir`.
    pub fn use_copy_mode(&mut self) -> StageResult<()> {
        let state = self
            .state
            .as_mut()
            .ok_or(StageError::Application(ApplicationError::NotPrepared))?;
        if !state.settings.copy {
            debug!("Switching to copy mode");
            state.settings.copy = true;
        }
        Ok(())
    }

    /// Copy, or symlink, the whole app root into the build directory.
    ///
    /// Returns the directory the files were staged into.
    #[instrument(skip_all)]
    pub fn copy_to_build_dir(&mut self) -> StageResult<PathBuf> {
        let state = self
            .state
            .as_mut()
            .ok_or(StageError::Application(ApplicationError::NotPrepared))?;

        let target = if state.app.should_move_to_root() {
            state.app.document_root().resolve(&state.build_dir)
        } else {
            state.build_dir.clone()
        };

        if state.settings.copy {
            info!(source = %state.app.root().display(), target = %target.display(), "Copying app");
            self.filesystem.copy_all(
                state.app.root(),
                &target,
                state.ignored.patterns(),
                true,
            )?;
        } else {
            info!(source = %state.app.root().display(), target = %target.display(), "Symlinking app");
            self.filesystem
                .symlink(state.app.root(), &target, state.links)?;
        }

        state.build_in_place = true;
        Ok(target)
    }

    /// Relocate the special destination files (favicon, robots.txt).
    ///
    /// Each file is an independent step: the first failure is returned and
    /// files already relocated stay in place.
    #[instrument(skip_all)]
    pub fn process_special_destinations(&self) -> StageResult<()> {
        let state = self.state()?;
        let web_root = state.web_root();
        let copy = state.copy();

        for special in self.special_destinations.iter() {
            let matched = self
                .filesystem
                .glob(state.app.root(), &special.source_pattern)?;
            if matched.is_empty() {
                continue;
            }

            let into_web_root = special.destination.is_web_root();
            let staged_in_place = into_web_root && state.build_in_place;
            if staged_in_place && !copy {
                // The web root is reached through the bulk symlink.
                debug!(pattern = %special.source_pattern, "Already staged in place");
                continue;
            }

            let abs_destination = special.destination.resolve(&web_root, &state.build_dir);

            for source in matched {
                let rel_source = relative_display(&source, state.app.root());
                if state.ignored.excludes(&rel_source) {
                    debug!(source = %rel_source, "Ignored");
                    continue;
                }

                let web_root_missing = into_web_root && !self.filesystem.is_dir(&web_root);
                let mut destination = abs_destination.clone();
                // Do not overwrite directories with files.
                if !self.filesystem.is_dir(&source)
                    && (web_root_missing || self.filesystem.is_dir(&destination))
                {
                    if let Some(name) = source.file_name() {
                        destination.push(name);
                    }
                }
                if destination == source {
                    continue;
                }
                if staged_in_place && self.filesystem.exists(&destination) {
                    debug!(source = %rel_source, "Already staged in place");
                    continue;
                }

                let verb = if copy { "Copying" } else { "Symlinking" };
                self.output.write_line(&format!(
                    "{verb} {rel_source} to {}",
                    special.destination
                ));

                if self.filesystem.exists(&destination) {
                    let rel_destination = relative_display(&destination, &state.build_dir);
                    warn!(path = %rel_destination, "Overriding existing path");
                    self.output.write_line(&format!(
                        "Overriding existing path '{rel_destination}' in destination"
                    ));
                    self.filesystem.remove(&destination)?;
                }

                if web_root_missing {
                    self.filesystem.create_dir_all(&web_root)?;
                }
                if copy {
                    self.filesystem.copy(&source, &destination)?;
                } else {
                    self.filesystem
                        .symlink(&source, &destination, state.links)?;
                }
            }
        }

        Ok(())
    }

    /// Directory holding data shared between builds, created on demand.
    ///
    /// `None` when no source directory is configured. Multi-app projects get
    /// one subdirectory per app.
    #[instrument(skip_all)]
    pub fn shared_dir(&self) -> StageResult<Option<PathBuf>> {
        let state = self.state()?;
        let Some(source_dir) = &state.settings.source_dir else {
            return Ok(None);
        };

        let mut shared = source_dir.join(&state.config.shared_dir);
        if state.settings.multi_app {
            shared.push(Slug::new(state.app.name()).as_str());
        }
        if !self.filesystem.is_dir(&shared) {
            info!(path = %shared.display(), "Creating shared directory");
            self.filesystem.create_dir_all(&shared)?;
        }

        Ok(Some(shared))
    }

    /// Seed a `.gitignore` in the app root from a template.
    ///
    /// The template is read from the resources directory when it has one,
    /// otherwise from the built-in set. Does nothing when neither has it,
    /// when there is no source directory, when the source directory is
    /// already a repository, or when a `.gitignore` exists in the app root or
    /// source directory.
    #[instrument(skip_all, fields(template = %template))]
    pub fn copy_git_ignore(&self, template: &str) -> StageResult<()> {
        let state = self.state()?;
        let on_disk = self
            .resources_dir
            .as_ref()
            .map(|dir| dir.join(template))
            .filter(|path| self.filesystem.exists(path));
        let builtin = builtin_gitignore(template);
        if on_disk.is_none() && builtin.is_none() {
            debug!("No .gitignore template");
            return Ok(());
        }
        let Some(source_dir) = &state.settings.source_dir else {
            return Ok(());
        };
        if self.vcs.is_repository(source_dir) {
            debug!(path = %source_dir.display(), "Source is a repository; leaving ignores alone");
            return Ok(());
        }

        let app_gitignore = state.app.root().join(".gitignore");
        if !self.filesystem.exists(&app_gitignore)
            && !self.filesystem.exists(&source_dir.join(".gitignore"))
        {
            self.output.write_line("Creating a .gitignore file");
            match (on_disk, builtin) {
                (Some(source), _) => self.filesystem.copy(&source, &app_gitignore)?,
                (None, Some(content)) => self.filesystem.write_file(&app_gitignore, content)?,
                (None, None) => {}
            }
        }
        Ok(())
    }

    /// `<build dir>/<document root>`.
    pub fn web_root(&self) -> StageResult<PathBuf> {
        Ok(self.state()?.web_root())
    }

    /// The build directory.
    pub fn app_dir(&self) -> StageResult<PathBuf> {
        Ok(self.state()?.build_dir.clone())
    }

    /// Whether the build can be archived.
    ///
    /// A tree symlinked in place references live source outside the build.
    pub fn can_archive(&self) -> bool {
        match &self.state {
            Some(state) => !state.build_in_place || state.copy(),
            None => true,
        }
    }
}

/// `path` relative to `base` with `/` separators, or the whole path when it
/// is not below `base`.
fn relative_display(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.display().to_string(),
    }
}
