//! Toolstacks - the driving port of the staging engine.
//!
//! A toolstack owns a `BuildStager` and decides what "build" and "install"
//! mean for one kind of application. The default trait methods delegate to
//! the stager, so a variant only overrides the steps it changes.

use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tracing::{info, instrument};

use crate::{
    application::{
        ports::{CommandRunner, ProgressSink},
        services::BuildStager,
    },
    domain::{AppDescriptor, BuildSettings, LocalConfig, ToolstackKind},
    error::StageResult,
};

/// The contract every toolstack fulfils.
pub trait Toolstack {
    fn kind(&self) -> ToolstackKind;

    fn stager(&self) -> &BuildStager;

    fn stager_mut(&mut self) -> &mut BuildStager;

    /// Stage the application into the prepared build directory.
    fn build(&mut self) -> StageResult<()>;

    /// Post-build steps run against the source tree.
    fn install(&mut self) -> StageResult<()> {
        Ok(())
    }

    /// Cache key identifying the build's dependencies, if the toolstack has one.
    fn key(&self) -> StageResult<Option<String>> {
        Ok(None)
    }

    fn set_output(&mut self, output: Box<dyn ProgressSink>) {
        self.stager_mut().set_output(output);
    }

    fn add_ignored_files(&mut self, patterns: &[String]) {
        self.stager_mut().add_ignored_files(patterns.iter().cloned());
    }

    fn prepare(
        &mut self,
        build_dir: PathBuf,
        app: AppDescriptor,
        config: LocalConfig,
        settings: BuildSettings,
    ) -> StageResult<()> {
        self.stager_mut().prepare(build_dir, app, config, settings)
    }

    fn can_archive(&self) -> bool {
        self.stager().can_archive()
    }

    fn web_root(&self) -> StageResult<PathBuf> {
        self.stager().web_root()
    }

    fn app_dir(&self) -> StageResult<PathBuf> {
        self.stager().app_dir()
    }

    fn shared_dir(&self) -> StageResult<Option<PathBuf>> {
        self.stager().shared_dir()
    }
}

/// Create the toolstack for `kind`.
///
/// `runner` is only used by toolstacks that shell out.
pub fn create_toolstack(
    kind: ToolstackKind,
    stager: BuildStager,
    runner: Box<dyn CommandRunner>,
) -> Box<dyn Toolstack> {
    match kind {
        ToolstackKind::Vanilla => Box::new(Vanilla::new(stager)),
        ToolstackKind::Composer => Box::new(Composer::new(stager, runner)),
    }
}

// ── Vanilla ──────────────────────────────────────────────────────────────────

/// Plain file staging with no dependency manager.
pub struct Vanilla {
    stager: BuildStager,
}

impl Vanilla {
    pub fn new(stager: BuildStager) -> Self {
        Self { stager }
    }
}

impl Toolstack for Vanilla {
    fn kind(&self) -> ToolstackKind {
        ToolstackKind::Vanilla
    }

    fn stager(&self) -> &BuildStager {
        &self.stager
    }

    fn stager_mut(&mut self) -> &mut BuildStager {
        &mut self.stager
    }

    #[instrument(skip_all, fields(toolstack = "vanilla"))]
    fn build(&mut self) -> StageResult<()> {
        self.stager.copy_to_build_dir()?;
        self.stager.process_special_destinations()
    }

    fn install(&mut self) -> StageResult<()> {
        self.stager
            .copy_git_ignore(self.kind().gitignore_template())
    }
}

// ── Composer ─────────────────────────────────────────────────────────────────

const COMPOSER_JSON: &str = "composer.json";
const COMPOSER_LOCK: &str = "composer.lock";

/// PHP applications managed with Composer.
pub struct Composer {
    stager: BuildStager,
    runner: Box<dyn CommandRunner>,
}

impl Composer {
    pub fn new(stager: BuildStager, runner: Box<dyn CommandRunner>) -> Self {
        Self { stager, runner }
    }
}

impl Toolstack for Composer {
    fn kind(&self) -> ToolstackKind {
        ToolstackKind::Composer
    }

    fn stager(&self) -> &BuildStager {
        &self.stager
    }

    fn stager_mut(&mut self) -> &mut BuildStager {
        &mut self.stager
    }

    /// A project with a `composer.json` is always staged by copy, so that
    /// `composer install` only ever writes into the build.
    #[instrument(skip_all, fields(toolstack = "composer"))]
    fn build(&mut self) -> StageResult<()> {
        let manifest = self.stager.state()?.app().root().join(COMPOSER_JSON);
        let install = self.stager.filesystem().exists(&manifest);
        if install && !self.stager.state()?.copy() {
            self.stager
                .output()
                .write_line("Copying instead of symlinking: dependencies are installed into the build");
            self.stager.use_copy_mode()?;
        }

        let target = self.stager.copy_to_build_dir()?;

        if install {
            info!(dir = %target.display(), "Running composer install");
            self.stager
                .output()
                .write_line("Found a composer.json file; installing dependencies");
            let args = ["install", "--no-progress", "--no-interaction"].map(String::from);
            self.runner.run("composer", &args, &target)?;
        }

        self.stager.process_special_destinations()
    }

    fn install(&mut self) -> StageResult<()> {
        self.stager
            .copy_git_ignore(self.kind().gitignore_template())
    }

    /// `composer-<sha256>` over `composer.json` and, if present, `composer.lock`.
    fn key(&self) -> StageResult<Option<String>> {
        let root = self.stager.state()?.app().root();
        let fs = self.stager.filesystem();

        let manifest = root.join(COMPOSER_JSON);
        if !fs.exists(&manifest) {
            return Ok(None);
        }

        let mut hasher = Sha256::new();
        hasher.update(fs.read(&manifest)?);
        let lock = root.join(COMPOSER_LOCK);
        if fs.exists(&lock) {
            hasher.update(fs.read(&lock)?);
        }

        Ok(Some(format!("composer-{:x}", hasher.finalize())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::{
        MockCommandRunner, MockFilesystem, MockProgressSink, MockVersionControl,
    };
    use std::path::Path;

    const APP_ROOT: &str = "/srv/project/app";
    const BUILD_DIR: &str = "/srv/builds/app";

    fn prepared(kind: ToolstackKind, fs: MockFilesystem, runner: MockCommandRunner) -> Box<dyn Toolstack> {
        let mut output = MockProgressSink::new();
        output.expect_write_line().returning(|_| ());
        let stager = BuildStager::new(
            Box::new(fs),
            Box::new(MockVersionControl::new()),
            Box::new(output),
        );

        let mut toolstack = create_toolstack(kind, stager, Box::new(runner));
        toolstack
            .prepare(
                PathBuf::from(BUILD_DIR),
                AppDescriptor::builder(APP_ROOT).build().unwrap(),
                LocalConfig::default(),
                BuildSettings::default(),
            )
            .unwrap();
        toolstack
    }

    #[test]
    fn factory_picks_variant() {
        for kind in ToolstackKind::ALL {
            let toolstack = prepared(kind, MockFilesystem::new(), MockCommandRunner::new());
            assert_eq!(toolstack.kind(), kind);
        }
    }

    #[test]
    fn vanilla_has_no_key() {
        let toolstack = prepared(
            ToolstackKind::Vanilla,
            MockFilesystem::new(),
            MockCommandRunner::new(),
        );
        assert_eq!(toolstack.key().unwrap(), None);
    }

    #[test]
    fn accessors_delegate_to_stager() {
        let toolstack = prepared(
            ToolstackKind::Vanilla,
            MockFilesystem::new(),
            MockCommandRunner::new(),
        );
        assert_eq!(toolstack.app_dir().unwrap(), PathBuf::from(BUILD_DIR));
        assert_eq!(
            toolstack.web_root().unwrap(),
            PathBuf::from("/srv/builds/app/public")
        );
        assert!(toolstack.can_archive());
    }

    #[test]
    fn composer_runs_install_in_a_copied_tree() {
        let mut fs = MockFilesystem::new();
        fs.expect_symlink().never();
        fs.expect_copy_all()
            .withf(|source, destination, _, _| {
                source == Path::new(APP_ROOT) && destination == Path::new(BUILD_DIR)
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));
        fs.expect_exists()
            .returning(|path| path == Path::new("/srv/project/app/composer.json"));
        fs.expect_glob().returning(|_, _| Ok(vec![]));

        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, args, dir| {
                program == "composer"
                    && args.first().map(String::as_str) == Some("install")
                    && args.iter().any(|a| a == "--no-interaction")
                    && dir == Path::new(BUILD_DIR)
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut toolstack = prepared(ToolstackKind::Composer, fs, runner);
        toolstack.build().unwrap();
        assert!(toolstack.can_archive());
    }

    #[test]
    fn composer_skips_install_without_manifest() {
        let mut fs = MockFilesystem::new();
        fs.expect_symlink().returning(|_, _, _| Ok(()));
        fs.expect_exists().returning(|_| false);
        fs.expect_glob().returning(|_, _| Ok(vec![]));
        let mut runner = MockCommandRunner::new();
        runner.expect_run().never();

        let mut toolstack = prepared(ToolstackKind::Composer, fs, runner);
        toolstack.build().unwrap();
    }

    #[test]
    fn composer_key_hashes_manifest_and_lock() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_read().returning(|path| {
            if path.ends_with(COMPOSER_JSON) {
                Ok(b"{}".to_vec())
            } else {
                Ok(b"lock".to_vec())
            }
        });

        let toolstack = prepared(ToolstackKind::Composer, fs, MockCommandRunner::new());
        let key = toolstack.key().unwrap().unwrap();

        let expected = format!("composer-{:x}", Sha256::digest(b"{}lock"));
        assert_eq!(key, expected);
    }

    #[test]
    fn composer_key_absent_without_manifest() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| false);

        let toolstack = prepared(ToolstackKind::Composer, fs, MockCommandRunner::new());
        assert_eq!(toolstack.key().unwrap(), None);
    }
}
