//! Local filesystem adapter using std::fs.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::{debug, trace};
use walkdir::WalkDir;

use appstage_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::LinkOptions,
    error::{StageError, StageResult},
};

/// Matching rules for exclusion patterns: one path component at a time.
const EXCLUDE_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Matching rules for glob expansion: `*` does not pick up dot-files.
const EXPAND_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read(&self, path: &Path) -> StageResult<Vec<u8>> {
        fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> StageResult<()> {
        create_parent(path)?;
        if is_symlink(path) {
            remove_link(path)?;
        }
        fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn create_dir_all(&self, path: &Path) -> StageResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn copy(&self, source: &Path, destination: &Path) -> StageResult<()> {
        if source.is_dir() {
            return self.copy_all(source, destination, &[], true);
        }
        if is_symlink(destination) {
            remove_link(destination)?;
        }
        copy_file(source, destination)
    }

    fn symlink(&self, target: &Path, link: &Path, options: LinkOptions) -> StageResult<()> {
        fs::symlink_metadata(target).map_err(|e| map_io_error(target, e, "find link target"))?;

        if cfg!(windows) && options.copy_on_windows {
            debug!(target = %target.display(), link = %link.display(), "Copying instead of linking");
            return self.copy(target, link);
        }

        create_parent(link)?;
        let link_target = match (options.relative, link.parent()) {
            (true, Some(parent)) => relative_to(target, parent),
            _ => target.to_path_buf(),
        };

        match fs::symlink_metadata(link) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                if fs::read_link(link).is_ok_and(|current| current == link_target) {
                    trace!(link = %link.display(), "Link already up to date");
                    return Ok(());
                }
                remove_link(link)?;
            }
            Ok(_) => {
                return Err(ApplicationError::FilesystemError {
                    path: link.to_path_buf(),
                    reason: "Failed to create symlink: path exists and is not a link".into(),
                }
                .into());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(map_io_error(link, e, "inspect link")),
        }

        create_symlink(&link_target, link, target.is_dir())
            .map_err(|e| map_io_error(link, e, "create symlink"))
    }

    fn copy_all(
        &self,
        source: &Path,
        destination: &Path,
        exclude: &[String],
        overwrite: bool,
    ) -> StageResult<()> {
        let mut patterns = exclude
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    StageError::from(ApplicationError::InvalidPattern {
                        pattern: p.clone(),
                        reason: e.msg.to_owned(),
                    })
                })
            })
            .collect::<StageResult<Vec<_>>>()?;

        // Never copy the destination into itself.
        if let Ok(inner) = destination.strip_prefix(source) {
            if let Some(Component::Normal(first)) = inner.components().next() {
                patterns.push(Pattern::new(&Pattern::escape(&first.to_string_lossy())).map_err(
                    |e| ApplicationError::InvalidPattern {
                        pattern: first.to_string_lossy().into_owned(),
                        reason: e.msg.to_owned(),
                    },
                )?);
            }
        }

        fs::create_dir_all(destination)
            .map_err(|e| map_io_error(destination, e, "create directory"))?;

        let walker = WalkDir::new(source)
            .min_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                let name = entry.file_name().to_string_lossy();
                !patterns.iter().any(|p| p.matches_with(&name, EXCLUDE_OPTIONS))
            });

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(source).to_path_buf();
                StageError::from(ApplicationError::FilesystemError {
                    path,
                    reason: format!("Failed to walk directory: {e}"),
                })
            })?;
            let relative = entry.path().strip_prefix(source).map_err(|_| {
                StageError::from(ApplicationError::FilesystemError {
                    path: entry.path().to_path_buf(),
                    reason: format!("walked outside '{}'", source.display()),
                })
            })?;
            let target = destination.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&target)
                    .map_err(|e| map_io_error(&target, e, "create directory"))?;
                continue;
            }

            let occupied = fs::symlink_metadata(&target).is_ok();
            if occupied && !overwrite {
                trace!(path = %target.display(), "Keeping existing file");
                continue;
            }

            if file_type.is_symlink() {
                copy_symlink(entry.path(), &target)?;
            } else {
                if occupied && is_symlink(&target) {
                    remove_link(&target)?;
                }
                copy_file(entry.path(), &target)?;
            }
        }

        Ok(())
    }

    fn remove(&self, path: &Path) -> StageResult<()> {
        let metadata =
            fs::symlink_metadata(path).map_err(|e| map_io_error(path, e, "inspect path"))?;
        if metadata.file_type().is_symlink() {
            remove_link(path)
        } else if metadata.is_dir() {
            fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
        } else {
            fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
        }
    }

    fn glob(&self, root: &Path, pattern: &str) -> StageResult<Vec<PathBuf>> {
        let full = format!("{}/{}", Pattern::escape(&root.to_string_lossy()), pattern);
        let paths = glob::glob_with(&full, EXPAND_OPTIONS).map_err(|e| {
            StageError::from(ApplicationError::InvalidPattern {
                pattern: pattern.to_owned(),
                reason: e.msg.to_owned(),
            })
        })?;

        let mut matched = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| {
                StageError::from(ApplicationError::FilesystemError {
                    path: e.path().to_path_buf(),
                    reason: format!("Failed to expand '{pattern}': {}", e.error()),
                })
            })?;
            matched.push(path);
        }
        Ok(matched)
    }
}

/// Express `target` relative to the directory `base`.
///
/// Falls back to `target` when the two share no root (different drives).
fn relative_to(target: &Path, base: &Path) -> PathBuf {
    let target_parts: Vec<_> = target.components().collect();
    let base_parts: Vec<_> = base.components().collect();
    let common = target_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();
    if common == 0 {
        return target.to_path_buf();
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push(Component::ParentDir);
    }
    for part in &target_parts[common..] {
        relative.push(part);
    }
    if relative.as_os_str().is_empty() {
        relative.push(Component::CurDir);
    }
    relative
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}

fn create_parent(path: &Path) -> StageResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .map_err(|e| map_io_error(parent, e, "create parent directory")),
        _ => Ok(()),
    }
}

fn copy_file(source: &Path, destination: &Path) -> StageResult<()> {
    create_parent(destination)?;
    fs::copy(source, destination).map_err(|e| map_io_error(source, e, "copy file"))?;
    Ok(())
}

/// Re-create the link at `source` as `destination`, pointing at the same target.
fn copy_symlink(source: &Path, destination: &Path) -> StageResult<()> {
    create_parent(destination)?;
    let target = fs::read_link(source).map_err(|e| map_io_error(source, e, "read symbolic link"))?;

    if let Ok(metadata) = fs::symlink_metadata(destination) {
        if metadata.file_type().is_symlink() {
            remove_link(destination)?;
        } else if metadata.is_dir() {
            fs::remove_dir_all(destination)
                .map_err(|e| map_io_error(destination, e, "remove directory"))?;
        } else {
            fs::remove_file(destination)
                .map_err(|e| map_io_error(destination, e, "remove file"))?;
        }
    }

    let target_is_dir = source.is_dir();
    create_symlink(&target, destination, target_is_dir)
        .map_err(|e| map_io_error(destination, e, "create symlink"))
}

fn remove_link(path: &Path) -> StageResult<()> {
    fs::remove_file(path)
        .or_else(|e| {
            // Directory symlinks on Windows need remove_dir.
            if cfg!(windows) {
                fs::remove_dir(path)
            } else {
                Err(e)
            }
        })
        .map_err(|e| map_io_error(path, e, "remove link"))
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path, _target_is_dir: bool) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path, target_is_dir: bool) -> io::Result<()> {
    if target_is_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> StageError {
    ApplicationError::io(path, operation, e).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn write_file_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("app/nested/.gitignore");

        LocalFilesystem.write_file(&path, "/vendor/\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "/vendor/\n");
    }

    #[test]
    fn relative_to_walks_up_to_common_ancestor() {
        assert_eq!(
            relative_to(Path::new("/srv/project/app"), Path::new("/srv/builds")),
            PathBuf::from("../project/app")
        );
        assert_eq!(
            relative_to(Path::new("/srv/app/favicon.ico"), Path::new("/srv/app")),
            PathBuf::from("favicon.ico")
        );
        assert_eq!(relative_to(Path::new("/srv"), Path::new("/srv")), PathBuf::from("."));
    }

    #[test]
    fn copy_all_skips_excluded_names_at_every_level() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(&src.join("index.php"), "<?php");
        write(&src.join(".env"), "SECRET=1");
        write(&src.join("lib/.cache/data"), "x");
        write(&src.join("lib/code.php"), "<?php");
        write(&src.join("node_modules/pkg/index.js"), "js");

        let dst = tmp.path().join("dst");
        LocalFilesystem
            .copy_all(&src, &dst, &[".*".into(), "node_modules".into()], true)
            .unwrap();

        assert!(dst.join("index.php").is_file());
        assert!(dst.join("lib/code.php").is_file());
        assert!(!dst.join(".env").exists());
        assert!(!dst.join("lib/.cache").exists());
        assert!(!dst.join("node_modules").exists());
    }

    #[test]
    fn copy_all_does_not_recurse_into_destination() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("app");
        write(&src.join("index.html"), "hi");

        let dst = src.join("build/out");
        LocalFilesystem.copy_all(&src, &dst, &[], true).unwrap();

        assert!(dst.join("index.html").is_file());
        assert!(!dst.join("build").exists());
    }

    #[test]
    fn copy_all_respects_overwrite_flag() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write(&src.join("a.txt"), "new");
        write(&dst.join("a.txt"), "old");

        LocalFilesystem.copy_all(&src, &dst, &[], false).unwrap();
        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "old");

        LocalFilesystem.copy_all(&src, &dst, &[], true).unwrap();
        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "new");
    }

    #[test]
    fn copy_all_rejects_bad_pattern() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFilesystem
            .copy_all(tmp.path(), &tmp.path().join("out"), &["[".into()], true)
            .unwrap_err();
        assert!(matches!(
            err,
            StageError::Application(ApplicationError::InvalidPattern { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn copy_all_recreates_links_without_following() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        write(&src.join("real/file.txt"), "x");
        std::os::unix::fs::symlink("real", src.join("alias")).unwrap();
        // A cycle must not hang the walk.
        std::os::unix::fs::symlink(".", src.join("real/loop")).unwrap();

        let dst = tmp.path().join("dst");
        LocalFilesystem.copy_all(&src, &dst, &[], true).unwrap();

        assert!(is_symlink(&dst.join("alias")));
        assert_eq!(fs::read_link(dst.join("alias")).unwrap(), PathBuf::from("real"));
        assert!(is_symlink(&dst.join("real/loop")));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_is_relative_and_idempotent() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("app");
        fs::create_dir(&target).unwrap();
        let link = tmp.path().join("builds/one");

        let fs_adapter = LocalFilesystem;
        fs_adapter.symlink(&target, &link, LinkOptions::default()).unwrap();
        fs_adapter.symlink(&target, &link, LinkOptions::default()).unwrap();

        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("../app"));
        assert!(link.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_absolute_replaces_stale_link() {
        let tmp = TempDir::new().unwrap();
        let old = tmp.path().join("old");
        let new = tmp.path().join("new");
        fs::create_dir(&old).unwrap();
        fs::create_dir(&new).unwrap();
        let link = tmp.path().join("current");
        let absolute = LinkOptions {
            relative: false,
            ..LinkOptions::default()
        };

        LocalFilesystem.symlink(&old, &link, absolute).unwrap();
        LocalFilesystem.symlink(&new, &link, absolute).unwrap();

        assert_eq!(fs::read_link(&link).unwrap(), new);
    }

    #[test]
    fn symlink_refuses_to_replace_real_file() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("target.txt");
        let link = tmp.path().join("occupied.txt");
        write(&target, "t");
        write(&link, "keep me");

        assert!(
            LocalFilesystem
                .symlink(&target, &link, LinkOptions::default())
                .is_err()
        );
        assert_eq!(fs::read_to_string(&link).unwrap(), "keep me");
    }

    #[test]
    fn symlink_requires_existing_target() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFilesystem
            .symlink(
                &tmp.path().join("missing"),
                &tmp.path().join("link"),
                LinkOptions::default(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            StageError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[test]
    fn glob_expands_relative_to_root() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("favicon.ico"), "ico");
        write(&tmp.path().join("img/a.png"), "a");
        write(&tmp.path().join("img/.b.png"), "b");

        let fs_adapter = LocalFilesystem;
        assert_eq!(
            fs_adapter.glob(tmp.path(), "favicon.ico").unwrap(),
            [tmp.path().join("favicon.ico")]
        );
        assert_eq!(
            fs_adapter.glob(tmp.path(), "img/*.png").unwrap(),
            [tmp.path().join("img/a.png")]
        );
        assert!(fs_adapter.glob(tmp.path(), "robots.txt").unwrap().is_empty());
    }

    #[test]
    fn remove_handles_files_and_trees() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f.txt");
        let tree = tmp.path().join("tree");
        write(&file, "x");
        write(&tree.join("deep/file"), "y");

        LocalFilesystem.remove(&file).unwrap();
        LocalFilesystem.remove(&tree).unwrap();

        assert!(!LocalFilesystem.exists(&file));
        assert!(!LocalFilesystem.exists(&tree));
    }

    #[cfg(unix)]
    #[test]
    fn remove_link_keeps_target() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("dir");
        write(&target.join("keep"), "x");
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        LocalFilesystem.remove(&link).unwrap();

        assert!(!LocalFilesystem.exists(&link));
        assert!(target.join("keep").is_file());
    }
}
