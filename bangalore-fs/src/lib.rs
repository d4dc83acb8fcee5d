//! Shared filesystem helpers built on `cap-std` and `camino`.
//!
//! Output files are replaced atomically: content goes to a temporary file in
//! the target directory, which is synced and then renamed over the target.
//! A failed write never leaves a truncated file behind.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::fs::File;
use std::io;
use std::path::Component;

/// What sits at a path that should be a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirState {
    /// A directory.
    Directory,
    /// Nothing.
    Missing,
    /// Something other than a directory.
    NotDirectory,
}

/// Open a UTF-8 file path using ambient authority.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Resolve an ambient directory for the given path and return the directory with the file name.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = path.parent().unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("target should include a file name"))?
        .to_string();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Ensure the parent directory for `path` exists, handling absolute paths safely for cap-std.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base_dir, relative) = base_dir_and_relative(parent)?;
    if relative.as_os_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)?;
    Ok(())
}

/// Classify `path` as a directory, missing, or something else.
pub fn dir_state(path: &Utf8Path) -> io::Result<DirState> {
    match fs_utf8::Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(_) => Ok(DirState::Directory),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(DirState::Missing),
        Err(err) if err.kind() == io::ErrorKind::NotADirectory => Ok(DirState::NotDirectory),
        Err(err) => Err(err),
    }
}

/// Replace `path` with whatever `write` produces, creating parent directories.
///
/// `write` receives a temporary file in the target directory. The file is
/// only renamed over `path` once `write` returns `Ok` and the data is synced;
/// on error the temporary file is removed and `path` is left untouched.
///
/// # Examples
///
/// ```
/// use std::io::Write;
///
/// use camino::Utf8PathBuf;
/// use bangalore_fs::write_atomically;
///
/// let dir = tempfile::tempdir()?;
/// let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
/// let target = root.join("nested/out.txt");
///
/// write_atomically(&target, |file| file.write_all(b"hello"))?;
/// assert_eq!(std::fs::read_to_string(&target)?, "hello");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn write_atomically<F, E>(path: &Utf8Path, write: F) -> Result<(), E>
where
    F: FnOnce(&mut File) -> Result<(), E>,
    E: From<io::Error>,
{
    ensure_parent_dir(path)?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other("target should include a file name"))?;
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(parent)?;
    write(temp.as_file_mut())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

/// Return whether a path exists and is a regular file using capability-based IO.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Split an absolute or relative parent path into an ambient base directory and a relative suffix.
pub fn base_dir_and_relative(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();

    let (base, relative) = match std_parent.components().next() {
        // Windows absolute path with a drive or UNC prefix.
        Some(Component::Prefix(prefix)) => {
            let prefix_str = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;

            let base = Utf8PathBuf::from(prefix_str).join(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .or_else(|_| std_parent.strip_prefix(prefix.as_os_str()))
                .map_err(|_| io::Error::other("failed to strip prefix from parent path"))?
                .to_path_buf();
            (base, relative)
        }
        // Unix-style absolute path.
        Some(Component::RootDir) => {
            let base = Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string());
            let relative = std_parent
                .strip_prefix(base.as_std_path())
                .map_err(|_| io::Error::other("failed to strip root from absolute path"))?
                .to_path_buf();
            (base, relative)
        }
        // Relative path: resolve from the current directory.
        _ => (Utf8PathBuf::from("."), std_parent.to_path_buf()),
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    let relative = Utf8PathBuf::from_path_buf(relative)
        .map_err(|_| io::Error::other("non-UTF-8 parent path"))?;

    Ok((dir, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::io::Write;
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temporary directory")
    }

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir")
    }

    #[rstest]
    fn replaces_existing_file(temp_dir: TempDir) {
        let target = utf8(&temp_dir).join("out.json");
        std::fs::write(&target, "old").expect("seed file");

        write_atomically(&target, |file| file.write_all(b"new")).expect("write succeeds");

        assert_eq!(std::fs::read_to_string(&target).expect("read back"), "new");
    }

    #[rstest]
    fn failed_write_leaves_target_untouched(temp_dir: TempDir) {
        let root = utf8(&temp_dir);
        let target = root.join("out.json");
        std::fs::write(&target, "old").expect("seed file");

        let result: io::Result<()> = write_atomically(&target, |file| {
            file.write_all(b"partial")?;
            Err(io::Error::other("boom"))
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&target).expect("read back"), "old");
        let leftovers = std::fs::read_dir(&root).expect("list dir").count();
        assert_eq!(leftovers, 1, "temporary file should be removed");
    }

    #[rstest]
    fn classifies_directories(temp_dir: TempDir) {
        let root = utf8(&temp_dir);
        let file = root.join("file.txt");
        std::fs::write(&file, "x").expect("write file");

        assert_eq!(dir_state(&root).expect("stat root"), DirState::Directory);
        assert_eq!(dir_state(&root.join("absent")).expect("stat absent"), DirState::Missing);
        assert_eq!(dir_state(&file).expect("stat file"), DirState::NotDirectory);
    }

    #[rstest]
    fn file_is_file_distinguishes_directories(temp_dir: TempDir) {
        let root = utf8(&temp_dir);
        let file = root.join("file.txt");
        std::fs::write(&file, "x").expect("write file");
        std::fs::create_dir(root.join("sub")).expect("create dir");

        assert!(file_is_file(&file).expect("stat file"));
        assert!(!file_is_file(&root.join("sub")).expect("stat dir"));
    }
}
