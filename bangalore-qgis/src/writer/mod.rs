//! Serialise a [`Project`] to a `.qgs` document or a `.qgz` archive.
//!
//! Output is always written atomically: the document is produced in a
//! temporary file next to the target and renamed over it once complete.

mod qgs;
mod qgz;

use std::fs;
use std::io;

use bangalore_core::Project;
use bangalore_fs::write_atomically;
use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use thiserror::Error;

/// Errors raised while writing or reading a project file.
#[derive(Debug, Error)]
pub enum ProjectWriteError {
    /// The output path has neither a `.qgs` nor a `.qgz` extension.
    #[error("{path} is not a .qgs or .qgz path")]
    UnsupportedFormat {
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// XML serialisation failure.
    #[error("failed to encode project XML: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Archive failure.
    #[error("failed to write project archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    /// A `.qgz` archive without a `.qgs` member.
    #[error("{path} contains no .qgs document")]
    MissingDocument {
        /// Archive path.
        path: Utf8PathBuf,
    },
}

/// On-disk project format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFormat {
    /// Plain XML document.
    Qgs,
    /// Zip archive holding the XML document.
    Qgz,
}

impl ProjectFormat {
    /// Pick the format for `path`; extensions are matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectWriteError::UnsupportedFormat`] for any other
    /// extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use bangalore_qgis::ProjectFormat;
    /// use camino::Utf8Path;
    ///
    /// assert_eq!(ProjectFormat::from_path(Utf8Path::new("map.QGZ"))?, ProjectFormat::Qgz);
    /// assert!(ProjectFormat::from_path(Utf8Path::new("map.xml")).is_err());
    /// # Ok::<(), bangalore_qgis::ProjectWriteError>(())
    /// ```
    pub fn from_path(path: &Utf8Path) -> Result<Self, ProjectWriteError> {
        match path.extension().map(str::to_ascii_lowercase).as_deref() {
            Some("qgs") => Ok(Self::Qgs),
            Some("qgz") => Ok(Self::Qgz),
            _ => Err(ProjectWriteError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Write `project` to `path` in the format its extension names.
///
/// # Errors
///
/// Returns [`ProjectWriteError`] when the extension is unsupported or the
/// file cannot be produced. The target is left untouched on failure.
pub fn write_project(project: &Project, path: &Utf8Path) -> Result<(), ProjectWriteError> {
    let format = ProjectFormat::from_path(path)?;
    write_atomically(path, |file| match format {
        ProjectFormat::Qgs => qgs::write_document(project, io::BufWriter::new(file)),
        ProjectFormat::Qgz => qgz::write_archive(project, &document_name(path), file),
    })?;
    info!("wrote {} layer(s) to {path}", project.layers().len());
    Ok(())
}

/// Read back the XML document of a project file.
///
/// # Errors
///
/// Returns [`ProjectWriteError`] when the file cannot be read or a `.qgz`
/// holds no document.
pub fn read_project_document(path: &Utf8Path) -> Result<String, ProjectWriteError> {
    match ProjectFormat::from_path(path)? {
        ProjectFormat::Qgs => Ok(fs::read_to_string(path)?),
        ProjectFormat::Qgz => qgz::read_document(path),
    }
}

/// Name of the `.qgs` member stored inside a `.qgz` archive.
fn document_name(path: &Utf8Path) -> String {
    format!("{}.qgs", path.file_stem().unwrap_or("project"))
}
