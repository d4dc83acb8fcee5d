//! Zipped project archives.

use std::fs::File;
use std::io::{Read, Seek, Write};

use bangalore_core::Project;
use camino::Utf8Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{ProjectWriteError, qgs};

/// Write a zip archive holding the project document as `document`.
pub(super) fn write_archive<W: Write + Seek>(
    project: &Project,
    document: &str,
    out: W,
) -> Result<(), ProjectWriteError> {
    let mut zip = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(document, options)?;
    qgs::write_document(project, &mut zip)?;
    zip.finish()?;
    Ok(())
}

/// Extract the first `.qgs` member of the archive at `path`.
pub(super) fn read_document(path: &Utf8Path) -> Result<String, ProjectWriteError> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let name = archive
        .file_names()
        .find(|name| name.ends_with(".qgs"))
        .map(str::to_owned)
        .ok_or_else(|| ProjectWriteError::MissingDocument {
            path: path.to_path_buf(),
        })?;
    let mut document = String::new();
    archive.by_name(&name)?.read_to_string(&mut document)?;
    Ok(document)
}
