//! Zip packaging of batch outputs

use crate::error::PackagingError;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Bundle `paths` into a new zip archive inside `workspace_dir`
///
/// Each entry is stored under its file's base name, in input order. The
/// archive is named `articles_<token>.zip` with a random token. Colliding
/// base names are not renamed; callers are expected to pass unique names.
pub fn pack(paths: &[PathBuf], workspace_dir: &Path) -> Result<PathBuf, PackagingError> {
    let token = uuid::Uuid::new_v4().simple().to_string();
    let archive_path = workspace_dir.join(format!("articles_{}.zip", &token[..8]));

    let file = File::create(&archive_path)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in paths {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| PackagingError::NoFileName(path.display().to_string()))?;

        writer.start_file(name, options)?;
        let mut input = File::open(path)?;
        io::copy(&mut input, &mut writer)?;
    }

    let mut buffered = writer.finish()?;
    io::Write::flush(&mut buffered)?;

    tracing::debug!(
        archive = %archive_path.display(),
        entries = paths.len(),
        "Packaged articles"
    );
    Ok(archive_path)
}
