//! Zip packaging of the output directory

use crate::output::{OutputError, OutputResult};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Returns the archive path for an output directory: `<dir>.zip` beside it
pub fn archive_path_for(out_dir: &Path) -> OutputResult<PathBuf> {
    let name = out_dir
        .file_name()
        .ok_or_else(|| OutputError::Write(format!("{} has no base name", out_dir.display())))?;

    let mut file_name = name.to_os_string();
    file_name.push(".zip");
    Ok(out_dir.with_file_name(file_name))
}

/// Compresses the contents of `out_dir` into `<out_dir>.zip`
///
/// Entries are stored relative to `out_dir`, so the archive root holds the
/// directory's contents rather than the directory itself. An existing
/// archive is replaced.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the archive
/// * `Err(OutputError)` - Directory walk, I/O or zip failure
pub fn zip_output_folder(out_dir: &Path) -> OutputResult<PathBuf> {
    let base = out_dir.canonicalize()?;
    let zip_path = archive_path_for(&base)?;

    let file = File::create(&zip_path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = 0usize;
    for entry in WalkDir::new(&base).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(&base)
            .map_err(|e| OutputError::Write(e.to_string()))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
        } else if entry.file_type().is_file() {
            writer.start_file(name, options)?;
            let mut source = File::open(entry.path())?;
            io::copy(&mut source, &mut writer)?;
            entries += 1;
        }
    }

    writer.finish()?;
    tracing::info!("Archived {} files into {}", entries, zip_path.display());
    Ok(zip_path)
}
