use std::path::Path;
use std::{fs, io};

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths). A missing directory yields an
/// empty list rather than an error, so callers can treat "no directory"
/// and "no artifacts" uniformly.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	if !dir.as_ref().is_dir() {
		return Ok(files);
	}

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() {
			if path.extension() == Some(std::ffi::OsStr::new(extension)) {
				if let Some(name) = path.file_name() {
					files.push(name.to_string_lossy().to_string());
				}
			}
		}
	}

	files.sort();
	Ok(files)
}
