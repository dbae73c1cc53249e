//! Collects the workspace files that are mirrored as documents.

use std::{collections::BTreeMap, fs, path::Path};

use time::OffsetDateTime;
use walkdir::{DirEntry, WalkDir};

use crate::{Error, Result};
use mc_config::Ingest;
use mc_domain::{clock, workspace};
use mc_service::UpsertDocumentRequest;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceFile {
	/// Relative to the workspace root, always `/`-separated.
	pub rel_path: String,
	pub content: String,
	pub modified_ms: i64,
}
impl WorkspaceFile {
	pub fn into_request(self) -> UpsertDocumentRequest {
		UpsertDocumentRequest {
			kind: workspace::infer_document_kind(&self.rel_path),
			title: workspace::title_from_markdown(&self.rel_path, &self.content),
			path: self.rel_path,
			content: self.content,
			updated_at: self.modified_ms,
		}
	}
}

/// Root files plus every matching file below the configured directories, sorted by path.
///
/// Hidden files and directories are skipped. Unreadable files are logged and left out.
pub fn scan(cfg: &Ingest) -> Result<Vec<WorkspaceFile>> {
	let root = cfg.root.as_path();

	if !root.is_dir() {
		return Err(Error::MissingRoot { path: cfg.root.clone() });
	}

	let mut files = BTreeMap::new();

	for name in &cfg.root_files {
		let path = root.join(name);

		if path.is_file()
			&& let Some(file) = read_file(root, &path)
		{
			files.insert(file.rel_path.clone(), file);
		}
	}
	for dir in &cfg.dirs {
		let dir_path = root.join(dir);

		if !dir_path.is_dir() {
			continue;
		}

		for entry in
			WalkDir::new(&dir_path).into_iter().filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
		{
			let entry = entry?;

			if !entry.file_type().is_file() || !has_extension(entry.path(), &cfg.extension) {
				continue;
			}
			if let Some(file) = read_file(root, entry.path()) {
				files.insert(file.rel_path.clone(), file);
			}
		}
	}

	Ok(files.into_values().collect())
}

fn read_file(root: &Path, path: &Path) -> Option<WorkspaceFile> {
	let rel_path = relative_path(root, path)?;
	let read = fs::read_to_string(path).and_then(|content| {
		let modified = fs::metadata(path)?.modified()?;

		Ok((content, modified))
	});

	match read {
		Ok((content, modified)) => Some(WorkspaceFile {
			rel_path,
			content,
			modified_ms: clock::to_ms(OffsetDateTime::from(modified)),
		}),
		Err(err) => {
			tracing::warn!(path = %path.display(), error = %err, "Skipping unreadable workspace file.");

			None
		},
	}
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
	let rel = path.strip_prefix(root).ok()?;
	let parts = rel
		.components()
		.map(|component| component.as_os_str().to_str())
		.collect::<Option<Vec<_>>>()?;

	Some(parts.join("/"))
}

fn is_hidden(entry: &DirEntry) -> bool {
	entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

fn has_extension(path: &Path, extension: &str) -> bool {
	path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
