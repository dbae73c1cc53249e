//! Path conventions of the mirrored workspace.

use crate::DocumentKind;

pub const ROOT_MEMORY_FILE: &str = "MEMORY.md";
pub const MEMORY_DIR: &str = "memory/";
pub const NOTES_DIR: &str = "notes/";

/// Infers the document kind from a workspace-relative, `/`-separated path.
pub fn infer_document_kind(rel_path: &str) -> DocumentKind {
	if rel_path == ROOT_MEMORY_FILE || rel_path.starts_with(MEMORY_DIR) {
		return DocumentKind::Memory;
	}
	if rel_path.starts_with(NOTES_DIR) {
		return DocumentKind::Note;
	}

	DocumentKind::Doc
}

/// First level-1 markdown heading, or the file's base name when there is none.
pub fn title_from_markdown(rel_path: &str, content: &str) -> String {
	let heading = content
		.lines()
		.map(str::trim)
		.find(|line| line.starts_with("# "))
		.map(|line| line.trim_start_matches('#').trim().to_string());

	match heading {
		Some(title) => title,
		None => base_name(rel_path).to_string(),
	}
}

fn base_name(rel_path: &str) -> &str {
	rel_path.rsplit(['/', '\\']).next().unwrap_or(rel_path)
}
