use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Workspace root {path:?} is not a directory.")]
	MissingRoot { path: PathBuf },
	#[error(transparent)]
	Walk(#[from] walkdir::Error),
	#[error(transparent)]
	Service(#[from] mc_service::Error),
}
