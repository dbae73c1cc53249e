pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Unauthorized: {message}")]
	Unauthorized { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<mc_storage::Error> for Error {
	fn from(err: mc_storage::Error) -> Self {
		match err {
			mc_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			mc_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			mc_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}
