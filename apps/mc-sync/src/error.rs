pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to run {program:?}: {source}")]
	Spawn { program: String, source: std::io::Error },
	#[error("{program:?} did not finish within {timeout_ms} ms.")]
	Timeout { program: String, timeout_ms: u64 },
	#[error("{program:?} exited with {status}: {stderr}")]
	CommandFailed { program: String, status: String, stderr: String },
	#[error("Sync endpoint responded with {status}: {body}")]
	Rejected { status: u16, body: String },
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
}
