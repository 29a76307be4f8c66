pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<carrel_storage::Error> for Error {
	fn from(err: carrel_storage::Error) -> Self {
		match err {
			carrel_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			carrel_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			carrel_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}

impl From<carrel_providers::Error> for Error {
	fn from(err: carrel_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
