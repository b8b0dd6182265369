use std::path::PathBuf;

/// Why a dataset could not be made available
#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to download {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("download of {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("malformed CSV in {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("required column '{column}' missing from {}", .path.display())]
    MissingColumn { column: &'static str, path: PathBuf },

    #[error("CSV reader task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AcquisitionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            AcquisitionError::NotFound(path)
        } else {
            AcquisitionError::Io { path, source }
        }
    }
}
