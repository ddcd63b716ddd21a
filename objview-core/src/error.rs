/// Error taxonomy for mesh loading, frame validation and configuration
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for fallible core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for operations that can fail as a whole
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The mesh source could not be read at all
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read mesh file {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A recoverable problem with a single input line; the line is skipped
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("line {line}: vertex needs three numeric coordinates: {content}")]
    MalformedVertex { line: usize, content: String },

    #[error("line {line}: {reason}: {content}")]
    MalformedFace {
        line: usize,
        content: String,
        reason: String,
    },
}

impl LineError {
    /// 1-based line number the diagnostic refers to
    pub fn line(&self) -> usize {
        match self {
            LineError::MalformedVertex { line, .. } | LineError::MalformedFace { line, .. } => {
                *line
            }
        }
    }
}

/// Why a frame rendered less than the full mesh
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameIssue {
    #[error("no indices to render")]
    EmptyGeometry,

    #[error("invalid number of indices: {len} (must be a multiple of 3)")]
    MalformedIndexBuffer { len: usize },

    #[error("index {index} out of range for {vertex_count} vertices")]
    OutOfRangeIndex { index: u32, vertex_count: usize },
}

/// Configuration file problems
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message_names_index_and_range() {
        let issue = FrameIssue::OutOfRangeIndex {
            index: 7,
            vertex_count: 3,
        };
        assert_eq!(issue.to_string(), "index 7 out of range for 3 vertices");
    }

    #[test]
    fn test_load_error_converts_transparently() {
        let err: Error = LoadError::FileAccess {
            path: PathBuf::from("missing.obj"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        }
        .into();
        assert_eq!(err.to_string(), "cannot read mesh file missing.obj: no such file");
    }

    #[test]
    fn test_line_error_reports_line_number() {
        let err = LineError::MalformedFace {
            line: 12,
            content: "f 1 2".to_string(),
            reason: "face has fewer than 3 vertices".to_string(),
        };
        assert_eq!(err.line(), 12);
        assert!(err.to_string().contains("f 1 2"));
    }
}
