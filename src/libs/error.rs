use std::path::PathBuf;

/// Errors raised while reading MAF blocks.
#[derive(Debug, thiserror::Error)]
pub enum MafError {
    /// A malformed line in the alignment file
    #[error("Format error at line {line}: {reason}\nLine: \"{content}\"")]
    Format {
        /// The line number (1-based)
        line: usize,
        /// The offending line, without its line terminator
        content: String,
        /// A human-readable message explaining the error
        reason: String,
    },
    /// The input could not be read, e.g. it is not valid UTF-8
    #[error("Read error at line {line}: {source}")]
    Read {
        line: usize,
        source: std::io::Error,
    },
}

/// Errors raised while writing per-species FASTA files.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("could not create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl WriteError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            WriteError::CreateDir { path, .. } | WriteError::Write { path, .. } => path,
        }
    }
}
