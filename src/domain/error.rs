use std::io;
use std::path::PathBuf;

/// File I/O failures that end a run. Command failures never show up here;
/// they are written into the dump instead.
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error("opening dump file {}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("writing dump file {}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("reading dump file {}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("writing compressed dump {}", path.display())]
    Compress { path: PathBuf, source: io::Error },
}
