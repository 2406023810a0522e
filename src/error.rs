use std::io;
use std::path::PathBuf;

use goscan_syntax::ParseFailure;
use thiserror::Error;

/// Failure to turn a path or text into a [`GoSource`](crate::GoSource).
///
/// Queries on a loaded source never fail; a declaration that does not
/// match is simply left out.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is a directory", path.display())]
    NotAFile { path: PathBuf },

    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
