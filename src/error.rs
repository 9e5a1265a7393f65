use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop the front end before parsing starts. Lexical and
/// syntax problems are not errors here; they are reported as diagnostics.
#[derive(Error, Debug)]
pub enum FrontEndError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
