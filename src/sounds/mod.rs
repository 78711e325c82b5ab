pub mod index;
pub mod tags;

use std::path::PathBuf;
use thiserror::Error;

pub use index::{strip_marker, SoundIndex};
pub use tags::TagMatch;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("sound directory is missing or unreadable: {}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
