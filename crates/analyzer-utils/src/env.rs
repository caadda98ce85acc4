//! Process environment loading

use std::path::PathBuf;
use tracing::debug;

/// Load variables from a `.env` file in the working directory or its parents
///
/// Variables already present in the process environment win. Returns the path
/// of the file that was loaded, if any.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!(path = %path.display(), "loaded .env file");
            Some(path)
        }
        Err(e) => {
            debug!("no .env file loaded: {}", e);
            None
        }
    }
}
