//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::CliError;

/// Map domain/service errors to a string for CLI output: the stage-prefixed message,
/// followed by the hint when there is one.
pub fn map_error(e: &CliError) -> String {
    match e.hint() {
        Some(hint) => format!("{}\nHint: {}", e, hint),
        None => e.to_string(),
    }
}
