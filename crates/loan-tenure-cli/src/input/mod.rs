pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Load a JSON document from `--input <path>` or, failing that, piped stdin.
/// Returns `None` when neither source supplied anything.
pub fn read_document<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    match path {
        Some(p) => file::read_json(p).map(Some),
        None => stdin::read_stdin(),
    }
}
