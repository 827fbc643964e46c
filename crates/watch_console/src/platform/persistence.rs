use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use watch_core::Endpoint;
use watch_engine::{read_if_present, AtomicFileWriter};
use watch_logging::{watch_error, watch_info, watch_warn};

const STATE_FILENAME: &str = "console_state.ron";
const STATE_DIRNAME: &str = ".keyword_watch";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedState {
    backend_url: Option<String>,
}

/// Directory holding the persisted endpoint, below the working directory.
pub(crate) fn state_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(STATE_DIRNAME)
}

pub(crate) fn load_endpoint(dir: &Path) -> Option<Endpoint> {
    let content = match read_if_present(dir, STATE_FILENAME) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(err) => {
            watch_warn!("Failed to read persisted state from {:?}: {}", dir, err);
            return None;
        }
    };

    let state: PersistedState = match ron::from_str(&content) {
        Ok(state) => state,
        Err(err) => {
            watch_warn!("Failed to parse persisted state in {:?}: {}", dir, err);
            return None;
        }
    };

    let raw = state.backend_url?;
    match Endpoint::parse(&raw) {
        Ok(endpoint) => {
            watch_info!("Loaded persisted endpoint {}", endpoint);
            Some(endpoint)
        }
        Err(err) => {
            watch_warn!("Ignoring persisted endpoint {:?}: {}", raw, err);
            None
        }
    }
}

pub(crate) fn save_endpoint(dir: &Path, endpoint: Option<&Endpoint>) {
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let Some(endpoint) = endpoint else {
        if let Err(err) = writer.remove(STATE_FILENAME) {
            watch_error!("Failed to remove persisted state in {:?}: {}", dir, err);
        }
        return;
    };

    let state = PersistedState {
        backend_url: Some(endpoint.as_str().to_string()),
    };
    let content = match ron::ser::to_string_pretty(&state, ron::ser::PrettyConfig::new()) {
        Ok(text) => text,
        Err(err) => {
            watch_error!("Failed to serialize persisted state: {}", err);
            return;
        }
    };

    if let Err(err) = writer.write(STATE_FILENAME, &content) {
        watch_error!("Failed to write persisted state to {:?}: {}", dir, err);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn endpoint_round_trips_through_disk() {
        let temp = TempDir::new().unwrap();
        let endpoint = Endpoint::parse("https://bot.example.com").unwrap();

        assert_eq!(load_endpoint(temp.path()), None);
        save_endpoint(temp.path(), Some(&endpoint));
        assert_eq!(load_endpoint(temp.path()), Some(endpoint));

        save_endpoint(temp.path(), None);
        assert_eq!(load_endpoint(temp.path()), None);
    }

    #[test]
    fn corrupt_or_invalid_state_is_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(STATE_FILENAME), "not ron at all (").unwrap();
        assert_eq!(load_endpoint(temp.path()), None);

        fs::write(
            temp.path().join(STATE_FILENAME),
            r#"(backend_url: Some("bot.example.com"))"#,
        )
        .unwrap();
        assert_eq!(load_endpoint(temp.path()), None);
    }
}
