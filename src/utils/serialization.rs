use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("could not access {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("malformed JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_json<T: DeserializeOwned, TPath: AsRef<Path>>(path: TPath) -> Result<T, JsonError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| JsonError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| JsonError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_json<T: Serialize, TPath: AsRef<Path>>(data: &T, path: TPath) -> Result<(), JsonError> {
    let path = path.as_ref();
    let io_err = |source| JsonError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data).map_err(|source| JsonError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_errors() {
        let path = std::env::temp_dir().join("boggle_serialization_test.json");
        let rows = vec![vec!["a".to_string(), "b".to_string()]];
        save_json(&rows, &path).unwrap();
        let back: Vec<Vec<String>> = load_json(&path).unwrap();
        assert_eq!(back, rows);

        std::fs::write(&path, "not json").unwrap();
        let bad: Result<Vec<Vec<String>>, _> = load_json(&path);
        assert!(matches!(bad, Err(JsonError::Parse { .. })));

        let _ = std::fs::remove_file(&path);
        let missing: Result<Vec<Vec<String>>, _> = load_json(&path);
        assert!(matches!(missing, Err(JsonError::Io { .. })));
    }
}
