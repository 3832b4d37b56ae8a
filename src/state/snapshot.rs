/*
 * Copyright 2021 Cargill Incorporated
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 * -----------------------------------------------------------------------------
 */

//! Saves and restores a `BTreeState` as a JSON object of key to value.
//!
//! Values are written as UTF-8 strings, so a snapshot stays readable when the contract stores
//! JSON records.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::handler::ContextError;
use crate::state::btree::BTreeState;

#[derive(Debug)]
pub enum SnapshotError {
    /// The snapshot file could not be read or written
    Io(std::io::Error),
    /// The snapshot file is not a JSON object of strings
    Json(serde_json::Error),
    /// A value in state is not valid UTF-8 and cannot be written to a snapshot
    InvalidValue(String),
    /// The state could not be accessed
    State(ContextError),
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SnapshotError::Io(err) => Some(err),
            SnapshotError::Json(err) => Some(err),
            SnapshotError::InvalidValue(_) => None,
            SnapshotError::State(err) => Some(err),
        }
    }
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SnapshotError::Io(err) => write!(f, "Unable to access snapshot: {}", err),
            SnapshotError::Json(err) => write!(f, "Malformed snapshot: {}", err),
            SnapshotError::InvalidValue(key) => {
                write!(f, "Value at key '{}' is not valid UTF-8", key)
            }
            SnapshotError::State(err) => write!(f, "Unable to access state: {}", err),
        }
    }
}

impl From<std::io::Error> for SnapshotError {
    fn from(err: std::io::Error) -> Self {
        SnapshotError::Io(err)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotError::Json(err)
    }
}

impl From<ContextError> for SnapshotError {
    fn from(err: ContextError) -> Self {
        SnapshotError::State(err)
    }
}

/// Loads the snapshot at the given path. A missing file is treated as empty state.
pub fn load(path: &Path) -> Result<BTreeState, SnapshotError> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("No snapshot at {}, starting from empty state", path.display());
            return Ok(BTreeState::new());
        }
        Err(err) => return Err(err.into()),
    };

    let entries: BTreeMap<String, String> = serde_json::from_slice(&contents)?;
    debug!("Loaded {} entries from {}", entries.len(), path.display());

    Ok(BTreeState::with_entries(
        entries
            .into_iter()
            .map(|(key, value)| (key, value.into_bytes())),
    ))
}

/// Writes every entry of the given state to the snapshot at the given path.
pub fn save(state: &BTreeState, path: &Path) -> Result<(), SnapshotError> {
    let entries = state
        .entries()?
        .into_iter()
        .map(|(key, value)| match String::from_utf8(value) {
            Ok(value) => Ok((key, value)),
            Err(_) => Err(SnapshotError::InvalidValue(key)),
        })
        .collect::<Result<BTreeMap<String, String>, SnapshotError>>()?;

    fs::write(path, serde_json::to_vec_pretty(&entries)?)?;
    debug!("Saved {} entries to {}", entries.len(), path.display());

    Ok(())
}
