// Copyright 2021 Cargill Incorporated
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::error::Error as StdError;

use crate::handler::{ApplyError, ContextError};
use crate::protocol::reading::ReadingBuildError;

#[derive(Debug)]
pub enum ContractError {
    /// A reading is already stored at the given iteration
    AlreadyExists(String),
    /// No reading is stored at the given iteration
    NotFound(String),
    /// A value handed to the contract is not usable
    InvalidArgument(String),
    /// A reading could not be serialized for storage
    SerializationError(String),
    /// The value stored at `key` is not a valid reading
    DeserializationError {
        key: String,
        source: serde_json::Error,
    },
    /// The host's world state returned an error
    StoreError(ContextError),
}

impl StdError for ContractError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ContractError::AlreadyExists(_) => None,
            ContractError::NotFound(_) => None,
            ContractError::InvalidArgument(_) => None,
            ContractError::SerializationError(_) => None,
            ContractError::DeserializationError { source, .. } => Some(source),
            ContractError::StoreError(err) => Some(err),
        }
    }
}

impl std::fmt::Display for ContractError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ContractError::AlreadyExists(key) => {
                write!(f, "the sensor data {} already exists", key)
            }
            ContractError::NotFound(key) => write!(f, "the sensor data {} does not exist", key),
            ContractError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            ContractError::SerializationError(msg) => {
                write!(f, "failed to serialize sensor data: {}", msg)
            }
            ContractError::DeserializationError { key, source } => write!(
                f,
                "failed to deserialize sensor data stored at {}: {}",
                key, source
            ),
            ContractError::StoreError(err) => write!(f, "failed to access world state: {}", err),
        }
    }
}

impl From<ContextError> for ContractError {
    fn from(err: ContextError) -> Self {
        ContractError::StoreError(err)
    }
}

impl From<ReadingBuildError> for ContractError {
    fn from(err: ReadingBuildError) -> Self {
        ContractError::InvalidArgument(err.to_string())
    }
}

impl From<ContractError> for ApplyError {
    fn from(err: ContractError) -> Self {
        match err {
            ContractError::AlreadyExists(_)
            | ContractError::NotFound(_)
            | ContractError::InvalidArgument(_)
            | ContractError::DeserializationError { .. } => {
                ApplyError::InvalidTransaction(err.to_string())
            }
            ContractError::SerializationError(_) => ApplyError::InternalError(err.to_string()),
            ContractError::StoreError(err) => ApplyError::from(err),
        }
    }
}
