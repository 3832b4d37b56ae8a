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

use std::error::Error;
use std::fmt;

use sensor_contract::contract::ContractError;
use sensor_contract::handler::{ApplyError, ContextError};
use sensor_contract::state::snapshot::SnapshotError;

#[derive(Debug)]
pub enum CliError {
    /// An argument passed on the command line did not conform to the expected format.
    InvalidArgument(String),
    /// The contract rejected the invocation or failed while running it.
    Apply(ApplyError),
    /// The state snapshot could not be loaded or saved.
    Snapshot(SnapshotError),
    /// Writing the invocation result failed.
    Io(std::io::Error),
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CliError::InvalidArgument(_) => None,
            CliError::Apply(err) => Some(err),
            CliError::Snapshot(err) => Some(err),
            CliError::Io(err) => Some(err),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Apply(err) => write!(f, "Invocation failed: {}", err),
            CliError::Snapshot(err) => write!(f, "{}", err),
            CliError::Io(err) => write!(f, "IoError: {}", err),
        }
    }
}

impl From<ApplyError> for CliError {
    fn from(err: ApplyError) -> Self {
        CliError::Apply(err)
    }
}

impl From<ContextError> for CliError {
    fn from(err: ContextError) -> Self {
        CliError::Apply(ApplyError::from(err))
    }
}

impl From<ContractError> for CliError {
    fn from(err: ContractError) -> Self {
        match err {
            ContractError::InvalidArgument(msg) => CliError::InvalidArgument(msg),
            err => CliError::Apply(ApplyError::from(err)),
        }
    }
}

impl From<SnapshotError> for CliError {
    fn from(err: SnapshotError) -> Self {
        CliError::Snapshot(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}
