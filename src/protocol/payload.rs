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

//! Invocation requests and the payloads they carry.
//!
//! A payload names the contract function to run and passes its arguments as strings, in the same
//! shape ledger clients use to submit chaincode arguments:
//!
//! ```json
//! {"function": "ReadAsset", "args": ["1"]}
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::handler::ApplyError;
use crate::protocol::reading::{Reading, ReadingBuilder};

/// Everything the host hands to the handler for a single invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    txn_id: String,
    payload: Vec<u8>,
}

impl InvocationRequest {
    pub fn new(txn_id: String, payload: Vec<u8>) -> Self {
        InvocationRequest { txn_id, payload }
    }

    /// The id the host assigned to the invocation, used for logging
    pub fn txn_id(&self) -> &str {
        &self.txn_id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// The raw payload of an invocation: a function name and its string arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationPayload {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl InvocationPayload {
    pub fn new(function: &str, args: Vec<String>) -> Self {
        InvocationPayload {
            function: function.to_string(),
            args,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ApplyError> {
        serde_json::from_slice(bytes).map_err(|err| {
            ApplyError::InvalidTransaction(format!("Failed to unmarshal payload: {}", err))
        })
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, ApplyError> {
        serde_json::to_vec(&self).map_err(|err| {
            ApplyError::InternalError(format!("Failed to marshal payload: {}", err))
        })
    }
}

/// A decoded contract function call.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    InitLedger,
    CreateAsset(Reading),
    ReadAsset(String),
    UpdateAsset(Reading),
    DeleteAsset(String),
    AssetExists(String),
    GetAllAssets,
}

impl Action {
    /// The function name this action is invoked by
    pub fn name(&self) -> &'static str {
        match self {
            Action::InitLedger => "InitLedger",
            Action::CreateAsset(_) => "CreateAsset",
            Action::ReadAsset(_) => "ReadAsset",
            Action::UpdateAsset(_) => "UpdateAsset",
            Action::DeleteAsset(_) => "DeleteAsset",
            Action::AssetExists(_) => "AssetExists",
            Action::GetAllAssets => "GetAllAssets",
        }
    }

    /// Decodes an action from the raw bytes of an invocation payload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Action, ApplyError> {
        Action::from_payload(InvocationPayload::from_bytes(bytes)?)
    }

    /// Decodes an action from its function name, checking the number and type of its arguments.
    pub fn from_payload(payload: InvocationPayload) -> Result<Action, ApplyError> {
        let InvocationPayload { function, args } = payload;
        match function.as_str() {
            "InitLedger" => expect_args(&function, args, 0).map(|_| Action::InitLedger),
            "CreateAsset" => reading_from_args(&function, args).map(Action::CreateAsset),
            "UpdateAsset" => reading_from_args(&function, args).map(Action::UpdateAsset),
            "ReadAsset" => key_from_args(&function, args).map(Action::ReadAsset),
            "DeleteAsset" => key_from_args(&function, args).map(Action::DeleteAsset),
            "AssetExists" => key_from_args(&function, args).map(Action::AssetExists),
            "GetAllAssets" => expect_args(&function, args, 0).map(|_| Action::GetAllAssets),
            _ => Err(ApplyError::InvalidTransaction(format!(
                "Unknown function: {}",
                function
            ))),
        }
    }
}

fn expect_args(function: &str, args: Vec<String>, count: usize) -> Result<Vec<String>, ApplyError> {
    if args.len() != count {
        return Err(ApplyError::InvalidTransaction(format!(
            "{} takes {} argument(s), {} given",
            function,
            count,
            args.len()
        )));
    }
    Ok(args)
}

fn key_from_args(function: &str, args: Vec<String>) -> Result<String, ApplyError> {
    let mut args = expect_args(function, args, 1)?.into_iter();
    args.next().ok_or_else(|| {
        ApplyError::InvalidTransaction(format!("{} requires an iteration", function))
    })
}

// Arguments are positional: node, packet_id, Temp, Hum, Pres, length, iteration
fn reading_from_args(function: &str, args: Vec<String>) -> Result<Reading, ApplyError> {
    let args = expect_args(function, args, 7)?;

    ReadingBuilder::new()
        .with_node(args[0].clone())
        .with_packet_id(parse_arg(&args[1], "packet_id")?)
        .with_temp(parse_arg(&args[2], "Temp")?)
        .with_hum(parse_arg(&args[3], "Hum")?)
        .with_pres(args[4].clone())
        .with_length(parse_arg(&args[5], "length")?)
        .with_iteration(args[6].clone())
        .build()
        .map_err(|err| ApplyError::InvalidTransaction(format!("Invalid reading: {}", err)))
}

fn parse_arg<T>(value: &str, name: &str) -> Result<T, ApplyError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|err| {
        ApplyError::InvalidTransaction(format!("Invalid value for {}: '{}': {}", name, value, err))
    })
}
