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

use serde::{Deserialize, Serialize};

/// A single sensor reading, as stored in world state.
///
/// The serialized form is a flat JSON object whose field names match what existing ledger
/// clients already read, so the mixed casing is kept on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    node: String,
    packet_id: i64,
    #[serde(rename = "Temp")]
    temp: f64,
    #[serde(rename = "Hum")]
    hum: f64,
    #[serde(rename = "Pres")]
    pres: String,
    length: i64,
    iteration: String,
}

impl Reading {
    /// The identifier of the node that produced the reading
    pub fn node(&self) -> &str {
        &self.node
    }

    pub fn packet_id(&self) -> i64 {
        self.packet_id
    }

    pub fn temp(&self) -> f64 {
        self.temp
    }

    pub fn hum(&self) -> f64 {
        self.hum
    }

    /// The pressure value with the battery annotation appended, e.g. `97170.78_#BAT:75#`
    pub fn pres(&self) -> &str {
        &self.pres
    }

    /// The length of the radio payload the reading arrived in
    pub fn length(&self) -> i64 {
        self.length
    }

    /// The iteration of the reading, which is also its key in state
    pub fn iteration(&self) -> &str {
        &self.iteration
    }
}

#[derive(Debug, PartialEq)]
pub enum ReadingBuildError {
    MissingField(String),
}

impl StdError for ReadingBuildError {}

impl std::fmt::Display for ReadingBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            ReadingBuildError::MissingField(ref s) => write!(f, "'{}' field is required", s),
        }
    }
}

/// Builder used to create a Reading
#[derive(Default, Clone, Debug)]
pub struct ReadingBuilder {
    node: Option<String>,
    packet_id: Option<i64>,
    temp: Option<f64>,
    hum: Option<f64>,
    pres: Option<String>,
    length: Option<i64>,
    iteration: Option<String>,
}

impl ReadingBuilder {
    pub fn new() -> Self {
        ReadingBuilder::default()
    }

    pub fn with_node(mut self, node: String) -> ReadingBuilder {
        self.node = Some(node);
        self
    }

    pub fn with_packet_id(mut self, packet_id: i64) -> ReadingBuilder {
        self.packet_id = Some(packet_id);
        self
    }

    pub fn with_temp(mut self, temp: f64) -> ReadingBuilder {
        self.temp = Some(temp);
        self
    }

    pub fn with_hum(mut self, hum: f64) -> ReadingBuilder {
        self.hum = Some(hum);
        self
    }

    pub fn with_pres(mut self, pres: String) -> ReadingBuilder {
        self.pres = Some(pres);
        self
    }

    pub fn with_length(mut self, length: i64) -> ReadingBuilder {
        self.length = Some(length);
        self
    }

    pub fn with_iteration(mut self, iteration: String) -> ReadingBuilder {
        self.iteration = Some(iteration);
        self
    }

    pub fn build(self) -> Result<Reading, ReadingBuildError> {
        let node = self
            .node
            .ok_or_else(|| ReadingBuildError::MissingField("node".to_string()))?;
        let packet_id = self
            .packet_id
            .ok_or_else(|| ReadingBuildError::MissingField("packet_id".to_string()))?;
        let temp = self
            .temp
            .ok_or_else(|| ReadingBuildError::MissingField("temp".to_string()))?;
        let hum = self
            .hum
            .ok_or_else(|| ReadingBuildError::MissingField("hum".to_string()))?;
        let pres = self
            .pres
            .ok_or_else(|| ReadingBuildError::MissingField("pres".to_string()))?;
        let length = self
            .length
            .ok_or_else(|| ReadingBuildError::MissingField("length".to_string()))?;
        let iteration = self
            .iteration
            .ok_or_else(|| ReadingBuildError::MissingField("iteration".to_string()))?;

        Ok(Reading {
            node,
            packet_id,
            temp,
            hum,
            pres,
            length,
            iteration,
        })
    }
}
