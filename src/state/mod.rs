/*
 * Copyright 2018 Bitwise IO, Inc.
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

//! World state implementations that can stand in for a ledger host.
//!
//! `BTreeState` keeps every entry in memory in key order, which is enough to execute the contract
//! locally and in tests. The `snapshot` module persists a `BTreeState` between runs of the CLI.

pub mod btree;
pub mod snapshot;

pub use crate::state::btree::BTreeState;
