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

//! A smart contract for keeping sensor readings in ledger world state.
//!
//! Readings are stored as flat JSON records keyed by their iteration. The contract only checks
//! existence and moves records in and out of state; ordering, consensus and rollback of failed
//! invocations belong to the host that supplies the [`TransactionContext`].
//!
//! [`TransactionContext`]: handler::TransactionContext

pub mod contract;
pub mod handler;
pub mod protocol;
pub mod state;

#[macro_use]
extern crate log;
