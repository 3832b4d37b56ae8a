/*
 * Copyright 2017 Bitwise IO, Inc.
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

//! Traits for handling the execution of an invocation.
//!
//! The TransactionHandler trait is implemented by the contract and called by the host once per
//! invocation. The host provides a TransactionContext, which gives access to reading and writing
//! world state and to the receipt of the invocation. Writes made through the context only become
//! durable if the invocation succeeds.

mod error;

pub use crate::handler::error::{ApplyError, ContextError};
use crate::protocol::payload::InvocationRequest;

/// A page of state entries returned by a range query, along with the bookmark to resume from.
///
/// The bookmark is `None` once the range has been exhausted.
pub type StatePage = (Vec<(String, Vec<u8>)>, Option<String>);

pub trait TransactionContext {
    /// get_state_entry queries world state for data at the key given. If the key is set, the
    /// data is returned.
    ///
    /// # Arguments
    ///
    /// * `key` - the key to fetch
    fn get_state_entry(&self, key: &str) -> Result<Option<Vec<u8>>, ContextError> {
        Ok(self
            .get_state_entries(&[key.to_string()])?
            .into_iter()
            .map(|(_, val)| val)
            .next())
    }

    /// get_state_entries queries world state for data at each of the keys in the given list.
    /// Only the keys that have been set are returned.
    ///
    /// # Arguments
    ///
    /// * `keys` - the keys to fetch
    fn get_state_entries(&self, keys: &[String]) -> Result<Vec<(String, Vec<u8>)>, ContextError>;

    /// set_state_entry requests that the provided key is set in world state to the given value.
    ///
    /// # Arguments
    ///
    /// * `key` - key of where to store the data
    /// * `data` - the data to store at the key
    fn set_state_entry(&self, key: String, data: Vec<u8>) -> Result<(), ContextError> {
        self.set_state_entries(vec![(key, data)])
    }

    /// set_state_entries requests that each key in the provided list be set in world state to
    /// its corresponding value.
    ///
    /// # Arguments
    ///
    /// * `entries` - pairs of key and the data to store there
    fn set_state_entries(&self, entries: Vec<(String, Vec<u8>)>) -> Result<(), ContextError>;

    /// delete_state_entry requests that the provided key be unset in world state. The key is
    /// returned if it was set.
    ///
    /// # Arguments
    ///
    /// * `key` - the key to delete
    fn delete_state_entry(&self, key: &str) -> Result<Option<String>, ContextError> {
        Ok(self
            .delete_state_entries(&[key.to_string()])?
            .into_iter()
            .next())
    }

    /// delete_state_entries requests that each of the provided keys be unset in world state. A
    /// list of the keys that were actually deleted is returned.
    ///
    /// # Arguments
    ///
    /// * `keys` - the keys to delete
    fn delete_state_entries(&self, keys: &[String]) -> Result<Vec<String>, ContextError>;

    /// get_state_entries_by_range returns one page of the entries whose keys fall in
    /// `start_key..end_key`, in ascending key order. An empty bound leaves that side of the range
    /// open.
    ///
    /// # Arguments
    ///
    /// * `start_key` - inclusive lower bound of the range
    /// * `end_key` - exclusive upper bound of the range
    /// * `page_size` - the maximum number of entries to return; must be greater than zero
    /// * `bookmark` - the bookmark returned with the previous page, if any
    fn get_state_entries_by_range(
        &self,
        start_key: &str,
        end_key: &str,
        page_size: usize,
        bookmark: Option<&str>,
    ) -> Result<StatePage, ContextError>;

    /// add_receipt_data adds a blob to the result of this invocation
    ///
    /// # Arguments
    ///
    /// * `data` - the data to add
    fn add_receipt_data(&self, data: Vec<u8>) -> Result<(), ContextError>;
}

pub trait TransactionHandler: Send {
    /// family_name should return the name of the contract this handler implements, e.g.
    /// "sensor"
    fn family_name(&self) -> &str;

    /// family_versions should return a list of versions this handler can process, e.g. ["1.0"]
    fn family_versions(&self) -> &[String];

    /// Apply is the single method where all the business logic of the contract is invoked. It is
    /// called by the host for each invocation routed to this handler, with the context that
    /// invocation executes against.
    fn apply(
        &self,
        request: &InvocationRequest,
        context: &mut dyn TransactionContext,
    ) -> Result<(), ApplyError>;
}
