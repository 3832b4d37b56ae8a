/*
 * Copyright 2019 Bitwise IO, Inc.
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

//! An in-memory world state backed by `std::collections::BTreeMap`.

use std::collections::BTreeMap;
use std::ops::Bound::{self, Excluded, Included, Unbounded};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::handler::{ContextError, StatePage, TransactionContext};

/// An in-memory implementation of world state.
///
/// Entries are kept in natural key order so range queries page through them the same way a
/// ledger's state database does. Clones share the same underlying entries.
#[derive(Debug, Clone, Default)]
pub struct BTreeState {
    entries: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    receipt_data: Arc<RwLock<Vec<Vec<u8>>>>,
}

impl BTreeState {
    pub fn new() -> Self {
        BTreeState::default()
    }

    /// Creates a state pre-populated with the given entries.
    pub fn with_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<u8>)>,
    {
        BTreeState {
            entries: Arc::new(RwLock::new(entries.into_iter().collect())),
            receipt_data: Arc::default(),
        }
    }

    /// Returns a copy of every entry currently in state.
    pub fn entries(&self) -> Result<BTreeMap<String, Vec<u8>>, ContextError> {
        Ok(self.read_entries()?.clone())
    }

    /// Returns the number of entries in state.
    pub fn count(&self) -> Result<usize, ContextError> {
        Ok(self.read_entries()?.len())
    }

    /// Removes and returns the receipt data added since the last call.
    pub fn take_receipt_data(&self) -> Result<Vec<Vec<u8>>, ContextError> {
        let mut receipt_data = self.receipt_data.write().map_err(|_| {
            ContextError::TransactionReceiptError("Couldn't lock receipt data".into())
        })?;
        Ok(std::mem::take(&mut *receipt_data))
    }

    fn read_entries(&self) -> Result<RwLockReadGuard<BTreeMap<String, Vec<u8>>>, ContextError> {
        self.entries
            .read()
            .map_err(|_| ContextError::StorageError("Couldn't lock state for reading".into()))
    }

    fn write_entries(&self) -> Result<RwLockWriteGuard<BTreeMap<String, Vec<u8>>>, ContextError> {
        self.entries
            .write()
            .map_err(|_| ContextError::StorageError("Couldn't lock state for writing".into()))
    }
}

impl TransactionContext for BTreeState {
    fn get_state_entries(&self, keys: &[String]) -> Result<Vec<(String, Vec<u8>)>, ContextError> {
        let entries = self.read_entries()?;
        Ok(keys
            .iter()
            .filter_map(|key| {
                entries
                    .get(key)
                    .map(|value| (key.to_string(), value.to_vec()))
            })
            .collect())
    }

    fn set_state_entries(&self, entries: Vec<(String, Vec<u8>)>) -> Result<(), ContextError> {
        let mut state = self.write_entries()?;
        for (key, value) in entries {
            state.insert(key, value);
        }
        Ok(())
    }

    fn delete_state_entries(&self, keys: &[String]) -> Result<Vec<String>, ContextError> {
        let mut state = self.write_entries()?;
        Ok(keys
            .iter()
            .filter(|key| state.remove(key.as_str()).is_some())
            .cloned()
            .collect())
    }

    fn get_state_entries_by_range(
        &self,
        start_key: &str,
        end_key: &str,
        page_size: usize,
        bookmark: Option<&str>,
    ) -> Result<StatePage, ContextError> {
        if page_size == 0 {
            return Err(ContextError::InvalidArgument(
                "page size must be greater than zero".into(),
            ));
        }

        // The bookmark is the first key of the next page; it can only narrow the range
        let lower = match bookmark {
            Some(bookmark) if bookmark > start_key => bookmark,
            _ => start_key,
        };
        if !end_key.is_empty() && lower >= end_key {
            return Ok((vec![], None));
        }

        let lower_bound: Bound<&str> = if lower.is_empty() {
            Unbounded
        } else {
            Included(lower)
        };
        let upper_bound: Bound<&str> = if end_key.is_empty() {
            Unbounded
        } else {
            Excluded(end_key)
        };

        let entries = self.read_entries()?;
        let mut range = entries.range::<str, _>((lower_bound, upper_bound));
        let page = range
            .by_ref()
            .take(page_size)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect::<Vec<_>>();
        let next_bookmark = range.next().map(|(key, _)| key.clone());

        Ok((page, next_bookmark))
    }

    fn add_receipt_data(&self, data: Vec<u8>) -> Result<(), ContextError> {
        self.receipt_data
            .write()
            .map_err(|_| ContextError::TransactionReceiptError("Couldn't lock receipt data".into()))?
            .push(data);
        Ok(())
    }
}
