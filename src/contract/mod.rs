// Copyright 2021 Cargill Incorporated
// Copyright 2018 Intel Corporation
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

//! The sensor reading contract.
//!
//! `SensorContract` stores each `Reading` as JSON at the key given by its iteration. Every
//! operation reads the key first and fails if the reading is missing (or, for creation, already
//! present) before writing anything. Conflicts between concurrent invocations are left to the
//! host's read/write set validation.

mod error;
pub mod handler;

pub use crate::contract::error::ContractError;

use crate::handler::TransactionContext;
use crate::protocol::reading::{Reading, ReadingBuilder};

/// Number of entries requested per range query when listing every reading.
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct SensorContract {
    page_size: usize,
}

impl Default for SensorContract {
    fn default() -> Self {
        SensorContract {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SensorContract {
    pub fn new() -> Self {
        SensorContract::default()
    }

    /// Creates a contract that lists readings `page_size` entries at a time.
    pub fn with_page_size(page_size: usize) -> Result<Self, ContractError> {
        if page_size == 0 {
            return Err(ContractError::InvalidArgument(
                "page size must be greater than zero".into(),
            ));
        }
        Ok(SensorContract { page_size })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Stores the two seed readings. Fails on the first reading that cannot be written; readings
    /// written before the failure are left for the host to discard.
    pub fn init_ledger(&self, context: &dyn TransactionContext) -> Result<(), ContractError> {
        for reading in seed_readings()? {
            put_reading(context, &reading)?;
        }
        info!("Initialized ledger with seed readings");
        Ok(())
    }

    /// Returns whether a reading is stored at the given iteration.
    pub fn asset_exists(
        &self,
        context: &dyn TransactionContext,
        iteration: &str,
    ) -> Result<bool, ContractError> {
        Ok(context.get_state_entry(iteration)?.is_some())
    }

    pub fn create_asset(
        &self,
        context: &dyn TransactionContext,
        reading: &Reading,
    ) -> Result<(), ContractError> {
        if self.asset_exists(context, reading.iteration())? {
            return Err(ContractError::AlreadyExists(reading.iteration().to_string()));
        }
        put_reading(context, reading)
    }

    pub fn read_asset(
        &self,
        context: &dyn TransactionContext,
        iteration: &str,
    ) -> Result<Reading, ContractError> {
        match context.get_state_entry(iteration)? {
            Some(bytes) => parse_reading(iteration, &bytes),
            None => Err(ContractError::NotFound(iteration.to_string())),
        }
    }

    /// Replaces the reading stored at the reading's iteration. Every field is overwritten.
    pub fn update_asset(
        &self,
        context: &dyn TransactionContext,
        reading: &Reading,
    ) -> Result<(), ContractError> {
        if !self.asset_exists(context, reading.iteration())? {
            return Err(ContractError::NotFound(reading.iteration().to_string()));
        }
        put_reading(context, reading)
    }

    pub fn delete_asset(
        &self,
        context: &dyn TransactionContext,
        iteration: &str,
    ) -> Result<(), ContractError> {
        if !self.asset_exists(context, iteration)? {
            return Err(ContractError::NotFound(iteration.to_string()));
        }
        context.delete_state_entry(iteration)?;
        debug!("Deleted sensor data {}", iteration);
        Ok(())
    }

    /// Returns every stored reading in key order, following range query bookmarks until the
    /// host reports no further pages.
    pub fn get_all_assets(
        &self,
        context: &dyn TransactionContext,
    ) -> Result<Vec<Reading>, ContractError> {
        let mut readings = Vec::new();
        let mut bookmark: Option<String> = None;

        loop {
            let (entries, next_bookmark) = context.get_state_entries_by_range(
                "",
                "",
                self.page_size,
                bookmark.as_deref(),
            )?;
            for (key, bytes) in entries {
                readings.push(parse_reading(&key, &bytes)?);
            }

            match next_bookmark {
                Some(next) => bookmark = Some(next),
                None => break,
            }
        }

        debug!("Listed {} readings", readings.len());
        Ok(readings)
    }
}

/// The readings written by `init_ledger`.
pub fn seed_readings() -> Result<Vec<Reading>, ContractError> {
    Ok(vec![
        ReadingBuilder::new()
            .with_node("node_01".into())
            .with_packet_id(0)
            .with_temp(21.75)
            .with_hum(27.74)
            .with_pres("97170.78_#BAT:75#".into())
            .with_length(85)
            .with_iteration("1".into())
            .build()?,
        ReadingBuilder::new()
            .with_node("node_01".into())
            .with_packet_id(1)
            .with_temp(20.81)
            .with_hum(29.82)
            .with_pres("97176.59_#BAT:100#".into())
            .with_length(86)
            .with_iteration("2".into())
            .build()?,
    ])
}

fn put_reading(context: &dyn TransactionContext, reading: &Reading) -> Result<(), ContractError> {
    // JSON has no representation for NaN or infinity; serde_json would write null and the
    // stored record could never be read back
    for (field, value) in &[("Temp", reading.temp()), ("Hum", reading.hum())] {
        if !value.is_finite() {
            return Err(ContractError::SerializationError(format!(
                "{} of sensor data {} is not a finite number",
                field,
                reading.iteration()
            )));
        }
    }
    let bytes = serde_json::to_vec(reading)
        .map_err(|err| ContractError::SerializationError(err.to_string()))?;
    context.set_state_entry(reading.iteration().to_string(), bytes)?;
    debug!("Stored sensor data {}", reading.iteration());
    Ok(())
}

fn parse_reading(key: &str, bytes: &[u8]) -> Result<Reading, ContractError> {
    serde_json::from_slice(bytes).map_err(|source| {
        warn!("Sensor data stored at {} is malformed: {}", key, source);
        ContractError::DeserializationError {
            key: key.to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;

    use crate::handler::{ContextError, StatePage};
    use crate::state::BTreeState;

    /// Wraps a BTreeState and starts failing writes or range queries after a number of calls.
    struct FailingState {
        inner: BTreeState,
        writes_before_failure: Cell<Option<usize>>,
        pages_before_failure: Cell<Option<usize>>,
    }

    impl FailingState {
        fn new(inner: BTreeState) -> Self {
            FailingState {
                inner,
                writes_before_failure: Cell::new(None),
                pages_before_failure: Cell::new(None),
            }
        }

        fn fail_writes_after(self, writes: usize) -> Self {
            self.writes_before_failure.set(Some(writes));
            self
        }

        fn fail_pages_after(self, pages: usize) -> Self {
            self.pages_before_failure.set(Some(pages));
            self
        }

        fn count_down(counter: &Cell<Option<usize>>) -> Result<(), ContextError> {
            match counter.get() {
                Some(0) => Err(ContextError::StorageError("state unavailable".into())),
                Some(n) => {
                    counter.set(Some(n - 1));
                    Ok(())
                }
                None => Ok(()),
            }
        }
    }

    impl TransactionContext for FailingState {
        fn get_state_entries(
            &self,
            keys: &[String],
        ) -> Result<Vec<(String, Vec<u8>)>, ContextError> {
            self.inner.get_state_entries(keys)
        }

        fn set_state_entries(&self, entries: Vec<(String, Vec<u8>)>) -> Result<(), ContextError> {
            FailingState::count_down(&self.writes_before_failure)?;
            self.inner.set_state_entries(entries)
        }

        fn delete_state_entries(&self, keys: &[String]) -> Result<Vec<String>, ContextError> {
            self.inner.delete_state_entries(keys)
        }

        fn get_state_entries_by_range(
            &self,
            start_key: &str,
            end_key: &str,
            page_size: usize,
            bookmark: Option<&str>,
        ) -> Result<StatePage, ContextError> {
            FailingState::count_down(&self.pages_before_failure)?;
            self.inner
                .get_state_entries_by_range(start_key, end_key, page_size, bookmark)
        }

        fn add_receipt_data(&self, data: Vec<u8>) -> Result<(), ContextError> {
            self.inner.add_receipt_data(data)
        }
    }

    fn reading(iteration: &str, packet_id: i64, temp: f64) -> Reading {
        ReadingBuilder::new()
            .with_node("node_02".into())
            .with_packet_id(packet_id)
            .with_temp(temp)
            .with_hum(30.5)
            .with_pres("97180.12_#BAT:60#".into())
            .with_length(84)
            .with_iteration(iteration.into())
            .build()
            .expect("Unable to build reading")
    }

    fn iterations(readings: &[Reading]) -> Vec<&str> {
        readings.iter().map(Reading::iteration).collect()
    }

    #[test]
    fn init_ledger_seeds_readings() {
        let state = BTreeState::new();
        let contract = SensorContract::new();

        contract.init_ledger(&state).expect("Unable to init ledger");

        let first = contract.read_asset(&state, "1").expect("Unable to read 1");
        assert_eq!(first.node(), "node_01");
        assert_eq!(first.packet_id(), 0);
        assert_eq!(first.temp(), 21.75);
        assert_eq!(first.hum(), 27.74);
        assert_eq!(first.pres(), "97170.78_#BAT:75#");
        assert_eq!(first.length(), 85);

        let second = contract.read_asset(&state, "2").expect("Unable to read 2");
        assert_eq!(second.packet_id(), 1);
        assert_eq!(second.temp(), 20.81);
        assert_eq!(second.hum(), 29.82);
        assert_eq!(second.pres(), "97176.59_#BAT:100#");
        assert_eq!(second.length(), 86);
    }

    #[test]
    fn init_ledger_stops_at_first_failed_write() {
        let state = FailingState::new(BTreeState::new()).fail_writes_after(1);
        let contract = SensorContract::new();

        match contract.init_ledger(&state) {
            Err(ContractError::StoreError(ContextError::StorageError(_))) => (),
            other => panic!("Expected StoreError, got {:?}", other),
        }

        // The first write is not rolled back; that is left to the host
        assert!(contract.asset_exists(&state, "1").expect("Unable to check 1"));
        assert!(!contract.asset_exists(&state, "2").expect("Unable to check 2"));
    }

    #[test]
    fn create_then_read() {
        let state = BTreeState::new();
        let contract = SensorContract::new();
        let created = reading("10", 9, 19.25);

        contract
            .create_asset(&state, &created)
            .expect("Unable to create reading");

        assert!(contract.asset_exists(&state, "10").expect("Unable to check"));
        assert_eq!(
            contract.read_asset(&state, "10").expect("Unable to read"),
            created
        );
    }

    #[test]
    fn create_existing_fails() {
        let state = BTreeState::new();
        let contract = SensorContract::new();
        contract
            .create_asset(&state, &reading("10", 9, 19.25))
            .expect("Unable to create reading");

        match contract.create_asset(&state, &reading("10", 10, 18.0)) {
            Err(ContractError::AlreadyExists(key)) => assert_eq!(key, "10"),
            other => panic!("Expected AlreadyExists, got {:?}", other),
        }
        assert_eq!(
            contract
                .read_asset(&state, "10")
                .expect("Unable to read")
                .packet_id(),
            9
        );
    }

    #[test]
    fn read_missing_fails() {
        let state = BTreeState::new();
        match SensorContract::new().read_asset(&state, "missing") {
            Err(ContractError::NotFound(key)) => assert_eq!(key, "missing"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn read_malformed_fails() {
        let state = BTreeState::new();
        state
            .set_state_entry("bad".into(), b"not json".to_vec())
            .expect("Unable to set entry");

        match SensorContract::new().read_asset(&state, "bad") {
            Err(ContractError::DeserializationError { key, .. }) => assert_eq!(key, "bad"),
            other => panic!("Expected DeserializationError, got {:?}", other),
        }
    }

    #[test]
    fn create_non_finite_reading_fails() {
        let state = BTreeState::new();
        let contract = SensorContract::new();

        for (iteration, temp) in &[("11", f64::NAN), ("12", f64::INFINITY)] {
            match contract.create_asset(&state, &reading(iteration, 1, *temp)) {
                Err(ContractError::SerializationError(msg)) => {
                    assert!(msg.contains("Temp"), "unexpected message: {}", msg)
                }
                other => panic!("Expected SerializationError, got {:?}", other),
            }
            assert!(!contract
                .asset_exists(&state, iteration)
                .expect("Unable to check"));
        }

        let humid = ReadingBuilder::new()
            .with_node("node_02".into())
            .with_packet_id(3)
            .with_temp(20.0)
            .with_hum(f64::NEG_INFINITY)
            .with_pres("97180.12_#BAT:60#".into())
            .with_length(84)
            .with_iteration("13".into())
            .build()
            .expect("Unable to build reading");
        match contract.create_asset(&state, &humid) {
            Err(ContractError::SerializationError(msg)) => {
                assert!(msg.contains("Hum"), "unexpected message: {}", msg)
            }
            other => panic!("Expected SerializationError, got {:?}", other),
        }

        assert_eq!(state.count().expect("Unable to count"), 0);
        assert!(contract
            .get_all_assets(&state)
            .expect("Unable to list")
            .is_empty());
    }

    #[test]
    fn update_with_non_finite_reading_keeps_prior_value() {
        let state = BTreeState::new();
        let contract = SensorContract::new();
        contract.init_ledger(&state).expect("Unable to init ledger");

        for temp in &[f64::NAN, f64::INFINITY] {
            match contract.update_asset(&state, &reading("1", 5, *temp)) {
                Err(ContractError::SerializationError(_)) => (),
                other => panic!("Expected SerializationError, got {:?}", other),
            }
        }

        let stored = contract.read_asset(&state, "1").expect("Unable to read");
        assert_eq!(stored.packet_id(), 0);
        assert_eq!(stored.temp(), 21.75);
        assert_eq!(
            contract.get_all_assets(&state).expect("Unable to list").len(),
            2
        );
    }

    #[test]
    fn update_replaces_every_field() {
        let state = BTreeState::new();
        let contract = SensorContract::new();
        contract.init_ledger(&state).expect("Unable to init ledger");

        let replacement = ReadingBuilder::new()
            .with_node("node_07".into())
            .with_packet_id(42)
            .with_temp(-3.5)
            .with_hum(88.0)
            .with_pres("96000.00_#BAT:5#".into())
            .with_length(90)
            .with_iteration("1".into())
            .build()
            .expect("Unable to build reading");
        contract
            .update_asset(&state, &replacement)
            .expect("Unable to update reading");

        assert_eq!(
            contract.read_asset(&state, "1").expect("Unable to read"),
            replacement
        );
    }

    #[test]
    fn update_missing_fails() {
        let state = BTreeState::new();
        let contract = SensorContract::new();

        match contract.update_asset(&state, &reading("5", 1, 20.0)) {
            Err(ContractError::NotFound(key)) => assert_eq!(key, "5"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
        assert!(!contract.asset_exists(&state, "5").expect("Unable to check"));
    }

    #[test]
    fn delete_removes_reading() {
        let state = BTreeState::new();
        let contract = SensorContract::new();
        contract.init_ledger(&state).expect("Unable to init ledger");

        contract.delete_asset(&state, "1").expect("Unable to delete");

        assert!(!contract.asset_exists(&state, "1").expect("Unable to check"));
        match contract.delete_asset(&state, "1") {
            Err(ContractError::NotFound(key)) => assert_eq!(key, "1"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn get_all_assets_is_independent_of_page_size() {
        let state = BTreeState::new();
        let loader = SensorContract::new();
        loader.init_ledger(&state).expect("Unable to init ledger");
        for i in 3..10 {
            loader
                .create_asset(&state, &reading(&i.to_string(), i, 20.0 + i as f64))
                .expect("Unable to create reading");
        }
        loader
            .update_asset(&state, &reading("4", 40, 12.5))
            .expect("Unable to update reading");
        loader.delete_asset(&state, "6").expect("Unable to delete");

        let expected = loader.get_all_assets(&state).expect("Unable to list");
        assert_eq!(
            iterations(&expected),
            vec!["1", "2", "3", "4", "5", "7", "8", "9"]
        );
        assert_eq!(expected[3].packet_id(), 40);

        for page_size in &[1, 2, 3, 7, 8, 9] {
            let contract =
                SensorContract::with_page_size(*page_size).expect("Unable to create contract");
            assert_eq!(
                contract.get_all_assets(&state).expect("Unable to list"),
                expected,
                "page size {}",
                page_size
            );
        }
    }

    #[test]
    fn get_all_assets_on_empty_state() {
        let state = BTreeState::new();
        assert!(SensorContract::new()
            .get_all_assets(&state)
            .expect("Unable to list")
            .is_empty());
    }

    #[test]
    fn get_all_assets_fails_on_page_error() {
        let inner = BTreeState::new();
        SensorContract::new()
            .init_ledger(&inner)
            .expect("Unable to init ledger");
        let state = FailingState::new(inner).fail_pages_after(1);
        let contract = SensorContract::with_page_size(1).expect("Unable to create contract");

        match contract.get_all_assets(&state) {
            Err(ContractError::StoreError(_)) => (),
            other => panic!("Expected StoreError, got {:?}", other),
        }
    }

    #[test]
    fn get_all_assets_fails_on_malformed_value() {
        let state = BTreeState::new();
        let contract = SensorContract::new();
        contract.init_ledger(&state).expect("Unable to init ledger");
        state
            .set_state_entry("3".into(), br#"{"node":"node_01"}"#.to_vec())
            .expect("Unable to set entry");

        match contract.get_all_assets(&state) {
            Err(ContractError::DeserializationError { key, .. }) => assert_eq!(key, "3"),
            other => panic!("Expected DeserializationError, got {:?}", other),
        }
    }

    #[test]
    fn zero_page_size_is_rejected() {
        match SensorContract::with_page_size(0) {
            Err(ContractError::InvalidArgument(_)) => (),
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }
        assert_eq!(SensorContract::new().page_size(), DEFAULT_PAGE_SIZE);
    }
}
