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

//! Runs a single sensor contract invocation against a local world state.
//!
//! The state is loaded from a JSON snapshot, the invocation is applied through the contract's
//! transaction handler, and the snapshot is written back only if the invocation succeeded, so a
//! rejected invocation leaves no trace in state.

#[macro_use]
extern crate log;

mod error;

use std::io::Write;
use std::path::Path;

use clap::{App, AppSettings, Arg, ArgMatches};
use flexi_logger::{DeferredNow, LogSpecBuilder, Logger, LoggerHandle};
use log::Record;

use sensor_contract::contract::handler::SensorTransactionHandler;
use sensor_contract::contract::{SensorContract, DEFAULT_PAGE_SIZE};
use sensor_contract::handler::TransactionHandler;
use sensor_contract::protocol::payload::{InvocationPayload, InvocationRequest};
use sensor_contract::state::{snapshot, BTreeState};

use crate::error::CliError;

const APP_NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let matches = app().get_matches();

    let log_level = match matches.occurrences_of("verbose") {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let _logger = setup_logging(log_level);

    if let Err(e) = run(&matches) {
        error!("ERROR: {}", e);
        std::process::exit(1);
    }
}

fn app<'a, 'b>() -> App<'a, 'b> {
    App::new(APP_NAME)
        .version(VERSION)
        .about("Runs sensor contract invocations against a local world state")
        .setting(AppSettings::TrailingVarArg)
        .arg(
            Arg::with_name("verbose")
                .help("Log verbosely")
                .short("v")
                .long("verbose")
                .multiple(true),
        )
        .arg(
            Arg::with_name("state")
                .long("state")
                .short("s")
                .takes_value(true)
                .help("JSON state snapshot to run against; state is discarded if omitted"),
        )
        .arg(
            Arg::with_name("page_size")
                .long("page-size")
                .takes_value(true)
                .help("Number of entries per range query when listing readings"),
        )
        .arg(
            Arg::with_name("function")
                .required(true)
                .help("Contract function to invoke, e.g. CreateAsset"),
        )
        .arg(
            Arg::with_name("args")
                .multiple(true)
                .allow_hyphen_values(true)
                .help("Arguments of the function"),
        )
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let page_size = match matches.value_of("page_size") {
        Some(value) => value.parse::<usize>().map_err(|_| {
            CliError::InvalidArgument("'page-size' must be a valid integer".into())
        })?,
        None => DEFAULT_PAGE_SIZE,
    };
    let contract = SensorContract::with_page_size(page_size)?;

    let function = matches
        .value_of("function")
        .ok_or_else(|| CliError::InvalidArgument("missing argument 'function'".into()))?;
    let args: Vec<String> = matches
        .values_of("args")
        .map(|values| values.map(String::from).collect())
        .unwrap_or_default();

    let state_path = matches.value_of("state").map(Path::new);
    let mut state = match state_path {
        Some(path) => snapshot::load(path)?,
        None => BTreeState::new(),
    };

    let payload = InvocationPayload::new(function, args).into_bytes()?;
    let request = InvocationRequest::new(format!("local-{}", function), payload);

    let handler = SensorTransactionHandler::with_contract(contract);
    handler.apply(&request, &mut state)?;
    info!("{} succeeded", function);

    if let Some(path) = state_path {
        snapshot::save(&state, path)?;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for data in state.take_receipt_data()? {
        out.write_all(&data)?;
        writeln!(out)?;
    }

    Ok(())
}

fn setup_logging(log_level: log::LevelFilter) -> LoggerHandle {
    let mut log_spec_builder = LogSpecBuilder::new();
    log_spec_builder.default(log_level);

    match Logger::with(log_spec_builder.build())
        .format(log_format)
        .log_to_stderr()
        .start()
    {
        Ok(handle) => handle,
        Err(err) => panic!("Failed to start logger: {}", err),
    }
}

// log format for cli that will only show the log message
pub fn log_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(w, "{}", record.args(),)
}
