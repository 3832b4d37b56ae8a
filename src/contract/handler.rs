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

use crate::contract::SensorContract;
use crate::handler::{ApplyError, TransactionContext, TransactionHandler};
use crate::protocol::payload::{Action, InvocationRequest};

pub const FAMILY_NAME: &str = "sensor";
pub const FAMILY_VERSION: &str = "1.0";

/// Routes invocations to the sensor contract.
///
/// Query results are handed back to the caller as receipt data: the reading for `ReadAsset`, an
/// array of readings for `GetAllAssets` and a boolean for `AssetExists`, all JSON encoded.
pub struct SensorTransactionHandler {
    family_name: String,
    family_versions: Vec<String>,
    contract: SensorContract,
}

impl SensorTransactionHandler {
    #[allow(clippy::new_without_default)]
    pub fn new() -> SensorTransactionHandler {
        SensorTransactionHandler::with_contract(SensorContract::new())
    }

    pub fn with_contract(contract: SensorContract) -> SensorTransactionHandler {
        SensorTransactionHandler {
            family_name: FAMILY_NAME.to_string(),
            family_versions: vec![FAMILY_VERSION.to_string()],
            contract,
        }
    }
}

impl TransactionHandler for SensorTransactionHandler {
    fn family_name(&self) -> &str {
        &self.family_name
    }

    fn family_versions(&self) -> &[String] {
        &self.family_versions
    }

    fn apply(
        &self,
        request: &InvocationRequest,
        context: &mut dyn TransactionContext,
    ) -> Result<(), ApplyError> {
        let action = Action::from_bytes(request.payload()).map_err(|err| {
            warn!("Invalid transaction {}: {}", request.txn_id(), err);
            err
        })?;
        debug!("Sensor txn {}: {}", request.txn_id(), action.name());

        let context: &dyn TransactionContext = context;
        let result = match action {
            Action::InitLedger => self.contract.init_ledger(context).map(|_| None),
            Action::CreateAsset(reading) => {
                self.contract.create_asset(context, &reading).map(|_| None)
            }
            Action::UpdateAsset(reading) => {
                self.contract.update_asset(context, &reading).map(|_| None)
            }
            Action::DeleteAsset(iteration) => {
                self.contract.delete_asset(context, &iteration).map(|_| None)
            }
            Action::ReadAsset(iteration) => self
                .contract
                .read_asset(context, &iteration)
                .map(|reading| Some(serde_json::to_vec(&reading))),
            Action::AssetExists(iteration) => self
                .contract
                .asset_exists(context, &iteration)
                .map(|exists| Some(serde_json::to_vec(&exists))),
            Action::GetAllAssets => self
                .contract
                .get_all_assets(context)
                .map(|readings| Some(serde_json::to_vec(&readings))),
        };

        let receipt = result.map_err(|err| {
            warn!("Invalid transaction {}: {}", request.txn_id(), err);
            ApplyError::from(err)
        })?;

        if let Some(data) = receipt {
            let data = data.map_err(|err| {
                ApplyError::InternalError(format!("Failed to serialize result: {}", err))
            })?;
            context.add_receipt_data(data)?;
        }

        Ok(())
    }
}
