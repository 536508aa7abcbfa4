//! Contract stub over a world-state simulation.
//!
//! Reads land in the simulation's read set, writes are staged in its write
//! set. Nothing touches committed state until the commit service accepts the
//! resulting transaction.

use dl_04_account_contract::{KeyModification, LedgerStub, StubError};
use dl_05_world_state::TxSimulator;
use shared_types::TxTimestamp;

/// [`LedgerStub`] backed by a [`TxSimulator`].
pub struct SimulationStub<'a> {
    simulator: &'a mut TxSimulator,
}

impl<'a> SimulationStub<'a> {
    pub fn new(simulator: &'a mut TxSimulator) -> Self {
        Self { simulator }
    }
}

impl LedgerStub for SimulationStub<'_> {
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, StubError> {
        self.simulator
            .get_state(key)
            .map_err(|e| StubError(e.to_string()))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StubError> {
        self.simulator.put_state(key, value);
        Ok(())
    }

    fn get_history_for_key(&mut self, key: &str) -> Result<Vec<KeyModification>, StubError> {
        let history = self
            .simulator
            .get_history(key)
            .map_err(|e| StubError(e.to_string()))?;
        Ok(history
            .into_iter()
            .map(|record| KeyModification {
                tx_id: record.tx_id,
                timestamp: record.timestamp,
                is_delete: record.is_delete,
                value: record.value,
            })
            .collect())
    }

    fn tx_id(&self) -> &str {
        self.simulator.tx_id()
    }

    fn tx_timestamp(&self) -> TxTimestamp {
        self.simulator.timestamp()
    }
}
