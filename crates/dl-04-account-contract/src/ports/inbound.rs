//! # Inbound Ports
//!
//! The surface a hosting peer drives.

use crate::domain::errors::ContractError;
use crate::ports::outbound::LedgerStub;

/// A contract that can be invoked by function name with string arguments.
pub trait ContractInvoker: Send + Sync {
    /// Contract name proposals must address.
    fn name(&self) -> &str;

    /// Run `function` against `stub` and return the encoded result.
    fn invoke(
        &self,
        stub: &mut dyn LedgerStub,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError>;
}
