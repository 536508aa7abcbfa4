//! # Contract Functions
//!
//! The flat command set of the account contract.

use std::fmt;
use std::str::FromStr;

use super::errors::ContractError;

/// A contract function name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    InitLedger,
    AccountExists,
    CreateAccount,
    QueryAccount,
    UpdateAccountBalance,
    GetAccountHistory,
}

impl Function {
    /// Every function, in declaration order.
    pub const ALL: [Function; 6] = [
        Function::InitLedger,
        Function::AccountExists,
        Function::CreateAccount,
        Function::QueryAccount,
        Function::UpdateAccountBalance,
        Function::GetAccountHistory,
    ];

    /// Name as used in proposals.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitLedger => "InitLedger",
            Self::AccountExists => "AccountExists",
            Self::CreateAccount => "CreateAccount",
            Self::QueryAccount => "QueryAccount",
            Self::UpdateAccountBalance => "UpdateAccountBalance",
            Self::GetAccountHistory => "GetAccountHistory",
        }
    }

    /// Number of string arguments the function takes.
    pub fn arity(&self) -> usize {
        match self {
            Self::InitLedger => 0,
            Self::AccountExists | Self::QueryAccount | Self::GetAccountHistory => 1,
            Self::UpdateAccountBalance => 2,
            Self::CreateAccount => 8,
        }
    }

    /// Whether the function never writes world state.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::AccountExists | Self::QueryAccount | Self::GetAccountHistory
        )
    }

    /// Fail with `InvalidArguments` unless `received` matches the arity.
    pub fn check_arity(&self, received: usize) -> Result<(), ContractError> {
        if received == self.arity() {
            Ok(())
        } else {
            Err(ContractError::InvalidArguments {
                function: self.name().to_string(),
                expected: self.arity(),
                received,
            })
        }
    }
}

impl FromStr for Function {
    type Err = ContractError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| ContractError::UnknownFunction(name.to_string()))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for function in Function::ALL {
            assert_eq!(function.name().parse::<Function>().unwrap(), function);
        }
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!(matches!(
            "queryAccount".parse::<Function>(),
            Err(ContractError::UnknownFunction(name)) if name == "queryAccount"
        ));
    }

    #[test]
    fn test_arity_check() {
        assert!(Function::UpdateAccountBalance.check_arity(2).is_ok());
        assert_eq!(
            Function::UpdateAccountBalance.check_arity(1),
            Err(ContractError::InvalidArguments {
                function: "UpdateAccountBalance".into(),
                expected: 2,
                received: 1,
            })
        );
    }

    #[test]
    fn test_read_only_set() {
        assert!(Function::QueryAccount.is_read_only());
        assert!(!Function::CreateAccount.is_read_only());
        assert!(!Function::InitLedger.is_read_only());
    }
}
