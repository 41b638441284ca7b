//! Ledger domain types for credit balances and allocation requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an account in the allocation hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Holds a quota it can sub-allocate to retailers.
    Distributor,
    /// Spends one credit per submitted entry.
    Retailer,
}

impl AccountKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Distributor => "distributor",
            Self::Retailer => "retailer",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Spendable credit of a retailer (`total_amount`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditBalance {
    /// Remaining spendable credit.
    pub total: i64,
}

impl CreditBalance {
    /// Creates a balance from the stored `total_amount`.
    #[must_use]
    pub const fn new(total: i64) -> Self {
        Self { total }
    }
}

/// Quota of a distributor: granted total and the part already allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    /// Total quota granted (`total_amount`).
    pub total: i64,
    /// Quota already handed to retailers (`used_amount`).
    pub used: i64,
}

impl Quota {
    /// Creates a quota from the stored columns.
    #[must_use]
    pub const fn new(total: i64, used: i64) -> Self {
        Self { total, used }
    }

    /// Quota still available for allocation.
    #[must_use]
    pub const fn available(&self) -> i64 {
        self.total - self.used
    }
}

/// Result of moving credit from a distributor quota to a retailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    /// Distributor quota after the allocation.
    pub quota: Quota,
    /// Retailer balance after the allocation.
    pub retailer: CreditBalance,
    /// Credit moved.
    pub amount: i64,
}

/// Profile of a retailer account to be provisioned.
#[derive(Debug, Clone)]
pub struct RetailerProfile {
    /// Login name (unique, case-sensitive storage).
    pub username: String,
    /// Plaintext password, compared as-is on login.
    pub password: String,
    /// Display name.
    pub name: String,
    /// Mobile number (unique).
    pub mobile: String,
    /// Email address (unique).
    pub email: String,
}

/// Input for provisioning a retailer under a distributor.
#[derive(Debug, Clone)]
pub struct CreateRetailerInput {
    /// Username of the funding distributor.
    pub distributor_username: String,
    /// Distributor display name copied onto the retailer row.
    pub distributor_name: Option<String>,
    /// New retailer profile.
    pub profile: RetailerProfile,
    /// Opening credit moved from the distributor quota.
    pub amount: i64,
}

/// Input for topping up an existing retailer.
#[derive(Debug, Clone)]
pub struct AllocateInput {
    /// Username of the funding distributor.
    pub distributor_username: String,
    /// Retailer username or mobile number.
    pub retailer: String,
    /// Credit to move.
    pub amount: i64,
}
