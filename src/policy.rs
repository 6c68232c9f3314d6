//! Per transaction type field policies: required fields, signature layout and bundles
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{INVOICE_URL, PURCHASE_URL};
use crate::error::UnknownTransactionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Purchase,
    ConfirmPurchase,
    CreateInvoice,
    CheckStatus,
}

/// A synthetic field assembled from several source fields, e.g. `data`.
#[derive(Debug, PartialEq, Eq)]
pub struct Bundle {
    pub field: &'static str,
    pub parts: &'static [&'static str],
}

#[derive(Debug, PartialEq, Eq)]
pub struct FieldPolicy {
    /// Fields that must be present before signing, on top of the signature fields.
    pub required: &'static [&'static str],
    /// Fields hashed into the signature, in hashing order.
    pub signature: &'static [&'static str],
    /// Subset of `signature` whose values are reversed before hashing.
    pub signature_reversed: &'static [&'static str],
    pub bundles: &'static [Bundle],
}

static PURCHASE: FieldPolicy = FieldPolicy {
    required: &["key", "payment", "data", "url"],
    signature: &["key", "payment", "data", "url", "password"],
    signature_reversed: &["key", "payment", "data", "url", "password"],
    bundles: &[Bundle {
        field: "data",
        parts: &["amount", "currency", "description"],
    }],
};

static CONFIRM_PURCHASE: FieldPolicy = FieldPolicy {
    required: &[],
    signature: &["email", "password", "order", "card"],
    signature_reversed: &["email", "card"],
    bundles: &[],
};

static CREATE_INVOICE: FieldPolicy = FieldPolicy {
    required: &["key", "order", "action", "description", "amount"],
    signature: &["key", "order", "amount", "password"],
    signature_reversed: &["password"],
    bundles: &[],
};

// CHECK_STATUS has no policy yet: the gateway flow for it is not defined.
static POLICIES: &[(TransactionType, &FieldPolicy)] = &[
    (TransactionType::Purchase, &PURCHASE),
    (TransactionType::ConfirmPurchase, &CONFIRM_PURCHASE),
    (TransactionType::CreateInvoice, &CREATE_INVOICE),
];

impl TransactionType {
    pub const ALL: [TransactionType; 4] = [
        TransactionType::Purchase,
        TransactionType::ConfirmPurchase,
        TransactionType::CreateInvoice,
        TransactionType::CheckStatus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "PURCHASE",
            TransactionType::ConfirmPurchase => "CONFIRM_PURCHASE",
            TransactionType::CreateInvoice => "CREATE_INVOICE",
            TransactionType::CheckStatus => "CHECK_STATUS",
        }
    }

    /// Default gateway endpoint requests of this type are sent to.
    pub fn default_url(&self) -> &'static str {
        match self {
            TransactionType::Purchase | TransactionType::ConfirmPurchase => PURCHASE_URL,
            TransactionType::CreateInvoice | TransactionType::CheckStatus => INVOICE_URL,
        }
    }

    /// Whether requests of this type go to the authorization endpoint rather than invoicing.
    pub fn is_authorization(&self) -> bool {
        self.default_url() == PURCHASE_URL
    }

    pub fn policy(&self) -> Option<&'static FieldPolicy> {
        POLICIES
            .iter()
            .find(|(tx, _)| tx == self)
            .map(|(_, policy)| *policy)
    }
}

impl FieldPolicy {
    /// Union of the required list and the signature fields.
    pub fn required_fields(&self) -> BTreeSet<&'static str> {
        self.required
            .iter()
            .chain(self.signature.iter())
            .copied()
            .collect()
    }

    pub fn is_reversed(&self, field: &str) -> bool {
        self.signature_reversed.contains(&field)
    }
}

/// True when `field` is required by any declared policy.
pub fn is_required_anywhere(field: &str) -> bool {
    POLICIES
        .iter()
        .any(|(_, policy)| policy.required.contains(&field))
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionType::ALL
            .into_iter()
            .find(|tx| tx.as_str() == s)
            .ok_or_else(|| UnknownTransactionType(s.to_string()))
    }
}
