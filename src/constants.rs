//! Gateway endpoints and the closed value sets accepted by the validators.

/// Card payment authorization endpoint. Purchase forms are posted here.
pub const PURCHASE_URL: &str = "https://secure.platononline.com/payment/auth";

/// Invoicing API endpoint.
pub const INVOICE_URL: &str = "https://pltn.me/v1/";

pub const SUPPORTED_LANGUAGES: &[&str] = &["RU", "UK", "EN"];

pub const SUPPORTED_PAYMENT: &[&str] = &["CC", "CCT", "RF"];

pub const SUPPORTED_CURRENCY: &[&str] = &["UAH", "USD", "EUR"];

// field names with special handling in the pipeline
pub const TRANSACTION_TYPE: &str = "transactionType";
pub const KEY: &str = "key";
pub const PASSWORD: &str = "password";
pub const SIGN: &str = "sign";
pub const CARD: &str = "card";
