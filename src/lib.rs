//! Client SDK for the Platon payment gateway.
//!
//! Builds and signs the request parameters of gateway transactions, renders the
//! purchase form for browser redirects and calls the API for server-to-server flows.
//!
//! ```
//! use platon::{Platon, TransactionType};
//!
//! let platon = Platon::new("MERCHANT_KEY", "MERCHANT_PASSWORD");
//! let form = platon
//!     .form([
//!         ("amount", "12.00"),
//!         ("currency", "UAH"),
//!         ("description", "Order 42"),
//!         ("payment", "CC"),
//!         ("url", "https://shop.example/return"),
//!     ])
//!     .unwrap();
//! assert!(form.render().contains("name=\"sign\""));
//!
//! let query = platon
//!     .query_params(TransactionType::CreateInvoice, [
//!         ("order", "42"),
//!         ("amount", "12.00"),
//!         ("action", "create"),
//!         ("description", "Order 42"),
//!     ])
//!     .unwrap();
//! assert_eq!(query.action_url, "https://pltn.me/v1/");
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod form;
pub mod params;
pub mod policy;
pub mod utils;
pub mod value;

pub use api::Api;
pub use client::Platon;
pub use config::Config;
pub use error::{Error, ParamError, UnknownTransactionType};
pub use form::{Form, QueryParams};
pub use params::{Params, Snapshot};
pub use policy::{FieldPolicy, TransactionType};
pub use value::FieldValue;
