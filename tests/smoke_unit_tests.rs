//! Smoke screen unit tests for the SDK components
//!
//! These tests exercise each public module in isolation from the full
//! scenarios. They are intended as a smoke screen and mostly cover the
//! happy path plus the documented rejections.

use platon::{
    FieldValue, ParamError, Params, Snapshot, TransactionType,
    constants::{SUPPORTED_CURRENCY, SUPPORTED_LANGUAGES, SUPPORTED_PAYMENT},
    utils::{generate_signature, reverse},
};

// UTILS MODULE TESTS
#[cfg(test)]
mod utils_tests {
    use super::*;

    /// The digest of a fixed input never changes
    #[test]
    fn signature_is_a_fixed_digest() {
        let fields = vec![
            FieldValue::from(1),
            FieldValue::from("<test>"),
            FieldValue::List(vec![
                FieldValue::from(1),
                FieldValue::from("val\""),
                FieldValue::from(2.2),
            ]),
        ];
        assert_eq!(generate_signature(&fields), "58e87bbb04ee6c629bcdde18cd62fac5");
    }

    /// Digests are lowercase hex of 128 bits
    #[test]
    fn signature_is_lowercase_hex() {
        let digest = generate_signature(&[FieldValue::from("anything")]);
        assert_eq!(digest.len(), 32);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    /// An empty field list still hashes (md5 of the empty string)
    #[test]
    fn signature_of_nothing() {
        assert_eq!(generate_signature(&[]), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn reverse_strings_only() {
        assert_eq!(reverse(&FieldValue::from("123")).unwrap(), "321");
        assert!(matches!(
            reverse(&FieldValue::from(123)),
            Err(ParamError::NotAString(_))
        ));
        assert!(matches!(
            reverse(&FieldValue::List(vec![])),
            Err(ParamError::NotAString(_))
        ));
    }
}

// PARAMS MODULE TESTS
#[cfg(test)]
mod params_tests {
    use super::*;

    /// Languages are accepted exactly as listed, case-sensitively
    #[test]
    fn lang_validation() {
        for lang in ["", "test", "auto", "en", "ru", "ua", "uk", "UA"] {
            assert_eq!(
                Params::from_fields([("lang", lang)]),
                Err(ParamError::Validation("lang".into())),
                "{lang}"
            );
        }
        for lang in SUPPORTED_LANGUAGES {
            assert_eq!(Params::from_fields([("lang", *lang)]).unwrap().get("lang").unwrap(), lang);
        }
    }

    #[test]
    fn payment_validation() {
        for payment in ["", "cc", "cC", "cct", "fr", "FR", "ccT", "rf"] {
            assert_eq!(
                Params::from_fields([("payment", payment)]),
                Err(ParamError::Validation("payment".into())),
                "{payment}"
            );
        }
        for payment in SUPPORTED_PAYMENT {
            assert_eq!(
                Params::from_fields([("payment", *payment)]).unwrap().get("payment").unwrap(),
                payment
            );
        }
    }

    #[test]
    fn currency_validation() {
        for currency in ["", "cc", "uah", "Usd", "GBP", "RUB"] {
            assert_eq!(
                Params::from_fields([("currency", currency)]),
                Err(ParamError::Validation("currency".into())),
                "{currency}"
            );
        }
        for currency in SUPPORTED_CURRENCY {
            assert_eq!(
                Params::from_fields([("currency", *currency)]).unwrap().get("currency").unwrap(),
                currency
            );
        }
    }

    #[test]
    fn description_must_not_be_empty() {
        assert!(Params::from_fields([("description", "")]).is_err());
        assert!(Params::from_fields([("description", "x")]).is_ok());
    }

    /// Required fields of CREATE_INVOICE are enforced
    #[test]
    fn required_fields_for_invoice() -> anyhow::Result<()> {
        let params = Params::from_fields([("transactionType", "CREATE_INVOICE")])?;
        let required = params.required_fields()?;
        for field in ["key", "order", "action", "description", "amount", "password"] {
            assert!(required.contains(field), "{field}");
        }
        Ok(())
    }

    /// Bulk updates go through the same validation as single inserts
    #[test]
    fn extend_validates_each_field() {
        let mut params = Params::new();
        let result = params.extend([("key", "acc"), ("lang", "xx"), ("url", "u")]);
        assert_eq!(result, Err(ParamError::Validation("lang".into())));
        assert!(params.contains_key("key"));
        assert!(!params.contains_key("url"));
    }
}

// SNAPSHOT TESTS
#[cfg(test)]
mod snapshot_tests {
    use super::*;

    fn invoice() -> Snapshot {
        Snapshot::build(
            "acc",
            "key",
            TransactionType::CreateInvoice,
            [
                ("order", "4221"),
                ("amount", "12.00"),
                ("action", "create"),
                ("description", "YOLO"),
            ],
        )
        .unwrap()
    }

    /// Fixed inputs always give the same sign
    #[test]
    fn invoice_sign_is_stable() {
        assert_eq!(invoice().sign(), Some("12e3f227b59c8470c440e02e12b4305b"));
        assert_eq!(invoice(), invoice());
    }

    /// Read operations behave like a read-only map
    #[test]
    fn read_operations() {
        let snapshot = invoice();
        assert_eq!(snapshot.len(), 7);
        assert!(!snapshot.is_empty());
        assert!(snapshot.contains_key("order"));
        assert!(!snapshot.contains_key("password"));
        assert_eq!(snapshot.get("action").unwrap(), &"create");
        assert_eq!(snapshot.transaction_type(), Some(TransactionType::CreateInvoice));

        let keys: Vec<_> = snapshot.keys().collect();
        assert_eq!(
            keys,
            ["transactionType", "key", "order", "amount", "action", "description", "sign"]
        );
        assert_eq!((&snapshot).into_iter().count(), 7);
    }

    #[test]
    fn empty_invoice_is_rejected() {
        let err = Snapshot::build(
            "acc",
            "key",
            TransactionType::CreateInvoice,
            Vec::<(&str, &str)>::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ParamError::RequiredMissing(_)));
    }

    /// CHECK_STATUS has no field policy, so nothing can be signed for it
    #[test]
    fn check_status_is_unsupported() {
        let err = Snapshot::build(
            "acc",
            "key",
            TransactionType::CheckStatus,
            [("order", "1")],
        )
        .unwrap_err();
        assert_eq!(err, ParamError::NoPolicy(TransactionType::CheckStatus));
    }

    #[test]
    fn confirm_purchase_sign() {
        let snapshot = Snapshot::build(
            "acc",
            "password",
            TransactionType::ConfirmPurchase,
            [
                ("email", "test@test.test"),
                ("order", "1"),
                ("card", "555555****5555"),
                ("sign", "test"),
            ],
        )
        .unwrap();
        assert_eq!(snapshot.sign(), Some("afa0f44c3adb9c9d06ebec3d027c0797"));
    }
}
