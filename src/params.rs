//! Parameter validation, bundling and signing
//!
//! [`Params`] accumulates fields, validating and post-processing every write. Once all
//! fields are in, [`Params::prepare`] checks the transaction type's policy, signs the set
//! and freezes it into a [`Snapshot`].
use std::collections::BTreeSet;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::constants::{
    CARD, KEY, PASSWORD, SIGN, SUPPORTED_CURRENCY, SUPPORTED_LANGUAGES, SUPPORTED_PAYMENT,
    TRANSACTION_TYPE,
};
use crate::error::ParamError;
use crate::policy::{self, FieldPolicy, TransactionType};
use crate::utils;
use crate::value::FieldValue;

/// Validation applied to a field on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    TransactionType,
    OneOf(&'static [&'static str]),
    NonEmpty,
    PositiveNumber,
}

/// Transformation applied to a field after validation, before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    JoinWith(&'static str),
}

impl Rule {
    pub fn for_field(field: &str) -> Option<Rule> {
        match field {
            TRANSACTION_TYPE => Some(Rule::TransactionType),
            "lang" => Some(Rule::OneOf(SUPPORTED_LANGUAGES)),
            "payment" => Some(Rule::OneOf(SUPPORTED_PAYMENT)),
            "currency" => Some(Rule::OneOf(SUPPORTED_CURRENCY)),
            "amount" => Some(Rule::PositiveNumber),
            "description" => Some(Rule::NonEmpty),
            other if policy::is_required_anywhere(other) => Some(Rule::NonEmpty),
            _ => None,
        }
    }

    pub fn check(&self, value: &FieldValue) -> bool {
        match self {
            Rule::TransactionType => value
                .as_str()
                .is_some_and(|s| s.parse::<TransactionType>().is_ok()),
            Rule::OneOf(allowed) => value.as_str().is_some_and(|s| allowed.contains(&s)),
            Rule::NonEmpty => value.is_truthy(),
            Rule::PositiveNumber => {
                if !value.is_truthy() {
                    return false;
                }
                let number = match value {
                    FieldValue::Text(text) => text.trim().parse::<f64>().ok(),
                    FieldValue::Number(number) => number.as_f64(),
                    FieldValue::List(_) => None,
                };
                number.is_some_and(|n| n > 0.0)
            }
        }
    }
}

impl PostProcess {
    pub fn for_field(field: &str) -> Option<PostProcess> {
        match field {
            "paymentSystems" => Some(PostProcess::JoinWith(";")),
            _ => None,
        }
    }

    pub fn apply(&self, value: FieldValue) -> FieldValue {
        match (self, value) {
            (PostProcess::JoinWith(sep), FieldValue::List(items)) => FieldValue::Text(
                items
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(sep),
            ),
            (_, value) => value,
        }
    }
}

/// Run the field's rule, if it has one.
pub fn validate_field(field: &str, value: &FieldValue) -> Result<(), ParamError> {
    match Rule::for_field(field) {
        Some(rule) if !rule.check(value) => Err(ParamError::Validation(field.to_string())),
        _ => Ok(()),
    }
}

/// Ordered field storage shared by [`Params`] and [`Snapshot`].
#[derive(Debug, Clone, Default, PartialEq)]
struct Fields(Vec<(String, FieldValue)>);

impl Fields {
    fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0
            .iter()
            .find_map(|(name, value)| (name == field).then_some(value))
    }

    fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|(name, _)| name == field)
    }

    // existing fields keep their position
    fn set(&mut self, field: &str, value: FieldValue) {
        match self.0.iter_mut().find(|(name, _)| name == field) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((field.to_string(), value)),
        }
    }

    fn remove(&mut self, field: &str) -> Option<FieldValue> {
        let index = self.0.iter().position(|(name, _)| name == field)?;
        Some(self.0.remove(index).1)
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Mutable parameter set under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    fields: Fields,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every field in order, then assemble the bundled fields of the
    /// transaction type, if one was given.
    pub fn from_fields<K, V, I>(fields: I) -> Result<Self, ParamError>
    where
        K: AsRef<str>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut params = Self::new();
        params.extend(fields)?;
        params.bundle()?;
        Ok(params)
    }

    /// Validate, post-process and store a single field.
    pub fn insert(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<(), ParamError> {
        if field == PASSWORD {
            return Err(ParamError::Reserved(field.to_string()));
        }
        let value = value.into();
        if let FieldValue::List(items) = &value {
            if items.iter().any(|item| matches!(item, FieldValue::List(_))) {
                return Err(ParamError::NestedList(field.to_string()));
            }
        }
        validate_field(field, &value)?;
        let value = match PostProcess::for_field(field) {
            Some(post) => post.apply(value),
            None => value,
        };
        self.fields.set(field, value);
        Ok(())
    }

    /// Insert many fields. Stops at the first rejected field.
    pub fn extend<K, V, I>(&mut self, fields: I) -> Result<(), ParamError>
    where
        K: AsRef<str>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        fields
            .into_iter()
            .try_for_each(|(field, value)| self.insert(field.as_ref(), value))
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn len(&self) -> usize {
        self.fields.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter()
    }

    pub fn transaction_type(&self) -> Option<TransactionType> {
        self.get(TRANSACTION_TYPE)?.as_str()?.parse().ok()
    }

    fn policy(&self) -> Result<&'static FieldPolicy, ParamError> {
        self.require([TRANSACTION_TYPE])?;
        let tx = self
            .transaction_type()
            .ok_or_else(|| ParamError::Validation(TRANSACTION_TYPE.to_string()))?;
        tx.policy().ok_or(ParamError::NoPolicy(tx))
    }

    /// Fields the active transaction type needs: its required list plus its signature fields.
    pub fn required_fields(&self) -> Result<BTreeSet<&'static str>, ParamError> {
        Ok(self.policy()?.required_fields())
    }

    fn missing<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        fields
            .into_iter()
            .filter(|field| *field != PASSWORD && !self.contains_key(field))
            .map(str::to_string)
            .collect()
    }

    fn require<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> Result<(), ParamError> {
        let missing = self.missing(fields);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ParamError::RequiredMissing(missing))
        }
    }

    fn require_reversed<'a>(
        &self,
        fields: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ParamError> {
        let missing = self.missing(fields);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ParamError::ReversedMissing(missing))
        }
    }

    /// Replace bundle parts with their synthesized field. A bundle field that is
    /// already set wins and its parts are dropped.
    fn bundle(&mut self) -> Result<(), ParamError> {
        let Some(tx) = self.transaction_type() else {
            return Ok(());
        };
        let policy = tx.policy().ok_or(ParamError::NoPolicy(tx))?;

        for bundle in policy.bundles {
            if self.get(bundle.field).is_some_and(FieldValue::is_truthy) {
                for part in bundle.parts {
                    if self.fields.remove(part).is_some() {
                        tracing::debug!(field = bundle.field, part, "dropped bundle part");
                    }
                }
                continue;
            }

            let mut collected = Vec::new();
            for part in bundle.parts {
                if let Some(value) = self.get(part).filter(|value| value.is_truthy()) {
                    validate_field(part, value)?;
                    collected.push((*part, value.clone()));
                }
            }
            if collected.is_empty() {
                continue;
            }

            let encoded = utils::to_gateway_json(
                bundle.field,
                collected.iter().map(|(part, value)| (part, value)),
            )?;
            for (part, _) in &collected {
                self.fields.remove(part);
            }
            self.insert(bundle.field, encoded)?;
            tracing::debug!(field = bundle.field, parts = collected.len(), "bundled fields");
        }
        Ok(())
    }

    /// Signature of the current fields for the active transaction type.
    ///
    /// `password` is hashed in place of the `password` field, `card` is reduced to its
    /// first six and last four characters, and reversed fields are reversed last.
    pub fn signature(&self, password: &str) -> Result<String, ParamError> {
        let policy = self.policy()?;
        self.require(policy.signature.iter().copied())?;
        self.require_reversed(policy.signature_reversed.iter().copied())?;

        let mut values = Vec::with_capacity(policy.signature.len());
        for &field in policy.signature {
            let value = match field {
                PASSWORD => FieldValue::from(password),
                CARD => FieldValue::Text(mask_card(self.stored(field)?)?),
                _ => self.stored(field)?.clone(),
            };
            let value = if policy.is_reversed(field) {
                FieldValue::Text(utils::reverse(&value)?)
            } else {
                value
            };
            values.push(value);
        }

        Ok(utils::generate_signature(&values))
    }

    fn stored(&self, field: &str) -> Result<&FieldValue, ParamError> {
        self.get(field)
            .ok_or_else(|| ParamError::RequiredMissing(vec![field.to_string()]))
    }

    /// Check the required fields, sign with `password` and freeze the result.
    pub fn prepare(mut self, password: &str) -> Result<Snapshot, ParamError> {
        let mut required = self.required_fields()?;
        for field in [SIGN, PASSWORD, TRANSACTION_TYPE] {
            required.remove(field);
        }
        self.require(required)?;

        let sign = self.signature(password)?;
        self.insert(SIGN, sign)?;
        tracing::debug!(
            transaction_type = ?self.transaction_type(),
            fields = self.len(),
            "params signed"
        );

        Ok(Snapshot {
            fields: self.fields,
        })
    }
}

fn mask_card(card: &FieldValue) -> Result<String, ParamError> {
    let digits: Vec<char> = card
        .as_str()
        .ok_or(ParamError::NotAString(card.kind()))?
        .chars()
        .collect();
    let head = &digits[..digits.len().min(6)];
    let tail = &digits[digits.len().saturating_sub(4)..];
    Ok(head.iter().chain(tail).collect())
}

/// Signed, read-only parameter set.
///
/// A snapshot can only be produced by [`Params::prepare`] or [`Snapshot::build`] and has
/// no way to change its fields:
///
/// ```compile_fail
/// use platon::{Snapshot, TransactionType};
///
/// let mut snapshot = Snapshot::build("acc", "pass", TransactionType::CreateInvoice, [
///     ("order", "1"), ("amount", "1.00"), ("action", "create"), ("description", "x"),
/// ]).unwrap();
/// snapshot.insert("order", "2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    fields: Fields,
}

impl Snapshot {
    /// Build and sign the parameters of a `transaction_type` request for account `key`.
    pub fn build<K, V, I>(
        key: &str,
        password: &str,
        transaction_type: TransactionType,
        fields: I,
    ) -> Result<Self, ParamError>
    where
        K: AsRef<str>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let fields = fields
            .into_iter()
            .map(|(field, value)| match field.as_ref() {
                TRANSACTION_TYPE | KEY => Err(ParamError::Reserved(field.as_ref().to_string())),
                name => Ok((name.to_string(), value.into())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let seed = [
            (TRANSACTION_TYPE.to_string(), FieldValue::from(transaction_type.as_str())),
            (KEY.to_string(), FieldValue::from(key)),
        ];
        Params::from_fields(seed.into_iter().chain(fields))?.prepare(password)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn len(&self) -> usize {
        self.fields.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(name, _)| name)
    }

    pub fn transaction_type(&self) -> Option<TransactionType> {
        self.get(TRANSACTION_TYPE)?.as_str()?.parse().ok()
    }

    pub fn sign(&self) -> Option<&str> {
        self.get(SIGN)?.as_str()
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a str, &'a FieldValue);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a FieldValue)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
