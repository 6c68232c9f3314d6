//! Browser redirect flows: the auto-submitting purchase form and the query payload
//! for clients that post the signed parameters themselves.
use serde::Serialize;

use crate::constants::{PURCHASE_URL, TRANSACTION_TYPE};
use crate::error::ParamError;
use crate::params::Snapshot;
use crate::policy::TransactionType;
use crate::value::FieldValue;

/// Purchase form posting signed parameters to the gateway.
#[derive(Debug, Clone)]
pub struct Form {
    action_url: String,
    params: Snapshot,
}

impl Form {
    pub fn new<K, V, I>(key: &str, password: &str, fields: I) -> Result<Self, ParamError>
    where
        K: AsRef<str>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let params = Snapshot::build(key, password, TransactionType::Purchase, fields)?;
        Ok(Self {
            action_url: PURCHASE_URL.to_string(),
            params,
        })
    }

    /// Post the form somewhere other than the default purchase endpoint.
    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = url.into();
        self
    }

    pub fn params(&self) -> &Snapshot {
        &self.params
    }

    /// One hidden input per field, `name[]` inputs for each item of a list field.
    pub fn inputs(&self) -> Vec<String> {
        let mut inputs = Vec::with_capacity(self.params.len());
        for (name, value) in self.params.iter() {
            if name == TRANSACTION_TYPE {
                continue;
            }
            match value {
                FieldValue::List(items) => {
                    let name = format!("{name}[]");
                    inputs.extend(items.iter().map(|item| render_input(&name, item)));
                }
                scalar => inputs.push(render_input(name, scalar)),
            }
        }
        inputs
    }

    pub fn render(&self) -> String {
        format!(
            "<form method=\"post\" action=\"{action}\" accept-charset=\"utf-8\">\n    \
             {inputs}\n    \
             <input type=\"submit\" value=\"Submit purchase form\">\n\
             </form>",
            action = self.action_url,
            inputs = self.inputs().join("\n    "),
        )
    }
}

fn render_input(name: &str, value: &FieldValue) -> String {
    format!(
        "<input type=\"hidden\" name=\"{name}\" value=\"{}\" />",
        escape_html(&value.to_string())
    )
}

/// Escape `& < > " '` for use inside an attribute value.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Signed parameters and the endpoint they should be posted to.
#[derive(Debug, Clone, Serialize)]
pub struct QueryParams {
    pub action_url: String,
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl QueryParams {
    pub fn new<K, V, I>(
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
        let snapshot = Snapshot::build(key, password, transaction_type, fields)?;
        Ok(Self::from_snapshot(
            transaction_type.default_url(),
            &snapshot,
        ))
    }

    pub fn from_snapshot(action_url: &str, snapshot: &Snapshot) -> Self {
        let params = snapshot
            .iter()
            .filter(|(name, _)| *name != TRANSACTION_TYPE)
            .map(|(name, value)| (name.to_string(), to_json(value)))
            .collect();
        Self {
            action_url: action_url.to_string(),
            params,
        }
    }
}

fn to_json(value: &FieldValue) -> serde_json::Value {
    match value {
        FieldValue::Text(text) => serde_json::Value::String(text.clone()),
        FieldValue::Number(number) => serde_json::Value::Number(number.clone()),
        FieldValue::List(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
    }
}
