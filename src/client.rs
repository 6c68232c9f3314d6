//! Entry point holding the merchant credentials
use crate::api::Api;
use crate::config::Config;
use crate::error::ParamError;
use crate::form::{Form, QueryParams};
use crate::params::Snapshot;
use crate::policy::TransactionType;
use crate::value::FieldValue;

pub struct Platon {
    config: Config,
    api: Api,
}

impl Platon {
    pub fn new(key: impl Into<String>, password: impl Into<String>) -> Self {
        Self::with_config(Config::new(key, password))
    }

    pub fn with_config(config: Config) -> Self {
        let api = Api::new(config.clone());
        Self { config, api }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    /// Signed purchase form for a browser redirect.
    pub fn form<K, V, I>(&self, fields: I) -> Result<Form, ParamError>
    where
        K: AsRef<str>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Ok(Form::new(&self.config.key, &self.config.password, fields)?
            .with_action_url(self.config.purchase_url.clone()))
    }

    /// Signed parameters for `transaction_type` and the endpoint to post them to.
    pub fn query_params<K, V, I>(
        &self,
        transaction_type: TransactionType,
        fields: I,
    ) -> Result<QueryParams, ParamError>
    where
        K: AsRef<str>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let snapshot = Snapshot::build(
            &self.config.key,
            &self.config.password,
            transaction_type,
            fields,
        )?;
        Ok(QueryParams::from_snapshot(
            self.config.url_for(transaction_type),
            &snapshot,
        ))
    }
}
