//! Server-to-server calls to the gateway
use crate::config::Config;
use crate::error::Error;
use crate::params::Snapshot;
use crate::policy::TransactionType;
use crate::value::FieldValue;

/// Gateway API client. Signs the parameters of each call and posts them as JSON.
pub struct Api {
    http: reqwest::Client,
    config: Config,
}

impl Api {
    pub fn new(config: Config) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Use a preconfigured `reqwest` client, e.g. one with timeouts or a proxy.
    pub fn with_client(http: reqwest::Client, config: Config) -> Self {
        Self { http, config }
    }

    /// Build the signed POST request for `transaction_type` without sending it.
    pub fn request<K, V, I>(
        &self,
        transaction_type: TransactionType,
        fields: I,
    ) -> Result<reqwest::Request, Error>
    where
        K: AsRef<str>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let params = Snapshot::build(
            &self.config.key,
            &self.config.password,
            transaction_type,
            fields,
        )?;
        let request = self
            .http
            .post(self.config.url_for(transaction_type))
            .json(&params)
            .build()?;
        Ok(request)
    }

    /// Sign and post the parameters, returning the parsed response body.
    pub async fn query<K, V, I>(
        &self,
        transaction_type: TransactionType,
        fields: I,
    ) -> Result<serde_json::Value, Error>
    where
        K: AsRef<str>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let request = self.request(transaction_type, fields)?;
        tracing::info!(
            transaction_type = %transaction_type,
            url = %request.url(),
            "sending gateway request"
        );

        let response = self.http.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::warn!(
                transaction_type = %transaction_type,
                status = status.as_u16(),
                "gateway returned an error status"
            );
        }

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn create_invoice<K, V, I>(&self, fields: I) -> Result<serde_json::Value, Error>
    where
        K: AsRef<str>,
        V: Into<FieldValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.query(TransactionType::CreateInvoice, fields).await
    }
}
