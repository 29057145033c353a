use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::AstroService;
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::kundali::KundaliPayload;
use crate::state::BirthQuery;

#[derive(Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    #[serde(rename = "kundaliData")]
    kundali_data: Option<&'a KundaliPayload>,
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
}

#[derive(Clone)]
pub struct AstroClient {
    client: Client,
    config: ServiceConfig,
}

impl AstroClient {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        let url = self.config.endpoint(path);
        tracing::debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            tracing::warn!("POST {} returned {}", url, status);
            return Err(Error::status(status.as_u16(), text));
        }

        Ok(response)
    }
}

#[async_trait]
impl AstroService for AstroClient {
    async fn kundali(&self, query: &BirthQuery) -> Result<KundaliPayload> {
        let response = self.post("/kundali", query).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn chat(&self, message: &str, kundali: Option<&KundaliPayload>) -> Result<String> {
        let request = ChatRequest {
            message,
            kundali_data: kundali,
        };

        let response = self.post("/chatbot", &request).await?;
        let body = response.text().await?;
        let chat: ChatResponse = serde_json::from_str(&body)?;
        Ok(chat.response)
    }
}
