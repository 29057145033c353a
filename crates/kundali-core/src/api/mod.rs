pub mod client;

use async_trait::async_trait;

use crate::error::Result;
use crate::kundali::KundaliPayload;
use crate::state::BirthQuery;

pub use client::AstroClient;

/// The remote astrology service.
///
/// Screens hold it as `Arc<dyn AstroService>` so background tasks can
/// own a handle; tests swap in a recording fake.
#[async_trait]
pub trait AstroService: Send + Sync {
    /// `POST /kundali` with the birth details
    async fn kundali(&self, query: &BirthQuery) -> Result<KundaliPayload>;

    /// `POST /chatbot` with the question and the chart it refers to
    async fn chat(&self, message: &str, kundali: Option<&KundaliPayload>) -> Result<String>;
}
