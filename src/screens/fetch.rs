//! The fetch-on-mount screens: planetary positions, planets in houses, dasha

use std::sync::Arc;

use kundali_core::kundali::{PLANETARY_INFO, PLANETS_INFO};
use kundali_core::{AstroService, BirthQuery, KundaliPayload, Route, RouteParams};
use tokio::task::JoinHandle;

use super::take_finished;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Positions,
    Houses,
    Dasha,
}

impl FetchKind {
    pub fn route(self) -> Route {
        match self {
            FetchKind::Positions => Route::Kundali,
            FetchKind::Houses => Route::Planets,
            FetchKind::Dasha => Route::Dasha,
        }
    }

    /// Section the screen renders; a payload without it counts as failed
    pub fn required_section(self) -> Option<&'static str> {
        match self {
            FetchKind::Positions => Some(PLANETARY_INFO),
            FetchKind::Houses => Some(PLANETS_INFO),
            FetchKind::Dasha => None,
        }
    }

    pub fn loading_label(self) -> &'static str {
        match self {
            FetchKind::Positions => "Loading Kundali Data",
            FetchKind::Houses => "Loading Planetary Info",
            FetchKind::Dasha => "Loading Dasha Data",
        }
    }

    pub fn forward_label(self) -> &'static str {
        match self {
            FetchKind::Dasha => "Get Predictions",
            _ => "Next",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Idle,
    Loading,
    Loaded(KundaliPayload),
    Failed(String),
}

pub struct FetchScreen {
    pub kind: FetchKind,
    pub query: BirthQuery,
    pub state: FetchState,
    pub scroll: u16,
    // Unknown until the content has been laid out once
    max_scroll: Option<u16>,
    service: Arc<dyn AstroService>,
    task: Option<JoinHandle<kundali_core::Result<KundaliPayload>>>,
}

impl FetchScreen {
    pub fn new(kind: FetchKind, params: &RouteParams, service: Arc<dyn AstroService>) -> Self {
        Self {
            kind,
            query: params.birth_query(),
            state: FetchState::Idle,
            scroll: 0,
            max_scroll: None,
            service,
            task: None,
        }
    }

    /// Mount effect. Only the first call issues a request.
    pub fn mount(&mut self) {
        if self.state == FetchState::Idle {
            self.start();
        }
    }

    /// Re-issue the request after a failure. Returns false in any other state.
    pub fn retry(&mut self) -> bool {
        if !matches!(self.state, FetchState::Failed(_)) {
            return false;
        }
        tracing::info!("Retrying {:?} fetch", self.kind);
        self.start();
        true
    }

    fn start(&mut self) {
        let service = Arc::clone(&self.service);
        let query = self.query.clone();
        tracing::debug!("Fetching kundali for {:?} screen", self.kind);

        self.state = FetchState::Loading;
        self.scroll = 0;
        self.task = Some(tokio::spawn(async move { service.kundali(&query).await }));
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_some()
    }

    pub fn poll(&mut self) {
        let Some(outcome) = take_finished(&mut self.task) else {
            return;
        };

        self.state = match outcome {
            Ok(Ok(payload)) => match self.kind.required_section() {
                Some(section) => match payload.require_section(section) {
                    Ok(()) => FetchState::Loaded(payload),
                    Err(e) => {
                        tracing::error!(
                            "Kundali response unusable on {:?} screen: {}",
                            self.kind,
                            e
                        );
                        FetchState::Failed(e.to_string())
                    }
                },
                None => FetchState::Loaded(payload),
            },
            Ok(Err(e)) => {
                tracing::error!("Error fetching Kundali data: {}", e);
                FetchState::Failed(e.to_string())
            }
            Err(e) => {
                tracing::error!("Kundali request task ended abnormally: {}", e);
                FetchState::Failed(format!("request was interrupted: {}", e))
            }
        };
    }

    pub fn payload(&self) -> Option<&KundaliPayload> {
        match &self.state {
            FetchState::Loaded(payload) => Some(payload),
            _ => None,
        }
    }

    /// Parameters for the next screen; only available once loaded. The
    /// dasha screen also hands over the whole payload.
    pub fn forward(&self) -> Option<kundali_core::Result<(Route, RouteParams)>> {
        let payload = self.payload()?;
        let next = self.kind.route().next()?;
        let params = RouteParams::from_query(&self.query);

        Some(match self.kind {
            FetchKind::Dasha => params.with_payload(payload).map(|params| (next, params)),
            _ => Ok((next, params)),
        })
    }

    pub fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            tracing::debug!("Cancelling {:?} fetch", self.kind);
            task.abort();
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let scroll = self.scroll.saturating_add(lines);
        self.scroll = match self.max_scroll {
            Some(max) => scroll.min(max),
            None => scroll,
        };
    }

    /// Limit scrolling to `content_rows` shown `height` rows at a time
    pub fn fit_to_view(&mut self, content_rows: usize, height: u16) {
        let rows = u16::try_from(content_rows).unwrap_or(u16::MAX);
        let max = rows.saturating_sub(height);
        self.max_scroll = Some(max);
        self.scroll = self.scroll.min(max);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }
}
