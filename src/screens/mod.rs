//! Screen states for each route

pub mod chat;
pub mod fetch;
pub mod home;
pub mod input;

use std::sync::Arc;

use futures_util::FutureExt;
use kundali_core::{AstroService, Route, RouteParams};
use tokio::task::{JoinError, JoinHandle};

pub use chat::{ChatScreen, SendOutcome};
pub use fetch::{FetchKind, FetchScreen, FetchState};
pub use home::{HomeField, HomeScreen};

pub enum ScreenState {
    Home(HomeScreen),
    Fetch(FetchScreen),
    Chat(ChatScreen),
}

impl ScreenState {
    /// Build the screen for `route` from its navigation parameters and run
    /// its mount effect (fetch screens issue their one request here).
    pub fn mount(route: Route, params: &RouteParams, service: Arc<dyn AstroService>) -> Self {
        match route {
            Route::Home => ScreenState::Home(HomeScreen::new()),
            Route::Kundali | Route::Planets | Route::Dasha => {
                let kind = match route {
                    Route::Kundali => FetchKind::Positions,
                    Route::Planets => FetchKind::Houses,
                    _ => FetchKind::Dasha,
                };
                let mut screen = FetchScreen::new(kind, params, service);
                screen.mount();
                ScreenState::Fetch(screen)
            }
            Route::Chatbot => ScreenState::Chat(ChatScreen::new(params, service)),
        }
    }

    pub fn route(&self) -> Route {
        match self {
            ScreenState::Home(_) => Route::Home,
            ScreenState::Fetch(screen) => screen.kind.route(),
            ScreenState::Chat(_) => Route::Chatbot,
        }
    }

    pub fn poll(&mut self) {
        match self {
            ScreenState::Home(_) => {}
            ScreenState::Fetch(screen) => screen.poll(),
            ScreenState::Chat(screen) => screen.poll(),
        }
    }

    pub fn is_pending(&self) -> bool {
        match self {
            ScreenState::Home(_) => false,
            ScreenState::Fetch(screen) => screen.is_pending(),
            ScreenState::Chat(screen) => screen.is_pending(),
        }
    }

    /// Tear-down: cancel whatever request is still running
    pub fn abort(&mut self) {
        match self {
            ScreenState::Home(_) => {}
            ScreenState::Fetch(screen) => screen.abort(),
            ScreenState::Chat(screen) => screen.abort(),
        }
    }
}

/// Take the outcome of a background request if it has finished, leaving
/// `None` in its place. Never blocks.
fn take_finished<T>(task: &mut Option<JoinHandle<T>>) -> Option<Result<T, JoinError>> {
    let outcome = task.as_mut()?.now_or_never()?;
    *task = None;
    Some(outcome)
}
