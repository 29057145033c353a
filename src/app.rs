use std::sync::Arc;

use kundali_core::{AstroService, Route, RouteParams};

use crate::screens::{ChatScreen, FetchScreen, HomeScreen, ScreenState};

/// Navigation shell: a stack of screens, newest on top.
///
/// Screens only ever receive data through the [`RouteParams`] handed to
/// [`navigate`](App::navigate); popping a screen drops its state and
/// cancels its request without passing anything back.
pub struct App {
    pub should_quit: bool,
    pub animation_frame: u8, // 0-2 for ellipsis animation
    pub service_url: String,
    stack: Vec<ScreenState>,
    service: Arc<dyn AstroService>,
}

impl App {
    pub fn new(service: Arc<dyn AstroService>, service_url: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            animation_frame: 0,
            service_url: service_url.into(),
            stack: vec![ScreenState::Home(HomeScreen::new())],
            service,
        }
    }

    pub fn current(&self) -> &ScreenState {
        // The home screen is never popped
        &self.stack[self.stack.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut ScreenState {
        let top = self.stack.len() - 1;
        &mut self.stack[top]
    }

    pub fn current_route(&self) -> Route {
        self.current().route()
    }

    pub fn breadcrumb(&self) -> Vec<Route> {
        self.stack.iter().map(ScreenState::route).collect()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Push and mount the screen for `route`
    pub fn navigate(&mut self, route: Route, params: RouteParams) {
        tracing::info!("Navigating to {:?}", route);
        let screen = ScreenState::mount(route, &params, Arc::clone(&self.service));
        self.stack.push(screen);
    }

    /// Run the current screen's forward action, if it has one right now
    pub fn forward(&mut self) {
        let target = match self.current() {
            ScreenState::Home(home) => Some(Ok(home.submit())),
            ScreenState::Fetch(fetch) => fetch.forward(),
            ScreenState::Chat(_) => None,
        };

        match target {
            Some(Ok((route, params))) => self.navigate(route, params),
            Some(Err(e)) => tracing::error!("Could not prepare parameters for next screen: {}", e),
            None => {}
        }
    }

    /// Pop the current screen. The home screen stays.
    pub fn go_back(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        if let Some(mut screen) = self.stack.pop() {
            tracing::info!("Leaving {:?}", screen.route());
            screen.abort();
        }
        true
    }

    /// Collect finished requests on every screen in the stack. Screens
    /// below the top keep their requests running, as mounted screens do.
    pub fn poll_tasks(&mut self) {
        for screen in &mut self.stack {
            screen.poll();
        }
    }

    pub fn has_pending(&self) -> bool {
        self.stack.iter().any(ScreenState::is_pending)
    }

    /// Tick animation frame and collect finished requests (called by Tick event)
    pub fn tick(&mut self) {
        if self.current().is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        self.poll_tasks();
    }

    pub fn fetch_mut(&mut self) -> Option<&mut FetchScreen> {
        match self.current_mut() {
            ScreenState::Fetch(screen) => Some(screen),
            _ => None,
        }
    }

    pub fn chat_mut(&mut self) -> Option<&mut ChatScreen> {
        match self.current_mut() {
            ScreenState::Chat(screen) => Some(screen),
            _ => None,
        }
    }

    pub fn home_mut(&mut self) -> Option<&mut HomeScreen> {
        match self.current_mut() {
            ScreenState::Home(screen) => Some(screen),
            _ => None,
        }
    }
}
