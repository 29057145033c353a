//! Test helpers: a recording in-memory astrology service and utilities
//! for waiting on background requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use kundali_core::{AstroService, BirthQuery, Error, KundaliPayload, Result};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::{Frame, Terminal};
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use crate::app::App;
use crate::screens::{ChatScreen, FetchScreen};

pub fn sample_kundali() -> Value {
    json!({
        "ascendant_info": { "Ascendant Sign": "Leo (12.34°)" },
        "planetary_info": {
            "Sun": { "Position": "10°", "Sign": "Aries" },
            "Moon": { "Position": "200.50°", "Sign": "Libra" }
        },
        "planets_info": {
            "Sun": { "House": 9, "House Ruler": "Mars", "Strength": "Exalted", "Nature": "Malefic", "Sign": "Aries" },
            "Moon": { "House": 3, "House Ruler": "Mercury", "Strength": "Neutral", "Nature": "Benefic", "Sign": "Libra" }
        },
        "current_dasha": { "Planet": "Venus", "Start Date": "2015-03-01", "End Date": "2035-03-01" },
        "current_antardasha": { "Planet": "Moon", "Start Date": "2020-01-01", "End Date": "2026-01-01" },
        "kundali_summary": "Leo ascendant"
    })
}

/// In-memory service that records every call.
///
/// Kundali requests answer with the configured JSON (or a 503 when none is
/// set); chat requests echo "Reply to: <message>" unless chat is failing.
pub struct FakeService {
    kundali_reply: Mutex<Option<Value>>,
    chat_fails: AtomicBool,
    kundali_calls: Mutex<Vec<BirthQuery>>,
    chat_calls: Mutex<Vec<(String, Option<KundaliPayload>)>>,
    chat_held: AtomicBool,
    chat_gate: Semaphore,
}

impl FakeService {
    pub fn new(kundali: Value) -> Arc<Self> {
        Arc::new(Self {
            kundali_reply: Mutex::new(Some(kundali)),
            chat_fails: AtomicBool::new(false),
            kundali_calls: Mutex::new(Vec::new()),
            chat_calls: Mutex::new(Vec::new()),
            chat_held: AtomicBool::new(false),
            chat_gate: Semaphore::new(0),
        })
    }

    /// Every request fails with a 503
    pub fn failing() -> Arc<Self> {
        let service = Self::new(Value::Null);
        *service.kundali_reply.lock().unwrap() = None;
        service.chat_fails.store(true, Ordering::SeqCst);
        service
    }

    /// Chat replies wait until [`release_chat`](Self::release_chat)
    pub fn hold_chat(self: Arc<Self>) -> Arc<Self> {
        self.chat_held.store(true, Ordering::SeqCst);
        self
    }

    pub fn release_chat(&self) {
        self.chat_gate.add_permits(1);
    }

    pub fn set_kundali(&self, kundali: Value) {
        *self.kundali_reply.lock().unwrap() = Some(kundali);
    }

    pub fn kundali_calls(&self) -> Vec<BirthQuery> {
        self.kundali_calls.lock().unwrap().clone()
    }

    pub fn kundali_count(&self) -> usize {
        self.kundali_calls.lock().unwrap().len()
    }

    pub fn chat_calls(&self) -> Vec<(String, Option<KundaliPayload>)> {
        self.chat_calls.lock().unwrap().clone()
    }

    pub fn chat_count(&self) -> usize {
        self.chat_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AstroService for FakeService {
    async fn kundali(&self, query: &BirthQuery) -> Result<KundaliPayload> {
        self.kundali_calls.lock().unwrap().push(query.clone());
        let reply = self.kundali_reply.lock().unwrap().clone();
        match reply {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Err(Error::status(503, "service unavailable")),
        }
    }

    async fn chat(&self, message: &str, kundali: Option<&KundaliPayload>) -> Result<String> {
        self.chat_calls
            .lock()
            .unwrap()
            .push((message.to_string(), kundali.cloned()));

        if self.chat_held.load(Ordering::SeqCst) {
            // Permit goes back on drop so later calls pass straight through
            let _permit = self.chat_gate.acquire().await;
        }
        if self.chat_fails.load(Ordering::SeqCst) {
            return Err(Error::status(503, "service unavailable"));
        }
        Ok(format!("Reply to: {}", message))
    }
}

const SETTLE_ATTEMPTS: usize = 200;
const SETTLE_STEP: Duration = Duration::from_millis(5);

pub async fn settle_screen(screen: &mut FetchScreen) {
    for _ in 0..SETTLE_ATTEMPTS {
        screen.poll();
        if !screen.is_pending() {
            return;
        }
        tokio::time::sleep(SETTLE_STEP).await;
    }
    panic!("fetch did not finish");
}

pub async fn settle_chat(screen: &mut ChatScreen) {
    for _ in 0..SETTLE_ATTEMPTS {
        screen.poll();
        if !screen.is_pending() {
            return;
        }
        tokio::time::sleep(SETTLE_STEP).await;
    }
    panic!("chat reply did not arrive");
}

pub async fn settle_app(app: &mut App) {
    for _ in 0..SETTLE_ATTEMPTS {
        app.poll_tasks();
        if !app.has_pending() {
            return;
        }
        tokio::time::sleep(SETTLE_STEP).await;
    }
    panic!("background requests did not finish");
}

/// Render into an in-memory terminal and return the buffer
pub fn render_to_buffer(width: u16, height: u16, draw: impl FnOnce(&mut Frame)) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(draw).unwrap();
    terminal.backend().buffer().clone()
}

/// Buffer rows as strings
pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect())
        .collect()
}

pub fn buffer_contains(buffer: &Buffer, text: &str) -> bool {
    buffer_lines(buffer).iter().any(|line| line.contains(text))
}
