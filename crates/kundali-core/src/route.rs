//! Screen routes and the parameters passed between them
//!
//! Screens never share state by reference. Each transition hands the next
//! screen a fresh [`RouteParams`], a string-to-string map; the Kundali
//! payload rides along in its JSON string form and is parsed back on the
//! receiving side.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::kundali::KundaliPayload;
use crate::state::BirthQuery;

pub const DATE_OF_BIRTH: &str = "dateOfBirth";
pub const TIME_OF_BIRTH: &str = "timeOfBirth";
pub const PLACE_OF_BIRTH: &str = "placeOfBirth";
pub const KUNDALI_DATA: &str = "kundaliData";

/// The five screens of the linear flow, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Kundali,
    Planets,
    Dasha,
    Chatbot,
}

impl Route {
    /// The screen a forward action leads to
    pub fn next(self) -> Option<Route> {
        match self {
            Route::Home => Some(Route::Kundali),
            Route::Kundali => Some(Route::Planets),
            Route::Planets => Some(Route::Dasha),
            Route::Dasha => Some(Route::Chatbot),
            Route::Chatbot => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Home => "Birth Details",
            Route::Kundali => "Planetary Positions",
            Route::Planets => "Planets in Houses",
            Route::Dasha => "Dasha",
            Route::Chatbot => "Predictions",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(BTreeMap<String, String>);

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_query(query: &BirthQuery) -> Self {
        let mut params = Self::new();
        params.insert(DATE_OF_BIRTH, &query.date_of_birth);
        params.insert(TIME_OF_BIRTH, &query.time_of_birth);
        params.insert(PLACE_OF_BIRTH, &query.place_of_birth);
        params
    }

    /// Attach the payload in its serialized form
    pub fn with_payload(mut self, payload: &KundaliPayload) -> Result<Self> {
        let encoded = payload.to_json_string()?;
        self.insert(KUNDALI_DATA, encoded);
        Ok(self)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Birth details carried by these params; absent keys become empty strings
    pub fn birth_query(&self) -> BirthQuery {
        let field = |key: &str| self.get(key).unwrap_or_default().to_string();
        BirthQuery {
            date_of_birth: field(DATE_OF_BIRTH),
            time_of_birth: field(TIME_OF_BIRTH),
            place_of_birth: field(PLACE_OF_BIRTH),
        }
    }

    /// Parse the forwarded payload, if one was attached
    pub fn payload(&self) -> Result<Option<KundaliPayload>> {
        self.get(KUNDALI_DATA)
            .map(KundaliPayload::from_json_str)
            .transpose()
    }
}
