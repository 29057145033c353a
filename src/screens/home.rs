//! Birth details form

use kundali_core::{BirthQuery, Route, RouteParams};

use super::input::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeField {
    #[default]
    Date,
    Time,
    Place,
}

impl HomeField {
    pub const ALL: [HomeField; 3] = [HomeField::Date, HomeField::Time, HomeField::Place];

    pub fn label(self) -> &'static str {
        match self {
            HomeField::Date => "Date of Birth (YYYY-MM-DD)",
            HomeField::Time => "Time of Birth (HH:MM)(24H)",
            HomeField::Place => "Place of Birth",
        }
    }

    fn next(self) -> Self {
        match self {
            HomeField::Date => HomeField::Time,
            HomeField::Time => HomeField::Place,
            HomeField::Place => HomeField::Date,
        }
    }

    fn prev(self) -> Self {
        match self {
            HomeField::Date => HomeField::Place,
            HomeField::Time => HomeField::Date,
            HomeField::Place => HomeField::Time,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HomeScreen {
    pub focus: HomeField,
    date: TextInput,
    time: TextInput,
    place: TextInput,
}

impl HomeScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: HomeField) -> &TextInput {
        match field {
            HomeField::Date => &self.date,
            HomeField::Time => &self.time,
            HomeField::Place => &self.place,
        }
    }

    pub fn focused_mut(&mut self) -> &mut TextInput {
        match self.focus {
            HomeField::Date => &mut self.date,
            HomeField::Time => &mut self.time,
            HomeField::Place => &mut self.place,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn query(&self) -> BirthQuery {
        BirthQuery::new(self.date.value(), self.time.value(), self.place.value())
    }

    /// "Calculate Kundali": the three fields exactly as typed
    pub fn submit(&self) -> (Route, RouteParams) {
        (Route::Kundali, RouteParams::from_query(&self.query()))
    }
}
