//! Kundali payload returned by the astrology service
//!
//! The payload is kept as the raw JSON object so it can be forwarded to
//! the chat endpoint untouched. Screens read it through the typed
//! projections below, which never fail on odd field values: anything
//! that is not a string is rendered verbatim and absent fields fall back
//! to [`UNKNOWN`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub const ASCENDANT_INFO: &str = "ascendant_info";
pub const PLANETARY_INFO: &str = "planetary_info";
pub const PLANETS_INFO: &str = "planets_info";
pub const CURRENT_DASHA: &str = "current_dasha";
pub const CURRENT_ANTARDASHA: &str = "current_antardasha";

/// Placeholder for fields the service left out
pub const UNKNOWN: &str = "Unknown";

/// Opaque Kundali report, insertion order preserved
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KundaliPayload(Map<String, Value>);

/// One entry of `planetary_info`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanetPosition {
    pub planet: String,
    pub position: String,
    pub sign: String,
}

impl PlanetPosition {
    /// "Sun: 10° in Aries"
    pub fn line(&self) -> String {
        format!("{}: {} in {}", self.planet, self.position, self.sign)
    }
}

/// One entry of `planets_info`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HousePlacement {
    pub planet: String,
    pub house: String,
    pub house_ruler: String,
    pub strength: String,
    pub nature: String,
    pub sign: String,
}

impl HousePlacement {
    /// Labelled fields in display order
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("House", self.house.as_str()),
            ("House Ruler", self.house_ruler.as_str()),
            ("Strength", self.strength.as_str()),
            ("Nature", self.nature.as_str()),
            ("Sign", self.sign.as_str()),
        ]
    }
}

/// `current_dasha` / `current_antardasha`: the service sends either a
/// period object or a plain message such as "No current Mahadasha found."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashaPeriod {
    Missing,
    Note(String),
    Period {
        planet: String,
        start_date: String,
        end_date: String,
    },
}

impl DashaPeriod {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => DashaPeriod::Missing,
            Some(Value::String(s)) => DashaPeriod::Note(s.clone()),
            Some(Value::Object(obj)) => DashaPeriod::Period {
                planet: field_text(obj, "Planet"),
                start_date: field_text(obj, "Start Date"),
                end_date: field_text(obj, "End Date"),
            },
            Some(other) => DashaPeriod::Note(other.to_string()),
        }
    }
}

impl KundaliPayload {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Parse the string form used in navigation parameters
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Fails unless `section` is present and holds a JSON object
    pub fn require_section(&self, section: &'static str) -> Result<()> {
        match self.0.get(section) {
            Some(Value::Object(_)) => Ok(()),
            _ => Err(Error::MissingSection { section }),
        }
    }

    /// `ascendant_info` entries as (label, value), e.g. ("Ascendant Sign", "Leo (12.34°)")
    pub fn ascendant(&self) -> Vec<(String, String)> {
        match self.0.get(ASCENDANT_INFO) {
            Some(Value::Object(obj)) => obj
                .iter()
                .map(|(label, value)| (label.clone(), display_value(value)))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn planetary_positions(&self) -> Result<Vec<PlanetPosition>> {
        let info = self.section(PLANETARY_INFO)?;
        Ok(info
            .iter()
            .map(|(planet, entry)| PlanetPosition {
                planet: planet.clone(),
                position: entry_text(entry, "Position"),
                sign: entry_text(entry, "Sign"),
            })
            .collect())
    }

    pub fn house_placements(&self) -> Result<Vec<HousePlacement>> {
        let info = self.section(PLANETS_INFO)?;
        Ok(info
            .iter()
            .map(|(planet, entry)| HousePlacement {
                planet: planet.clone(),
                house: entry_text(entry, "House"),
                house_ruler: entry_text(entry, "House Ruler"),
                strength: entry_text(entry, "Strength"),
                nature: entry_text(entry, "Nature"),
                sign: entry_text(entry, "Sign"),
            })
            .collect())
    }

    pub fn current_dasha(&self) -> DashaPeriod {
        DashaPeriod::from_value(self.0.get(CURRENT_DASHA))
    }

    pub fn current_antardasha(&self) -> DashaPeriod {
        DashaPeriod::from_value(self.0.get(CURRENT_ANTARDASHA))
    }

    fn section(&self, section: &'static str) -> Result<&Map<String, Value>> {
        match self.0.get(section) {
            Some(Value::Object(obj)) => Ok(obj),
            _ => Err(Error::MissingSection { section }),
        }
    }
}

/// Render a JSON value the way a template would: strings bare, null as
/// [`UNKNOWN`], everything else in JSON notation.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => UNKNOWN.to_string(),
        other => other.to_string(),
    }
}

fn field_text(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .map(display_value)
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn entry_text(entry: &Value, key: &str) -> String {
    match entry {
        Value::Object(obj) => field_text(obj, key),
        _ => UNKNOWN.to_string(),
    }
}
