pub mod api;
pub mod config;
pub mod error;
pub mod kundali;
pub mod logging;
pub mod route;
pub mod state;

// Re-export main types for convenience
pub use api::{AstroClient, AstroService};
pub use config::{Config, Overrides, ServiceConfig};
pub use error::{Error, Result};
pub use kundali::{DashaPeriod, HousePlacement, KundaliPayload, PlanetPosition};
pub use route::{Route, RouteParams};
pub use state::{BirthQuery, ChatMessage, Sender};
