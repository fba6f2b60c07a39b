//! Browser dashboard over the `weather_data` table.

pub mod cache;
pub mod render;
pub mod routes;
pub mod state;

pub use cache::RecordCache;
pub use routes::{resolve_city, routes};
pub use state::DashboardState;
