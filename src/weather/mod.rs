//! Current-weather widget.
//!
//! * [`tables`]: condition-code, Beaufort and compass lookups.
//! * [`snapshot`]: the provider's JSON payload.
//! * [`transform`]: snapshot → [`DisplayWeather`].
//! * [`widget`]: configuration binding and the refresh cycle.

mod snapshot;
pub mod tables;
mod transform;
mod widget;

pub use transform::DisplayWeather;
pub use widget::{WeatherView, WeatherWidget};
