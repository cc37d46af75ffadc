//! Date-range selection for calendar pickers
//!
//! The pieces here carry no rendering of their own.  A front end feeds them
//! clicks, pointer positions, touch samples and typed text, and draws
//! whatever [`picker::DateRangePicker`] reports back.  Dates are handled
//! through a [`adapter::DateAdapter`], so the same logic works over any
//! date type; [`adapter::TimeAdapter`] covers [`time::Date`].
pub mod adapter;
pub mod config;
pub mod gesture;
pub mod hover;
pub mod model;
pub mod picker;
pub mod presets;
pub mod selection;
pub mod text;
pub mod viewport;
