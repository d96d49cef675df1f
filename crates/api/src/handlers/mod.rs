//! Request handlers.
//!
//! - [`public_widgets`] -- anonymous dashboard display and widget queries.
//! - [`public_dashboard`] -- publish, read, edit and delete public dashboards.

pub mod public_dashboard;
pub mod public_widgets;
