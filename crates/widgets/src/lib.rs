//! Public widget resolution engine.
//!
//! Every anonymous widget query flows through [`WidgetEngine`]:
//!
//! 1. [`WidgetResolver`] loads the dashboard by public key, decodes its
//!    manifest, locates the widget and builds the
//!    [`ScopedIdentity`](vantage_core::identity::ScopedIdentity) from the
//!    current marking catalog and sharing ceiling.
//! 2. A [`translate`] function maps the widget's data selection and the
//!    caller's date window to engine parameters.
//! 3. The [`QueryEngine`] runs the query under the shared [`QueryBudget`].
//! 4. Two-level distributions fan out through [`breakdown`].

pub mod breakdown;
pub mod budget;
pub mod collaborators;
pub mod engine;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod resolver;
pub mod scope;
pub mod translate;

pub use budget::QueryBudget;
pub use collaborators::{
    shareable_markings, DashboardLookup, MarkingCatalog, PublishedDashboard, QueryEngine,
    SharingPolicy,
};
pub use engine::{DashboardDisplay, WidgetEngine, WidgetRequest};
pub use resolver::{ResolvedWidget, WidgetResolver};
