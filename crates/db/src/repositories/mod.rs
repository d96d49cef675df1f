//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod audit_repo;
pub mod marking_repo;
pub mod public_dashboard_repo;
pub mod settings_repo;
pub mod user_repo;
pub mod workspace_repo;

pub use audit_repo::AuditLogRepo;
pub use marking_repo::MarkingDefinitionRepo;
pub use public_dashboard_repo::PublicDashboardRepo;
pub use settings_repo::SettingsRepo;
pub use user_repo::UserRepo;
pub use workspace_repo::WorkspaceRepo;
