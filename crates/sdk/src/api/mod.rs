//! Per-resource API groups.

mod environments;
mod health;
mod inventory;
mod projects;
mod repositories;
mod tasks;
mod templates;

pub use environments::EnvironmentsApi;
pub use health::HealthApi;
pub use inventory::InventoryApi;
pub use projects::ProjectsApi;
pub use repositories::RepositoriesApi;
pub use tasks::{RunTaskRequest, TasksApi};
pub use templates::TemplatesApi;
