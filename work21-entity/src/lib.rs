pub mod application;
pub mod contract;
pub mod prelude;
pub mod project;
pub mod rating;
pub mod task;
pub mod user;

pub use application::Entity as Application;
pub use contract::Entity as Contract;
pub use project::Entity as Project;
pub use rating::Entity as Rating;
pub use task::Entity as Task;
pub use user::Entity as User;
