pub use super::application::Entity as Application;
pub use super::contract::Entity as Contract;
pub use super::project::Entity as Project;
pub use super::rating::Entity as Rating;
pub use super::task::Entity as Task;
pub use super::user::Entity as User;
