pub mod account;
pub mod task;

pub use account::{normalize_email, Account, AccountResponse};
pub use task::{NewTask, Task, TaskChanges};
