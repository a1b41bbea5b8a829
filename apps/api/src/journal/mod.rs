pub mod dashboard;
pub mod handlers;
pub mod models;
pub mod store;
pub mod submission;

pub use store::JournalLog;
