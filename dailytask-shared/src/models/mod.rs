/// Database models for the task manager
///
/// - `user`: registered accounts
/// - `task`: tasks owned by a single user
///
/// The functions on these models talk to PostgreSQL directly. Application
/// code goes through the traits in [`crate::store`] instead, so the backing
/// store can be swapped.

pub mod task;
pub mod user;
