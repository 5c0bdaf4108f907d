//! GitHub REST API endpoint groups.

pub mod git;
pub mod issues;
pub mod pulls;
pub mod repos;
pub mod search;
pub mod users;

pub use git::GitApi;
pub use issues::IssuesApi;
pub use pulls::PullsApi;
pub use repos::ReposApi;
pub use search::SearchApi;
pub use users::UsersApi;
