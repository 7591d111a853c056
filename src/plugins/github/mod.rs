//! GitHub plugin: repositories and issues of configured organizations

mod client;
mod instance;
mod router;

pub use client::GithubClient;
pub use instance::{
    GithubConfig, GithubInstance, Issue, IssueSearchResult, Label, Repository, User,
};
pub use router::{configure, GithubParams, ROUTE};
