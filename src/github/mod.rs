// GitHub API module.
// Provides the client, transport seam, and types for the GitHub REST API.

pub mod client;
pub mod credentials;
pub mod endpoints;
pub mod transport;
pub mod types;

pub use client::GitHubClient;
pub use credentials::Credentials;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::*;
