use async_trait::async_trait;
use reqwest::{Request, Response};

/// Sends a prepared request. Registry clients are generic over this so auth
/// wrappers can be layered on a [`BasicClient`](super::BasicClient).
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
