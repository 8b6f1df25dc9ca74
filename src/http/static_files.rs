//! Static asset serving.
//!
//! Thin wrapper over `tower_http::services::ServeDir`: given a request, either
//! the file under the configured root (content type guessed from the
//! extension, `index.html` for directories) or a 404.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeDir;

#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    service: ServeDir,
}

impl StaticFiles {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            service: ServeDir::new(&root),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve the file named by the request path, or 404.
    pub async fn serve(&self, request: Request<Body>) -> Response {
        let result: Result<_, Infallible> = self.service.clone().oneshot(request).await;
        match result {
            Ok(response) => response.map(Body::new).into_response(),
            Err(never) => match never {},
        }
    }
}
