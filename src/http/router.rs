use std::path::{Path, PathBuf};

use crate::http::files::{self, FileInfo};
use crate::http::request::{Method, Request};
use crate::http::response::Response;

/// Maps requests to responses against a single document root.
#[derive(Debug, Clone)]
pub struct Router {
    docroot: PathBuf,
}

impl Router {
    pub fn new(docroot: impl Into<PathBuf>) -> Self {
        Self {
            docroot: docroot.into(),
        }
    }

    pub fn docroot(&self) -> &Path {
        &self.docroot
    }

    /// Chooses the response for `req`. Only GET and HEAD touch the
    /// filesystem.
    pub async fn respond(&self, req: &Request) -> Response {
        match &req.method {
            Method::Get | Method::Head => {
                let info = files::resolve(&self.docroot, &req.path).await;
                file_response(&req.method, &info)
            }
            Method::Post => Response::method_not_allowed(&req.method),
            Method::Other(_) => Response::not_implemented(&req.method),
        }
    }
}

/// Response for a GET or HEAD of `info`. HEAD gets headers only, also on 404.
pub fn file_response(method: &Method, info: &FileInfo) -> Response {
    let include_body = *method != Method::Head;

    if info.servable {
        Response::file(info, include_body)
    } else {
        Response::not_found(include_body)
    }
}
