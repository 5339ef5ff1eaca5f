//! Shared fixtures for the HTTP tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use pdfsmith::{Engines, ScratchSpace};
use pdfsmith_api::{AppState, ServiceConfig};
use std::io::Write;
use std::path::Path;

pub const BOUNDARY: &str = "----WebKitFormBoundary7MA4YWxkTrZu0gW";

/// State backed by the mock engines with scratch storage under `root`.
pub fn mock_state(root: &Path) -> AppState {
    AppState::new(
        Engines::mock(ScratchSpace::new(root)),
        ServiceConfig::default(),
    )
}

/// Handwritten `multipart/form-data` body, built the way a browser sends it.
#[derive(Default)]
pub struct FormBody {
    body: Vec<u8>,
}

impl FormBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, filename: &str, bytes: &[u8]) -> Self {
        write!(self.body, "--{}\r\n", BOUNDARY).unwrap();
        write!(
            self.body,
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .unwrap();
        write!(self.body, "Content-Type: application/pdf\r\n\r\n").unwrap();
        self.body.extend_from_slice(bytes);
        write!(self.body, "\r\n").unwrap();
        self
    }

    pub fn field(mut self, name: &str, value: &str) -> Self {
        write!(self.body, "--{}\r\n", BOUNDARY).unwrap();
        write!(
            self.body,
            "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
            name
        )
        .unwrap();
        write!(self.body, "{}\r\n", value).unwrap();
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        write!(self.body, "--{}--\r\n", BOUNDARY).unwrap();

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub fn header_str<'a>(response: &'a Response<Body>, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("missing header {name}"))
        .to_str()
        .unwrap()
}

/// Number of entries left under a scratch root
pub fn scratch_entries(root: &Path) -> usize {
    std::fs::read_dir(root).unwrap().count()
}
