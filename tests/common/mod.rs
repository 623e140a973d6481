//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which points storage at a temporary directory and
//! builds a full [`AppContext`]. The [`TestHarness::with_server`] constructor
//! starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::io::Cursor;
use std::net::SocketAddr;
use std::path::PathBuf;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tempfile::TempDir;

use sl_core::config::Config;
use sl_server::context::AppContext;
use sl_server::router::build_router;

/// Test harness wrapping a fully-constructed [`AppContext`] whose upload and
/// result directories live in a temp dir.
pub struct TestHarness {
    pub ctx: AppContext,
    pub dir: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration. Storage paths are
    /// always redirected into the harness temp dir.
    pub fn with_config(mut config: Config) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        config.storage.upload_dir = dir.path().join("uploads");
        config.storage.result_dir = dir.path().join("results");

        let ctx = AppContext::new(config);
        ctx.store.ensure_dirs().expect("failed to create storage dirs");

        Self { ctx, dir }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let static_dir = harness.ctx.config.server.static_dir.clone();
        let app = build_router(harness.ctx.clone(), static_dir);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    pub fn result_dir(&self) -> PathBuf {
        self.dir.path().join("results")
    }
}

/// Black canvas with one filled white rectangle.
pub fn rectangle_png(width: u32, height: u32, rect: (u32, u32, u32, u32)) -> Vec<u8> {
    let (rx, ry, rw, rh) = rect;
    let img = RgbImage::from_fn(width, height, |x, y| {
        if (rx..rx + rw).contains(&x) && (ry..ry + rh).contains(&y) {
            Rgb([255, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    });
    encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
}

pub fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).expect("failed to encode image");
    buf.into_inner()
}

/// Multipart form with a single `file` part.
pub fn file_form(filename: &str, data: Vec<u8>) -> reqwest::multipart::Form {
    let part = reqwest::multipart::Part::bytes(data).file_name(filename.to_string());
    reqwest::multipart::Form::new().part("file", part)
}
