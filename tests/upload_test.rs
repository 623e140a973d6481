//! Integration tests for `POST /upload` and `GET /results/{filename}`.

mod common;

use common::{encode, file_form, rectangle_png, TestHarness};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

fn url(addr: std::net::SocketAddr, path: &str) -> String {
    format!("http://{}{}", addr, path)
}

async fn post_form(
    addr: std::net::SocketAddr,
    form: reqwest::multipart::Form,
) -> (reqwest::StatusCode, serde_json::Value) {
    let resp = reqwest::Client::new()
        .post(url(addr, "/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    let body: serde_json::Value = resp.json().await.unwrap();
    (status, body)
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let (_harness, addr) = TestHarness::with_server().await;

    let form = reqwest::multipart::Form::new().text("comment", "no image here");
    let (status, body) = post_form(addr, form).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "No file uploaded");
    assert_eq!(body["code"], "validation_error");
}

#[tokio::test]
async fn test_upload_with_empty_filename() {
    let (_harness, addr) = TestHarness::with_server().await;

    let (status, body) = post_form(addr, file_form("", rectangle_png(8, 8, (2, 2, 3, 3)))).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "No selected file");
}

#[tokio::test]
async fn test_upload_disallowed_extension() {
    let (harness, addr) = TestHarness::with_server().await;

    let (status, body) = post_form(addr, file_form("notes.txt", b"hello".to_vec())).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "File type not allowed");
    assert!(!harness.upload_dir().join("notes.txt").exists());
}

#[tokio::test]
async fn test_upload_garbage_png() {
    let (_harness, addr) = TestHarness::with_server().await;

    let (status, body) = post_form(
        addr,
        file_form("x.png", b"this is not really a png".to_vec()),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid image file");
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn test_upload_rectangle_and_fetch_result() {
    let (harness, addr) = TestHarness::with_server().await;

    let png = rectangle_png(64, 64, (12, 7, 40, 50));
    let (status, body) = post_form(addr, file_form("house plan.png", png)).await;

    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["message"], "Analysis complete");

    // Upload kept under its sanitized name.
    assert!(harness.upload_dir().join("house_plan.png").exists());

    let parts = body["number_of_parts"].as_u64().unwrap();
    let boxes = body["bounding_boxes"].as_array().unwrap();
    assert!(parts >= 1);
    assert_eq!(boxes.len() as u64, parts);

    // The largest box hugs the rectangle outline.
    let largest = boxes
        .iter()
        .max_by_key(|b| b["width"].as_u64().unwrap() * b["height"].as_u64().unwrap())
        .unwrap();
    let (x, y) = (largest["x"].as_u64().unwrap(), largest["y"].as_u64().unwrap());
    let (w, h) = (
        largest["width"].as_u64().unwrap(),
        largest["height"].as_u64().unwrap(),
    );
    assert!(x <= 14 && x + 3 >= 12, "box: {largest}");
    assert!(y <= 9 && y + 3 >= 7, "box: {largest}");
    assert!(x + w >= 50 && x + w <= 55, "box: {largest}");
    assert!(y + h >= 55 && y + h <= 60, "box: {largest}");

    let objects = body["detected_objects"].as_array().unwrap();
    let labels: Vec<&str> = objects
        .iter()
        .map(|o| o["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Window", "Door", "Beam"]);
    assert!((objects[0]["confidence"].as_f64().unwrap() - 0.95).abs() < 1e-6);

    // The annotated copy is served back as PNG.
    let output = body["output_image"].as_str().unwrap();
    assert!(output.ends_with(".png"));
    assert_eq!(output.len(), 32 + 4);
    assert!(harness.result_dir().join(output).exists());

    let resp = reqwest::get(url(addr, &format!("/results/{output}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "image/png");

    let bytes = resp.bytes().await.unwrap();
    let annotated = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(annotated.dimensions(), (64, 64));
    assert_eq!(*annotated.get_pixel(x as u32, y as u32), Rgb([0, 0, 255]));
}

#[tokio::test]
async fn test_upload_jpeg_with_uppercase_extension() {
    let (_harness, addr) = TestHarness::with_server().await;

    let img = RgbImage::from_fn(48, 48, |x, _| {
        if x < 24 {
            Rgb([20, 20, 20])
        } else {
            Rgb([230, 230, 230])
        }
    });
    let jpeg = encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg);

    let (status, body) = post_form(addr, file_form("SPLIT.JPG", jpeg)).await;

    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["detected_objects"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_each_upload_gets_its_own_result() {
    let (harness, addr) = TestHarness::with_server().await;

    let png = rectangle_png(32, 32, (8, 8, 16, 16));
    let (_, first) = post_form(addr, file_form("a.png", png.clone())).await;
    let (_, second) = post_form(addr, file_form("a.png", png)).await;

    let first = first["output_image"].as_str().unwrap().to_string();
    let second = second["output_image"].as_str().unwrap().to_string();
    assert_ne!(first, second);
    assert!(harness.result_dir().join(&first).exists());
    assert!(harness.result_dir().join(&second).exists());
}

#[tokio::test]
async fn test_missing_result_is_404() {
    let (_harness, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(url(addr, "/results/missing.png")).await.unwrap();
    assert_eq!(resp.status(), 404);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["code"], "not_found");
}
