//! HTTP routing and error mapping tests

mod common;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use table_renderer::{ServiceConfig, router};
use tower::ServiceExt;

fn app() -> Router {
    router(Arc::new(ServiceConfig::default()))
}

fn post(uri: &str, body: impl Into<Body>) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())?)
}

async fn send(request: Request<Body>) -> Result<(StatusCode, String, Vec<u8>)> {
    let response = app().oneshot(request).await?;
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, content_type, body.to_vec()))
}

#[tokio::test]
async fn test_render_html() -> Result<()> {
    let (status, content_type, body) = send(post("/render/html", common::EXAMPLE_REQUEST)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/html");
    assert!(String::from_utf8(body)?.starts_with(r#"<figure class="figure" id="table-house-prices">"#));
    Ok(())
}

#[tokio::test]
async fn test_render_csv() -> Result<()> {
    let (status, content_type, body) = send(post("/render/csv", common::EXAMPLE_REQUEST)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/csv");
    assert!(String::from_utf8(body)?.starts_with("Regional house prices[1]\n"));
    Ok(())
}

#[tokio::test]
async fn test_render_xlsx() -> Result<()> {
    let (status, content_type, body) = send(post("/render/xlsx", common::EXAMPLE_REQUEST)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        content_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(&body[..2], b"PK");
    Ok(())
}

#[tokio::test]
async fn test_unknown_render_type() -> Result<()> {
    let (status, _, body) = send(post("/render/pdf", common::EXAMPLE_REQUEST)?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(String::from_utf8(body)?, "Unknown render type");
    Ok(())
}

#[tokio::test]
async fn test_invalid_json() -> Result<()> {
    let (status, content_type, body) = send(post("/render/html", "{not json")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(String::from_utf8(body)?, "Bad request - Invalid request body");
    Ok(())
}

#[tokio::test]
async fn test_empty_render_body() -> Result<()> {
    let (status, _, body) = send(post("/render/csv", "{}")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(String::from_utf8(body)?, "Bad request - Missing data in body");
    Ok(())
}

#[tokio::test]
async fn test_parse_missing_table_html() -> Result<()> {
    let (status, _, body) = send(post("/parse/html", "{}")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body)?.contains("table_html"));
    Ok(())
}

#[tokio::test]
async fn test_parse_rejects_non_table() -> Result<()> {
    let body = serde_json::json!({"table_html": "<div>x</div>"}).to_string();
    let (status, _, body) = send(post("/parse/html", body)?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(body)?,
        "Bad request - table_html must contain a single table element"
    );
    Ok(())
}

#[tokio::test]
async fn test_parse_success() -> Result<()> {
    let body = serde_json::json!({
        "filename": "p",
        "table_html": "<table><tr><td>a</td><td>b</td></tr></table>"
    })
    .to_string();
    let (status, content_type, body) = send(post("/parse/html", body)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json");

    let value: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(value["json"]["data"], serde_json::json!([["a", "b"]]));
    assert!(value["preview_html"].as_str().is_some_and(|html| html.contains("<td>a</td>")));
    Ok(())
}

#[tokio::test]
async fn test_health() -> Result<()> {
    let request = Request::builder().uri("/health").body(Body::empty())?;
    let (status, _, body) = send(request).await?;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(value["status"], "OK");
    Ok(())
}

#[tokio::test]
async fn test_body_limit() -> Result<()> {
    let config = ServiceConfig {
        max_body_bytes: 16,
        ..ServiceConfig::default()
    };
    let response = router(Arc::new(config))
        .oneshot(post("/render/html", common::EXAMPLE_REQUEST)?)
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_parse_huge_span_stays_small() -> Result<()> {
    let mut table_html = String::from(r#"<table><tr><td colspan="1000" rowspan="65534">big</td></tr>"#);
    table_html.push_str(&"<tr></tr>".repeat(1999));
    table_html.push_str("</table>");
    let request_body = serde_json::json!({ "table_html": table_html }).to_string();
    let request_len = request_body.len();

    let (status, _, body) = send(post("/parse/html", request_body)?).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body.len() < request_len * 20, "response of {} bytes", body.len());

    let value: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(value["json"]["cell_formats"][0]["rowspan"], 2000);
    assert!(value["json"]["cell_formats"][0].get("colspan").is_none());
    Ok(())
}
