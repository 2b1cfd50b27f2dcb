//! Health, metrics and static asset routes.

use std::path::PathBuf;

use axum::http::StatusCode;
use tasklog_api::ApiConfig;

#[path = "support/app.rs"]
mod app_support;
use app_support::TestApp;

type TestResult = Result<(), String>;

fn static_dir() -> Result<PathBuf, String> {
    let dir = std::env::temp_dir().join(format!("tasklog-static-{}", std::process::id()));
    std::fs::create_dir_all(dir.join("images")).map_err(|e| e.to_string())?;
    std::fs::write(dir.join("index.html"), "<html><body>task</body></html>")
        .map_err(|e| e.to_string())?;
    std::fs::write(dir.join("task.js"), "console.log('task');").map_err(|e| e.to_string())?;
    std::fs::write(dir.join("images").join("img1.png"), [0x89u8, b'P', b'N', b'G'])
        .map_err(|e| e.to_string())?;
    Ok(dir)
}

#[tokio::test]
async fn test_ping() -> TestResult {
    let app = TestApp::new();
    let (status, body) = app.get("/health/ping").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"pong");
    Ok(())
}

#[tokio::test]
async fn test_liveness_reports_backend() -> TestResult {
    let app = TestApp::new();
    let (status, body) = app.get("/health/live").await?;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).map_err(|e| e.to_string())?;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["details"]["backend"], "memory");
    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint() -> TestResult {
    let app = TestApp::new();
    let (status, _) = app.get("/metrics").await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_static_assets_are_served() -> TestResult {
    let config = ApiConfig {
        static_dir: static_dir()?,
        ..ApiConfig::default()
    };
    let app = TestApp::with_config(&config);

    let (status, body) = app.get("/").await?;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("task"));

    let (status, _) = app.get("/static/task.js").await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/images/img1.png").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[1..4], b"PNG");

    let (status, _) = app.get("/static/missing.js").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
