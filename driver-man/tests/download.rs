use driver_man::{Error, RequestConfig, Settings, fetch_text, fetch_to_file};
use httpmock::prelude::*;
use tempfile::tempdir;

fn config_for(url: &str) -> RequestConfig {
    RequestConfig::build(url, &Settings::default()).unwrap()
}

#[tokio::test]
async fn test_fetch_to_file() {
    let server = MockServer::start_async().await;
    let body: Vec<u8> = (0..3 * 1024 * 1024 + 17).map(|i| (i % 251) as u8).collect();
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/100.0/chromedriver_linux64.zip");
            then.status(200).body(body.clone());
        })
        .await;

    let temp = tempdir().unwrap();
    let dest = temp.path().join("chromedriver_linux64.zip");
    let config = config_for(&server.url("/100.0/chromedriver_linux64.zip"));
    let written = fetch_to_file(&config, &dest).await.unwrap();

    mock.assert_async().await;
    assert_eq!(written, body.len() as u64);
    assert_eq!(std::fs::read(&dest).unwrap(), body);
}

#[tokio::test]
async fn test_fetch_to_file_not_found() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/missing.zip");
            then.status(404).body("<Error><Code>NoSuchKey</Code></Error>");
        })
        .await;

    let temp = tempdir().unwrap();
    let dest = temp.path().join("missing.zip");
    let err = fetch_to_file(&config_for(&server.url("/missing.zip")), &dest)
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, Error::Status { status: 404, .. }));
    assert!(err.to_string().contains("404"));
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_fetch_to_file_unwritable_destination() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/file.zip");
            then.status(200).body("data");
        })
        .await;

    let temp = tempdir().unwrap();
    let dest = temp.path().join("no-such-dir").join("file.zip");
    let err = fetch_to_file(&config_for(&server.url("/file.zip")), &dest)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Io { operation: "create", .. }));
}

#[tokio::test]
async fn test_fetch_text_trims() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/LATEST_RELEASE");
            then.status(200).body("  100.0.4896.60\r\n");
        })
        .await;

    let version = fetch_text(&config_for(&server.url("/LATEST_RELEASE")))
        .await
        .unwrap();
    assert_eq!(version, "100.0.4896.60");
}

#[tokio::test]
async fn test_fetch_text_error_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/LATEST_RELEASE_999");
            then.status(500);
        })
        .await;

    let err = fetch_text(&config_for(&server.url("/LATEST_RELEASE_999")))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/LATEST_RELEASE")
                .header("user-agent", "npm/10.2.0");
            then.status(200).body("101.0.1");
        })
        .await;

    let settings = Settings {
        user_agent: Some("npm/10.2.0".to_string()),
        ..Settings::default()
    };
    let config = RequestConfig::build(&server.url("/LATEST_RELEASE"), &settings).unwrap();
    assert_eq!(fetch_text(&config).await.unwrap(), "101.0.1");
    mock.assert_async().await;
}
