use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Valentine Post API
Version: {version}

Available endpoints:
  - GET  /credentials/{{id}}          - Fetch a card's credential
  - POST /valentines                 - Send a valentine
  - GET  /valentines/{{id}}           - Fetch a valentine by id
  - GET  /valentines/recipient/{{id}} - List valentines for a card
  - GET  /health                     - Light health check
  - GET  /health?mode=full           - Full health check (includes storage)
  - GET  /metrics                    - Prometheus metrics
"#
    )
}
