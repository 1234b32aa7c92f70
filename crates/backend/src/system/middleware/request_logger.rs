use axum::body::Body;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;

use crate::shared::format::format_number;

/// Middleware для логирования HTTP запросов
///
/// Пишет время (MSK, UTC+3), длительность, размер ответа по
/// Content-Length, статус, метод и путь. Тело ответа не буферизуется,
/// поэтому для потоковых ответов размер выводится как `-`.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    let size = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .map(format_number)
        .unwrap_or_else(|| "-".into());
    let timestamp = Utc::now() + chrono::Duration::hours(3);
    let status = response.status();
    let line = format!(
        "{} | {:>5}ms | {:>12} | {} {:>6} {}",
        timestamp.format("%H:%M:%S"),
        start.elapsed().as_millis(),
        size,
        status.as_u16(),
        method,
        path
    );

    if status.is_server_error() {
        tracing::error!("{}", line);
    } else if status.is_client_error() {
        tracing::warn!("{}", line);
    } else {
        tracing::info!("{}", line);
    }

    response
}
