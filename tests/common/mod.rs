#![allow(dead_code)]

use axum::extract::ConnectInfo;
use chrono::{DateTime, Utc};
use snapurl::application::services::{ShortenerSettings, UrlService};
use snapurl::config::ServerConfig;
use snapurl::infrastructure::persistence::PgUrlRepository;
use snapurl::state::AppState;
use snapurl::utils::code_generator::CodeGenerator;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;

pub const BASE_URL: &str = "http://sho.rt";

pub async fn create_test_url(pool: &PgPool, code: &str, url: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO urls (short_code, original_url) VALUES ($1, $2) RETURNING id")
        .bind(code)
        .bind(url)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_expired_url(pool: &PgPool, code: &str, url: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO urls (short_code, original_url, expires_at) VALUES ($1, $2, NOW() - INTERVAL '1 hour') RETURNING id",
    )
    .bind(code)
    .bind(url)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_url_expiring_at(
    pool: &PgPool,
    code: &str,
    url: &str,
    expires_at: DateTime<Utc>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO urls (short_code, original_url, expires_at) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(code)
    .bind(url)
    .bind(expires_at)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn create_url_created_at(
    pool: &PgPool,
    code: &str,
    url: &str,
    created_at: DateTime<Utc>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO urls (short_code, original_url, created_at) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(code)
    .bind(url)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn access_count(pool: &PgPool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT access_count FROM urls WHERE short_code = $1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn url_exists(pool: &PgPool, code: &str) -> bool {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM urls WHERE short_code = $1)")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub fn create_test_service(pool: PgPool) -> Arc<UrlService<PgUrlRepository>> {
    let repository = Arc::new(PgUrlRepository::new(Arc::new(pool)));

    Arc::new(UrlService::new(
        repository,
        CodeGenerator::with_os_random(7),
        ShortenerSettings {
            base_url: BASE_URL.to_string(),
            default_ttl: None,
        },
    ))
}

pub fn create_test_state(pool: PgPool) -> AppState {
    AppState::new(create_test_service(pool))
}

pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        request_timeout: Duration::from_secs(60),
        shutdown_timeout: Duration::from_secs(30),
        rate_limit_per_second: 10,
        rate_limit_burst: 100,
    }
}

/// Injects a fixed peer address, standing in for `into_make_service_with_connect_info`.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
