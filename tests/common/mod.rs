#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use isp_access_gate::auth::{issue_token, Claims};
use isp_access_gate::config::GateConfig;
use isp_access_gate::{app, Audience, Gate};
use reqwest::{redirect::Policy, StatusCode};

pub const SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serve the full router in-process on a free port
    pub async fn spawn(config: GateConfig) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;
        let router = app(Arc::new(Gate::new(config)));
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        // Redirects are the thing under test; never follow them
        let client = reqwest::Client::builder().redirect(Policy::none()).build()?;

        let server = Self { port, base_url, client };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(format!("{}/health", self.base_url)).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub async fn get(&self, path: &str, cookie: Option<(&str, &str)>) -> Result<reqwest::Response> {
        let mut request = self.client.get(format!("{}{}", self.base_url, path));
        if let Some((name, value)) = cookie {
            request = request.header(reqwest::header::COOKIE, format!("{}={}", name, value));
        }
        Ok(request.send().await?)
    }
}

pub async fn default_server() -> Result<TestServer> {
    TestServer::spawn(GateConfig::with_secret(SECRET)).await
}

pub async fn bypass_server() -> Result<TestServer> {
    TestServer::spawn(GateConfig::with_secret(SECRET).otp_bypass(true)).await
}

pub fn admin_token(subject: &str) -> String {
    let claims = Claims::new(Audience::Admin, subject, Utc::now(), chrono::Duration::hours(12)).expect("admin claims");
    issue_token(&claims, SECRET).expect("admin token")
}

pub fn client_token(subject: &str, otp_verified: bool) -> String {
    let claims = Claims::new(Audience::Client, subject, Utc::now(), chrono::Duration::days(7))
        .expect("client claims")
        .with_otp_verified(otp_verified);
    issue_token(&claims, SECRET).expect("client token")
}

pub fn expired_admin_token(subject: &str) -> String {
    let issued = Utc::now() - chrono::Duration::days(8);
    let claims = Claims::new(Audience::Admin, subject, issued, chrono::Duration::days(7)).expect("expired claims");
    issue_token(&claims, SECRET).expect("expired token")
}

pub fn location(resp: &reqwest::Response) -> Option<&str> {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
