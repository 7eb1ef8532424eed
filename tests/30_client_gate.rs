mod common;

use anyhow::Result;
use common::{admin_token, client_token, location};
use reqwest::StatusCode;

#[tokio::test]
async fn verified_client_reaches_protected_pages() -> Result<()> {
    let server = common::default_server().await?;
    let token = client_token("42", true);

    let res = server.get("/client/42/billing", Some(("client_token", &token))).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["session"]["subject"], "42");
    assert_eq!(body["data"]["session"]["otp_verified"], true);
    Ok(())
}

#[tokio::test]
async fn unverified_client_is_sent_to_otp_step() -> Result<()> {
    let server = common::default_server().await?;
    let token = client_token("42", false);

    let res = server.get("/client/42/billing", Some(("client_token", &token))).await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), Some("/client/verify-otp"));

    // The OTP page itself is reachable for that session
    let res = server.get("/client/verify-otp", Some(("client_token", &token))).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn anonymous_client_is_sent_to_login() -> Result<()> {
    let server = common::default_server().await?;

    for path in ["/client", "/client/42/billing", "/client/verify-otp"] {
        let res = server.get(path, None).await?;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT, "{}", path);
        assert_eq!(location(&res), Some("/client/login"), "{}", path);
    }

    let res = server.get("/client/42/billing", Some(("client_token", "tampered"))).await?;
    assert_eq!(location(&res), Some("/client/login"));
    Ok(())
}

#[tokio::test]
async fn logged_in_client_lands_on_own_home() -> Result<()> {
    let server = common::default_server().await?;
    let token = client_token("42", true);

    for path in ["/client", "/client/login", "/client/register"] {
        let res = server.get(path, Some(("client_token", &token))).await?;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT, "{}", path);
        assert_eq!(location(&res), Some("/client/42/home"), "{}", path);
    }
    Ok(())
}

#[tokio::test]
async fn admin_cookie_does_not_open_client_pages() -> Result<()> {
    let server = common::default_server().await?;
    let token = admin_token("42");

    let res = server.get("/client/42/home", Some(("client_token", &token))).await?;
    assert_eq!(location(&res), Some("/client/login"));
    Ok(())
}

#[tokio::test]
async fn bypass_opens_client_pages_except_root() -> Result<()> {
    let server = common::bypass_server().await?;

    for path in ["/client/42/billing", "/client/login", "/client/verify-otp"] {
        let res = server.get(path, None).await?;
        assert_eq!(res.status(), StatusCode::OK, "{}", path);
    }

    let res = server.get("/client", None).await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), Some("/client/login"));

    let token = client_token("42", false);
    let res = server.get("/client", Some(("client_token", &token))).await?;
    assert_eq!(location(&res), Some("/client/login"));
    Ok(())
}

#[tokio::test]
async fn bypass_does_not_affect_admin_pages() -> Result<()> {
    let server = common::bypass_server().await?;

    let res = server.get("/admin/dashboard", None).await?;
    assert_eq!(location(&res), Some("/admin/login"));
    Ok(())
}
