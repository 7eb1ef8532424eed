use anyhow::Context;
use chrono::{TimeZone, Utc};
use clap::Subcommand;
use serde_json::{json, Value};

use crate::auth::{issue_token, session_ttl, Claims};
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::gate::{verify, VerifyResult};
use crate::types::Audience;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Mint a signed session token")]
    Issue {
        #[arg(long, help = "Token audience (admin or client)")]
        audience: Audience,
        #[arg(long, help = "Subject id (admin user id or client id)")]
        subject: String,
        #[arg(long, help = "Mark a client token as past the OTP step")]
        otp_verified: bool,
        #[arg(long, help = "Validity in hours (defaults to the configured session length)")]
        hours: Option<u64>,
    },

    #[command(about = "Verify a token and print its claims")]
    Inspect {
        #[arg(help = "Raw token value")]
        token: String,
        #[arg(long, help = "Audience the token is presented to")]
        audience: Audience,
    },
}

pub fn handle(cmd: TokenCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let secret = &config.security.jwt_secret;

    match cmd {
        TokenCommands::Issue {
            audience,
            subject,
            otp_verified,
            hours,
        } => {
            let hours = hours.unwrap_or(match audience {
                Audience::Admin => config.security.admin_session_hours,
                Audience::Client => config.security.client_session_hours,
            });
            let ttl = session_ttl(hours).with_context(|| format!("invalid session length of {} hours", hours))?;
            let claims = Claims::new(audience, subject, Utc::now(), ttl)
                .with_context(|| format!("invalid session length of {} hours", hours))?
                .with_otp_verified(otp_verified);
            let token = issue_token(&claims, secret).context("failed to issue token")?;

            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    json!({ "token": token, "cookie": audience.cookie_name(), "claims": claims })
                ),
                OutputFormat::Text => println!("{}", token),
            }
            Ok(())
        }
        TokenCommands::Inspect { token, audience } => {
            let result = verify(Some(&token), audience, secret, Utc::now());
            match output_format {
                OutputFormat::Json => println!("{}", inspect_json(&result)),
                OutputFormat::Text => match result {
                    Ok(claims) => {
                        let expires = Utc
                            .timestamp_opt(claims.exp, 0)
                            .single()
                            .map(|t| t.to_rfc3339())
                            .unwrap_or_else(|| claims.exp.to_string());
                        println!("valid {} token", audience);
                        println!("  subject:      {}", claims.sub);
                        if audience == Audience::Client {
                            println!("  otp verified: {}", claims.otp_verified());
                        }
                        println!("  expires:      {}", expires);
                    }
                    Err(err) => println!("invalid: {}", err),
                },
            }
            Ok(())
        }
    }
}

fn inspect_json(result: &VerifyResult) -> Value {
    match result {
        Ok(claims) => json!({ "valid": true, "claims": claims }),
        Err(err) => json!({ "valid": false, "reason": err.code(), "message": err.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &str = "cli-secret";

    #[test]
    fn inspect_reports_rejection_reason() {
        let claims = Claims::new(Audience::Client, "42", Utc::now(), Duration::hours(1)).unwrap();
        let token = issue_token(&claims, SECRET).unwrap();

        let result = verify(Some(&token), Audience::Admin, SECRET, Utc::now());
        let value = inspect_json(&result);
        assert_eq!(value["valid"], false);
        assert_eq!(value["reason"], "wrong_audience");

        let value = inspect_json(&verify(Some("garbage"), Audience::Admin, SECRET, Utc::now()));
        assert_eq!(value["reason"], "malformed");
    }

    #[test]
    fn inspect_prints_claims_for_valid_token() {
        let claims = Claims::new(Audience::Client, "42", Utc::now(), Duration::hours(1))
            .unwrap()
            .with_otp_verified(true);
        let token = issue_token(&claims, SECRET).unwrap();

        let value = inspect_json(&verify(Some(&token), Audience::Client, SECRET, Utc::now()));
        assert_eq!(value["valid"], true);
        assert_eq!(value["claims"]["sub"], "42");
        assert_eq!(value["claims"]["otpVerified"], true);
    }

    #[test]
    fn issue_rejects_unrepresentable_session_length() {
        let mut config = AppConfig::from_env();
        config.security.jwt_secret = SECRET.to_string();
        let cmd = TokenCommands::Issue {
            audience: Audience::Admin,
            subject: "7".to_string(),
            otp_verified: false,
            hours: Some(10_000_000_000),
        };
        let err = handle(cmd, &config, OutputFormat::Json).unwrap_err();
        assert!(err.to_string().contains("invalid session length"));
    }
}
