use anyhow::Context;
use clap::Args;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::gate::{Gate, GateRequest, Verdict};
use crate::types::PathClass;

#[derive(Args)]
pub struct DecideArgs {
    #[arg(help = "Request path, e.g. /admin/dashboard")]
    pub path: String,
    #[arg(long, help = "Value of the auth-token cookie")]
    pub admin_token: Option<String>,
    #[arg(long, help = "Value of the client_token cookie")]
    pub client_token: Option<String>,
    #[arg(long, help = "Evaluate with client OTP bypass enabled (ignored in production)")]
    pub otp_bypass: bool,
}

pub fn handle(args: DecideArgs, mut config: AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    if args.otp_bypass {
        config.set_otp_bypass(true);
    }
    let gate = Gate::new(config.gate_config().context("invalid gate route configuration")?);

    let request = GateRequest {
        path: &args.path,
        admin_token: args.admin_token.as_deref(),
        client_token: args.client_token.as_deref(),
    };
    let verdict = gate.evaluate(&request, chrono::Utc::now());

    match output_format {
        OutputFormat::Json => println!("{}", verdict_json(&args.path, &verdict)),
        OutputFormat::Text => {
            match verdict.class {
                PathClass::Unrelated => println!("{}: no audience, gate does not apply", args.path),
                PathClass::Scoped(audience, category) => {
                    println!("{}: {} / {:?}", args.path, audience, category);
                    match (&verdict.session, verdict.rejection) {
                        (Some(session), _) => println!("  session:  {} ({:?})", session.subject, session.state()),
                        (None, Some(reason)) => println!("  session:  none ({})", reason),
                        (None, None) => println!("  session:  none"),
                    }
                }
            }
            println!("  decision: {}", verdict.decision);
        }
    }
    Ok(())
}

fn verdict_json(path: &str, verdict: &Verdict) -> Value {
    let (audience, category) = match verdict.class {
        PathClass::Unrelated => (None, None),
        PathClass::Scoped(audience, category) => (Some(audience), Some(category)),
    };
    json!({
        "path": path,
        "audience": audience,
        "category": category,
        "session": verdict.session,
        "rejection": verdict.rejection.map(|r| r.code()),
        "decision": verdict.decision,
    })
}
