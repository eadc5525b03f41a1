//! Sendmail
//!
//! Send a single message through the Mandrill API from the command line.
//! Reads `MANDRILL_API_KEY` (and optionally `MANDRILL_API_URL`) from the
//! environment.

use clap::Parser;
use eyre::{Result, eyre};
use mandrill_transport::{AddressInput, MandrillTransport, SendPayload};
use serde_json::{Map, Value};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "sendmail")]
#[command(about = "Send a message through the Mandrill API")]
struct Cli {
    /// Primary recipients ("Name <addr>", comma separated, repeatable)
    #[arg(short, long, required = true)]
    to: Vec<String>,

    /// CC recipients
    #[arg(long)]
    cc: Vec<String>,

    /// BCC recipients
    #[arg(long)]
    bcc: Vec<String>,

    /// Sender address
    #[arg(short, long)]
    from: String,

    /// Message subject
    #[arg(short, long)]
    subject: String,

    /// Plain text body
    #[arg(long)]
    text: Option<String>,

    /// HTML body
    #[arg(long)]
    html: Option<String>,

    /// Message-level Mandrill override as key=JSON (repeatable),
    /// e.g. --option preserve_recipients=true
    #[arg(short, long, value_name = "KEY=JSON")]
    option: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let transport = MandrillTransport::from_env()?;
    info!(
        transport = transport.name(),
        version = transport.version(),
        "Transport ready"
    );

    let payload = SendPayload {
        to: address_input(cli.to),
        cc: address_input(cli.cc),
        bcc: address_input(cli.bcc),
        from: cli.from.into(),
        subject: cli.subject,
        text: cli.text,
        html: cli.html,
        mandrill_options: parse_options(&cli.option)?,
    };

    let sent = transport.send(&payload).await?;

    info!(
        message_id = ?sent.message_id,
        accepted = sent.accepted.len(),
        rejected = sent.rejected.len(),
        "Send complete"
    );

    for entry in &sent.rejected {
        warn!(
            email = %entry.email,
            status = ?entry.status,
            reason = ?entry.reject_reason,
            "Recipient rejected"
        );
    }

    Ok(())
}

fn address_input(values: Vec<String>) -> AddressInput {
    if values.is_empty() {
        AddressInput::None
    } else {
        AddressInput::Many(values)
    }
}

/// Parse repeated `key=JSON` flags into the options map. Values that are
/// not valid JSON are kept as plain strings.
fn parse_options(options: &[String]) -> Result<Option<Map<String, Value>>> {
    if options.is_empty() {
        return Ok(None);
    }

    let mut map = Map::new();
    for option in options {
        let (key, raw) = option
            .split_once('=')
            .ok_or_else(|| eyre!("invalid --option '{}', expected key=JSON", option))?;
        let value =
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        map.insert(key.to_string(), value);
    }
    Ok(Some(map))
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let is_prod = std::env::var("ENVIRONMENT")
        .map(|e| e == "production")
        .unwrap_or(false);

    if is_prod {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty())
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_json_values() {
        let options = parse_options(&["preserve_recipients=true".to_string()])
            .unwrap()
            .unwrap();
        assert_eq!(options["preserve_recipients"], Value::Bool(true));
    }

    #[test]
    fn test_parse_options_plain_string_fallback() {
        let options = parse_options(&["subaccount=reports".to_string()])
            .unwrap()
            .unwrap();
        assert_eq!(options["subaccount"], Value::String("reports".to_string()));
    }

    #[test]
    fn test_parse_options_rejects_missing_separator() {
        assert!(parse_options(&["preserve_recipients".to_string()]).is_err());
    }

    #[test]
    fn test_no_options_yields_none() {
        assert!(parse_options(&[]).unwrap().is_none());
    }
}
