use std::io::{self, BufRead};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mailvet::{EmailValidator, ValidationReport, ValidatorOptions};

#[derive(Parser)]
#[command(
    name = "mailvet-cli",
    about = "Email deliverability checks: syntax, DNS/MX, SMTP probe, reputation heuristics."
)]
struct Cli {
    /// addresses to validate
    emails: Vec<String>,

    /// read addresses from stdin (one per line)
    #[arg(long)]
    stdin: bool,

    /// output format: human|json|ndjson (json formats need `with-serde`)
    #[arg(long, default_value = "human")]
    format: String,

    /// overall SMTP stage deadline in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// retry rounds across the MX list
    #[arg(long)]
    retries: Option<u32>,

    /// envelope sender used in MAIL FROM
    #[arg(long)]
    sender: Option<String>,

    /// identity announced in HELO
    #[arg(long)]
    helo: Option<String>,

    /// increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut emails = cli.emails.clone();
    if cli.stdin {
        for line in io::stdin().lock().lines() {
            let line = line.context("reading addresses from stdin")?;
            let line = line.trim();
            if !line.is_empty() {
                emails.push(line.to_string());
            }
        }
    }
    if emails.is_empty() {
        bail!("no addresses given (pass them as arguments or use --stdin)");
    }

    let mut options = ValidatorOptions::default();
    if let Some(ms) = cli.timeout_ms {
        options.smtp_timeout = Duration::from_millis(ms);
    }
    if let Some(retries) = cli.retries {
        options.retry_attempts = retries;
    }
    if let Some(sender) = cli.sender {
        options.sender_address = Some(sender);
    }
    if let Some(helo) = cli.helo {
        options.helo_hostname = helo;
    }

    let validator = EmailValidator::new(options);
    let reports = validator.validate_batch(&emails);

    match cli.format.as_str() {
        "human" => {
            for report in &reports {
                print_human(report);
            }
        }
        #[cfg(feature = "with-serde")]
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&reports).context("serializing reports")?
        ),
        #[cfg(feature = "with-serde")]
        "ndjson" => {
            for report in &reports {
                println!("{}", serde_json::to_string(report)?);
            }
        }
        other => bail!("unknown --format '{other}' (or built without `with-serde`)"),
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_human(report: &ValidationReport) {
    println!(
        "{}: {}",
        report.email,
        if report.is_valid { "deliverable" } else { "not deliverable" }
    );
    let rows = [
        ("syntax", &report.checks.syntax),
        ("domain", &report.checks.domain),
        ("mx", &report.checks.mx),
        ("smtp", &report.checks.smtp),
        ("disposable", &report.checks.disposable),
        ("role_based", &report.checks.role_based),
    ];
    for (name, check) in rows {
        match check {
            Some(check) => println!(
                "  {name:<11} {:<4} {}",
                if check.passed { "ok" } else { "FAIL" },
                check.message
            ),
            None => println!("  {name:<11} skipped"),
        }
    }
    println!("  elapsed     {} ms", report.elapsed_ms);
}
