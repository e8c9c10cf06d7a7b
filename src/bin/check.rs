//! wikiperm command-line decision tool
//!
//! Run with: cargo run --features cli --bin wikiperm-check -- \
//!     --principal role:Authenticated page 'mywiki:Main' edit
//!
//! Prints `allow` or `deny`; exits 0 when allowed, 1 when denied, 2 on bad input.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wikiperm::{Permission, PermissionKind, Principal, SecurityPolicy, SubjectContext};

#[derive(Parser, Debug)]
#[command(name = "wikiperm-check")]
#[command(about = "Decide whether a set of principals is granted a wiki permission")]
struct Cli {
    /// Policy file (JSON). Uses the built-in policy when omitted
    #[arg(short, long)]
    policy: Option<PathBuf>,

    /// Principal held by the caller, e.g. `role:Authenticated`, `group:Editors`, `user:alice`
    #[arg(long = "principal", value_parser = parse_principal)]
    principals: Vec<Principal>,

    /// Permission kind: page, group, wiki or all
    kind: PermissionKind,

    /// Target, e.g. `mywiki:Main`, `*:Admins`, `mywiki`
    target: String,

    /// Comma-separated actions (ignored for `all`)
    #[arg(default_value = "")]
    actions: String,

    /// Print the permissions the principals hold instead of a decision
    #[arg(long)]
    explain: bool,
}

fn parse_principal(s: &str) -> Result<Principal, String> {
    s.parse().map_err(|e: wikiperm::PermissionError| e.to_string())
}

fn run(cli: Cli) -> wikiperm::Result<bool> {
    let policy = match &cli.policy {
        Some(path) => SecurityPolicy::from_path(path)?,
        None => SecurityPolicy::builtin()?,
    };
    let subject: SubjectContext = cli.principals.into_iter().collect();
    let permission = Permission::new(cli.kind, &cli.target, &cli.actions)?;

    if cli.explain {
        let mut held: Vec<String> = policy.permissions_for(&subject).members().iter().map(|p| p.to_string()).collect();
        held.sort();
        for p in held {
            println!("{}", p);
        }
    }
    Ok(policy.check(&subject, &permission))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(true) => {
            println!("allow");
            ExitCode::SUCCESS
        }
        Ok(false) => {
            println!("deny");
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}
