//! Command-line host that validates and applies a resource sync config.

use anyhow::Context;
use clap::Parser;
use elastic_sync::init_logging;
use elastic_sync_config::{ProviderSettings, SyncConfig};
use elastic_sync_core::{
    ElasticSync, HostContext, NoStackExports, ReqwestTransport, SigV4Signer, StackExports,
    StackOutputsFile, SyncOutcome, SyncReport,
};
use elastic_sync_core::resolver::STACK_PROVIDER;
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Command-line options for the sync runner.
#[derive(Parser, Debug)]
#[command(name = "elastic-sync", version)]
struct Cli {
    /// Config file(s); later files override earlier ones
    #[arg(long = "config", short = 'c', default_value = "elastic-sync.json5")]
    configs: Vec<PathBuf>,
    /// Stack whose exports are consulted
    #[arg(long, default_value = "")]
    stack: String,
    /// Target provider name (e.g. aws)
    #[arg(long)]
    provider: Option<String>,
    /// Provider region used for signing
    #[arg(long)]
    region: Option<String>,
    /// Credential profile used for signing
    #[arg(long)]
    profile: Option<String>,
    /// JSON file in describe-stacks format holding stack outputs
    #[arg(long)]
    stack_outputs: Option<PathBuf>,
    /// Directory resource files are resolved against (defaults to cwd)
    #[arg(long)]
    root: Option<PathBuf>,
    /// Stop after the validate phase
    #[arg(long)]
    validate_only: bool,
    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = SyncConfig::load_layered(&cli.configs).context("failed to load config")?;
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let exports: Arc<dyn StackExports> = match &cli.stack_outputs {
        Some(path) => Arc::new(StackOutputsFile::new(path)),
        None => Arc::new(NoStackExports),
    };
    let transport = build_transport(cli.provider.as_deref());
    let sync = ElasticSync::with_defaults(exports, Arc::new(transport), root);

    sync.validate(&config)?;
    info!("validate phase passed");
    if cli.validate_only {
        return Ok(());
    }

    let host = HostContext::new(
        cli.stack,
        ProviderSettings {
            name: cli.provider,
            region: cli.region,
            profile: cli.profile,
        },
    );
    let report = sync.apply(&host, &config).await?;
    print_report(&report);
    Ok(())
}

/// Stack-provider targets get a SigV4 signer; everything else goes unsigned.
fn build_transport(provider: Option<&str>) -> ReqwestTransport {
    let transport = ReqwestTransport::new();
    if provider == Some(STACK_PROVIDER) {
        transport.with_signer(Arc::new(SigV4Signer::new()))
    } else {
        transport
    }
}

fn print_report(report: &SyncReport) {
    println!("endpoint: {}", report.endpoint);
    for outcome in report.templates.iter().chain(report.indices.iter()) {
        println!("{}", describe(outcome));
    }
    println!("repositories: {}", report.repositories);
}

fn describe(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::Applied { kind, name } => format!("{} {name}: applied", kind.label()),
        SyncOutcome::SuppressedConflict { kind, name } => {
            format!("{} {name}: already exists", kind.label())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, build_transport, describe};
    use clap::Parser;
    use elastic_sync_core::{ResourceKind, SyncOutcome};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn parses_layered_configs_and_provider() {
        let cli = Cli::parse_from([
            "elastic-sync",
            "-c",
            "base.json5",
            "-c",
            "prod.json5",
            "--stack",
            "search-prod",
            "--provider",
            "aws",
            "--validate-only",
        ]);
        assert_eq!(
            cli.configs,
            vec![PathBuf::from("base.json5"), PathBuf::from("prod.json5")]
        );
        assert_eq!(cli.stack, "search-prod");
        assert_eq!(cli.provider.as_deref(), Some("aws"));
        assert!(cli.validate_only);
    }

    #[test]
    fn defaults_to_local_config_file() {
        let cli = Cli::parse_from(["elastic-sync"]);
        assert_eq!(cli.configs, vec![PathBuf::from("elastic-sync.json5")]);
        assert!(!cli.verbose);
    }

    #[test]
    fn stack_provider_transport_signs() {
        assert!(build_transport(Some("aws")).can_sign());
        assert!(!build_transport(Some("local")).can_sign());
        assert!(!build_transport(None).can_sign());
    }

    #[test]
    fn describes_outcomes() {
        let applied = SyncOutcome::Applied {
            kind: ResourceKind::Template,
            name: "logs".to_string(),
        };
        let existing = SyncOutcome::SuppressedConflict {
            kind: ResourceKind::Index,
            name: "orders".to_string(),
        };
        assert_eq!(describe(&applied), "Template logs: applied");
        assert_eq!(describe(&existing), "Index orders: already exists");
    }
}
