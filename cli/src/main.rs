use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use hw_inventory_collect::raid::parse_controller_overview;
use hw_inventory_collect::{
    CannedRunner, CollectionOutcome, DmiInputFormat, InventoryConfig, InventoryOptions,
    OutputFormat, Platform, SystemRunner, collect_inventory, format_report, write_snapshot,
};
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Parser)]
#[command(name = "hw-inventory")]
#[command(about = "Server hardware inventory snapshot from dmidecode, storcli and ipmicfg")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Query the local tools and write a snapshot (the default).
    Collect(CollectArgs),
    /// Build a report from captured tool output without running anything.
    Parse(ParseArgs),
}

#[derive(Debug, Default, Args)]
struct CollectArgs {
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory for the snapshot file (overrides the config file).
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Print the report without writing a snapshot file.
    #[arg(long)]
    no_write: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// dmidecode output format to request (overrides the config file).
    #[arg(long)]
    input: Option<DmiInputFormat>,
    /// Deadline for each external tool, in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Do not query the RAID controller.
    #[arg(long)]
    skip_raid: bool,
    /// Do not query the BMC.
    #[arg(long)]
    skip_bmc: bool,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Captured dmidecode output.
    #[arg(long)]
    dmidecode: PathBuf,
    /// Format of the dmidecode capture.
    #[arg(long, default_value = "json")]
    input: DmiInputFormat,
    /// Captured `storcli show all J` output.
    #[arg(long)]
    storcli_overview: Option<PathBuf>,
    /// Captured `storcli /c<id> show all J` output.
    #[arg(long, requires = "storcli_overview")]
    storcli_controller: Option<PathBuf>,
    /// Captured `ipmicfg -m` output.
    #[arg(long)]
    ipmi_network: Option<PathBuf>,
    /// Captured `ipmicfg -user list` output.
    #[arg(long)]
    ipmi_users: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Also write the snapshot file into this directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl CollectArgs {
    /// Applies command-line overrides on top of the file configuration.
    fn apply(&self, mut config: InventoryConfig) -> InventoryConfig {
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        if let Some(input) = self.input {
            config.input = input;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if self.skip_raid {
            config.collect_raid = false;
        }
        if self.skip_bmc {
            config.collect_bmc = false;
        }
        config
    }
}

/// Initialize tracing with the given verbosity level
///
/// - 0: warn (default)
/// - 1: info (-v)
/// - 2: debug (-vv)
/// - 3+: trace (-vvv)
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // RUST_LOG wins when set.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Some(Command::Collect(args)) => run_collect(args),
        Some(Command::Parse(args)) => run_parse(args),
        None => run_collect(CollectArgs::default()),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_collect(args: CollectArgs) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => InventoryConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => InventoryConfig::default(),
    };
    let config = args.apply(config);
    debug!(?config, "Effective configuration");

    let platform = config.platform();
    let runner = SystemRunner::new(config.timeout());
    let outcome = collect_inventory(&runner, &platform, &config.inventory_options())
        .map_err(|err| format!("Hardware inventory failed: {err}"))?;

    let snapshot_dir = (!args.no_write).then(|| config.output_dir());
    emit(&outcome, args.format, snapshot_dir.as_deref())
}

fn run_parse(args: ParseArgs) -> Result<(), String> {
    let platform = Platform::current();
    let runner = canned_runner(&args, &platform)?;
    let options = InventoryOptions {
        input: args.input,
        collect_raid: args.storcli_overview.is_some(),
        collect_bmc: args.ipmi_network.is_some() || args.ipmi_users.is_some(),
    };

    let outcome = collect_inventory(&runner, &platform, &options)
        .map_err(|err| format!("Failed to parse '{}': {err}", args.dmidecode.display()))?;
    emit(&outcome, args.format, args.output_dir.as_deref())
}

/// Registers each captured file under the invocation that would have
/// produced it.
fn canned_runner(args: &ParseArgs, platform: &Platform) -> Result<CannedRunner, String> {
    let mut runner = CannedRunner::new();
    runner.respond(platform.dmidecode(args.input), read_capture(&args.dmidecode)?);

    if let Some(path) = &args.storcli_overview {
        let overview = read_capture(path)?;
        if let Some(detail_path) = &args.storcli_controller {
            let detail = read_capture(detail_path)?;
            // Unparseable overviews surface later as a RAID warning.
            for card in parse_controller_overview(&overview).unwrap_or_default() {
                runner.respond(
                    platform.storcli_controller(&card.controller_id),
                    detail.clone(),
                );
            }
        }
        runner.respond(platform.storcli_overview(), overview);
    }

    if let Some(path) = &args.ipmi_network {
        runner.respond(platform.ipmi_network(), read_capture(path)?);
    }
    if let Some(path) = &args.ipmi_users {
        runner.respond(platform.ipmi_users(), read_capture(path)?);
    }

    Ok(runner)
}

fn read_capture(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("Failed to read '{}': {err}", path.display()))
}

/// Prints the rendering and, when `snapshot_dir` is set, writes it to the
/// snapshot file.
fn emit(
    outcome: &CollectionOutcome,
    format: OutputFormat,
    snapshot_dir: Option<&Path>,
) -> Result<(), String> {
    let rendered = format_report(&outcome.report, format)
        .map_err(|err| format!("Failed to render report: {err}"))?;
    if rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }

    if let Some(dir) = snapshot_dir {
        let path = write_snapshot(&outcome.report, &rendered, dir).map_err(|err| {
            format!("Failed to write snapshot to '{}': {err}", dir.display())
        })?;
        info!(path = %path.display(), "Wrote snapshot");
        eprintln!("Wrote {}", path.display());
    }

    if !outcome.warnings.is_empty() {
        eprintln!(
            "{} subsystem(s) skipped: {}",
            outcome.warnings.len(),
            outcome.warnings.join("; ")
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hw_inventory_collect::CommandRunner;

    #[test]
    fn test_no_subcommand_is_collect() {
        let cli = Cli::try_parse_from(["hw-inventory"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_collect_flags() {
        let cli = Cli::try_parse_from([
            "hw-inventory",
            "collect",
            "--format",
            "yaml",
            "--input",
            "text",
            "--timeout-secs",
            "30",
            "--skip-bmc",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Some(Command::Collect(args)) = cli.command else {
            panic!("expected collect");
        };
        assert_eq!(args.format, OutputFormat::Yaml);
        assert_eq!(args.input, Some(DmiInputFormat::Text));
        assert_eq!(args.timeout_secs, Some(30));
        assert!(args.skip_bmc);
        assert!(!args.skip_raid);
    }

    #[test]
    fn test_flags_override_config() {
        let args = CollectArgs {
            output_dir: Some(PathBuf::from("/srv/inventory")),
            input: Some(DmiInputFormat::Text),
            skip_raid: true,
            ..Default::default()
        };
        let config = args.apply(InventoryConfig {
            timeout_secs: 10,
            collect_bmc: false,
            ..Default::default()
        });
        assert_eq!(config.output_dir(), PathBuf::from("/srv/inventory"));
        assert_eq!(config.input, DmiInputFormat::Text);
        assert_eq!(config.timeout_secs, 10);
        assert!(!config.collect_raid);
        assert!(!config.collect_bmc);
    }

    #[test]
    fn test_unset_flags_keep_config() {
        let config = InventoryConfig {
            output_dir: Some(PathBuf::from("/var/lib/hw-inventory")),
            ..Default::default()
        };
        let applied = CollectArgs::default().apply(config.clone());
        assert_eq!(applied, config);
    }

    #[test]
    fn test_parse_requires_dmidecode() {
        assert!(Cli::try_parse_from(["hw-inventory", "parse"]).is_err());
    }

    #[test]
    fn test_controller_capture_requires_overview() {
        let result = Cli::try_parse_from([
            "hw-inventory",
            "parse",
            "--dmidecode",
            "dmi.json",
            "--storcli-controller",
            "c0.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_canned_runner_keys_detail_by_controller_id() {
        let dir = tempfile::tempdir().unwrap();
        let dmi = dir.path().join("dmi.json");
        let overview = dir.path().join("overview.json");
        let detail = dir.path().join("c3.json");
        fs::write(&dmi, "[]").unwrap();
        fs::write(
            &overview,
            r#"{"Controllers": [{"Response Data": {"System Overview": [{"Ctl": 3}]}}]}"#,
        )
        .unwrap();
        fs::write(&detail, r#"{"Controllers": [{"Response Data": {}}]}"#).unwrap();

        let args = ParseArgs {
            dmidecode: dmi,
            input: DmiInputFormat::Json,
            storcli_overview: Some(overview),
            storcli_controller: Some(detail),
            ipmi_network: None,
            ipmi_users: None,
            format: OutputFormat::Json,
            output_dir: None,
        };
        let platform = Platform::current();
        let runner = canned_runner(&args, &platform).unwrap();

        assert!(runner.run(&platform.storcli_controller("3")).is_ok());
        assert!(runner.run(&platform.storcli_controller("0")).is_err());
        assert!(runner.run(&platform.ipmi_network()).is_err());
    }

    #[test]
    fn test_missing_capture_is_an_error() {
        let err = read_capture(Path::new("/nonexistent/dmidecode.json")).unwrap_err();
        assert!(err.starts_with("Failed to read '/nonexistent/dmidecode.json'"));
    }
}
