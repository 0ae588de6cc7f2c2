//! k2pac-gen: CLI tool for generating PAC scripts from AdBlock-style filter lists.

use clap::{Args, Parser, Subcommand};
use k2pac::{FeedLoader, FeedSource, GeneratorConfig, MatchIndex, PacEmitter, RuleSet};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "k2pac-gen")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Generate PAC scripts from gfwlist-style filter lists", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that loads rules.
#[derive(Args)]
struct SourceArgs {
    /// Feed URL or local path (defaults to the configured feed)
    #[arg(short, long)]
    input: Option<String>,

    /// Local user rules merged into the feed
    #[arg(short, long)]
    user_rules: Option<PathBuf>,

    /// The feed is plain text, not base64
    #[arg(long)]
    no_base64: bool,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Proxy used to download the feed, e.g. socks5://127.0.0.1:1080
    #[arg(long)]
    fetch_proxy: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a PAC script
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Output PAC file
        #[arg(short, long)]
        output: PathBuf,

        /// Proxy token returned for proxied hosts
        #[arg(short, long)]
        proxy: Option<String>,
    },

    /// Print the decision for each host
    Check {
        #[command(flatten)]
        source: SourceArgs,

        /// Hosts to classify
        #[arg(required = true)]
        hosts: Vec<String>,
    },

    /// Write the aggregated rules back as a filter list
    Normalize {
        #[command(flatten)]
        source: SourceArgs,

        /// Output rule file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_log_filter(&cli.command)),
    )
    .init();

    let result = match cli.command {
        Commands::Generate {
            source,
            output,
            proxy,
        } => generate(&source, &output, proxy),
        Commands::Check { source, hosts } => check(&source, &hosts),
        Commands::Normalize { source, output } => normalize(&source, &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

impl Commands {
    fn source(&self) -> &SourceArgs {
        match self {
            Commands::Generate { source, .. }
            | Commands::Check { source, .. }
            | Commands::Normalize { source, .. } => source,
        }
    }
}

/// Default log filter when `RUST_LOG` is unset.
fn default_log_filter(command: &Commands) -> &'static str {
    if command.source().verbose {
        "debug"
    } else {
        "info"
    }
}

/// Resolve the run configuration: file first, then command-line overrides.
fn resolve_config(args: &SourceArgs) -> Result<GeneratorConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };

    if let Some(input) = &args.input {
        config.feed_url = input.clone();
    }
    if args.no_base64 {
        config.feed_base64 = false;
    }
    if let Some(proxy) = &args.fetch_proxy {
        config.fetch_proxy = Some(proxy.clone());
    }

    Ok(config)
}

fn load_rules(
    args: &SourceArgs,
    config: &GeneratorConfig,
) -> Result<RuleSet, Box<dyn std::error::Error>> {
    let loader = FeedLoader::new(config)?;
    let feed = loader.load(&FeedSource::parse(&config.feed_url)?)?;

    let user_rules = match &args.user_rules {
        Some(path) => Some(loader.load_plain(&FeedSource::Path(path.clone()))?),
        None => None,
    };

    let rules = RuleSet::from_sources(&feed, user_rules.as_deref());

    if args.verbose {
        println!("Aggregated {}", rules.stats());
        for (name, size) in rules.container_sizes() {
            println!("  {:<17} {}", name, size);
        }
    }

    Ok(rules)
}

fn generate(
    args: &SourceArgs,
    output: &PathBuf,
    proxy: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = resolve_config(args)?;
    if let Some(proxy) = proxy {
        config.proxy_token = proxy;
    }

    let rules = load_rules(args, &config)?;
    let index = MatchIndex::build(&rules);

    let size = PacEmitter::new(config.proxy_token.as_str()).write_to(output, &index)?;

    println!("Generated {:?} ({} bytes, {} rules)", output, size, rules.rule_count());
    Ok(())
}

fn check(args: &SourceArgs, hosts: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    let rules = load_rules(args, &config)?;
    let index = MatchIndex::build(&rules);

    for host in hosts {
        let reason = index.explain(host);
        println!("{}\t{}\t{}", host, reason.decision(), reason);
    }

    Ok(())
}

fn normalize(args: &SourceArgs, output: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    let rules = load_rules(args, &config)?;

    let mut text = rules.to_rule_lines().join("\n");
    text.push('\n');
    fs::write(output, text)?;

    println!("Wrote {} rules to {:?}", rules.rule_count(), output);
    Ok(())
}
