// mailbridge - reconcile email campaign engagement with CRM contacts

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use mailbridge_client::{BrevoClient, PipedriveClient, SessionCache};
use mailbridge_cli::{campaigns, exit_codes, push, resolve_key, run, CliError};
use mailbridge_recon::ReconFilters;

#[derive(Parser)]
#[command(name = "mailbridge")]
#[command(about = "Reconcile email campaign engagement with CRM contacts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BrevoOpts {
    /// Brevo API key
    #[arg(long, env = "BREVO_API_KEY", hide_env_values = true)]
    brevo_key: Option<String>,

    /// Brevo API base URL
    #[arg(long, env = "BREVO_API_URL", default_value = "https://api.brevo.com")]
    brevo_url: String,
}

#[derive(Args)]
struct PipedriveOpts {
    /// Pipedrive API token
    #[arg(long, env = "PIPEDRIVE_API_TOKEN", hide_env_values = true)]
    pipedrive_token: Option<String>,

    /// Pipedrive API base URL (company-specific domains are supported)
    #[arg(long, env = "PIPEDRIVE_BASE_URL", default_value = "https://api.pipedrive.com")]
    pipedrive_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List sent campaigns from the email platform
    #[command(after_help = "\
Examples:
  mailbridge campaigns
  mailbridge campaigns --json
  mailbridge campaigns --limit 50")]
    Campaigns {
        #[command(flatten)]
        brevo: BrevoOpts,

        /// Page size
        #[arg(long, default_value = "10")]
        limit: u32,

        /// Page offset
        #[arg(long, default_value = "0")]
        offset: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the full pipeline: export recipients, reconcile with CRM
    /// contacts, aggregate the per-campaign report, write outputs
    #[command(after_help = "\
Examples:
  mailbridge run --campaign 42 --out-xlsx report.xlsx
  mailbridge run --campaign 42 --campaign 43 --drop-unmatched
  mailbridge run --campaign 42 --internal-domain corp.example --out-csv merged.csv
  mailbridge run --campaign 42 --custom-field Segment --out-csv merged.csv")]
    Run {
        #[command(flatten)]
        brevo: BrevoOpts,

        #[command(flatten)]
        pipedrive: PipedriveOpts,

        /// Campaign id to include (repeatable)
        #[arg(long = "campaign", value_name = "ID")]
        campaigns: Vec<i64>,

        /// Drop rows that matched no CRM contact
        #[arg(long)]
        drop_unmatched: bool,

        /// Drop rows whose email is under this domain
        #[arg(long, value_name = "DOMAIN")]
        internal_domain: Option<String>,

        /// CRM custom field (by display name) to carry into the output
        #[arg(long, value_name = "NAME")]
        custom_field: Option<String>,

        /// Write merged rows as CSV (stdout when no output flag is given)
        #[arg(long, value_name = "PATH")]
        out_csv: Option<PathBuf>,

        /// Write the two-sheet workbook (report + merged rows)
        #[arg(long, value_name = "PATH")]
        out_xlsx: Option<PathBuf>,

        /// CRM contact page size
        #[arg(long, default_value = "500")]
        page_size: u32,

        /// Stop fetching CRM contacts after this many
        #[arg(long, value_name = "N")]
        max_contacts: Option<u32>,

        /// Suppress progress output
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Push reconciled values back onto CRM person records
    #[command(after_help = "\
Examples:
  mailbridge push merged.csv --map 'Engagement=engagement_status'
  mailbridge push merged.csv --map 'Engagement=engagement_status' --map 'Blacklisted=blacklist'")]
    Push {
        #[command(flatten)]
        pipedrive: PipedriveOpts,

        /// Reconciled CSV produced by `mailbridge run`
        input: PathBuf,

        /// Field mapping (repeatable): 'CRM Field=csv_column'
        #[arg(long = "map", value_name = "MAPPING")]
        maps: Vec<String>,

        /// Suppress progress output
        #[arg(long, short = 'q')]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Campaigns { brevo, limit, offset, json } => {
            cmd_campaigns(brevo, limit, offset, json)
        }
        Commands::Run {
            brevo,
            pipedrive,
            campaigns,
            drop_unmatched,
            internal_domain,
            custom_field,
            out_csv,
            out_xlsx,
            page_size,
            max_contacts,
            quiet,
        } => cmd_run(
            brevo,
            pipedrive,
            run::RunConfig {
                campaigns,
                filters: ReconFilters { drop_unmatched, internal_domain },
                custom_field,
                page_size,
                max_contacts,
                out_csv,
                out_xlsx,
                quiet,
            },
        ),
        Commands::Push { pipedrive, input, maps, quiet } => {
            cmd_push(pipedrive, input, maps, quiet)
        }
    };

    match result {
        Ok(()) => ExitCode::from(exit_codes::EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {message}");
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(code)
        }
    }
}

fn brevo_client(opts: BrevoOpts) -> Result<BrevoClient, CliError> {
    let key = resolve_key(opts.brevo_key, "Brevo", "--brevo-key", "BREVO_API_KEY")?;
    Ok(BrevoClient::with_base_url(key, opts.brevo_url))
}

fn pipedrive_client(opts: PipedriveOpts) -> Result<PipedriveClient, CliError> {
    let token = resolve_key(
        opts.pipedrive_token,
        "Pipedrive",
        "--pipedrive-token",
        "PIPEDRIVE_API_TOKEN",
    )?;
    Ok(PipedriveClient::new(token, opts.pipedrive_url))
}

fn cmd_campaigns(brevo: BrevoOpts, limit: u32, offset: u32, json: bool) -> Result<(), CliError> {
    let brevo = brevo_client(brevo)?;
    let mut cache = SessionCache::new();
    campaigns::campaigns(&brevo, &mut cache, limit, offset, json)
}

fn cmd_run(
    brevo: BrevoOpts,
    pipedrive: PipedriveOpts,
    cfg: run::RunConfig,
) -> Result<(), CliError> {
    let brevo = brevo_client(brevo)?;
    let pipedrive = pipedrive_client(pipedrive)?;
    let mut cache = SessionCache::new();
    run::run(&cfg, &brevo, &pipedrive, &mut cache).map(|_| ())
}

fn cmd_push(
    pipedrive: PipedriveOpts,
    input: PathBuf,
    maps: Vec<String>,
    quiet: bool,
) -> Result<(), CliError> {
    let pipedrive = pipedrive_client(pipedrive)?;
    let mut cache = SessionCache::new();
    let mappings = maps
        .iter()
        .map(|arg| push::parse_mapping(arg))
        .collect::<Result<Vec<_>, _>>()?;
    let updated = push::push(
        &pipedrive,
        &mut cache,
        &input,
        &mappings,
        push::UPDATE_PACING,
        quiet,
    )?;
    println!("updated {updated} persons");
    Ok(())
}
