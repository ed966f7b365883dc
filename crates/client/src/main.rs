//! `netmon-rules` -- author, check and submit alert rules from a shell.
//!
//! Drafts are JSON files in [`RuleDraft`] shape; missing fields take their
//! defaults. `--set field=value` applies edits through the same resolver the
//! dashboard editor uses, so dependent fields are cleared the same way.
//!
//! # Environment variables
//!
//! | Variable                      | Required | Default                        |
//! |-------------------------------|----------|--------------------------------|
//! | `NETMON_API_URL`              | no       | `http://localhost:8000/api/v1` |
//! | `NETMON_API_TOKEN`            | no       | --                             |
//! | `NETMON_REQUEST_TIMEOUT_SECS` | no       | `30`                           |

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use netmon_client::api::NetmonApi;
use netmon_client::config::ClientConfig;
use netmon_client::editor::RuleEditor;
use netmon_client::error::ClientError;
use netmon_client::interface_cache::InterfaceList;
use netmon_client::inventory::InventoryService;
use netmon_core::metric_catalog;
use netmon_core::rule_draft::RuleDraft;
use netmon_core::rule_payload::RulePayload;
use netmon_core::rule_resolver::{DraftEdit, InterfaceRetention, RuleResolver};
use netmon_core::rule_validation::ValidationReport;
use netmon_core::types::DbId;

#[derive(Parser)]
#[command(name = "netmon-rules", version, about = "Author and submit netmon alert rules")]
struct Opts {
    #[command(subcommand)]
    cmd: Command,

    #[arg(
        long,
        global = true,
        help = "Keep the interface when switching between interface metrics"
    )]
    keep_interface: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List known metrics, grouped as in the rule editor.
    Metrics,
    /// List devices from the inventory service.
    Devices,
    /// List interfaces of one device.
    Interfaces {
        #[arg(help = "Device ID")]
        device_id: DbId,
    },
    /// Validate a draft and print the payload it would submit.
    Check(DraftArgs),
    /// Validate a draft and create (or, with --rule-id, update) the rule.
    Submit {
        #[command(flatten)]
        draft: DraftArgs,
        #[arg(long, help = "Existing rule to update")]
        rule_id: Option<DbId>,
    },
    /// Print a stored rule as an editable draft.
    Edit {
        #[arg(help = "Rule ID")]
        rule_id: DbId,
    },
}

#[derive(clap::Args)]
struct DraftArgs {
    #[arg(help = "Draft JSON file")]
    path: PathBuf,
    #[arg(long = "set", value_name = "FIELD=VALUE", help = "Apply an edit after loading")]
    set: Vec<String>,
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    validation: &'a ValidationReport,
    payload: Option<RulePayload>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netmon_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let opts = Opts::parse();
    let resolver = RuleResolver::new(if opts.keep_interface {
        InterfaceRetention::PreserveWithinInterfaceScope
    } else {
        InterfaceRetention::ClearOnMetricChange
    });

    match opts.cmd {
        Command::Metrics => print_json(&metric_catalog::grouped()),
        Command::Devices => {
            let api = connect()?;
            print_json(&api.list_devices().await?)
        }
        Command::Interfaces { device_id } => {
            let api = connect()?;
            print_json(&api.list_interfaces_for_device(device_id).await?)
        }
        Command::Check(args) => {
            let editor = load_editor(&args, resolver, None).await?;
            let report = editor.validation();
            print_json(&CheckOutput {
                validation: &report,
                payload: editor.preview().ok(),
            })?;
            if !report.is_valid {
                bail!("draft is not valid");
            }
            Ok(())
        }
        Command::Submit { draft, rule_id } => {
            let api = connect()?;
            let mut editor = load_editor(&draft, resolver, rule_id).await?;
            if let Some(InterfaceList::Failed(msg)) = editor.refresh_interfaces(&api).await {
                tracing::warn!(error = %msg, "Could not verify interface selection");
            }
            match editor.submit(&api).await {
                Ok(stored) => print_json(&stored),
                Err(ClientError::Invalid(report)) => {
                    print_json(&report)?;
                    bail!("draft is not valid");
                }
                Err(e) => Err(e.into()),
            }
        }
        Command::Edit { rule_id } => {
            let api = connect()?;
            let editor = RuleEditor::open(&api, rule_id).await?;
            print_json(editor.draft())
        }
    }
}

fn connect() -> Result<NetmonApi> {
    let config = ClientConfig::from_env()?;
    let api = NetmonApi::from_config(&config)?;
    tracing::debug!(api_url = %api.api_url(), "Using dashboard API");
    Ok(api)
}

/// Load a draft file into an editor and apply any `--set` edits in order.
async fn load_editor(
    args: &DraftArgs,
    resolver: RuleResolver,
    rule_id: Option<DbId>,
) -> Result<RuleEditor> {
    let text = tokio::fs::read_to_string(&args.path)
        .await
        .with_context(|| format!("reading {}", args.path.display()))?;
    let draft: RuleDraft = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", args.path.display()))?;

    let mut editor = match rule_id {
        Some(id) => RuleEditor::for_existing(draft, id),
        None => RuleEditor::with_draft(draft),
    }
    .with_resolver(resolver);

    for assignment in &args.set {
        let Some((field, value)) = assignment.split_once('=') else {
            bail!("--set expects FIELD=VALUE, got '{assignment}'");
        };
        editor.apply(DraftEdit::from_field(field.trim(), value)?);
    }
    Ok(editor)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
