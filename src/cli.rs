use anyhow::{bail, Result};

use crate::api::verify::{verify_entry, VerifyOutcome};
use crate::api::{create_client, ConfigApi};
use crate::config;
use crate::model::form::{validate, IntegrationFormData};
use crate::model::integration::{GlobalIntegrations, IntegrationKind};
use crate::model::table::table_rows;
use crate::store::SnapshotStore;

fn client_from_config() -> Result<Box<dyn ConfigApi>> {
    let config = config::load_config()?;
    match &config.server {
        Some(server) => Ok(create_client(server)),
        None => bail!("No server configured. Add [server] url and token to ~/.syncdesk/config.toml"),
    }
}

/// Print the integrations table, from the server when reachable,
/// otherwise from the local snapshot.
pub async fn handle_show() -> Result<()> {
    let mut store = SnapshotStore::new()?;
    let client = client_from_config().ok();
    let global = load_for_show(client.as_deref(), &mut store).await;

    let rows = table_rows(&global.integrations);
    if rows.is_empty() {
        println!("No ticket integrations configured.");
    } else {
        for row in &rows {
            println!(
                "{:>2}  {:<8} {:<45} {}",
                row.table_index.unwrap_or(0),
                row.kind.display_name(),
                row.name,
                row.identity()
            );
        }
    }

    match &global.google_calendar {
        Some(calendars) if !calendars.is_empty() => {
            for cal in calendars {
                println!(" cal {:<8} {} ({})", "Google", cal.email, cal.domain);
            }
        }
        _ => println!("No calendar integration configured."),
    }

    Ok(())
}

async fn load_for_show(
    client: Option<&dyn ConfigApi>,
    store: &mut SnapshotStore,
) -> GlobalIntegrations {
    if let Some(client) = client {
        match client.fetch_global().await {
            Ok(global) => {
                let _ = store.update(global.clone());
                return global;
            }
            Err(e) => {
                eprintln!("Could not reach server ({e}); showing local snapshot.");
            }
        }
    }
    if let Some(stamp) = store.fetched_at() {
        println!("(offline — snapshot from {stamp})");
    }
    store.integrations().clone()
}

/// Validate, verify, append, apply.
pub async fn handle_add(args: &[String]) -> Result<()> {
    let (form, force) = parse_add_args(args)?;

    let errors = validate(&form);
    if !errors.is_clean() {
        let lines: Vec<String> = errors
            .messages()
            .iter()
            .map(|(field, msg)| format!("  {field}: {msg}"))
            .collect();
        bail!("Invalid integration:\n{}", lines.join("\n"));
    }

    let entry = form.into_entry();

    if !force {
        match verify_entry(&entry).await {
            Ok(VerifyOutcome::Ok) => {}
            Ok(VerifyOutcome::Rejected(status)) => {
                bail!(
                    "{} rejected the credentials (HTTP {status}). Use --force to apply anyway.",
                    entry.kind().display_name()
                );
            }
            Err(e) => {
                bail!(
                    "Could not reach {} to verify credentials: {e}. Use --force to apply anyway.",
                    entry.kind().display_name()
                );
            }
        }
    }

    let client = client_from_config()?;
    let mut global = client.fetch_global().await?;
    let kind = entry.kind();
    global.integrations.push(entry);
    client.apply_global(&global).await?;

    let mut store = SnapshotStore::new()?;
    store.update(global.clone())?;

    println!(
        "Added {} integration ({} total).",
        kind.display_name(),
        global.integrations.len()
    );
    Ok(())
}

/// Remove an entry by original index.
pub async fn handle_delete(args: &[String]) -> Result<()> {
    let (kind, original_index) = parse_delete_args(args)?;

    let client = client_from_config()?;
    let mut global = client.fetch_global().await?;

    if global.integrations.remove(kind, original_index).is_none() {
        bail!(
            "No {} integration at index {original_index}",
            kind.display_name()
        );
    }
    client.apply_global(&global).await?;

    let mut store = SnapshotStore::new()?;
    store.update(global)?;

    println!("Deleted {} integration {original_index}.", kind.display_name());
    Ok(())
}

/// Parse `syncdesk add` arguments into form data plus the --force flag.
///
/// Supported forms:
///   syncdesk add jira --url <url> --username <user> --token <tok> --project <key> [--vuln]
///   syncdesk add zendesk --url <url> --email <email> --token <tok> --group <id> [--vuln]
pub fn parse_add_args(args: &[String]) -> Result<(IntegrationFormData, bool)> {
    let Some(kind_arg) = args.first() else {
        bail!(
            "Usage: syncdesk add <jira|zendesk> --url <url> --token <token> ...\n\nExamples:\n  syncdesk add jira --url https://acme.atlassian.net --username ops@acme.com --token T --project ENG\n  syncdesk add zendesk --url https://acme.zendesk.com --email ops@acme.com --token T --group 12345"
        );
    };
    let Some(kind) = IntegrationKind::parse(kind_arg) else {
        bail!("Unknown integration type '{kind_arg}' (expected jira or zendesk)");
    };

    let mut form = IntegrationFormData::new(kind);
    let mut force = false;
    let mut i = 1;

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--vuln" => {
                form.enable_software_vulnerabilities = true;
                i += 1;
                continue;
            }
            "--force" => {
                force = true;
                i += 1;
                continue;
            }
            _ => {}
        }

        i += 1;
        let Some(value) = args.get(i) else {
            bail!("Missing value for {flag}");
        };
        match flag {
            "--url" => form.url = value.clone(),
            "--username" => form.username = value.clone(),
            "--email" => form.email = value.clone(),
            "--token" => form.api_token = value.clone(),
            "--project" => form.project_key = value.clone(),
            "--group" => form.group_id = value.clone(),
            _ => bail!("Unknown flag {flag}"),
        }
        i += 1;
    }

    Ok((form, force))
}

/// Parse `syncdesk delete` arguments into (kind, original index).
pub fn parse_delete_args(args: &[String]) -> Result<(IntegrationKind, usize)> {
    let [kind_arg, index_arg] = args else {
        bail!("Usage: syncdesk delete <jira|zendesk> <index>");
    };
    let Some(kind) = IntegrationKind::parse(kind_arg) else {
        bail!("Unknown integration type '{kind_arg}' (expected jira or zendesk)");
    };
    let original_index: usize = index_arg
        .parse()
        .map_err(|_| anyhow::anyhow!("Index must be a number, got '{index_arg}'"))?;
    Ok((kind, original_index))
}

pub fn print_help() {
    println!("syncdesk — terminal dashboard for ticket & calendar integrations\n");
    println!("USAGE:");
    println!("  syncdesk                  Launch the TUI dashboard");
    println!("  syncdesk show             Print configured integrations");
    println!("  syncdesk add <type> ...   Add an integration and apply it");
    println!("  syncdesk delete <type> <index>");
    println!();
    println!("ADD FLAGS:");
    println!("  --url <url>        Service base URL");
    println!("  --username <user>  Jira username");
    println!("  --email <email>    Zendesk email");
    println!("  --token <token>    API token");
    println!("  --project <key>    Jira project key");
    println!("  --group <id>       Zendesk group id");
    println!("  --vuln             Enable vulnerability ticket creation");
    println!("  --force            Skip credential verification");
    println!();
    println!("EXAMPLES:");
    println!("  syncdesk add jira --url https://acme.atlassian.net --username ops@acme.com --token T --project ENG");
    println!("  syncdesk add zendesk --url https://acme.zendesk.com --email ops@acme.com --token T --group 12345");
}
