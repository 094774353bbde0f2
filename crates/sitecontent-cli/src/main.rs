mod display;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde_json::Value;
use sitecontent_core::form::{self, FormValues};
use sitecontent_core::{paths, query};
use sitecontent_store::{
    CacheConfig, ContentEditor, DocumentClient, JsonFileClient, QueryCache, StaticSession,
};
use sitecontent_sync::{RestDocumentClient, SyncValidator};

/// Inspect, validate and edit the institute site's content store.
#[derive(Parser, Debug)]
#[command(name = "sitecontent", version)]
struct Cli {
    /// Base URL of the REST document store
    #[arg(long, env = "SITE_CONTENT_URL", global = true)]
    url: Option<String>,

    /// Local JSON document tree, used instead of the REST store
    #[arg(long, env = "SITE_CONTENT_FILE", global = true)]
    file: Option<PathBuf>,

    /// Auth token appended to REST store requests
    #[arg(long, env = "SITE_CONTENT_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Identity of the acting admin; required for seed and save
    #[arg(long, env = "SITE_CONTENT_ADMIN", global = true)]
    admin: Option<String>,

    /// Replace every section's staleness window (seconds)
    #[arg(long, global = true)]
    stale_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load every section and report which ones are dynamic or zombie
    Validate {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one section, normalized, as JSON
    Show {
        /// Section name, e.g. stats, heroes, about
        section: String,
        /// Page, header section, or about subsection
        #[arg(long)]
        key: Option<String>,
    },
    /// Write a content tree into the store
    Seed {
        /// JSON file holding the tree, optionally wrapped in "siteContent"
        tree: PathBuf,
    },
    /// Validate a record against a form schema and save it
    Save {
        /// Store path, e.g. siteContent/heroes/home
        path: String,
        /// JSON object of string fields
        record: PathBuf,
        /// Form schema name: testimonial, hero, stat, course, section-header
        #[arg(long)]
        schema: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("sitecontent v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let client = open_client(&cli).await?;
    let config = CacheConfig {
        stale_time_override: cli.stale_secs.map(Duration::from_secs),
    };
    let cache = QueryCache::with_config(client, config);

    match &cli.command {
        Command::Validate { json } => {
            let report = SyncValidator::new(cache).run().await;
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                display::print_report(&report);
            }
        }
        Command::Show { section, key } => {
            let value = section_json(&cache, section, key.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::Seed { tree } => {
            let tree = read_json(tree).await?;
            let count = editor(&cli, cache).seed(&tree).await?;
            eprintln!("Seeded {count} subtrees");
        }
        Command::Save {
            path,
            record,
            schema,
        } => {
            let Some(form_schema) = form::schemas::by_name(schema) else {
                bail!("unknown form schema {schema:?}");
            };
            let values = form_values(&read_json(record).await?)?;
            editor(&cli, cache)
                .save_validated(path, &values, &form_schema)
                .await?;
            eprintln!("Saved {path}");
        }
    }

    Ok(())
}

async fn open_client(cli: &Cli) -> anyhow::Result<Arc<dyn DocumentClient>> {
    match (&cli.url, &cli.file) {
        (Some(_), Some(_)) => bail!("pass either --url or --file, not both"),
        (Some(url), None) => {
            let mut client = RestDocumentClient::new(url.clone());
            if let Some(token) = &cli.token {
                client = client.with_token(token.clone());
            }
            Ok(Arc::new(client))
        }
        (None, Some(file)) => {
            let client = if tokio::fs::try_exists(file).await? {
                JsonFileClient::open(file)
                    .await
                    .with_context(|| format!("opening {}", file.display()))?
            } else {
                JsonFileClient::create(file)
            };
            Ok(Arc::new(client))
        }
        (None, None) => bail!("no content store: set --url or --file"),
    }
}

/// One normalized section as JSON. Courses, services and case studies
/// come back with their side-table sub-items merged in.
async fn section_json(
    cache: &QueryCache,
    section: &str,
    key: Option<&str>,
) -> anyhow::Result<Value> {
    let value = match section {
        paths::COURSES => serde_json::to_value(
            cache
                .load_with_items(&query::courses(), &query::course_topics())
                .await?,
        )?,
        paths::SERVICES => serde_json::to_value(
            cache
                .load_with_items(&query::services(), &query::service_deliverables())
                .await?,
        )?,
        paths::CASE_STUDIES => serde_json::to_value(
            cache
                .load_with_items(&query::case_studies(), &query::case_study_outcomes())
                .await?,
        )?,
        _ => {
            let Some(query) = query::by_name(section, key) else {
                bail!("unknown section {section:?}");
            };
            cache
                .load(&query)
                .await
                .with_context(|| format!("loading {}", query.path()))?
        }
    };
    Ok(value)
}

fn editor(cli: &Cli, cache: QueryCache) -> ContentEditor {
    let session = match &cli.admin {
        Some(admin) => StaticSession::signed_in(admin.clone()).with_admins([admin.clone()]),
        None => StaticSession::anonymous(),
    };
    ContentEditor::new(cache, Arc::new(session))
}

async fn read_json(path: &Path) -> anyhow::Result<Value> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Flatten a JSON object into form values. Numbers and booleans are kept
/// as their text; nested values are rejected.
fn form_values(record: &Value) -> anyhow::Result<FormValues> {
    let Some(map) = record.as_object() else {
        bail!("record must be a JSON object");
    };
    map.iter()
        .map(|(field, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                _ => bail!("field {field:?} must be a string"),
            };
            Ok((field.clone(), text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sitecontent_store::MemoryDocumentClient;

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sitecontent",
            "show",
            "heroes",
            "--key",
            "home",
            "--file",
            "content.json",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("content.json")));
        assert!(matches!(
            cli.command,
            Command::Show { ref section, key: Some(ref key) } if section == "heroes" && key == "home"
        ));
    }

    #[test]
    fn form_values_from_record() {
        let values = form_values(&json!({ "label": "Graduates", "value": 5000 })).unwrap();
        assert_eq!(values["label"], "Graduates");
        assert_eq!(values["value"], "5000");

        assert!(form_values(&json!({ "features": ["a"] })).is_err());
        assert!(form_values(&json!(["a"])).is_err());
    }

    #[tokio::test]
    async fn show_merges_side_tables() {
        let cache = QueryCache::new(Arc::new(MemoryDocumentClient::with_root(json!({
            "siteContent": {
                "services": { "s1": { "title": "Audits", "deliverables": ["inline"] } },
                "serviceDeliverables": { "s1": { "items": ["Report", "Roadmap"] } },
                "stats": [{ "label": "Graduates", "value": "5000" }],
            }
        }))));

        let services = section_json(&cache, "services", None).await.unwrap();
        assert_eq!(services[0]["deliverables"], json!(["Report", "Roadmap"]));

        let stats = section_json(&cache, "stats", None).await.unwrap();
        assert_eq!(stats[0]["value"], 5000.0);

        assert!(section_json(&cache, "nope", None).await.is_err());
    }

    #[tokio::test]
    async fn editor_requires_admin_flag() {
        let tree = json!({ "stats": { "s1": { "label": "Graduates" } } });
        let cache = QueryCache::new(Arc::new(MemoryDocumentClient::new()));

        let anonymous = Cli::try_parse_from(["sitecontent", "validate"]).unwrap();
        assert!(editor(&anonymous, cache.clone()).seed(&tree).await.is_err());

        let admin = Cli::try_parse_from(["sitecontent", "--admin", "ops@x", "validate"]).unwrap();
        assert_eq!(editor(&admin, cache).seed(&tree).await.unwrap(), 1);
    }
}
