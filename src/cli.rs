//! Command-line front end: catalog management and field editing

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tokio::runtime::Handle;
use tracing::info;

use easyini::catalog::{FieldRow, split_domain};
use easyini::collaborators::{
    AutoConfirm, Confirm, GivenPath, MutationGate, OpenGate, PathPicker, PromptConfirm,
};
use easyini::constants::config::CATALOG_ENV;
use easyini::preview::format_table;
use easyini::status::{Status, StatusLine};
use easyini::sync::Control;
use easyini::{CatalogStore, FieldCatalog, FieldKey, JsonCatalogStore, SyncEngine};

/// Edit a curated set of INI keys
#[derive(Parser)]
#[command(name = "easyini", version)]
#[command(about = "Edit selected keys of INI files through typed fields")]
pub struct Cli {
    /// Catalog file (defaults to $EASYINI_CATALOG, then the platform config dir)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List configured files
    Files,
    /// Add an INI file to the catalog
    Add {
        path: PathBuf,
        /// Display name (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Remove a file from the catalog
    Remove {
        name: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List the editable fields of a file
    Fields { name: String },
    /// Replace the editable fields of a file
    SetFields {
        name: String,
        /// SECTION.OPTION or SECTION.OPTION=a,b,c (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,
        /// Move the entry to another INI path
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the document with managed keys highlighted
    Show { name: String },
    /// Set field values; each edit is written immediately
    Edit {
        name: String,
        /// SECTION.OPTION=VALUE (applied in order)
        #[arg(required = true)]
        assignments: Vec<String>,
        /// Exit right after the last write instead of waiting for the status to settle
        #[arg(long)]
        no_wait: bool,
    },
}

impl Cli {
    fn store(&self) -> JsonCatalogStore {
        let path = self
            .catalog
            .clone()
            .or_else(|| std::env::var_os(CATALOG_ENV).map(PathBuf::from))
            .unwrap_or_else(JsonCatalogStore::default_path);
        JsonCatalogStore::new(path)
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let store = cli.store();
    info!(catalog = %store.path().display(), "Using catalog");
    let mut gate = OpenGate;

    match cli.command {
        Command::Files => list_files(&store),
        Command::Add { path, name } => {
            ensure_allowed(&mut gate)?;
            add_file(&store, GivenPath::new(Some(path)), name)
        }
        Command::Remove { name, yes } => {
            ensure_allowed(&mut gate)?;
            if yes {
                remove_file(&store, &name, AutoConfirm(true))
            } else {
                let stdin = io::stdin();
                remove_file(&store, &name, PromptConfirm::new(stdin.lock(), io::stdout()))
            }
        }
        Command::Fields { name } => list_fields(&store, &name),
        Command::SetFields { name, fields, path } => {
            ensure_allowed(&mut gate)?;
            set_fields(&store, &name, &fields, path)
        }
        Command::Show { name } => show(&store, &name),
        Command::Edit {
            name,
            assignments,
            no_wait,
        } => edit(&store, &name, &assignments, !no_wait).await,
    }
}

fn ensure_allowed(gate: &mut impl MutationGate) -> Result<()> {
    if !gate.allow() {
        bail!("Catalog changes are not allowed");
    }
    Ok(())
}

fn list_files(store: &JsonCatalogStore) -> Result<()> {
    let catalog = store.load();
    if catalog.is_empty() {
        println!("No files configured");
        return Ok(());
    }
    for summary in catalog.summaries() {
        println!("{}\t{}\t{}", summary.name, summary.path.display(), summary.fields);
    }
    Ok(())
}

fn add_file(
    store: &JsonCatalogStore,
    mut picker: impl PathPicker,
    name: Option<String>,
) -> Result<()> {
    let path = picker.pick_path().ok_or_else(|| anyhow!("No file selected"))?;
    let name = name
        .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_default();

    let mut catalog = store.load();
    catalog
        .add_file(&name, &path)
        .with_context(|| format!("Failed to add {}", path.display()))?;
    store.save(&catalog).context("Failed to save catalog")?;

    println!("File '{name}' added");
    Ok(())
}

fn remove_file(store: &JsonCatalogStore, name: &str, mut confirm: impl Confirm) -> Result<()> {
    let mut catalog = store.load();
    if catalog.find(name).is_none() {
        bail!("No configured file named '{name}'");
    }
    if !confirm.confirm(&format!("Are you sure you want to remove '{name}'?")) {
        println!("Cancelled");
        return Ok(());
    }

    catalog.remove_file(name)?;
    store.save(&catalog).context("Failed to save catalog")?;
    println!("File '{name}' removed");
    Ok(())
}

fn list_fields(store: &JsonCatalogStore, name: &str) -> Result<()> {
    let catalog = store.load();
    let entry = catalog
        .find(name)
        .ok_or_else(|| anyhow!("No configured file named '{name}'"))?;

    for field in entry.fields.list_fields() {
        let control = match Control::for_field(field) {
            Control::Choice { options } => format!("choice [{}]", options.join(", ")),
            Control::FreeText => "text".to_string(),
        };
        println!("{}\t{}\t{}", field.key(), field.display, control);
    }
    Ok(())
}

/// Parse `SECTION.OPTION[=a,b,c]` into an editor row
fn parse_field_spec(spec: &str) -> Result<FieldRow> {
    let (key, domain) = spec.split_once('=').unwrap_or((spec, ""));
    let key: FieldKey = key.parse()?;
    Ok(FieldRow {
        section: key.section,
        option: key.option,
        domain: split_domain(domain).join(","),
    })
}

fn set_fields(
    store: &JsonCatalogStore,
    name: &str,
    specs: &[String],
    path: Option<PathBuf>,
) -> Result<()> {
    let rows = specs
        .iter()
        .map(|s| parse_field_spec(s).with_context(|| format!("Invalid field '{s}'")))
        .collect::<Result<Vec<_>>>()?;
    let fields = FieldCatalog::from_rows(&rows);
    let count = fields.len();

    let mut catalog = store.load();
    catalog.save_fields(name, fields, path.as_deref())?;
    store.save(&catalog).context("Failed to save catalog")?;

    println!("Saved {count} fields for '{name}'");
    Ok(())
}

fn open_engine(store: &JsonCatalogStore, name: &str) -> Result<SyncEngine> {
    let catalog = store.load();
    let entry = catalog
        .find(name)
        .cloned()
        .ok_or_else(|| anyhow!("No configured file named '{name}'"))?;
    let path = entry.path.clone();
    SyncEngine::open(entry).with_context(|| format!("Could not load INI file {}", path.display()))
}

fn show(store: &JsonCatalogStore, name: &str) -> Result<()> {
    let engine = open_engine(store, name)?;
    print!("{}", format_table(engine.preview()));

    for field in engine.fields() {
        let definition = field.definition();
        let mut line = format!("{} = {}", definition.display, field.value());
        if let Control::Choice { options } = field.control() {
            line.push_str(&format!("  (one of: {})", options.join(", ")));
        }
        if field.out_of_domain() {
            line.push_str("  [not in list]");
        }
        println!("{line}");
    }
    Ok(())
}

async fn edit(
    store: &JsonCatalogStore,
    name: &str,
    assignments: &[String],
    wait: bool,
) -> Result<()> {
    let edits = assignments
        .iter()
        .map(|a| -> Result<(FieldKey, String)> {
            let (key, value) = a
                .split_once('=')
                .ok_or_else(|| anyhow!("Expected SECTION.OPTION=VALUE, found '{a}'"))?;
            let key: FieldKey = key.parse()?;
            Ok((key, value.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut engine = open_engine(store, name)?.with_status(StatusLine::new(Handle::current()));
    let mut stdout = io::stdout();

    for (key, value) in &edits {
        engine
            .edit(key, value)
            .with_context(|| format!("Failed to set {key}"))?;
        if let Some(status) = engine.status() {
            writeln!(stdout, "{key} = {value}: {}", status.current().status.text())?;
        }
    }

    if wait {
        if let Some(status) = engine.status() {
            let mut rx = status.subscribe();
            while rx.borrow_and_update().status != Status::Idle {
                rx.changed().await.context("Status line closed")?;
            }
            writeln!(stdout, "{}", Status::Idle.text())?;
        }
    }
    Ok(())
}
