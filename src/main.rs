use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use sitestyles::autosave::SaveState;
use sitestyles::config::{load_editor_config, EditorConfig};
use sitestyles::fonts::{FontCatalog, FontCategory, FontEntry};
use sitestyles::preview::DocumentStyleScope;
use sitestyles::style::{compute_variables, StyleResolver};
use sitestyles::theme::{ButtonVariant, GlobalButtonStyle, ThemeRecord, TokenKey, TokenStore};

#[derive(Parser)]
#[command(author, version, about = "Site Styles theme resolver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the `:root` CSS variable block for a theme record
    Css {
        /// Theme record JSON (defaults when omitted)
        record: Option<PathBuf>,
    },
    /// Print the render descriptor for one button variant as JSON
    Resolve {
        /// primary, secondary, tertiary or text-link
        variant: String,
        /// Theme record JSON (defaults when omitted)
        record: Option<PathBuf>,
        /// Override the record's global button style
        #[arg(short, long)]
        style: Option<String>,
    },
    /// Set one token on a stored project theme and save it
    Set {
        project: String,
        /// Record column, e.g. primary_color or outline_text_color
        key: String,
        value: String,
        /// Theme directory (defaults to `storage_dir` from config.json)
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Browse the font catalog
    Fonts {
        #[command(subcommand)]
        command: FontsCommand,
    },
}

#[derive(Subcommand)]
enum FontsCommand {
    /// Case-insensitive substring search
    Search { query: String },
    /// Fonts in one category (sans-serif, serif, display, handwriting, monospace)
    Category { name: String },
    /// Popular fonts only
    Popular,
}

#[tokio::main]
async fn main() -> Result<()> {
    sitestyles::logging::init();
    let cli = Cli::parse();
    let mut config = load_editor_config();
    let catalog = Arc::new(sitestyles::load_font_catalog(&config)?);

    match cli.command {
        Command::Css { record } => {
            let store = load_store(record.as_deref())?;
            print!("{}", compute_variables(&store, &catalog).to_css_block());
        }
        Command::Resolve {
            variant,
            record,
            style,
        } => {
            let variant: ButtonVariant = variant.parse()?;
            let store = load_store(record.as_deref())?;
            let resolver = StyleResolver::new(Arc::clone(&catalog));
            let descriptor = match style {
                Some(style) => {
                    let style: GlobalButtonStyle = style.parse()?;
                    resolver.resolve_with_style(variant, &store, style)
                }
                None => resolver.resolve(variant, &store),
            };
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
        Command::Set {
            project,
            key,
            value,
            store,
        } => {
            if store.is_some() {
                config.storage_dir = store;
            }
            let state = set_token(&config, catalog, &project, &key, &value).await?;
            println!("{project}: {key} = {value} ({state:?})");
        }
        Command::Fonts { command } => {
            let entries = match &command {
                FontsCommand::Search { query } => {
                    catalog.search_limited(query, config.font_search_limit)
                }
                FontsCommand::Category { name } => {
                    let category = FontCategory::parse(name)
                        .ok_or_else(|| anyhow!("unknown font category: {name}"))?;
                    catalog.by_category(category)
                }
                FontsCommand::Popular => catalog.popular_only(),
            };
            print_fonts(&catalog, &entries);
        }
    }

    Ok(())
}

async fn set_token(
    config: &EditorConfig,
    catalog: Arc<FontCatalog>,
    project: &str,
    key: &str,
    value: &str,
) -> Result<SaveState> {
    if config.storage_dir.is_none() {
        bail!("no theme directory: pass --store or set storage_dir in config.json");
    }
    let token =
        TokenKey::from_record_key(key).ok_or_else(|| anyhow!("unknown token column: {key}"))?;
    let mut session = sitestyles::editor_session(config, catalog, DocumentStyleScope::new(), None);
    session.open_project(project).await?;
    session.edit(token, value)?;

    tokio::time::sleep(config.autosave_settings().debounce).await;
    let state = session.tick().await?;
    if state == SaveState::Error {
        bail!("save failed: {}", session.last_save_error().unwrap_or("unknown error"));
    }
    Ok(state)
}

fn load_store(path: Option<&Path>) -> Result<TokenStore> {
    let Some(path) = path else {
        return Ok(TokenStore::default_for("cli"));
    };
    let serialized =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let record = ThemeRecord::from_json(&serialized)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(TokenStore::from_record(&record))
}

fn print_fonts(catalog: &FontCatalog, entries: &[&FontEntry]) {
    if entries.is_empty() {
        println!("no matching fonts");
        return;
    }
    for entry in entries {
        let weights = entry
            .weights
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "{:<24} {:<12} {:<28} {}",
            entry.name,
            entry.category.as_str(),
            weights,
            catalog.family_declaration(&entry.name, entry.category.generic_family())
        );
    }
}
