
use std::fs;
use std::path::{Path, PathBuf};

use canvas::collection::ShapeCollection;
use canvas::error::CanvasError;
use clap::{Parser, Subcommand, ValueEnum};
use langstudio::catalog::{CatalogError, HttpFetch, SemanticsCatalog, sort_by_name};
use langstudio::config::{ConfigError, StudioConfig};
use langstudio::context::LanguageContext;
use langstudio::semantics::{SemanticsError, prepare_semantics};
use syntax::{GraphicalModel, SyntaxError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Semantics(#[from] SemanticsError),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Parser, Debug)]
#[command(name = "langstudio", about = "Language definition and canvas toolkit")]
struct Cli {
    /// Backend base URL; also read from LANGSTUDIO_BACKEND_URL.
    #[arg(long, env = "LANGSTUDIO_BACKEND_URL")]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a graphical model (JSON) to abstract and concrete syntax.
    ToText {
        graph: PathBuf,
        #[arg(long)]
        abstract_out: Option<PathBuf>,
        #[arg(long)]
        concrete_out: Option<PathBuf>,
    },
    /// Compile abstract and concrete syntax back to a graphical model.
    ToGraph {
        abstract_syntax: PathBuf,
        concrete_syntax: Option<PathBuf>,
    },
    /// Print semantics for a graphical model, initializing when needed.
    Semantics {
        graph: PathBuf,
        /// Existing semantics to keep if valid.
        #[arg(long)]
        existing: Option<PathBuf>,
    },
    /// Convert a shape snapshot between JSON and XML.
    Shapes {
        input: PathBuf,
        #[arg(long, value_enum)]
        to: ShapeFormat,
    },
    /// List published semantics from the backend.
    Catalog {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Print the document of this entry id instead of the list.
        #[arg(long)]
        select: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShapeFormat {
    Json,
    Xml,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let mut config = StudioConfig::from_env()?;
    if let Some(url) = cli.backend_url {
        config.backend_url = url.trim_end_matches('/').to_owned();
    }

    match cli.command {
        Command::ToText { graph, abstract_out, concrete_out } => {
            run_to_text(&graph, abstract_out.as_deref(), concrete_out.as_deref())
        }
        Command::ToGraph { abstract_syntax, concrete_syntax } => {
            run_to_graph(&abstract_syntax, concrete_syntax.as_deref())
        }
        Command::Semantics { graph, existing } => run_semantics(&graph, existing.as_deref()),
        Command::Shapes { input, to } => run_shapes(&config, &input, to),
        Command::Catalog { search, pages, select } => run_catalog(&config, search, pages, select.as_deref()),
    }
}

fn run_to_text(graph: &Path, abstract_out: Option<&Path>, concrete_out: Option<&Path>) -> Result<(), CliError> {
    let mut ctx = LanguageContext::from_model(read_model(graph)?);
    ctx.switch_to_textual()?;
    emit(abstract_out, ctx.abstract_syntax())?;
    emit(concrete_out, ctx.concrete_syntax())
}

fn run_to_graph(abstract_path: &Path, concrete_path: Option<&Path>) -> Result<(), CliError> {
    let abstract_text = read(abstract_path)?;
    let concrete_text = match concrete_path {
        Some(path) => read(path)?,
        None => String::new(),
    };
    let model = syntax::textual_to_graphical(&abstract_text, &concrete_text)?;
    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}

fn run_semantics(graph: &Path, existing: Option<&Path>) -> Result<(), CliError> {
    let mut ctx = LanguageContext::from_model(read_model(graph)?);
    if let Some(path) = existing {
        ctx.set_semantics(read(path)?);
    }
    prepare_semantics(&mut ctx)?;
    println!("{}", ctx.semantics());
    Ok(())
}

fn run_shapes(config: &StudioConfig, input: &Path, to: ShapeFormat) -> Result<(), CliError> {
    let text = read(input)?;
    let shapes = if text.trim_start().starts_with('<') {
        ShapeCollection::from_xml(&text)?
    } else {
        ShapeCollection::from_json(&text)?
    };

    let (width, height) = (f64::from(config.canvas_width), f64::from(config.canvas_height));
    let outside = shapes
        .iter()
        .filter(|s| {
            let b = s.bounds();
            b.x < 0.0 || b.y < 0.0 || b.x + b.width > width || b.y + b.height > height
        })
        .count();
    if outside > 0 {
        tracing::warn!(outside, width, height, "shapes extend past the canvas");
    }

    let rendered = match to {
        ShapeFormat::Json => shapes.to_json()?,
        ShapeFormat::Xml => shapes.to_xml(),
    };
    println!("{rendered}");
    Ok(())
}

fn run_catalog(config: &StudioConfig, search: Option<String>, pages: u32, select: Option<&str>) -> Result<(), CliError> {
    let mut catalog = SemanticsCatalog::new(config.page_size);
    if let Some(search) = search {
        catalog.set_search(search);
    }
    let mut fetcher = HttpFetch::new();
    catalog.load_next_page(&mut fetcher, &config.backend_url)?;
    while catalog.page() < pages && catalog.has_more() {
        catalog.load_next_page(&mut fetcher, &config.backend_url)?;
    }

    if let Some(value) = select {
        println!("{}", catalog.select(value)?);
        return Ok(());
    }

    let mut entries = catalog.entries().to_vec();
    entries.sort_by(sort_by_name);
    for entry in &entries {
        println!("{}\t{}: [{}]", entry.id, entry.name, entry.kind);
    }
    tracing::info!(loaded = catalog.options().len(), total = catalog.total(), "catalog listed");
    Ok(())
}

fn read_model(path: &Path) -> Result<GraphicalModel, CliError> {
    Ok(serde_json::from_str(&read(path)?)?)
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })
}

fn emit(path: Option<&Path>, text: &str) -> Result<(), CliError> {
    match path {
        Some(path) => fs::write(path, text).map_err(|source| CliError::Write { path: path.to_owned(), source }),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
