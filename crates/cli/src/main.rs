//! CLI tool for printing tracker items as slide decks.

mod config_store;
mod item_file;
mod prompt;
mod reveal;
mod select;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use demoslides_core::{
    document_info, Category, CategoryResolver, Color, ConfigStore, Configuration, Deck, EmitSummary,
    Error, GridLayout, ItemSource, PageEmitter, RecordingSurface, A4,
};
use demoslides_pdf::{PdfSurface, StandardMetrics};
use std::env;
use std::path::{Path, PathBuf};

use crate::config_store::{YamlConfigStore, DEFAULT_CONFIG_FILE};
use crate::item_file::FileItemSource;
use crate::prompt::TerminalPrompter;
use crate::reveal::reveal;
use crate::select::select_items;

/// Whether to append a slide with the collection goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GoalMode {
    Ask,
    Always,
    Never,
}

/// Print the items of a tracker collection as a PDF of slides.
#[derive(Parser, Debug)]
#[command(name = "demoslides")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Item export of the collection (.yml, .yaml or .json)
    items: PathBuf,

    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Only print the items with these keys
    #[arg(long = "only", value_name = "KEY")]
    only: Vec<String>,

    /// Leave out the item with this key (repeatable)
    #[arg(short = 'x', long = "exclude", value_name = "KEY")]
    exclude: Vec<String>,

    /// Append a slide with the collection goal
    #[arg(short, long, value_enum, default_value_t = GoalMode::Ask)]
    goal: GoalMode,

    /// Write a default configuration for the export and exit
    #[arg(long)]
    init: bool,

    /// Print the page and cell of every slide instead of writing a PDF
    #[arg(long)]
    dry_run: bool,

    /// Do not open the PDF when done
    #[arg(long)]
    no_open: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let mut source = FileItemSource::load(&args.items)
        .with_context(|| format!("Failed to load items from {}", args.items.display()))?;
    let mut store = YamlConfigStore::new(&args.config);

    if args.init {
        initialize(&mut store, &source)?;
        return Ok(());
    }

    let mut config = match load_configuration(&mut store) {
        Ok(config) => config,
        Err(Error::ConfigurationMissing) => initialize(&mut store, &source)?,
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to load {}", store.path().display()))
        }
    };
    config
        .validate()
        .with_context(|| format!("Check {}", store.path().display()))?;

    let collection = source.collection();
    let items = source.fetch_slides(&collection.name, &config.excluded_kinds, config.item_limit)?;
    if args.verbose {
        eprintln!("Loaded {} items of {}", items.len(), collection.name);
    }
    let items = select_items(items, &args.only, &args.exclude)?;

    let mut prompter = TerminalPrompter::stdio();
    let deck = {
        let mut resolver = CategoryResolver::new(&mut source, &mut prompter, &mut store);
        let mut deck = Deck::prepare(items, &mut resolver, &mut config)?;

        if args.goal != GoalMode::Never {
            if let Some(goal) = resolver.goal_text(collection.id) {
                let wanted = args.goal == GoalMode::Always
                    || resolver.confirm("Add slide for current sprint goal?");
                if wanted {
                    deck.append_goal(&goal, &mut resolver, &mut config)?;
                }
            }
        }

        deck
    };

    let metrics = StandardMetrics;
    let mut emitter = PageEmitter::new(&config, &metrics, A4);
    let mut info = document_info(&collection);
    info.author = env::var("USER").or_else(|_| env::var("USERNAME")).ok();

    if args.dry_run {
        let mut surface = RecordingSurface::new();
        let summary = emitter.emit(&info, &deck, &mut surface)?;
        print_assignment(emitter.layout(), &deck);
        report(&summary, None);
        return Ok(());
    }

    let output_path = args.output.join(collection.document_file_name());
    let mut surface = PdfSurface::create(&output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    let summary = emitter.emit(&info, &deck, &mut surface)?;
    report(&summary, Some(&output_path));

    if !args.no_open {
        match reveal(&output_path) {
            Err(e) if e.is_recoverable() => log::warn!("{}", e),
            result => result?,
        }
    }

    Ok(())
}

/// Load the stored configuration. A missing file is [`Error::ConfigurationMissing`].
fn load_configuration(store: &mut YamlConfigStore) -> demoslides_core::Result<Configuration> {
    store.load_config()?.ok_or(Error::ConfigurationMissing)
}

/// Write the default configuration with a black category for every grouping in the export.
fn initialize(store: &mut YamlConfigStore, source: &FileItemSource) -> Result<Configuration> {
    let categories = source
        .referenced_grouping_names()
        .into_iter()
        .map(|name| (name.clone(), Category::new(vec![name], Color::BLACK)))
        .collect();
    let config = Configuration::with_categories(categories);

    store
        .create(&config)
        .with_context(|| format!("Failed to create {}", store.path().display()))?;
    eprintln!(
        "Created {} with {} categories. Adjust colors there and run again.",
        store.path().display(),
        config.categories.len()
    );

    Ok(config)
}

/// Print the page and cell every slide lands in.
fn print_assignment(layout: &GridLayout, deck: &Deck) {
    println!(
        "{} per page, {} columns x {} rows, {:?}",
        layout.slides_per_page, layout.columns, layout.rows, layout.orientation
    );

    for placement in layout.placements(deck.len()) {
        let slide = &deck.slides[placement.index];
        println!(
            "page {} column {} row {}: {} {} [{}]",
            placement.page + 1,
            placement.column + 1,
            placement.row + 1,
            slide.item.key,
            slide.item.summary,
            slide.category_label()
        );
    }
}

fn report(summary: &EmitSummary, output_path: Option<&Path>) {
    if let Some(path) = output_path {
        println!("Written to: {}", path.display());
    }
    println!("{} slides on {} pages", summary.slides, summary.pages);
    if summary.overflowed > 0 {
        eprintln!(
            "{} text blocks did not fit at the minimum font size",
            summary.overflowed
        );
    }
}
