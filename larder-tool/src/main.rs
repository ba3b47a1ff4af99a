mod config;
mod error;
mod render;
mod store;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use larder_core::{
    Category, DEFAULT_UNIT, Detector, FoodItem, FoodItemPatch, RecipeSource, category_for,
    icon_for, ingredient_summary, view::SUMMARY_LIMIT,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{load_config, log_filter, resolve_store_config};
use crate::error::LarderError;
use crate::store::{AppContext, StoreType};

#[derive(Parser)]
#[command(name = "larder")]
#[command(about = "Household food inventory with expiry warnings and recipe ideas", long_about = None)]
struct Cli {
    /// Store type: fjall, rocks, memory or unavailable
    #[arg(long, global = true)]
    store_type: Option<StoreType>,

    /// Path to the inventory store
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the inventory grouped by category
    List,

    /// Add a food item
    Add {
        name: String,

        #[arg(short, long, default_value_t = 1.0, value_parser = parse_quantity)]
        quantity: f64,

        #[arg(short, long, default_value = DEFAULT_UNIT)]
        unit: String,

        /// Expiry date (YYYY-MM-DD)
        #[arg(short, long)]
        expiry: Option<NaiveDate>,

        /// Category label or slug; inferred from the name when omitted
        #[arg(short, long)]
        category: Option<Category>,
    },

    /// Change fields of an existing item
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long, value_parser = parse_quantity)]
        quantity: Option<f64>,

        #[arg(short, long)]
        unit: Option<String>,

        /// Expiry date (YYYY-MM-DD)
        #[arg(short, long, conflicts_with = "clear_expiry")]
        expiry: Option<NaiveDate>,

        /// Stop tracking the expiry date
        #[arg(long)]
        clear_expiry: bool,

        #[arg(short, long)]
        category: Option<Category>,
    },

    /// Delete an item
    Remove {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the newest history entries
    History {
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Detect food in a fridge photo
    Detect {
        /// Photo to analyse
        #[arg(long)]
        image: Option<PathBuf>,

        /// Add the detected items to the inventory
        #[arg(long)]
        save: bool,
    },

    /// Suggest recipes for what is on hand
    Recipes,

    /// Record that a suggested recipe was cooked
    Cook {
        /// Recipe id as shown by `recipes`
        recipe_id: String,
    },
}

fn parse_quantity(s: &str) -> Result<f64, String> {
    let quantity: f64 = s.parse().map_err(|_| format!("not a number: {}", s))?;
    if !quantity.is_finite() || quantity < 0.0 {
        return Err(format!("quantity must be a finite number >= 0, got {}", s));
    }
    Ok(quantity)
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config()?;
    init_tracing(log_filter(&config));

    let (store_type, store_path) = resolve_store_config(&config, cli.store_type, cli.store);
    info!(%store_type, path = %store_path.display(), "opening store");
    let ctx = AppContext::open(store_type, store_path)?;

    run(&ctx, cli.command)?;
    Ok(())
}

fn run(ctx: &AppContext, command: Command) -> Result<(), LarderError> {
    let records = &ctx.records;

    match command {
        Command::List => {
            let items = records.list_food_items()?;
            println!("{}", render::inventory(&items, Utc::now()));
        }
        Command::Add {
            name,
            quantity,
            unit,
            expiry,
            category,
        } => {
            let category = category.unwrap_or_else(|| category_for(&name));
            let mut item = FoodItem::new(name, quantity, unit, category, Utc::now());
            item.expiry_date = expiry;
            let added = format!("Added {} {} [{}]", icon_for(&item.name), item.name, item.id);
            records.add_food_item(item)?;
            println!("{}", added);
        }
        Command::Edit {
            id,
            name,
            quantity,
            unit,
            expiry,
            clear_expiry,
            category,
        } => {
            let patch = FoodItemPatch {
                name,
                quantity,
                unit,
                expiry_date: if clear_expiry { Some(None) } else { expiry.map(Some) },
                category,
            };
            if patch.is_empty() {
                return Err(LarderError::EmptyEdit);
            }
            if records.get_food_item(&id)?.is_none() {
                return Err(LarderError::ItemNotFound(id));
            }
            records.update_food_item(&id, patch)?;
            println!("Updated [{}]", id);
        }
        Command::Remove { id, yes } => {
            let Some(item) = records.get_food_item(&id)? else {
                return Err(LarderError::ItemNotFound(id));
            };
            if !yes && !confirm(&format!("Delete {} {}?", icon_for(&item.name), item.name))? {
                println!("Cancelled");
                return Ok(());
            }
            records.delete_food_item(&id)?;
            println!("Deleted [{}]", id);
        }
        Command::History { limit } => {
            let mut entries = records.list_history()?;
            if let Some(limit) = limit {
                entries.truncate(limit);
            }
            println!("{}", render::history(&entries));
        }
        Command::Detect { image, save } => {
            let bytes = match image {
                Some(path) => std::fs::read(path)?,
                None => Vec::new(),
            };
            let names = ctx.detector.detect(&bytes);
            println!("Detected {} items:", names.len());
            for name in &names {
                println!("  {} {}", icon_for(name), name);
            }
            if save {
                let added = records.record_detections(names, Utc::now())?;
                println!("Added {} items to the inventory", added.len());
            }
        }
        Command::Recipes => {
            let items = records.list_food_items()?;
            if items.is_empty() {
                println!("The inventory is empty. Add some food first.");
                return Ok(());
            }
            let summary = ingredient_summary(&items, SUMMARY_LIMIT);
            let suggestions = ctx.recipes.suggest(&items);
            println!("{}", render::suggestions(&summary, &suggestions));
        }
        Command::Cook { recipe_id } => {
            let Some(recipe) = ctx.recipes.find(&recipe_id) else {
                return Err(LarderError::RecipeNotFound(recipe_id));
            };
            records.record_cooked(recipe, Utc::now())?;
            println!("Cooked {}. Added to history.", recipe.title);
        }
    }

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool, LarderError> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
