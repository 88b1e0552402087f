use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "invtrack")]
#[command(about = "Track categories, items and lists of items", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store file (created if missing)
    #[arg(long, global = true, env = "INVTRACK_DATA", value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage categories
    #[command(alias = "c")]
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Manage items
    #[command(alias = "i")]
    Item {
        #[command(subcommand)]
        action: ItemAction,
    },

    /// Manage lists
    #[command(alias = "l")]
    List {
        #[command(subcommand)]
        action: ListAction,
    },
}

/// Filter and pagination flags shared by every `ls`.
#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Maximum number of results (1-1000, default 100)
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Number of matching results to skip
    #[arg(long, allow_negative_numbers = true)]
    pub skip: Option<i64>,

    /// Case-insensitive name pattern (regular expression)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum CategoryAction {
    /// List categories
    #[command(alias = "list")]
    Ls(ListArgs),

    /// Show one category
    Get {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Create a category
    #[command(alias = "new")]
    Add {
        #[arg(long)]
        name: String,
    },

    /// Rename a category
    Update {
        #[arg(allow_negative_numbers = true)]
        id: i64,

        #[arg(long)]
        name: Option<String>,
    },

    /// Delete a category
    #[command(alias = "delete")]
    Rm {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ItemAction {
    /// List items
    #[command(alias = "list")]
    Ls(ListArgs),

    /// Show one item
    Get {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Create an item
    #[command(alias = "new")]
    Add {
        #[arg(long)]
        name: String,

        /// Category id to tag the item with (repeatable)
        #[arg(long = "category", value_name = "ID", allow_negative_numbers = true)]
        categories: Vec<i64>,
    },

    /// Change an item's name or categories
    Update {
        #[arg(allow_negative_numbers = true)]
        id: i64,

        #[arg(long)]
        name: Option<String>,

        /// Replace the categories with these ids (repeatable)
        #[arg(long = "category", value_name = "ID", allow_negative_numbers = true)]
        categories: Vec<i64>,

        /// Remove all categories
        #[arg(long, conflicts_with = "categories")]
        clear_categories: bool,
    },

    /// Delete an item
    #[command(alias = "delete")]
    Rm {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum ListAction {
    /// List lists
    #[command(alias = "list")]
    Ls(ListArgs),

    /// Show one list
    Get {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Create a list
    #[command(alias = "new")]
    Add {
        #[arg(long)]
        name: String,

        /// Item and quantity, e.g. 3:2 (repeatable)
        #[arg(long = "item", value_name = "ID:COUNT", value_parser = parse_ref)]
        items: Vec<(i64, i64)>,

        /// Nested list and quantity, e.g. 0:1 (repeatable)
        #[arg(long = "list", value_name = "ID:COUNT", value_parser = parse_ref)]
        lists: Vec<(i64, i64)>,
    },

    /// Change a list's name or contents
    Update {
        #[arg(allow_negative_numbers = true)]
        id: i64,

        #[arg(long)]
        name: Option<String>,

        /// Replace the item refs with these (repeatable)
        #[arg(long = "item", value_name = "ID:COUNT", value_parser = parse_ref)]
        items: Vec<(i64, i64)>,

        /// Remove all item refs
        #[arg(long, conflicts_with = "items")]
        clear_items: bool,

        /// Replace the list refs with these (repeatable)
        #[arg(long = "list", value_name = "ID:COUNT", value_parser = parse_ref)]
        lists: Vec<(i64, i64)>,

        /// Remove all list refs
        #[arg(long, conflicts_with = "lists")]
        clear_lists: bool,
    },

    /// Delete a list
    #[command(alias = "delete")]
    Rm {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
}

/// Parse `ID:COUNT`. Range checks are left to the store.
fn parse_ref(s: &str) -> Result<(i64, i64), String> {
    let (id, count) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ID:COUNT, got {:?}", s))?;
    let id = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid id in {:?}", s))?;
    let count = count
        .trim()
        .parse()
        .map_err(|_| format!("invalid count in {:?}", s))?;
    Ok((id, count))
}
