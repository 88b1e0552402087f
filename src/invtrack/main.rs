use clap::Parser;
use colored::*;
use invtrack::api::{InventoryApi, Outcome, Resource};
use invtrack::config::{project_dirs, InvConfig};
use invtrack::error::Result;
use invtrack::logging;
use invtrack::model::{CategoryInput, ItemInput, ItemRefInput, ListInput, ListRefInput};
use invtrack::query::ListQuery;
use invtrack::store::{FsBackend, Store};
use serde_json::Value;

mod args;
use args::{CategoryAction, Cli, Commands, ItemAction, ListAction, ListArgs};

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// What to ask the API for, once the CLI action is decoded.
enum Request {
    List(ListQuery),
    Get(i64),
    Post(Value),
    Patch(i64, Value),
    Delete(i64),
}

fn run() -> Result<bool> {
    let cli = Cli::parse();

    let dirs = project_dirs();
    let config = match &dirs {
        Some(dirs) => InvConfig::load(dirs.config_dir()),
        None => Ok(InvConfig::default()),
    };
    let config_level = config.as_ref().ok().and_then(|c| c.log_level.clone());
    logging::init(cli.verbose, config_level.as_deref());
    let config = config.unwrap_or_else(|e| {
        log::warn!("event=config_load status=error error={}", e);
        InvConfig::default()
    });

    let path = config.resolve_data_file(cli.data.clone(), dirs.as_ref().map(|d| d.data_dir()))?;
    let (resource, request) = decode(cli.command)?;

    let mut api = InventoryApi::new(Store::open_path(&path)?);
    let outcome = dispatch(&mut api, resource, request)?;
    Ok(report(resource, &outcome))
}

fn dispatch(
    api: &mut InventoryApi<FsBackend>,
    resource: Resource,
    request: Request,
) -> Result<Outcome> {
    match request {
        Request::List(query) => api.list(resource, &query),
        Request::Get(id) => api.get(resource, id),
        Request::Post(body) => api.post(resource, body),
        Request::Patch(id, body) => api.patch(resource, id, body),
        Request::Delete(id) => api.delete(resource, id),
    }
}

fn decode(command: Commands) -> Result<(Resource, Request)> {
    Ok(match command {
        Commands::Category { action } => (Resource::Category, category_request(action)?),
        Commands::Item { action } => (Resource::Item, item_request(action)?),
        Commands::List { action } => (Resource::List, list_request(action)?),
    })
}

fn category_request(action: CategoryAction) -> Result<Request> {
    Ok(match action {
        CategoryAction::Ls(args) => Request::List(list_query(args)),
        CategoryAction::Get { id } => Request::Get(id),
        CategoryAction::Add { name } => Request::Post(body(&CategoryInput::named(name))?),
        CategoryAction::Update { id, name } => {
            Request::Patch(id, body(&CategoryInput { name })?)
        }
        CategoryAction::Rm { id } => Request::Delete(id),
    })
}

fn item_request(action: ItemAction) -> Result<Request> {
    Ok(match action {
        ItemAction::Ls(args) => Request::List(list_query(args)),
        ItemAction::Get { id } => Request::Get(id),
        ItemAction::Add { name, categories } => {
            let input = ItemInput::named(name).with_categories(categories);
            Request::Post(body(&input)?)
        }
        ItemAction::Update {
            id,
            name,
            categories,
            clear_categories,
        } => {
            let input = ItemInput {
                name,
                category_ids: replacement(categories, clear_categories),
            };
            Request::Patch(id, body(&input)?)
        }
        ItemAction::Rm { id } => Request::Delete(id),
    })
}

fn list_request(action: ListAction) -> Result<Request> {
    Ok(match action {
        ListAction::Ls(args) => Request::List(list_query(args)),
        ListAction::Get { id } => Request::Get(id),
        ListAction::Add { name, items, lists } => {
            let input = ListInput::named(name)
                .with_item_refs(item_refs(items))
                .with_list_refs(list_refs(lists));
            Request::Post(body(&input)?)
        }
        ListAction::Update {
            id,
            name,
            items,
            clear_items,
            lists,
            clear_lists,
        } => {
            let input = ListInput {
                name,
                item_refs: replacement(item_refs(items), clear_items),
                list_refs: replacement(list_refs(lists), clear_lists),
            };
            Request::Patch(id, body(&input)?)
        }
        ListAction::Rm { id } => Request::Delete(id),
    })
}

fn list_query(args: ListArgs) -> ListQuery {
    ListQuery {
        limit: args.limit,
        skip: args.skip,
        name: args.name,
    }
}

fn body<T: serde::Serialize>(input: &T) -> Result<Value> {
    Ok(serde_json::to_value(input)?)
}

/// A repeatable flag given at least once replaces the stored sequence;
/// `clear` replaces it with nothing; otherwise the field is left alone.
fn replacement<T>(values: Vec<T>, clear: bool) -> Option<Vec<T>> {
    if clear || !values.is_empty() {
        Some(values)
    } else {
        None
    }
}

fn item_refs(pairs: Vec<(i64, i64)>) -> Vec<ItemRefInput> {
    pairs
        .into_iter()
        .map(|(item_id, count)| ItemRefInput { item_id, count })
        .collect()
}

fn list_refs(pairs: Vec<(i64, i64)>) -> Vec<ListRefInput> {
    pairs
        .into_iter()
        .map(|(list_id, count)| ListRefInput { list_id, count })
        .collect()
}

/// Print the outcome. Returns false when the command should exit non-zero.
fn report(resource: Resource, outcome: &Outcome) -> bool {
    if let Some(body) = outcome.body() {
        match serde_json::to_string_pretty(body) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                return false;
            }
        }
    }
    match outcome {
        Outcome::NotModified(_) => {
            eprintln!("{}", "Nothing to update: not modified".yellow());
        }
        Outcome::Deleted => {
            eprintln!("{} {}", "Deleted".green(), resource);
        }
        Outcome::NotFound => {
            eprintln!("{} {} not found", "Error:".red().bold(), resource);
        }
        _ => {}
    }
    outcome.is_success()
}
