use clap::{Parser, Subcommand};
use rental_api::{ListQuery, Resource, Role};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "rentctl")]
#[command(about = "Command-line client for the rental management backend")]
#[command(version)]
pub struct Cli {
    #[arg(long, short, global = true, help = "Also print log events to stderr")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Override the API base URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "Sign in and remember the session; the password is read from stdin")]
    Login {
        #[arg(long, short)]
        username: Option<String>,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show the signed-in user")]
    Whoami,

    #[command(about = "Create a new account")]
    Register {
        username: String,
        email: String,
        #[arg(long, default_value_t = Role::Tenant)]
        role: Role,
        #[arg(long, default_value = "")]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long)]
        phone: Option<String>,
    },

    #[command(about = "Update the signed-in user's profile")]
    Profile {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },

    #[command(about = "Dashboard counters for the signed-in role")]
    Stats,

    #[command(about = "List records of a collection")]
    List {
        resource: Resource,
        #[arg(long, short)]
        search: Option<String>,
        #[arg(long, short)]
        ordering: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long = "param", value_parser = parse_param, help = "Exact-match filter, as field=value")]
        params: Vec<(String, String)>,
    },

    #[command(about = "Show one record")]
    Get { resource: Resource, id: String },

    #[command(about = "Create a record from a JSON object")]
    Create {
        resource: Resource,
        #[arg(value_parser = parse_json)]
        body: Value,
    },

    #[command(about = "Replace a record")]
    Update {
        resource: Resource,
        id: String,
        #[arg(value_parser = parse_json)]
        body: Value,
    },

    #[command(about = "Change some fields of a record")]
    Patch {
        resource: Resource,
        id: String,
        #[arg(value_parser = parse_json)]
        body: Value,
    },

    #[command(about = "Delete a record")]
    Delete { resource: Resource, id: String },

    #[command(about = "Run a detail action, e.g. `action notifications 4 respond '{..}'`")]
    Action {
        resource: Resource,
        id: String,
        name: String,
        #[arg(value_parser = parse_json)]
        body: Option<Value>,
    },
}

impl Command {
    /// Build the list filters out of the `list` arguments
    pub fn list_query(
        search: Option<String>,
        ordering: Option<String>,
        page: Option<u32>,
        params: Vec<(String, String)>,
    ) -> ListQuery {
        let mut query = ListQuery::new();
        if let Some(search) = search {
            query = query.search(search);
        }
        if let Some(ordering) = ordering {
            query = query.ordering(ordering);
        }
        if let Some(page) = page {
            query = query.page(page);
        }
        params
            .into_iter()
            .fold(query, |query, (field, value)| query.filter(field, value))
    }
}

pub fn parse_param(s: &str) -> Result<(String, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{}'", s))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{}'", s));
    }
    Ok((field.to_string(), value.to_string()))
}

pub fn parse_json(s: &str) -> Result<Value, String> {
    let value: Value = serde_json::from_str(s).map_err(|e| format!("invalid JSON: {}", e))?;
    if !value.is_object() {
        return Err("expected a JSON object".to_string());
    }
    Ok(value)
}
