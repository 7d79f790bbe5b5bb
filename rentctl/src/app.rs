use anyhow::{Context, Result};
use rental_api::{Client, NewUser, ProfileUpdate, SessionStatus, Settings};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::io::{BufRead, Write};

use crate::cli::Command;
use crate::output::{describe_user, print_json};

pub struct App {
    client: Client,
}

impl App {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::from_settings(settings)?;
        tracing::debug!(api_url = %client.base_url(), "client ready");
        Ok(Self { client })
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Login { username } => {
                let username = match username {
                    Some(username) => username,
                    None => prompt("Username: ")?,
                };
                let password = prompt("Password: ")?;
                let profile = self
                    .client
                    .login(&username, &SecretString::from(password))
                    .await?;
                println!("Logged in as {}", describe_user(&profile));
                if profile.must_change_password {
                    println!("Your password must be changed before continuing.");
                }
            }

            Command::Logout => {
                self.client.logout()?;
                println!("Logged out");
            }

            Command::Whoami => match self.client.restore().await {
                SessionStatus::SignedIn(Some(profile)) => println!("{}", describe_user(&profile)),
                SessionStatus::SignedIn(None) => println!("Signed in (profile unavailable)"),
                SessionStatus::SignedOut => println!("Not logged in"),
            },

            Command::Register {
                username,
                email,
                role,
                first_name,
                last_name,
                phone,
            } => {
                let password = prompt("Password: ")?;
                let confirmation = prompt("Repeat password: ")?;
                let user = NewUser {
                    username,
                    email,
                    password: SecretString::from(password),
                    password_confirmation: SecretString::from(confirmation),
                    first_name,
                    last_name,
                    role,
                    phone,
                };
                let profile = self.client.register(&user).await?;
                println!("Registered {}", describe_user(&profile));
            }

            Command::Profile {
                email,
                first_name,
                last_name,
                phone,
            } => {
                let update = ProfileUpdate {
                    email,
                    first_name,
                    last_name,
                    phone,
                };
                let profile = self.client.update_profile(update).await?;
                println!("Updated {}", describe_user(&profile));
            }

            Command::Stats => print_json(&self.client.dashboard_stats().await?)?,

            Command::List {
                resource,
                search,
                ordering,
                page,
                params,
            } => {
                let query = Command::list_query(search, ordering, page, params);
                let listing = self.client.list_page::<Value>(resource, query).await?;
                let more = listing.has_more();
                let count = listing.count;
                print_json(&Value::Array(listing.into_items()))?;
                if more {
                    let next = page.unwrap_or(1) + 1;
                    match count {
                        Some(count) => {
                            eprintln!("{} records in total; use --page {} for more", count, next)
                        }
                        None => eprintln!("More records available; use --page {}", next),
                    }
                }
            }

            Command::Get { resource, id } => {
                let record: Value = self.client.get(resource, id).await?;
                print_json(&record)?;
            }

            Command::Create { resource, body } => {
                let record: Value = self.client.create(resource, body).await?;
                print_json(&record)?;
            }

            Command::Update { resource, id, body } => {
                let record: Value = self.client.update(resource, id, body).await?;
                print_json(&record)?;
            }

            Command::Patch { resource, id, body } => {
                let record: Value = self.client.patch(resource, id, body).await?;
                print_json(&record)?;
            }

            Command::Delete { resource, id } => {
                self.client.delete(resource.clone(), id.clone()).await?;
                println!("Deleted {}/{}", resource, id);
            }

            Command::Action {
                resource,
                id,
                name,
                body,
            } => {
                let body = body.unwrap_or_else(|| json!({}));
                let result: Value = self.client.action(resource, id, &name, body).await?;
                print_json(&result)?;
            }
        }

        Ok(())
    }
}

/// Ask for a value on stderr and read one line from stdin
fn prompt(label: &str) -> Result<String> {
    let mut stderr = std::io::stderr();
    stderr.write_all(label.as_bytes())?;
    stderr.flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    let value = line.trim_end_matches(['\r', '\n']).to_string();
    if value.is_empty() {
        anyhow::bail!("{} cannot be empty", label.trim_end_matches(": "));
    }
    Ok(value)
}
