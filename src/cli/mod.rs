use std::sync::mpsc::Receiver;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::display;
use crate::{ControllerEvent, ExpenseList, ViewState};

/// Expense List - browse and delete expenses on the backend
#[derive(Parser)]
#[command(name = "expense-list")]
#[command(about = "List and delete expense records stored on a REST backend")]
#[command(version)]
pub struct Cli {
    /// Backend base URL (defaults to $EXPENSE_API_URL, then http://localhost:5000)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Bearer token (defaults to $EXPENSE_AUTH_TOKEN, then the token file)
    #[arg(long)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show all expenses
    List,

    /// Delete an expense by id and show the remaining ones
    Remove {
        /// Expense id
        id: String,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let mut builder = ExpenseList::builder().timeout(Duration::from_secs(self.timeout));
        if let Some(url) = self.base_url {
            builder = builder.base_url(url);
        }
        if let Some(token) = self.token {
            builder = builder.token(token);
        }

        let mut list = builder.build().context("Failed to configure expense list")?;
        let events = list.subscribe();

        list.load();
        handle_events(&events)?;

        if let Commands::Remove { id } = self.command {
            list.remove(&id);
            handle_events(&events)?;
        }

        print_view(list.state());
        if list.state().error().is_some() {
            bail!("expense list reported an error");
        }
        Ok(())
    }
}

/// Print notifications; a redirect ends the command with an error.
fn handle_events(events: &Receiver<ControllerEvent>) -> Result<()> {
    for event in events.try_iter() {
        match event {
            ControllerEvent::Notify(message) => println!("{}", message),
            ControllerEvent::Redirect(location) => {
                bail!("Not logged in; sign in at {} and retry", location)
            }
        }
    }
    Ok(())
}

fn print_view(state: &ViewState) {
    print!("{}", display::render_view(state));
}
