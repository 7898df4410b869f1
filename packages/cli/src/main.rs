mod api;
mod watch;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::Password;

use crate::api::ApiClient;

#[derive(Parser)]
#[command(name = "punchlist", about = "Notification watcher for the Punchlist defect tracker")]
struct Cli {
    /// Base URL of the Punchlist server.
    #[arg(long, global = true, env = "PUNCHLIST_SERVER", default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Bearer token obtained from `punchlist login`.
    #[arg(long, global = true, env = "PUNCHLIST_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and print a token for PUNCHLIST_TOKEN.
    Login {
        username: String,
        /// Password; prompted for when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Poll for due reminders and display them until interrupted.
    Watch {
        /// Polling interval in seconds.
        #[arg(long, default_value_t = 5)]
        interval: u64,
        /// Immediately acknowledge everything displayed.
        #[arg(long)]
        ack_all: bool,
    },
    /// List the currently due reminders once.
    Pending,
    /// Acknowledge (dismiss) a single reminder.
    Ack { id: i32 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.server, cli.token);

    match cli.command {
        Command::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => Password::new().with_prompt("Password").interact()?,
            };
            let login = client.login(&username, &password)?;
            println!(
                "Logged in as {} ({})",
                style(&login.username).bold(),
                login.role
            );
            println!();
            println!("export PUNCHLIST_TOKEN={}", login.token);
        }
        Command::Watch { interval, ack_all } => {
            watch::run(&client, Duration::from_secs(interval.max(1)), ack_all)?;
        }
        Command::Pending => {
            let pending = client.pending_notifications()?;
            if pending.is_empty() {
                println!("No defects currently due.");
            }
            for defect in pending {
                println!(
                    "#{}  {}  (floor {}, axis {})",
                    defect.id, defect.name, defect.floor, defect.axis_location
                );
            }
        }
        Command::Ack { id } => {
            if client.acknowledge(id)? {
                println!("Reminder #{id} dismissed.");
            } else {
                // The defect was deleted in the meantime; nothing to dismiss.
                println!("Reminder #{id} is already gone.");
            }
        }
    }

    Ok(())
}
