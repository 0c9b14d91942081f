//! Command-line surface: argument parsing, prompts and dispatch onto the
//! `nw_` user actions.

use crate::settings::{resolve_settings_path, FileCredentialStore};
use clap::{ArgAction, Parser, Subcommand};
use nekoweb_api::commands::{
    nw_download_html, nw_list_html, nw_set_token, nw_show_site_title, nw_upload_file,
};
use nekoweb_api::{LogDiagnostics, NekowebService, Notification};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Debug, Parser)]
#[command(name = "nekoweb")]
#[command(version, about = "Manage a Nekoweb site from the command line")]
pub struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true, env = "NEKOWEB_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API token and derive the site username
    SetToken {
        /// Token to store; prompted for when omitted
        token: Option<String>,
    },
    /// Show the site title
    Site,
    /// List .html files in the site root
    List,
    /// Download an .html file from the site
    Download {
        /// File to download; picked from a list when omitted
        name: Option<String>,
        /// Directory to write into
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Upload a local file
    Upload {
        #[arg(help = "Path to file to upload")]
        file: PathBuf,
        /// Remote directory
        #[arg(long, default_value = "/")]
        remote_dir: String,
    },
}

/// Run one command to completion.
pub async fn execute(cli: Cli) -> Notification {
    let path = match resolve_settings_path(cli.settings) {
        Ok(p) => p,
        Err(e) => return e.into(),
    };
    tracing::debug!(settings = %path.display(), "using settings file");

    let store = FileCredentialStore::new(path);
    let config = match store.load_settings() {
        Ok(s) => s.config(),
        Err(e) => return e.into(),
    };
    let svc = NekowebService::new(config, Arc::new(store), Arc::new(LogDiagnostics));

    match cli.command {
        Command::SetToken { token } => {
            let token = match token {
                Some(t) => Some(t),
                None => prompt("Enter your authorization token: ").await,
            };
            nw_set_token(&svc, token.as_deref()).await
        }
        Command::Site => nw_show_site_title(&svc).await,
        Command::List => match nw_list_html(&svc).await {
            Ok(names) if names.is_empty() => Notification::info("No .html files found"),
            Ok(names) => Notification::info(names.join("\n")),
            Err(n) => n,
        },
        Command::Download { name, out } => {
            let name = match name {
                Some(n) => Some(n),
                None => match nw_list_html(&svc).await {
                    Ok(names) => choose(&names).await,
                    Err(n) => return n,
                },
            };
            nw_download_html(&svc, name.as_deref(), &out).await
        }
        Command::Upload { file, remote_dir } => {
            nw_upload_file(&svc, Some(file.as_path()), &remote_dir).await
        }
    }
}

/// Resolve a picker answer: a 1-based index or an exact name.
pub fn pick(names: &[String], answer: &str) -> Option<String> {
    let answer = answer.trim();
    if answer.is_empty() {
        return None;
    }
    if let Ok(idx) = answer.parse::<usize>() {
        return idx.checked_sub(1).and_then(|i| names.get(i)).cloned();
    }
    names.iter().find(|n| n.as_str() == answer).cloned()
}

async fn choose(names: &[String]) -> Option<String> {
    if names.is_empty() {
        return None;
    }
    let mut menu = String::new();
    for (i, name) in names.iter().enumerate() {
        menu.push_str(&format!("{:>3}) {}\n", i + 1, name));
    }
    let _ = tokio::io::stderr().write_all(menu.as_bytes()).await;
    let answer = prompt("Select an HTML file: ").await?;
    pick(names, &answer)
}

/// One line from stdin; `None` on EOF or an empty answer.
async fn prompt(question: &str) -> Option<String> {
    let mut err = tokio::io::stderr();
    let _ = err.write_all(question.as_bytes()).await;
    let _ = err.flush().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    match lines.next_line().await {
        Ok(Some(line)) if !line.trim().is_empty() => Some(line.trim().to_string()),
        _ => None,
    }
}
