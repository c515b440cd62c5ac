//! Interactive market-analysis terminal
//!
//! Reads one command line at a time and drives the dispatch engine until
//! `quit` or end of input. Runs fully offline against the sample data
//! provider, so no API keys are needed.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin market-terminal
//! ```

use clap::Parser;
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use terminal_engine::{Dispatcher, TerminalConfig};
use terminal_market::{SampleDataProvider, build_menu_tree};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "market-terminal")]
#[command(about = "Interactive menu-driven market analysis terminal", long_about = None)]
struct Args {
    /// Skip the startup banner
    #[arg(long)]
    no_banner: bool,
}

fn print_banner() {
    println!(
        r"
+--------------------------------------------------------------+
|                   Market Analysis Terminal                   |
|                                                              |
|  load -t <ticker>   load a ticker into the session           |
|  view               show OHLC data for the loaded ticker     |
|  ta / fa / ca       enter an analysis submenu                |
|  help               list commands, <command> -h for flags    |
|  up / home / quit   navigate and exit                        |
+--------------------------------------------------------------+
"
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "warn,terminal_engine=info".to_string()),
        )
        .init();

    let args = Args::parse();

    let provider = Arc::new(SampleDataProvider::new());
    let tree = build_menu_tree(provider)?;
    let config = TerminalConfig::default();
    let welcome = config.welcome_message.clone();
    let mut dispatcher = Dispatcher::new(tree, config);

    if !args.no_banner {
        print_banner();
    }
    println!("{welcome}\n");
    println!("{}\n", dispatcher.render_menu());
    info!("session started");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        write!(stdout, "{}", dispatcher.prompt())?;
        stdout.flush()?;

        line.clear();
        // EOF on the input stream ends the session like 'quit'
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let reply = dispatcher.dispatch_line(&line).await;
        if let Some(text) = reply.text {
            println!("{text}\n");
        }
        if reply.quit {
            break;
        }
    }

    info!("session ended");
    Ok(())
}
