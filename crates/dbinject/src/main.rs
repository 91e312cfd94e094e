//! dbinject - Entry Point
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dbinject check` | Compose the database module from configuration and connect once |
//! | `dbinject show-config` | Print the resolved options, password redacted |

use clap::Parser;
use dbinject::cli::{Cli, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    run(cli).await
}
