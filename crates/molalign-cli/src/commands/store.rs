use crate::cli::{StoreArgs, StoreCommands};
use crate::error::Result;
use crate::store::StoreManager;
use std::path::PathBuf;
use tracing::info;

pub async fn run(args: StoreArgs) -> Result<()> {
    match args.command {
        StoreCommands::Path => {
            handle_path()?;
        }
        StoreCommands::SetPath { path } => {
            handle_set_path(path)?;
        }
        StoreCommands::ResetPath => {
            handle_reset_path()?;
        }
    }
    Ok(())
}

fn handle_path() -> Result<()> {
    let manager = StoreManager::new(None, None)?;
    println!("{}", manager.store_path().display());
    Ok(())
}

fn handle_set_path(path: PathBuf) -> Result<()> {
    let stored = StoreManager::set_custom_path(&path)?;
    info!("Custom store path set to {:?}", stored);
    if !stored.is_dir() {
        println!(
            "Note: {} does not exist yet; create it before running store-backed commands.",
            stored.display()
        );
    }
    println!("✓ Store path set to: {}", stored.display());
    Ok(())
}

fn handle_reset_path() -> Result<()> {
    StoreManager::reset_path()?;
    let manager = StoreManager::new(None, None)?;
    info!("Store path reset to default {:?}", manager.store_path());
    println!("✓ Store path reset to: {}", manager.store_path().display());
    Ok(())
}
