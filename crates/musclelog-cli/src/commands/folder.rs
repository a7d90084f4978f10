//! Folder and media commands for CLI.

use std::path::PathBuf;

use clap::Subcommand;
use musclelog_core::{FolderList, MediaKind};

use super::{open_log, report_notices};

#[derive(Subcommand)]
pub enum FolderAction {
    /// List folders and their items
    List {
        /// Print as JSON (images include their full data URL)
        #[arg(long)]
        json: bool,
    },
    /// Create a folder
    Add {
        name: String,
    },
    /// Rename a folder
    Rename {
        folder_id: String,
        name: String,
    },
    /// Add a link; YouTube addresses are stored as videos
    Link {
        folder_id: String,
        url: String,
    },
    /// Embed an image file
    Image {
        folder_id: String,
        path: PathBuf,
    },
    /// Delete an item from a folder
    RemoveItem {
        folder_id: String,
        item_id: String,
    },
}

pub fn run(action: FolderAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut log = open_log()?;

    let events = match action {
        FolderAction::List { json: true } => {
            println!("{}", serde_json::to_string_pretty(log.folders())?);
            return Ok(());
        }
        FolderAction::List { json: false } => {
            print!("{}", render_list(log.folders()));
            return Ok(());
        }
        FolderAction::Add { name } => log.add_folder(&name)?,
        FolderAction::Rename { folder_id, name } => log.rename_folder(&folder_id, &name)?,
        FolderAction::Link { folder_id, url } => log.add_link(&folder_id, &url)?,
        FolderAction::Image { folder_id, path } => log.add_image(&folder_id, &path)?,
        FolderAction::RemoveItem { folder_id, item_id } => log.delete_item(&folder_id, &item_id)?,
    };

    for event in &events {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    report_notices(&mut log);
    Ok(())
}

fn render_list(list: &FolderList) -> String {
    let mut out = String::new();
    for folder in list.folders() {
        out.push_str(&format!("{}  {} ({} items)\n", folder.id, folder.name, folder.items.len()));
        for item in &folder.items {
            let target = match item.kind {
                MediaKind::Image => format!("<embedded image, {} bytes>", item.url.len()),
                _ => item.url.clone(),
            };
            let kind = serde_json::to_value(item.kind)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            out.push_str(&format!("    {}  [{kind}] {}  {target}\n", item.id, item.title));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_shows_default_folders() {
        let text = render_list(&FolderList::default());
        assert!(text.contains("f1  Chest technique (1 items)"));
        assert!(text.contains("[youtube] Bench press basics"));
        assert!(text.contains("f2  Back routine (0 items)"));
    }
}
