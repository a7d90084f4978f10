//! Reference media folders: videos, links and images grouped by topic.

use std::path::Path;

use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Youtube,
    Link,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    /// Web address, or a `data:` URL for images.
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<MediaItem>,
}

/// Ordered list of folders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderList {
    folders: Vec<Folder>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn non_blank(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(trimmed.to_string())
}

/// Whether a URL points at YouTube.
pub fn is_youtube_url(url: &str) -> bool {
    url.contains("youtube") || url.contains("youtu.be")
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

impl Default for FolderList {
    /// The folders a first start begins with.
    fn default() -> Self {
        Self {
            folders: vec![
                Folder {
                    id: "f1".into(),
                    name: "Chest technique".into(),
                    items: vec![MediaItem {
                        id: "m1".into(),
                        title: "Bench press basics".into(),
                        url: "https://www.youtube.com/watch?v=example".into(),
                        kind: MediaKind::Youtube,
                    }],
                },
                Folder {
                    id: "f2".into(),
                    name: "Back routine".into(),
                    items: Vec::new(),
                },
            ],
        }
    }
}

impl FromIterator<Folder> for FolderList {
    fn from_iter<I: IntoIterator<Item = Folder>>(iter: I) -> Self {
        Self {
            folders: iter.into_iter().collect(),
        }
    }
}

impl FolderList {
    pub fn empty() -> Self {
        Self {
            folders: Vec::new(),
        }
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn get(&self, folder_id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == folder_id)
    }

    fn get_mut(&mut self, folder_id: &str) -> Result<&mut Folder, ValidationError> {
        self.folders
            .iter_mut()
            .find(|f| f.id == folder_id)
            .ok_or_else(|| ValidationError::NotFound {
                kind: "folder",
                id: folder_id.to_string(),
            })
    }

    /// Append a folder. Returns its id.
    pub fn add_folder(&mut self, name: &str) -> Result<String, ValidationError> {
        let name = non_blank(name, "folder name")?;
        let id = new_id();
        self.folders.push(Folder {
            id: id.clone(),
            name,
            items: Vec::new(),
        });
        Ok(id)
    }

    pub fn rename_folder(&mut self, folder_id: &str, name: &str) -> Result<(), ValidationError> {
        let name = non_blank(name, "folder name")?;
        self.get_mut(folder_id)?.name = name;
        Ok(())
    }

    /// Add a web link; YouTube addresses are recognised as videos.
    pub fn add_link(&mut self, folder_id: &str, url: &str) -> Result<&MediaItem, ValidationError> {
        let url = non_blank(url, "url")?;
        let (kind, title) = if is_youtube_url(&url) {
            (MediaKind::Youtube, "YouTube video")
        } else {
            (MediaKind::Link, "Reference link")
        };
        self.push_item(
            folder_id,
            MediaItem {
                id: new_id(),
                title: title.to_string(),
                url,
                kind,
            },
        )
    }

    /// Embed an image file as a `data:` URL titled with its file name.
    pub fn add_image(&mut self, folder_id: &str, path: &Path) -> Result<&MediaItem, CoreError> {
        // Check the folder first so a bad id does not cost a file read.
        self.get_mut(folder_id)?;
        let bytes = std::fs::read(path)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        let title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let item = MediaItem {
            id: new_id(),
            title,
            url: format!("data:{};base64,{encoded}", mime_for(path)),
            kind: MediaKind::Image,
        };
        Ok(self.push_item(folder_id, item)?)
    }

    pub fn delete_item(&mut self, folder_id: &str, item_id: &str) -> Result<MediaItem, ValidationError> {
        let folder = self.get_mut(folder_id)?;
        let pos = folder
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| ValidationError::NotFound {
                kind: "item",
                id: item_id.to_string(),
            })?;
        Ok(folder.items.remove(pos))
    }

    fn push_item(&mut self, folder_id: &str, item: MediaItem) -> Result<&MediaItem, ValidationError> {
        let folder = self.get_mut(folder_id)?;
        folder.items.push(item);
        folder.items.last().ok_or_else(|| ValidationError::NotFound {
            kind: "item",
            id: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_list_matches_first_start() {
        let list = FolderList::default();
        assert_eq!(list.folders().len(), 2);
        assert_eq!(list.folders()[0].items[0].kind, MediaKind::Youtube);
        assert!(list.folders()[1].items.is_empty());
    }

    #[test]
    fn add_and_rename_folder() {
        let mut list = FolderList::empty();
        let id = list.add_folder("  Leg day ").unwrap();
        assert_eq!(list.get(&id).unwrap().name, "Leg day");
        list.rename_folder(&id, "Legs").unwrap();
        assert_eq!(list.get(&id).unwrap().name, "Legs");
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut list = FolderList::default();
        assert_eq!(
            list.add_folder("   "),
            Err(ValidationError::Blank { field: "folder name" })
        );
        assert!(list.rename_folder("f1", "").is_err());
        assert_eq!(list.get("f1").unwrap().name, "Chest technique");
    }

    #[test]
    fn links_are_classified() {
        let mut list = FolderList::default();
        let yt = list.add_link("f2", "https://youtu.be/abc").unwrap().clone();
        assert_eq!(yt.kind, MediaKind::Youtube);
        assert_eq!(yt.title, "YouTube video");

        let link = list.add_link("f2", "https://example.com/rows").unwrap().clone();
        assert_eq!(link.kind, MediaKind::Link);
        assert_eq!(link.title, "Reference link");
        assert_eq!(list.get("f2").unwrap().items.len(), 2);

        assert!(list.add_link("f2", "").is_err());
        assert!(matches!(
            list.add_link("nope", "https://example.com"),
            Err(ValidationError::NotFound { kind: "folder", .. })
        ));
    }

    #[test]
    fn image_is_embedded_as_data_url() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("form.PNG");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let mut list = FolderList::default();
        let item = list.add_image("f1", &path).unwrap();
        assert_eq!(item.kind, MediaKind::Image);
        assert_eq!(item.title, "form.PNG");
        assert_eq!(item.url, "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn image_for_unknown_folder_fails() {
        let mut list = FolderList::default();
        let err = list.add_image("nope", Path::new("/does/not/matter.png")).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::NotFound { .. })));
    }

    #[test]
    fn delete_item_removes_only_that_item() {
        let mut list = FolderList::default();
        let removed = list.delete_item("f1", "m1").unwrap();
        assert_eq!(removed.title, "Bench press basics");
        assert!(list.get("f1").unwrap().items.is_empty());
        assert!(list.delete_item("f1", "m1").is_err());
    }

    #[test]
    fn serializes_item_kind_as_type() {
        let json = serde_json::to_value(FolderList::default()).unwrap();
        assert_eq!(json[0]["items"][0]["type"], "youtube");
        let back: FolderList = serde_json::from_value(json).unwrap();
        assert_eq!(back, FolderList::default());
    }
}
