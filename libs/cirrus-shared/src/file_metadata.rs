use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileType {
    File,
    Folder,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Images,
    Videos,
    Audios,
    Documents,
    Others,
}

impl FileCategory {
    /// Derived from the declared mime type. Folders carry no category.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            FileCategory::Images
        } else if mime_type.starts_with("video/") {
            FileCategory::Videos
        } else if mime_type.starts_with("audio/") {
            FileCategory::Audios
        } else if mime_type.contains("text")
            || mime_type.contains("pdf")
            || mime_type.contains("document")
            || mime_type.contains("spreadsheet")
            || mime_type.contains("presentation")
        {
            FileCategory::Documents
        } else {
            FileCategory::Others
        }
    }
}

/// The metadata row representing a file or folder, independent of the
/// underlying storage object.
///
/// `storage_key` is `Some` iff this is a file whose object has been durably
/// written. `path` is the parent location, always ending in `/`; a folder's
/// children are the records whose path equals [FileRecord::children_path].
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct FileRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub file_type: FileType,
    pub storage_key: Option<String>,
    pub size: u64,
    pub mime_type: Option<String>,
    pub path: String,
    pub is_favorited: bool,
    pub category: Option<FileCategory>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl FileRecord {
    pub fn is_folder(&self) -> bool {
        self.file_type == FileType::Folder
    }

    /// The path every direct child of this folder carries.
    pub fn children_path(&self) -> String {
        format!("{}{}/", self.path, self.name)
    }
}

/// A record as listed to the client, with the public object url derived for
/// files that have one.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct FileWithUrl {
    pub record: FileRecord,
    pub url: Option<String>,
}

pub const MAX_FILENAME_LENGTH: usize = 255;

pub fn filename_is_valid(name: &str) -> bool {
    !name.is_empty() && name.len() <= MAX_FILENAME_LENGTH && !name.contains('/')
}

pub fn path_is_valid(path: &str) -> bool {
    path.starts_with('/') && path.ends_with('/') && path.len() <= MAX_FILENAME_LENGTH
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn category_from_mime() {
        assert_eq!(FileCategory::from_mime("image/png"), FileCategory::Images);
        assert_eq!(FileCategory::from_mime("video/mp4"), FileCategory::Videos);
        assert_eq!(FileCategory::from_mime("audio/mpeg"), FileCategory::Audios);
        assert_eq!(FileCategory::from_mime("application/pdf"), FileCategory::Documents);
        assert_eq!(FileCategory::from_mime("text/plain"), FileCategory::Documents);
        assert_eq!(
            FileCategory::from_mime("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            FileCategory::Documents
        );
        assert_eq!(FileCategory::from_mime("application/zip"), FileCategory::Others);
    }

    #[test]
    fn children_path_nests() {
        let folder = FileRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "reports".to_string(),
            file_type: FileType::Folder,
            storage_key: None,
            size: 0,
            mime_type: None,
            path: "/work/".to_string(),
            is_favorited: false,
            category: None,
            created_at: 0,
            updated_at: 0,
        };
        assert_eq!(folder.children_path(), "/work/reports/");
    }

    #[test]
    fn path_validation() {
        assert!(path_is_valid("/"));
        assert!(path_is_valid("/work/reports/"));
        assert!(!path_is_valid("work/"));
        assert!(!path_is_valid("/work"));
    }
}
