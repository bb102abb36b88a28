use uuid::Uuid;

use cirrus_shared::api::{
    DeleteFileRequest, GetFilesRequest, RenameFileRequest, ToggleFavoriteRequest,
};
use cirrus_shared::file_metadata::{FileCategory, FileWithUrl};

use crate::io::network::Requester;
use crate::model::errors::CoreResult;
use crate::service::uploads::Transfer;
use crate::CirrusLib;

impl<Client: Requester, Store: Transfer> CirrusLib<Client, Store> {
    pub async fn list_files(&self) -> CoreResult<Vec<FileWithUrl>> {
        let resp = self.client.request(GetFilesRequest {}).await?;
        Ok(resp.files)
    }

    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn rename_file(&self, id: Uuid, new_name: &str) -> CoreResult<()> {
        let user_id = self.session()?.id;
        self.client
            .request(RenameFileRequest { id, user_id, new_name: new_name.to_string() })
            .await?;
        self.events.meta_changed();
        Ok(())
    }

    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn toggle_favorite(&self, id: Uuid) -> CoreResult<bool> {
        let user_id = self.session()?.id;
        let resp = self
            .client
            .request(ToggleFavoriteRequest { id, user_id })
            .await?;
        info!(%id, favorited = resp.is_favorited, "toggled favorite");
        self.events.meta_changed();
        Ok(resp.is_favorited)
    }

    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn delete_file(&self, id: Uuid) -> CoreResult<()> {
        let user_id = self.session()?.id;
        self.client.request(DeleteFileRequest { id, user_id }).await?;
        self.events.meta_changed();
        Ok(())
    }
}

/// The per-folder view: direct children only, by exact parent-path match.
pub fn files_at_path<'a>(files: &'a [FileWithUrl], path: &str) -> Vec<&'a FileWithUrl> {
    files.iter().filter(|f| f.record.path == path).collect()
}

pub fn files_in_category<'a>(
    files: &'a [FileWithUrl], category: FileCategory,
) -> Vec<&'a FileWithUrl> {
    files
        .iter()
        .filter(|f| f.record.category == Some(category))
        .collect()
}

/// The virtual favorites view.
pub fn favorites(files: &[FileWithUrl]) -> Vec<&FileWithUrl> {
    files.iter().filter(|f| f.record.is_favorited).collect()
}
