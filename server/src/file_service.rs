use uuid::Uuid;

use cirrus_shared::api::{
    DeleteFileError, DeleteFileRequest, GetFilesError, GetFilesRequest, GetFilesResponse,
    GetStorageUsageError, GetStorageUsageRequest, PresignedUrlError, PresignedUrlRequest,
    PresignedUrlResponse, RenameFileError, RenameFileRequest, ToggleFavoriteError,
    ToggleFavoriteRequest, ToggleFavoriteResponse, UploadFileMetadataError,
    UploadFileMetadataRequest, UploadFileMetadataResponse,
};
use cirrus_shared::clock::get_time;
use cirrus_shared::file_metadata::{
    filename_is_valid, path_is_valid, FileRecord, FileType, FileWithUrl,
};
use cirrus_shared::tier::{check_limits, QuotaDecision};
use cirrus_shared::usage::StorageUsage;

use crate::{usage_service, ClientError, RequestContext, ServerError};

pub async fn get_files(
    context: RequestContext<'_, GetFilesRequest>,
) -> Result<GetFilesResponse, ServerError<GetFilesError>> {
    let server_state = context.server_state;
    let db = &server_state.index_db;

    let ids = db
        .owned_files
        .get(&context.session.user_id)?
        .unwrap_or_default();

    let mut files = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(record) = db.metas.get(&id)? {
            let url = record
                .storage_key
                .as_deref()
                .map(|key| server_state.files_db.public_url(key));
            files.push(FileWithUrl { record, url });
        }
    }

    Ok(GetFilesResponse { files })
}

pub async fn get_storage_usage(
    context: RequestContext<'_, GetStorageUsageRequest>,
) -> Result<StorageUsage, ServerError<GetStorageUsageError>> {
    usage_service::storage_usage(context.server_state, &context.session)
}

/// Quota is enforced here, before the credential exists, and again at
/// confirmation. Neither check takes a reservation; two uploads racing the
/// same snapshot can jointly land past the cap.
pub async fn presigned_url(
    context: RequestContext<'_, PresignedUrlRequest>,
) -> Result<PresignedUrlResponse, ServerError<PresignedUrlError>> {
    let (request, server_state) = (&context.request, context.server_state);

    if !filename_is_valid(&request.name)
        || !path_is_valid(&request.path)
        || request.size == 0
        || request.mime_type.is_empty()
    {
        return Err(ClientError(PresignedUrlError::InvalidInput));
    }
    if !context.caller_owns(request.user_id) {
        return Err(ClientError(PresignedUrlError::NotPermitted));
    }

    let used = usage_service::used_storage(server_state, context.session.user_id)?;
    if let QuotaDecision::Denied(reason) =
        check_limits(context.session.tier, request.size, Some(&request.mime_type), used)
    {
        info!(user_id = %request.user_id, ?reason, "write credential denied");
        return Err(ClientError(PresignedUrlError::Denied(reason)));
    }

    let unique_key = format!("{}{}{}", context.session.user_id, request.path, request.name);
    let credential = server_state.files_db.presign_put(
        &unique_key,
        &request.mime_type,
        request.size,
        server_state.config.server.credential_ttl_secs,
    )?;

    Ok(PresignedUrlResponse { credential, unique_key })
}

/// Confirms a completed direct-to-storage write, or creates a folder (the
/// same record with nothing behind it). The storage-key invariant is
/// enforced at the door: a file carries a key, a folder never does.
pub async fn upload_file_metadata(
    context: RequestContext<'_, UploadFileMetadataRequest>,
) -> Result<UploadFileMetadataResponse, ServerError<UploadFileMetadataError>> {
    let (request, server_state) = (&context.request, context.server_state);

    if !filename_is_valid(&request.name) || !path_is_valid(&request.path) {
        return Err(ClientError(UploadFileMetadataError::InvalidInput));
    }
    let shape_is_valid = match request.file_type {
        FileType::File => request.storage_key.is_some() && request.size > 0,
        FileType::Folder => {
            request.storage_key.is_none() && request.size == 0 && request.mime_type.is_none()
        }
    };
    if !shape_is_valid {
        return Err(ClientError(UploadFileMetadataError::InvalidInput));
    }
    if !context.caller_owns(request.user_id) {
        return Err(ClientError(UploadFileMetadataError::NotPermitted));
    }

    if request.file_type == FileType::File {
        let used = usage_service::used_storage(server_state, context.session.user_id)?;
        if let QuotaDecision::Denied(reason) = check_limits(
            context.session.tier,
            request.size,
            request.mime_type.as_deref(),
            used,
        ) {
            info!(user_id = %request.user_id, ?reason, "metadata confirmation denied");
            return Err(ClientError(UploadFileMetadataError::Denied(reason)));
        }
    }

    let user_id = context.session.user_id;
    let now = get_time();
    let record = FileRecord {
        id: Uuid::new_v4(),
        user_id,
        name: request.name.clone(),
        file_type: request.file_type,
        storage_key: request.storage_key.clone(),
        size: request.size,
        mime_type: request.mime_type.clone(),
        path: request.path.clone(),
        is_favorited: request.is_favorited,
        category: request.category,
        created_at: now,
        updated_at: now,
    };

    let created = server_state.index_db.transaction(|tx| {
        let ids = tx.owned_files.get(&user_id).cloned().unwrap_or_default();
        for id in &ids {
            if let Some(existing) = tx.metas.get(id) {
                if existing.name == record.name && existing.path == record.path {
                    return None;
                }
            }
        }

        let mut ids = ids;
        ids.push(record.id);
        tx.metas.insert(record.id, record.clone());
        tx.owned_files.insert(user_id, ids);
        Some(record.id)
    })?;

    match created {
        Some(id) => {
            info!(%user_id, %id, file_type = ?request.file_type, "file record created");
            Ok(UploadFileMetadataResponse { id })
        }
        None => Err(ClientError(UploadFileMetadataError::FileAlreadyExists)),
    }
}

/// The storage object moves first; the record only changes once the move
/// stuck. A rename is never reported successful with the bytes still at the
/// old key.
pub async fn rename_file(
    context: RequestContext<'_, RenameFileRequest>,
) -> Result<(), ServerError<RenameFileError>> {
    let (request, server_state) = (&context.request, context.server_state);

    if !filename_is_valid(&request.new_name) {
        return Err(ClientError(RenameFileError::InvalidInput));
    }
    if !context.caller_owns(request.user_id) {
        return Err(ClientError(RenameFileError::NotPermitted));
    }

    let mut record = server_state
        .index_db
        .metas
        .get(&request.id)?
        .ok_or(ClientError(RenameFileError::FileNotFound))?;
    if record.user_id != context.session.user_id {
        return Err(ClientError(RenameFileError::NotPermitted));
    }

    if let (FileType::File, Some(old_key)) = (record.file_type, record.storage_key.clone()) {
        // the random segment keeps a re-used name from colliding with any
        // key a previous record left behind
        let new_key = format!(
            "{}_{}{}{}",
            record.user_id,
            Uuid::new_v4(),
            record.path,
            request.new_name
        );

        server_state.files_db.copy(&old_key, &new_key).await?;
        server_state.files_db.delete(&old_key).await?;

        record.storage_key = Some(new_key);
    }

    record.name = request.new_name.clone();
    record.updated_at = get_time();
    server_state.index_db.metas.insert(record.id, record)?;

    info!(id = %request.id, "file renamed");

    Ok(())
}

/// Each call flips and reports independently; two calls land back where you
/// started.
pub async fn toggle_favorite(
    context: RequestContext<'_, ToggleFavoriteRequest>,
) -> Result<ToggleFavoriteResponse, ServerError<ToggleFavoriteError>> {
    let (request, server_state) = (&context.request, context.server_state);

    if !context.caller_owns(request.user_id) {
        return Err(ClientError(ToggleFavoriteError::NotPermitted));
    }

    let mut record = server_state
        .index_db
        .metas
        .get(&request.id)?
        .ok_or(ClientError(ToggleFavoriteError::FileNotFound))?;
    if record.user_id != context.session.user_id {
        return Err(ClientError(ToggleFavoriteError::NotPermitted));
    }

    record.is_favorited = !record.is_favorited;
    record.updated_at = get_time();
    let is_favorited = record.is_favorited;
    server_state.index_db.metas.insert(record.id, record)?;

    info!(id = %request.id, favorited = is_favorited, "favorite toggled");

    Ok(ToggleFavoriteResponse { is_favorited })
}

/// Folders refuse to go while any child record exists. For files the object
/// goes first; if the store balks the record stays, so there is never a
/// record pointing at an object this path removed.
pub async fn delete_file(
    context: RequestContext<'_, DeleteFileRequest>,
) -> Result<(), ServerError<DeleteFileError>> {
    let (request, server_state) = (&context.request, context.server_state);

    if !context.caller_owns(request.user_id) {
        return Err(ClientError(DeleteFileError::NotPermitted));
    }

    let db = &server_state.index_db;
    let record = db
        .metas
        .get(&request.id)?
        .ok_or(ClientError(DeleteFileError::FileNotFound))?;
    if record.user_id != context.session.user_id {
        return Err(ClientError(DeleteFileError::NotPermitted));
    }

    if record.is_folder() {
        let children_path = record.children_path();
        let ids = db.owned_files.get(&record.user_id)?.unwrap_or_default();
        for id in ids {
            if let Some(candidate) = db.metas.get(&id)? {
                if candidate.path == children_path {
                    return Err(ClientError(DeleteFileError::FolderNotEmpty));
                }
            }
        }
    }

    if let Some(key) = &record.storage_key {
        server_state.files_db.delete(key).await?;
    }

    let user_id = record.user_id;
    server_state.index_db.transaction(|tx| {
        tx.metas.delete(request.id);
        let mut ids = tx.owned_files.get(&user_id).cloned().unwrap_or_default();
        ids.retain(|id| *id != request.id);
        tx.owned_files.insert(user_id, ids);
    })?;

    info!(id = %request.id, "file deleted");

    Ok(())
}
