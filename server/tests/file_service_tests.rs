mod test_utils;

use std::sync::Arc;

use uuid::Uuid;

use cirrus_server_lib::content::file_content_client::InMemoryStore;
use cirrus_server_lib::session_service::Session;
use cirrus_server_lib::{file_service, usage_service, ClientError, RequestContext, ServerState};
use cirrus_shared::api::{
    DeleteFileError, DeleteFileRequest, GetFilesRequest, GetStorageUsageRequest,
    PresignedUrlError, PresignedUrlRequest, RenameFileRequest, ToggleFavoriteError,
    ToggleFavoriteRequest, UploadFileMetadataError, UploadFileMetadataRequest,
};
use cirrus_shared::file_metadata::{FileCategory, FileType};
use cirrus_shared::tier::DenialReason;

use test_utils::{random_email, signed_up_user, test_state};

const MEGABYTE: u64 = 1024 * 1024;

fn ctx<'a, T>(state: &'a ServerState, session: &Session, request: T) -> RequestContext<'a, T> {
    RequestContext { server_state: state, request, session: session.clone() }
}

fn presign_request(session: &Session, name: &str, path: &str, size: u64) -> PresignedUrlRequest {
    PresignedUrlRequest {
        user_id: session.user_id,
        name: name.to_string(),
        size,
        mime_type: "application/pdf".to_string(),
        path: path.to_string(),
    }
}

/// Walks a file through the whole server-side flow: credential, simulated
/// direct PUT, metadata confirmation.
async fn upload(
    state: &ServerState, files_db: &Arc<InMemoryStore>, session: &Session, name: &str, path: &str,
    size: u64,
) -> Uuid {
    let credential = file_service::presigned_url(ctx(state, session, presign_request(session, name, path, size)))
        .await
        .unwrap();
    files_db.seed_object(&credential.unique_key);

    let confirmed = file_service::upload_file_metadata(ctx(
        state,
        session,
        UploadFileMetadataRequest {
            user_id: session.user_id,
            name: name.to_string(),
            file_type: FileType::File,
            storage_key: Some(credential.unique_key),
            size,
            mime_type: Some("application/pdf".to_string()),
            path: path.to_string(),
            is_favorited: false,
            category: Some(FileCategory::Documents),
        },
    ))
    .await
    .unwrap();

    confirmed.id
}

async fn create_folder(state: &ServerState, session: &Session, name: &str, path: &str) -> Uuid {
    file_service::upload_file_metadata(ctx(
        state,
        session,
        UploadFileMetadataRequest {
            user_id: session.user_id,
            name: name.to_string(),
            file_type: FileType::Folder,
            storage_key: None,
            size: 0,
            mime_type: None,
            path: path.to_string(),
            is_favorited: false,
            category: None,
        },
    ))
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn used_storage_sums_exactly_the_callers_records() {
    let (state, files_db, _dir) = test_state();
    let (user_a, _, session_a) = signed_up_user(&state, &random_email()).await;
    let (user_b, _, session_b) = signed_up_user(&state, &random_email()).await;

    upload(&state, &files_db, &session_a, "one.pdf", "/", 100).await;
    upload(&state, &files_db, &session_a, "two.pdf", "/", 200).await;
    create_folder(&state, &session_a, "docs", "/").await;
    upload(&state, &files_db, &session_b, "other.pdf", "/", 999).await;

    assert_eq!(usage_service::used_storage::<()>(&state, user_a).unwrap(), 300);
    assert_eq!(usage_service::used_storage::<()>(&state, user_b).unwrap(), 999);
}

#[tokio::test]
async fn quota_denial_reports_remaining_space() {
    let (state, files_db, _dir) = test_state();
    let (_, _, session) = signed_up_user(&state, &random_email()).await;

    // 150 MB consumed on a 200 MB tier
    upload(&state, &files_db, &session, "a.pdf", "/", 75 * MEGABYTE).await;
    upload(&state, &files_db, &session, "b.pdf", "/", 75 * MEGABYTE).await;

    let denied = file_service::presigned_url(ctx(
        &state,
        &session,
        presign_request(&session, "big.pdf", "/", 60 * MEGABYTE),
    ))
    .await;

    match denied {
        Err(ClientError(PresignedUrlError::Denied(
            reason @ DenialReason::QuotaExceeded { remaining },
        ))) => {
            assert_eq!(remaining, 50 * MEGABYTE);
            assert!(reason.to_string().contains("52.42 MB"));
        }
        other => panic!("expected quota denial, got {other:?}"),
    }
}

#[tokio::test]
async fn a_file_landing_exactly_on_the_cap_is_allowed() {
    let (state, files_db, _dir) = test_state();
    let (_, _, session) = signed_up_user(&state, &random_email()).await;

    upload(&state, &files_db, &session, "a.pdf", "/", 75 * MEGABYTE).await;
    upload(&state, &files_db, &session, "b.pdf", "/", 75 * MEGABYTE).await;

    file_service::presigned_url(ctx(
        &state,
        &session,
        presign_request(&session, "exact.pdf", "/", 50 * MEGABYTE),
    ))
    .await
    .unwrap();
}

#[tokio::test]
async fn an_oversized_single_file_is_denied_for_size_not_quota() {
    let (state, _, _dir) = test_state();
    let (_, _, session) = signed_up_user(&state, &random_email()).await;

    let denied = file_service::presigned_url(ctx(
        &state,
        &session,
        presign_request(&session, "huge.pdf", "/", 150 * MEGABYTE),
    ))
    .await;

    match denied {
        Err(ClientError(PresignedUrlError::Denied(DenialReason::FileTooLarge { .. }))) => {}
        other => panic!("expected size denial, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_confirmation_conflicts_and_keeps_the_original() {
    let (state, files_db, _dir) = test_state();
    let (_, _, session) = signed_up_user(&state, &random_email()).await;

    upload(&state, &files_db, &session, "report.pdf", "/", 256).await;

    let duplicate = file_service::upload_file_metadata(ctx(
        &state,
        &session,
        UploadFileMetadataRequest {
            user_id: session.user_id,
            name: "report.pdf".to_string(),
            file_type: FileType::File,
            storage_key: Some("whatever".to_string()),
            size: 256,
            mime_type: Some("application/pdf".to_string()),
            path: "/".to_string(),
            is_favorited: false,
            category: Some(FileCategory::Documents),
        },
    ))
    .await;

    match duplicate {
        Err(ClientError(UploadFileMetadataError::FileAlreadyExists)) => {}
        other => panic!("expected FileAlreadyExists, got {other:?}"),
    }

    let files = file_service::get_files(ctx(&state, &session, GetFilesRequest {}))
        .await
        .unwrap()
        .files;
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn the_same_name_is_fine_in_a_different_folder() {
    let (state, files_db, _dir) = test_state();
    let (_, _, session) = signed_up_user(&state, &random_email()).await;

    create_folder(&state, &session, "docs", "/").await;
    upload(&state, &files_db, &session, "report.pdf", "/", 256).await;
    upload(&state, &files_db, &session, "report.pdf", "/docs/", 256).await;
}

#[tokio::test]
async fn record_shape_invariants_are_enforced() {
    let (state, _, _dir) = test_state();
    let (_, _, session) = signed_up_user(&state, &random_email()).await;

    // a folder never carries a storage key
    let folder_with_key = file_service::upload_file_metadata(ctx(
        &state,
        &session,
        UploadFileMetadataRequest {
            user_id: session.user_id,
            name: "docs".to_string(),
            file_type: FileType::Folder,
            storage_key: Some("key".to_string()),
            size: 0,
            mime_type: None,
            path: "/".to_string(),
            is_favorited: false,
            category: None,
        },
    ))
    .await;
    match folder_with_key {
        Err(ClientError(UploadFileMetadataError::InvalidInput)) => {}
        other => panic!("expected InvalidInput, got {other:?}"),
    }

    // a file always does
    let file_without_key = file_service::upload_file_metadata(ctx(
        &state,
        &session,
        UploadFileMetadataRequest {
            user_id: session.user_id,
            name: "loose.pdf".to_string(),
            file_type: FileType::File,
            storage_key: None,
            size: 10,
            mime_type: Some("application/pdf".to_string()),
            path: "/".to_string(),
            is_favorited: false,
            category: Some(FileCategory::Documents),
        },
    ))
    .await;
    match file_without_key {
        Err(ClientError(UploadFileMetadataError::InvalidInput)) => {}
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[tokio::test]
async fn listing_derives_public_urls_for_files_only() {
    let (state, files_db, _dir) = test_state();
    let (_, _, session) = signed_up_user(&state, &random_email()).await;

    upload(&state, &files_db, &session, "a.pdf", "/", 64).await;
    create_folder(&state, &session, "docs", "/").await;

    let files = file_service::get_files(ctx(&state, &session, GetFilesRequest {}))
        .await
        .unwrap()
        .files;
    assert_eq!(files.len(), 2);

    for file in files {
        match file.record.file_type {
            FileType::File => {
                let url = file.url.unwrap();
                assert!(url.starts_with("https://storage.test/"));
            }
            FileType::Folder => assert!(file.url.is_none()),
        }
    }
}

#[tokio::test]
async fn rename_moves_the_object_before_the_record_changes() {
    let (state, files_db, _dir) = test_state();
    let (_, _, session) = signed_up_user(&state, &random_email()).await;

    let id = upload(&state, &files_db, &session, "old.pdf", "/", 64).await;
    let old_key = format!("{}{}{}", session.user_id, "/", "old.pdf");
    assert!(files_db.contains(&old_key));

    file_service::rename_file(ctx(
        &state,
        &session,
        RenameFileRequest { id, user_id: session.user_id, new_name: "new.pdf".to_string() },
    ))
    .await
    .unwrap();

    let files = file_service::get_files(ctx(&state, &session, GetFilesRequest {}))
        .await
        .unwrap()
        .files;
    let record = &files[0].record;
    assert_eq!(record.name, "new.pdf");

    let new_key = record.storage_key.clone().unwrap();
    assert!(files_db.contains(&new_key));
    assert!(!files_db.contains(&old_key));
    assert!(new_key.ends_with("new.pdf"));
}

#[tokio::test]
async fn rename_is_not_reported_successful_when_the_storage_move_fails() {
    let (state, files_db, _dir) = test_state();
    let (_, _, session) = signed_up_user(&state, &random_email()).await;

    let id = upload(&state, &files_db, &session, "old.pdf", "/", 64).await;
    let old_key = format!("{}{}{}", session.user_id, "/", "old.pdf");

    files_db.fail_copies(true);
    let result = file_service::rename_file(ctx(
        &state,
        &session,
        RenameFileRequest { id, user_id: session.user_id, new_name: "new.pdf".to_string() },
    ))
    .await;
    assert!(result.is_err());

    // record untouched, object still reachable at the old key
    let files = file_service::get_files(ctx(&state, &session, GetFilesRequest {}))
        .await
        .unwrap()
        .files;
    assert_eq!(files[0].record.name, "old.pdf");
    assert_eq!(files[0].record.storage_key.as_deref(), Some(old_key.as_str()));
    assert!(files_db.contains(&old_key));
}

#[tokio::test]
async fn deleting_a_file_removes_the_object_and_frees_quota() {
    let (state, files_db, _dir) = test_state();
    let (user_id, _, session) = signed_up_user(&state, &random_email()).await;

    let id = upload(&state, &files_db, &session, "gone.pdf", "/", 512).await;
    let key = format!("{}{}{}", session.user_id, "/", "gone.pdf");
    assert_eq!(usage_service::used_storage::<()>(&state, user_id).unwrap(), 512);

    file_service::delete_file(ctx(
        &state,
        &session,
        DeleteFileRequest { id, user_id: session.user_id },
    ))
    .await
    .unwrap();

    assert!(!files_db.contains(&key));
    assert_eq!(usage_service::used_storage::<()>(&state, user_id).unwrap(), 0);

    let missing = file_service::delete_file(ctx(
        &state,
        &session,
        DeleteFileRequest { id, user_id: session.user_id },
    ))
    .await;
    match missing {
        Err(ClientError(DeleteFileError::FileNotFound)) => {}
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn a_folder_with_children_refuses_deletion() {
    let (state, files_db, _dir) = test_state();
    let (_, _, session) = signed_up_user(&state, &random_email()).await;

    let folder_id = create_folder(&state, &session, "docs", "/").await;
    let child_id = upload(&state, &files_db, &session, "inside.pdf", "/docs/", 64).await;

    let refused = file_service::delete_file(ctx(
        &state,
        &session,
        DeleteFileRequest { id: folder_id, user_id: session.user_id },
    ))
    .await;
    match refused {
        Err(ClientError(DeleteFileError::FolderNotEmpty)) => {}
        other => panic!("expected FolderNotEmpty, got {other:?}"),
    }

    // folder record must still exist
    let files = file_service::get_files(ctx(&state, &session, GetFilesRequest {}))
        .await
        .unwrap()
        .files;
    assert_eq!(files.len(), 2);

    // emptied, it deletes cleanly
    file_service::delete_file(ctx(
        &state,
        &session,
        DeleteFileRequest { id: child_id, user_id: session.user_id },
    ))
    .await
    .unwrap();
    file_service::delete_file(ctx(
        &state,
        &session,
        DeleteFileRequest { id: folder_id, user_id: session.user_id },
    ))
    .await
    .unwrap();
}

#[tokio::test]
async fn favorites_flip_and_flip_back() {
    let (state, files_db, _dir) = test_state();
    let (_, _, session) = signed_up_user(&state, &random_email()).await;

    let id = upload(&state, &files_db, &session, "fav.pdf", "/", 64).await;

    let on = file_service::toggle_favorite(ctx(
        &state,
        &session,
        ToggleFavoriteRequest { id, user_id: session.user_id },
    ))
    .await
    .unwrap();
    assert!(on.is_favorited);

    let off = file_service::toggle_favorite(ctx(
        &state,
        &session,
        ToggleFavoriteRequest { id, user_id: session.user_id },
    ))
    .await
    .unwrap();
    assert!(!off.is_favorited);
}

#[tokio::test]
async fn another_users_record_is_forbidden_not_missing() {
    let (state, files_db, _dir) = test_state();
    let (_, _, owner_session) = signed_up_user(&state, &random_email()).await;
    let (_, _, intruder_session) = signed_up_user(&state, &random_email()).await;

    let id = upload(&state, &files_db, &owner_session, "private.pdf", "/", 64).await;

    let foreign = file_service::toggle_favorite(ctx(
        &state,
        &intruder_session,
        ToggleFavoriteRequest { id, user_id: intruder_session.user_id },
    ))
    .await;
    match foreign {
        Err(ClientError(ToggleFavoriteError::NotPermitted)) => {}
        other => panic!("expected NotPermitted, got {other:?}"),
    }

    let missing = file_service::toggle_favorite(ctx(
        &state,
        &intruder_session,
        ToggleFavoriteRequest { id: Uuid::new_v4(), user_id: intruder_session.user_id },
    ))
    .await;
    match missing {
        Err(ClientError(ToggleFavoriteError::FileNotFound)) => {}
        other => panic!("expected FileNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn usage_snapshot_is_consistent_with_the_tier_table() {
    let (state, files_db, _dir) = test_state();
    let (_, _, session) = signed_up_user(&state, &random_email()).await;

    upload(&state, &files_db, &session, "a.pdf", "/", 50 * MEGABYTE).await;

    let usage = file_service::get_storage_usage(ctx(&state, &session, GetStorageUsageRequest {}))
        .await
        .unwrap();

    assert_eq!(usage.used_storage, 50 * MEGABYTE);
    assert_eq!(usage.storage_limit, 200 * MEGABYTE);
    assert_eq!(usage.remaining_storage, 150 * MEGABYTE);
    assert_eq!(usage.usage_percentage, 25);
}
