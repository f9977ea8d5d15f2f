//! Tests for file upload, download, deletion and usage.

mod helpers;

use bytes::Bytes;
use uuid::Uuid;

use filevault_core::error::ErrorKind;
use filevault_service::{RequestContext, UploadRequest};

use helpers::{TestVault, user_ctx};

fn upload(folder_id: Option<Uuid>, name: &str, data: &'static [u8]) -> UploadRequest {
    UploadRequest {
        folder_id,
        file_name: name.to_string(),
        mime_type: Some("text/plain".to_string()),
        data: Bytes::from_static(data),
    }
}

#[tokio::test]
async fn test_upload_writes_blob_and_record() {
    let vault = TestVault::new();
    let user = Uuid::new_v4();
    let ctx = user_ctx(user);
    let folder = vault.catalog.add_folder("Docs", user, None);

    let file = vault
        .files
        .upload(&ctx, upload(Some(folder.id), "Relatório final.txt", b"hello"))
        .await
        .unwrap();

    let prefix = format!("{user}/{}/", folder.id);
    assert!(file.storage_path.starts_with(&prefix));
    assert!(file.storage_path.ends_with("_Relatorio_final.txt"));
    assert_eq!(file.file_name, "Relatório final.txt");
    assert_eq!(file.size_bytes, 5);
    assert_eq!(file.uploader_id, user);
    assert_eq!(vault.objects.keys().await, vec![file.storage_path.clone()]);

    let root_file = vault
        .files
        .upload(&ctx, upload(None, "top.txt", b"x"))
        .await
        .unwrap();
    assert!(root_file.storage_path.starts_with(&format!("{user}/root/")));
}

#[tokio::test]
async fn test_upload_rejections() {
    let vault = TestVault::new();
    let ctx = user_ctx(Uuid::new_v4());

    let too_big = UploadRequest {
        data: Bytes::from(vec![0u8; 2048]),
        ..upload(None, "big.bin", b"")
    };
    let err = vault.files.upload(&ctx, too_big).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = vault
        .files
        .upload(&ctx, upload(Some(Uuid::new_v4()), "lost.txt", b"x"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = vault
        .files
        .upload(&RequestContext::anonymous(), upload(None, "a.txt", b"x"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);

    assert!(vault.objects.keys().await.is_empty());
    assert_eq!(vault.catalog.file_count(), 0);
}

#[tokio::test]
async fn test_download_returns_content() {
    let vault = TestVault::new();
    let ctx = user_ctx(Uuid::new_v4());
    let file = vault
        .files
        .upload(&ctx, upload(None, "note.txt", b"content"))
        .await
        .unwrap();

    let download = vault.files.download(&ctx, file.id).await.unwrap();
    assert_eq!(download.data, Bytes::from_static(b"content"));
    assert_eq!(download.content_type, "text/plain");
    assert_eq!(download.file.id, file.id);

    let err = vault
        .files
        .download(&ctx, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_file_tolerates_missing_blob() {
    let vault = TestVault::new();
    let user = Uuid::new_v4();
    let ctx = user_ctx(user);
    let present = vault.seed_file(None, user, "u/root/present.txt").await;
    let orphan = vault.catalog.add_file(None, user, "u/root/orphan.txt");

    vault.files.delete_file(&ctx, present.id).await.unwrap();
    vault.files.delete_file(&ctx, orphan.id).await.unwrap();

    assert_eq!(vault.catalog.file_count(), 0);
    assert!(vault.objects.keys().await.is_empty());
}

#[tokio::test]
async fn test_delete_file_stops_on_storage_error() {
    let vault = TestVault::new();
    let user = Uuid::new_v4();
    let file = vault.seed_file(None, user, "u/root/locked.txt").await;
    vault.objects.set_unavailable(true);

    let err = vault
        .files
        .delete_file(&user_ctx(user), file.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Storage);
    assert!(vault.catalog.file(file.id).is_some());
}

#[tokio::test]
async fn test_usage_sums_file_sizes() {
    let vault = TestVault::new();
    let ctx = user_ctx(Uuid::new_v4());
    vault
        .files
        .upload(&ctx, upload(None, "a.txt", b"12345"))
        .await
        .unwrap();
    vault
        .files
        .upload(&ctx, upload(None, "b.txt", b"678"))
        .await
        .unwrap();

    let usage = vault.usage.usage().await.unwrap();
    assert_eq!(usage.used_bytes, 8);
    assert_eq!(usage.quota_bytes, 1_073_741_824);
    assert!(!usage.would_exceed(1024));
}

#[tokio::test]
async fn test_only_uploader_may_delete_file() {
    let vault = TestVault::new();
    let (uploader, stranger) = (Uuid::new_v4(), Uuid::new_v4());
    let file = vault.seed_file(None, uploader, "up/root/keep.txt").await;

    let err = vault
        .files
        .delete_file(&user_ctx(stranger), file.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert!(vault.catalog.file(file.id).is_some());
    assert_eq!(vault.objects.keys().await, vec!["up/root/keep.txt".to_string()]);

    vault
        .files
        .delete_file(&user_ctx(uploader), file.id)
        .await
        .unwrap();
    assert!(vault.catalog.file(file.id).is_none());
}
