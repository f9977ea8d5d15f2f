//! Shared fixtures for service tests: an in-memory catalog with failure
//! injection and an object store that journals its calls.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use filevault_core::config::{DeletionConfig, StorageConfig};
use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::traits::object_store::{ByteStream, ObjectStore};
use filevault_database::store::{FileStore, FolderStore};
use filevault_entity::file::{CreateFile, FileRecord};
use filevault_entity::folder::{CreateFolder, Folder};
use filevault_service::{
    FileService, FolderService, FolderTreeDeleter, RequestContext, UsageService,
};
use filevault_storage::MemoryObjectStore;

/// One observable store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    ListFiles(Uuid),
    ListChildren(Uuid),
    RemoveBlobs(Vec<String>),
    DeleteFileRows(Vec<Uuid>),
    DeleteFolder(Uuid),
    MoveFiles(Vec<Uuid>),
}

/// Ordered record of store calls shared by the fakes.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Op>>>);

impl Journal {
    pub fn push(&self, op: Op) {
        self.0.lock().unwrap().push(op);
    }

    pub fn ops(&self) -> Vec<Op> {
        self.0.lock().unwrap().clone()
    }

    /// Folder row deletions, in order.
    pub fn deleted_folders(&self) -> Vec<Uuid> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                Op::DeleteFolder(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Index of the first op matching `pred`.
    pub fn position(&self, pred: impl Fn(&Op) -> bool) -> Option<usize> {
        self.ops().iter().position(pred)
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    folders: BTreeMap<Uuid, Folder>,
    files: BTreeMap<Uuid, FileRecord>,
    fail_list_files: HashSet<Uuid>,
    fail_list_children: HashSet<Uuid>,
    fail_delete_files_in: HashSet<Uuid>,
    fail_delete_folder: HashSet<Uuid>,
}

/// In-memory `folders` and `files` tables.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    state: Mutex<CatalogState>,
    journal: Journal,
}

impl MemoryCatalog {
    pub fn new(journal: Journal) -> Self {
        Self {
            state: Mutex::default(),
            journal,
        }
    }

    pub fn add_folder(&self, name: &str, owner_id: Uuid, parent: Option<Uuid>) -> Folder {
        let folder = Folder {
            id: Uuid::new_v4(),
            name: name.to_string(),
            owner_id,
            parent_folder_id: parent,
            created_at: Utc::now(),
        };
        self.state
            .lock()
            .unwrap()
            .folders
            .insert(folder.id, folder.clone());
        folder
    }

    pub fn add_file(
        &self,
        folder: Option<Uuid>,
        uploader_id: Uuid,
        storage_path: &str,
    ) -> FileRecord {
        let file = FileRecord {
            id: Uuid::new_v4(),
            file_name: storage_path.rsplit('/').next().unwrap_or(storage_path).to_string(),
            file_type: Some("text/plain".to_string()),
            storage_path: storage_path.to_string(),
            folder_id: folder,
            uploader_id,
            size_bytes: 1,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().files.insert(file.id, file.clone());
        file
    }

    /// Points an existing folder at a new parent, bypassing validation.
    pub fn set_parent(&self, folder_id: Uuid, parent: Option<Uuid>) {
        if let Some(folder) = self.state.lock().unwrap().folders.get_mut(&folder_id) {
            folder.parent_folder_id = parent;
        }
    }

    pub fn folder(&self, id: Uuid) -> Option<Folder> {
        self.state.lock().unwrap().folders.get(&id).cloned()
    }

    pub fn file(&self, id: Uuid) -> Option<FileRecord> {
        self.state.lock().unwrap().files.get(&id).cloned()
    }

    pub fn folder_count(&self) -> usize {
        self.state.lock().unwrap().folders.len()
    }

    pub fn file_count(&self) -> usize {
        self.state.lock().unwrap().files.len()
    }

    pub fn fail_list_files(&self, folder_id: Uuid) {
        self.state.lock().unwrap().fail_list_files.insert(folder_id);
    }

    pub fn fail_list_children(&self, folder_id: Uuid) {
        self.state.lock().unwrap().fail_list_children.insert(folder_id);
    }

    /// Makes deleting the file rows of `folder_id` fail.
    pub fn fail_delete_files_in(&self, folder_id: Uuid) {
        self.state.lock().unwrap().fail_delete_files_in.insert(folder_id);
    }

    pub fn fail_delete_folder(&self, folder_id: Uuid) {
        self.state.lock().unwrap().fail_delete_folder.insert(folder_id);
    }
}

#[async_trait]
impl FolderStore for MemoryCatalog {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        Ok(self.folder(id))
    }

    async fn find_children(&self, parent: Option<Uuid>) -> AppResult<Vec<Folder>> {
        if let Some(id) = parent {
            self.journal.push(Op::ListChildren(id));
        }
        let state = self.state.lock().unwrap();
        if parent.is_some_and(|id| state.fail_list_children.contains(&id)) {
            return Err(AppError::database("connection reset while listing folders"));
        }
        let mut children: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| f.parent_folder_id == parent)
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn count_children(&self, folder_id: Uuid) -> AppResult<u64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .folders
            .values()
            .filter(|f| f.parent_folder_id == Some(folder_id))
            .count() as u64)
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut state = self.state.lock().unwrap();
        let duplicate = state.folders.values().any(|f| {
            f.owner_id == data.owner_id
                && f.parent_folder_id == data.parent_folder_id
                && f.name == data.name
        });
        if duplicate {
            return Err(AppError::conflict("A folder with this name already exists here"));
        }
        let folder = Folder {
            id: Uuid::new_v4(),
            name: data.name.clone(),
            owner_id: data.owner_id,
            parent_folder_id: data.parent_folder_id,
            created_at: Utc::now(),
        };
        state.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn rename(&self, folder_id: Uuid, new_name: &str) -> AppResult<Folder> {
        let mut state = self.state.lock().unwrap();
        let current = state
            .folders
            .get(&folder_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        let duplicate = state.folders.values().any(|f| {
            f.id != folder_id
                && f.owner_id == current.owner_id
                && f.parent_folder_id == current.parent_folder_id
                && f.name == new_name
        });
        if duplicate {
            return Err(AppError::conflict("A folder with this name already exists here"));
        }
        let folder = state
            .folders
            .get_mut(&folder_id)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        folder.name = new_name.to_string();
        Ok(folder.clone())
    }

    async fn delete(&self, folder_id: Uuid) -> AppResult<bool> {
        self.journal.push(Op::DeleteFolder(folder_id));
        let mut state = self.state.lock().unwrap();
        if state.fail_delete_folder.contains(&folder_id) {
            return Err(AppError::database("folder row is locked"));
        }
        Ok(state.folders.remove(&folder_id).is_some())
    }
}

#[async_trait]
impl FileStore for MemoryCatalog {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileRecord>> {
        Ok(self.file(id))
    }

    async fn find_by_folder(&self, folder: Option<Uuid>) -> AppResult<Vec<FileRecord>> {
        if let Some(id) = folder {
            self.journal.push(Op::ListFiles(id));
        }
        let state = self.state.lock().unwrap();
        if folder.is_some_and(|id| state.fail_list_files.contains(&id)) {
            return Err(AppError::database("connection reset while listing files"));
        }
        let mut files: Vec<FileRecord> = state
            .files
            .values()
            .filter(|f| f.folder_id == folder)
            .cloned()
            .collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    async fn create(&self, data: &CreateFile) -> AppResult<FileRecord> {
        let mut state = self.state.lock().unwrap();
        if state.files.values().any(|f| f.storage_path == data.storage_path) {
            return Err(AppError::conflict("A file with this storage path already exists"));
        }
        let file = FileRecord {
            id: Uuid::new_v4(),
            file_name: data.file_name.clone(),
            file_type: data.file_type.clone(),
            storage_path: data.storage_path.clone(),
            folder_id: data.folder_id,
            uploader_id: data.uploader_id,
            size_bytes: data.size_bytes,
            created_at: Utc::now(),
        };
        state.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn delete(&self, file_id: Uuid) -> AppResult<bool> {
        self.journal.push(Op::DeleteFileRows(vec![file_id]));
        Ok(self.state.lock().unwrap().files.remove(&file_id).is_some())
    }

    async fn delete_many(&self, file_ids: &[Uuid]) -> AppResult<u64> {
        self.journal.push(Op::DeleteFileRows(file_ids.to_vec()));
        let mut state = self.state.lock().unwrap();
        let blocked = file_ids.iter().any(|id| {
            state
                .files
                .get(id)
                .and_then(|f| f.folder_id)
                .is_some_and(|folder| state.fail_delete_files_in.contains(&folder))
        });
        if blocked {
            return Err(AppError::database("file rows are locked"));
        }
        Ok(file_ids
            .iter()
            .filter(|id| state.files.remove(*id).is_some())
            .count() as u64)
    }

    async fn move_to_folder(&self, file_ids: &[Uuid], folder: Option<Uuid>) -> AppResult<u64> {
        self.journal.push(Op::MoveFiles(file_ids.to_vec()));
        let mut state = self.state.lock().unwrap();
        let mut moved = 0;
        for id in file_ids {
            if let Some(file) = state.files.get_mut(id) {
                file.folder_id = folder;
                moved += 1;
            }
        }
        Ok(moved)
    }

    async fn total_size(&self) -> AppResult<u64> {
        let state = self.state.lock().unwrap();
        Ok(state.files.values().map(|f| f.size_bytes as u64).sum())
    }
}

/// Memory object store that journals batch removals and can be made to fail.
#[derive(Debug, Default)]
pub struct JournaledObjectStore {
    inner: MemoryObjectStore,
    journal: Journal,
    unavailable: Mutex<bool>,
}

impl JournaledObjectStore {
    pub fn new(journal: Journal) -> Self {
        Self {
            inner: MemoryObjectStore::new(),
            journal,
            unavailable: Mutex::new(false),
        }
    }

    /// Makes every delete fail with a non-`NotFound` storage error.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    fn check_available(&self) -> AppResult<()> {
        if *self.unavailable.lock().unwrap() {
            Err(AppError::storage("object store unavailable"))
        } else {
            Ok(())
        }
    }

    pub async fn keys(&self) -> Vec<String> {
        self.inner.keys().await
    }
}

#[async_trait]
impl ObjectStore for JournaledObjectStore {
    fn provider_type(&self) -> &str {
        "journaled-memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        self.inner.read(path).await
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        self.inner.read_bytes(path).await
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        self.inner.write(path, data).await
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.check_available()?;
        self.inner.delete(path).await
    }

    async fn remove_many(&self, paths: &[String]) -> AppResult<()> {
        self.journal.push(Op::RemoveBlobs(paths.to_vec()));
        self.check_available()?;
        self.inner.remove_many(paths).await
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        self.inner.exists(path).await
    }
}

/// A fully wired set of services over the in-memory fakes.
pub struct TestVault {
    pub journal: Journal,
    pub catalog: Arc<MemoryCatalog>,
    pub objects: Arc<JournaledObjectStore>,
    pub deleter: FolderTreeDeleter,
    pub folders: FolderService,
    pub files: FileService,
    pub usage: UsageService,
}

impl TestVault {
    pub fn new() -> Self {
        Self::with_max_depth(DeletionConfig::default().max_depth)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        let journal = Journal::default();
        let catalog = Arc::new(MemoryCatalog::new(journal.clone()));
        let objects = Arc::new(JournaledObjectStore::new(journal.clone()));
        let storage = StorageConfig {
            max_upload_size_bytes: 1024,
            ..StorageConfig::default()
        };

        let deleter = FolderTreeDeleter::new(
            catalog.clone(),
            catalog.clone(),
            objects.clone(),
            &DeletionConfig { max_depth },
        );
        let folders = FolderService::new(catalog.clone(), catalog.clone(), deleter.clone());
        let files = FileService::new(
            catalog.clone(),
            catalog.clone(),
            objects.clone(),
            storage.clone(),
        );
        let usage = UsageService::new(catalog.clone(), &storage);

        Self {
            journal,
            catalog,
            objects,
            deleter,
            folders,
            files,
            usage,
        }
    }

    /// Adds a file row and writes its blob.
    pub async fn seed_file(
        &self,
        folder: Option<Uuid>,
        uploader_id: Uuid,
        path: &str,
    ) -> FileRecord {
        self.objects
            .write(path, Bytes::from(path.to_string()))
            .await
            .unwrap();
        self.catalog.add_file(folder, uploader_id, path)
    }

    /// Builds a linear chain of `depth` folders below a new root and returns
    /// them top-down.
    pub fn seed_chain(&self, owner: Uuid, depth: usize) -> Vec<Folder> {
        let mut chain = vec![self.catalog.add_folder("level-0", owner, None)];
        for level in 1..=depth {
            let parent = chain.last().map(|f| f.id);
            chain.push(self.catalog.add_folder(&format!("level-{level}"), owner, parent));
        }
        chain
    }
}

pub fn user_ctx(user_id: Uuid) -> RequestContext {
    RequestContext::new(user_id, None)
}
