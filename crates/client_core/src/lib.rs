use std::path::Path;

use async_trait::async_trait;
use shared::{
    domain::{HeroId, Superhero},
    protocol::{DeleteAck, HeroFields, HeroPatch, PageWindow},
};

pub mod config;
pub mod controller;
pub mod draft;
pub mod error;
pub mod http;
pub mod pagination;

pub use controller::{
    ControllerEvent, LoadOutcome, MutationKind, PagedCollectionController, ViewState,
};
pub use error::FetchError;
pub use http::HttpCollectionApi;
pub use pagination::{compute_display_model, DisplayModel, Slot};

/// A file queued for upload alongside a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let mime_type = mime_guess::from_path(&filename)
            .first()
            .map(|mime| mime.essence_str().to_string());
        Self {
            filename,
            mime_type,
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(filename, bytes))
    }

    pub fn is_image(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with("image/"))
    }
}

/// Remote collection the controller pages through.
#[async_trait]
pub trait CollectionApi: Send + Sync {
    async fn list(&self, page: u32, page_size: u32) -> Result<PageWindow<Superhero>, FetchError>;
    async fn get(&self, id: &HeroId) -> Result<Superhero, FetchError>;
    async fn create(
        &self,
        fields: HeroFields,
        files: Vec<ImageUpload>,
    ) -> Result<Superhero, FetchError>;
    /// `keep_images` of `None` leaves existing images alone; `Some` replaces
    /// them with the listed references before `files` are appended.
    async fn update(
        &self,
        id: &HeroId,
        patch: HeroPatch,
        files: Vec<ImageUpload>,
        keep_images: Option<Vec<String>>,
    ) -> Result<Superhero, FetchError>;
    async fn delete(&self, id: &HeroId) -> Result<DeleteAck, FetchError>;
}

#[async_trait]
impl<T> CollectionApi for std::sync::Arc<T>
where
    T: CollectionApi + ?Sized,
{
    async fn list(&self, page: u32, page_size: u32) -> Result<PageWindow<Superhero>, FetchError> {
        (**self).list(page, page_size).await
    }

    async fn get(&self, id: &HeroId) -> Result<Superhero, FetchError> {
        (**self).get(id).await
    }

    async fn create(
        &self,
        fields: HeroFields,
        files: Vec<ImageUpload>,
    ) -> Result<Superhero, FetchError> {
        (**self).create(fields, files).await
    }

    async fn update(
        &self,
        id: &HeroId,
        patch: HeroPatch,
        files: Vec<ImageUpload>,
        keep_images: Option<Vec<String>>,
    ) -> Result<Superhero, FetchError> {
        (**self).update(id, patch, files, keep_images).await
    }

    async fn delete(&self, id: &HeroId) -> Result<DeleteAck, FetchError> {
        (**self).delete(id).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
