//! reqwest adapter for the superhero REST API.

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::{HeroId, Superhero},
    error::ApiError,
    protocol::{DeleteAck, HeroFields, HeroPatch, ListQuery, PageWindow},
};
use tracing::debug;

use crate::{
    config::{Settings, SettingsError},
    error::FetchError,
    CollectionApi, ImageUpload,
};

const COLLECTION_PATH: &str = "api/superheroes";

pub struct HttpCollectionApi {
    http: Client,
    base_url: String,
}

impl HttpCollectionApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|err| SettingsError::HttpClient(err.to_string()))?;
        Ok(Self::with_client(http, settings.api_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute address for an image reference. References that already carry
    /// a scheme are returned untouched.
    pub fn resolve_image(&self, reference: &str) -> String {
        if reference.starts_with("http") {
            reference.to_string()
        } else {
            format!("{}/{}", self.base_url, reference.trim_start_matches('/'))
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{COLLECTION_PATH}", self.base_url)
    }

    fn item_url(&self, id: &HeroId) -> String {
        format!("{}/{COLLECTION_PATH}/{}", self.base_url, id.as_str())
    }

    fn normalize(&self, mut hero: Superhero) -> Superhero {
        hero.images = hero
            .images
            .iter()
            .map(|reference| self.resolve_image(reference))
            .collect();
        hero
    }
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, FetchError> {
    let status = res.status();
    if !status.is_success() {
        let body: ApiError = res.json().await.unwrap_or_default();
        return Err(FetchError::status(
            status.as_u16(),
            body.message_or_status(status.as_u16()),
        ));
    }
    res.json().await.map_err(|err| FetchError::Decode {
        message: err.to_string(),
    })
}

fn file_part(upload: ImageUpload) -> Result<Part, FetchError> {
    let mime = upload
        .mime_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Part::bytes(upload.bytes)
        .file_name(upload.filename)
        .mime_str(&mime)
        .map_err(FetchError::from)
}

fn create_form(fields: HeroFields, files: Vec<ImageUpload>) -> Result<Form, FetchError> {
    let mut form = Form::new().text("nickname", fields.nickname);
    let optional = [
        ("realName", fields.real_name),
        ("originDescription", fields.origin_description),
        ("superpowers", fields.superpowers),
        ("catchPhrase", fields.catch_phrase),
    ];
    for (name, value) in optional {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            form = form.text(name, value);
        }
    }
    for upload in files {
        form = form.part("images", file_part(upload)?);
    }
    Ok(form)
}

fn update_form(
    patch: HeroPatch,
    files: Vec<ImageUpload>,
    keep_images: Option<Vec<String>>,
) -> Result<Form, FetchError> {
    let mut form = Form::new();
    let present = [
        ("nickname", patch.nickname),
        ("realName", patch.real_name),
        ("originDescription", patch.origin_description),
        ("superpowers", patch.superpowers),
        ("catchPhrase", patch.catch_phrase),
    ];
    for (name, value) in present {
        if let Some(value) = value {
            form = form.text(name, value);
        }
    }
    // The server reads a text `images` part as the JSON list of references to keep.
    if let Some(keep) = keep_images {
        let encoded = serde_json::to_string(&keep).map_err(|err| FetchError::Decode {
            message: err.to_string(),
        })?;
        form = form.text("images", encoded);
    }
    for upload in files {
        form = form.part("images", file_part(upload)?);
    }
    Ok(form)
}

#[async_trait]
impl CollectionApi for HttpCollectionApi {
    async fn list(&self, page: u32, page_size: u32) -> Result<PageWindow<Superhero>, FetchError> {
        debug!(page, page_size, "listing superheroes");
        let res = self
            .http
            .get(self.collection_url())
            .query(&ListQuery { page, page_size })
            .send()
            .await?;
        let mut window: PageWindow<Superhero> = read_json(res).await?;
        window.items = window
            .items
            .into_iter()
            .map(|hero| self.normalize(hero))
            .collect();
        Ok(window)
    }

    async fn get(&self, id: &HeroId) -> Result<Superhero, FetchError> {
        let res = self.http.get(self.item_url(id)).send().await?;
        let hero = read_json(res).await?;
        Ok(self.normalize(hero))
    }

    async fn create(
        &self,
        fields: HeroFields,
        files: Vec<ImageUpload>,
    ) -> Result<Superhero, FetchError> {
        debug!(nickname = %fields.nickname, files = files.len(), "creating superhero");
        let form = create_form(fields, files)?;
        let res = self
            .http
            .post(self.collection_url())
            .multipart(form)
            .send()
            .await?;
        let hero = read_json(res).await?;
        Ok(self.normalize(hero))
    }

    async fn update(
        &self,
        id: &HeroId,
        patch: HeroPatch,
        files: Vec<ImageUpload>,
        keep_images: Option<Vec<String>>,
    ) -> Result<Superhero, FetchError> {
        debug!(%id, files = files.len(), "updating superhero");
        let form = update_form(patch, files, keep_images)?;
        let res = self
            .http
            .put(self.item_url(id))
            .multipart(form)
            .send()
            .await?;
        let hero = read_json(res).await?;
        Ok(self.normalize(hero))
    }

    async fn delete(&self, id: &HeroId) -> Result<DeleteAck, FetchError> {
        debug!(%id, "deleting superhero");
        let res = self.http.delete(self.item_url(id)).send().await?;
        read_json(res).await
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
