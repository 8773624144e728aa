//! Create/edit drafts: field validation, pending image uploads and change
//! detection before a record is sent to the collection API.

use shared::{
    domain::{HeroId, Superhero},
    protocol::{HeroFields, HeroPatch},
};
use thiserror::Error;

use crate::ImageUpload;

/// Per-record image limit for a single submission.
pub const MAX_IMAGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("invalid fields: {}", describe(.0))]
    InvalidFields(Vec<FieldError>),
    #[error("only images allowed: {filename}")]
    NotAnImage { filename: String },
    #[error("no changes to save")]
    Unchanged,
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.message, e.field))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeroDraft {
    pub nickname: String,
    pub real_name: String,
    pub superpowers: String,
    pub origin: String,
    pub catch_phrase: String,
}

impl HeroDraft {
    pub fn from_hero(hero: &Superhero) -> Self {
        Self {
            nickname: hero.nickname.clone(),
            real_name: hero.real_name.clone().unwrap_or_default(),
            superpowers: hero.superpowers.clone().unwrap_or_default(),
            origin: hero.origin_description.clone().unwrap_or_default(),
            catch_phrase: hero.catch_phrase.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<HeroFields, DraftError> {
        let rules: [(&'static str, &str, usize, &'static str); 5] = [
            ("nickname", self.nickname.as_str(), 2, "Nickname is required"),
            ("realName", self.real_name.as_str(), 2, "Real name is required"),
            ("superpowers", self.superpowers.as_str(), 2, "List at least one superpower"),
            ("origin", self.origin.as_str(), 5, "Origin is required"),
            ("catchPhrase", self.catch_phrase.as_str(), 2, "Catch phrase is required"),
        ];

        let errors: Vec<FieldError> = rules
            .iter()
            .filter(|(_, value, min, _)| value.trim().chars().count() < *min)
            .map(|&(field, _, _, message)| FieldError { field, message })
            .collect();
        if !errors.is_empty() {
            return Err(DraftError::InvalidFields(errors));
        }

        Ok(HeroFields {
            nickname: self.nickname.trim().to_string(),
            real_name: Some(self.real_name.trim().to_string()),
            origin_description: Some(self.origin.trim().to_string()),
            superpowers: Some(normalize_superpowers(&self.superpowers)),
            catch_phrase: Some(self.catch_phrase.trim().to_string()),
        })
    }
}

/// `" Flight,, invisibility ,"` becomes `"Flight, invisibility"`.
pub fn normalize_superpowers(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|power| !power.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Files chosen for upload but not sent yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSelection {
    files: Vec<ImageUpload>,
    capacity: usize,
}

impl Default for ImageSelection {
    fn default() -> Self {
        Self::with_capacity(MAX_IMAGES)
    }
}

impl ImageSelection {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            files: Vec::new(),
            capacity,
        }
    }

    /// Appends `chosen` and drops whatever exceeds the capacity. Returns how
    /// many were accepted. A non-image file rejects the whole batch.
    pub fn add(&mut self, chosen: Vec<ImageUpload>) -> Result<usize, DraftError> {
        if let Some(bad) = chosen.iter().find(|upload| !upload.is_image()) {
            return Err(DraftError::NotAnImage {
                filename: bad.filename.clone(),
            });
        }
        let room = self.capacity.saturating_sub(self.files.len());
        let accepted = chosen.len().min(room);
        if accepted < chosen.len() {
            tracing::debug!(
                dropped = chosen.len() - accepted,
                capacity = self.capacity,
                "image selection full"
            );
        }
        self.files.extend(chosen.into_iter().take(accepted));
        Ok(accepted)
    }

    pub fn remove_at(&mut self, idx: usize) -> Option<ImageUpload> {
        (idx < self.files.len()).then(|| self.files.remove(idx))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[ImageUpload] {
        &self.files
    }

    fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.files.truncate(capacity);
    }

    pub fn into_files(self) -> Vec<ImageUpload> {
        self.files
    }
}

/// Everything the edit flow sends in one `update` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub id: HeroId,
    pub patch: HeroPatch,
    pub files: Vec<ImageUpload>,
    pub keep_images: Option<Vec<String>>,
}

/// Edit state for one loaded record.
#[derive(Debug, Clone)]
pub struct EditSession {
    original: Superhero,
    pub draft: HeroDraft,
    kept_images: Vec<String>,
    new_images: ImageSelection,
}

impl EditSession {
    pub fn begin(original: Superhero) -> Self {
        let draft = HeroDraft::from_hero(&original);
        let kept_images = original.images.clone();
        let new_images =
            ImageSelection::with_capacity(MAX_IMAGES.saturating_sub(kept_images.len()));
        Self {
            original,
            draft,
            kept_images,
            new_images,
        }
    }

    pub fn id(&self) -> &HeroId {
        &self.original.id
    }

    pub fn kept_images(&self) -> &[String] {
        &self.kept_images
    }

    pub fn new_images(&self) -> &ImageSelection {
        &self.new_images
    }

    /// Drops an existing image reference; freed room becomes available to new
    /// uploads.
    pub fn remove_kept(&mut self, reference: &str) -> bool {
        let before = self.kept_images.len();
        self.kept_images.retain(|kept| kept != reference);
        let removed = self.kept_images.len() != before;
        if removed {
            self.new_images
                .set_capacity(MAX_IMAGES.saturating_sub(self.kept_images.len()));
        }
        removed
    }

    pub fn add_images(&mut self, chosen: Vec<ImageUpload>) -> Result<usize, DraftError> {
        self.new_images.add(chosen)
    }

    pub fn is_dirty(&self) -> bool {
        HeroDraft::from_hero(&self.original) != self.draft
            || self.kept_images != self.original.images
            || !self.new_images.is_empty()
    }

    pub fn into_request(self) -> Result<UpdateRequest, DraftError> {
        if !self.is_dirty() {
            return Err(DraftError::Unchanged);
        }
        let fields = self.draft.validate()?;
        Ok(UpdateRequest {
            id: self.original.id,
            patch: HeroPatch {
                nickname: Some(fields.nickname),
                real_name: fields.real_name,
                origin_description: fields.origin_description,
                superpowers: fields.superpowers,
                catch_phrase: fields.catch_phrase,
            },
            files: self.new_images.into_files(),
            keep_images: Some(self.kept_images),
        })
    }
}

#[cfg(test)]
#[path = "tests/draft_tests.rs"]
mod tests;
