use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
}

/// One page of a remotely paginated collection plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default = "first_page", deserialize_with = "at_least_one")]
    pub page: u32,
    #[serde(default = "first_page", deserialize_with = "at_least_one")]
    pub page_size: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page", deserialize_with = "at_least_one")]
    pub total_pages: u32,
}

impl<T> PageWindow<T> {
    /// The window a controller starts from before anything has been fetched.
    pub fn empty(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
            total: 0,
            total_pages: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn first_page() -> u32 {
    1
}

fn at_least_one<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(u32::deserialize(deserializer)?.max(1))
}

/// Text fields of a new record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroFields {
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superpowers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catch_phrase: Option<String>,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superpowers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catch_phrase: Option<String>,
}

impl HeroPatch {
    pub fn is_empty(&self) -> bool {
        self.nickname.is_none()
            && self.real_name.is_none()
            && self.origin_description.is_none()
            && self.superpowers.is_none()
            && self.catch_phrase.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    #[serde(default = "acknowledged")]
    pub ok: bool,
}

fn acknowledged() -> bool {
    true
}
