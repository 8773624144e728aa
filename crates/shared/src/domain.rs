use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned record identifier. Kept as text because backends disagree on
/// whether ids are numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HeroId(pub String);

impl HeroId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HeroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HeroId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for HeroId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for HeroId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(value) => Self(value.to_string()),
            RawId::Text(value) => Self(value),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Superhero {
    #[serde(alias = "_id")]
    pub id: HeroId,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_description: Option<String>,
    #[serde(
        default,
        deserialize_with = "text_or_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub superpowers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catch_phrase: Option<String>,
    /// Opaque image location references, in display order.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Superhero {
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Superpowers are submitted as comma-separated text; some servers echo them
/// back as a list.
fn text_or_list<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        List(Vec<String>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Text(text)) => Some(text),
        Some(Raw::List(list)) => Some(list.join(", ")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_numeric_and_mongo_style_ids() {
        let numeric: Superhero =
            serde_json::from_str(r#"{"id": 42, "nickname": "Nightshade"}"#).expect("numeric");
        assert_eq!(numeric.id, HeroId::from(42));
        assert!(numeric.images.is_empty());

        let mongo: Superhero =
            serde_json::from_str(r#"{"_id": "66f0a1", "nickname": "Nightshade"}"#).expect("mongo");
        assert_eq!(mongo.id.as_str(), "66f0a1");
    }

    #[test]
    fn superpowers_accept_text_or_list() {
        let listed: Superhero = serde_json::from_str(
            r#"{"id": 1, "nickname": "Bolt", "superpowers": ["Flight", "Speed"]}"#,
        )
        .expect("list");
        assert_eq!(listed.superpowers.as_deref(), Some("Flight, Speed"));

        let text: Superhero = serde_json::from_str(
            r#"{"id": 1, "nickname": "Bolt", "superpowers": "Flight, Speed", "catchPhrase": "Zap!"}"#,
        )
        .expect("text");
        assert_eq!(text.superpowers.as_deref(), Some("Flight, Speed"));
        assert_eq!(text.catch_phrase.as_deref(), Some("Zap!"));
    }
}
