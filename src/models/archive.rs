use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Archive Search API Types
// ============================================================================

/// A search hit from the archive's advanced search endpoint
///
/// The archive is loose about field shapes: `subject` and `collection` come back either as a
/// single string or as a list, and `description` occasionally as a list of paragraphs. All of
/// them are normalized here so nothing downstream has to inspect shapes again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    pub identifier: String,
    #[serde(default, deserialize_with = "text_or_lines")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "text_or_lines")]
    pub description: Option<String>,
    #[serde(default)]
    pub mediatype: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub collection: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub subject: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<OneOrMany> = Option::deserialize(deserializer)?;
    Ok(value.map(Vec::from).unwrap_or_default())
}

fn text_or_lines<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<OneOrMany> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| Vec::from(v).join("\n")))
}

// ============================================================================
// Archive Metadata API Types
// ============================================================================

/// A single file entry from an item's metadata
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArchiveFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub format: String,
    /// Byte size, string-encoded by the archive
    #[serde(default)]
    pub size: Option<String>,
}

impl ArchiveFile {
    /// Whether this file is a playable video rendition
    pub fn is_video(&self) -> bool {
        !self.name.is_empty()
            && (self.format == "MPEG4"
                || self.format == "h.264"
                || self.name.ends_with(".mp4")
                || self.name.ends_with(".ogv"))
    }

    /// Byte size from the leading digits of `size`; missing or non-numeric sizes sort as zero
    pub fn size_bytes(&self) -> u64 {
        self.size
            .as_deref()
            .map(str::trim_start)
            .and_then(|s| {
                let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
                s[..end].parse().ok()
            })
            .unwrap_or(0)
    }
}

/// Response from GET /metadata/{identifier}
#[derive(Debug, Deserialize)]
pub struct ArchiveMetadata {
    #[serde(default)]
    pub files: Vec<ArchiveFile>,
}
