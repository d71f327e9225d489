//! Wire types for the VLC HTTP interface (`status.json`, `playlist.json`)
//!
//! VLC is loose with its JSON: fields go missing, ids arrive as strings or
//! numbers, and the current playlist entry is flagged with `"current": "current"`.
//! Everything here decodes leniently and leaves interpretation to the caller.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Body of `/requests/status.json`, also echoed by every command
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatusResponse {
    pub state: String,
    /// Playback position as a 0..1 fraction
    pub position: f64,
    /// Elapsed seconds (-1 when unknown)
    pub time: i64,
    /// Total seconds (-1 or 0 when unknown)
    pub length: i64,
    /// Native volume, 0..512 (256 = 100% in VLC terms)
    pub volume: f64,
    pub random: bool,
    pub repeat: bool,
    pub information: Option<Information>,
}

impl StatusResponse {
    /// `information.category.meta`, when VLC reports metadata
    pub fn meta(&self) -> Option<&Meta> {
        self.information.as_ref()?.category.as_ref()?.meta.as_ref()
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Information {
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Category {
    pub meta: Option<Meta>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Meta {
    pub filename: Option<String>,
    pub artist: Option<String>,
}

/// One node of `/requests/playlist.json`. The root's first child is the
/// playlist group; its children are the entries.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaylistNode {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    /// Seconds, -1 when unknown
    pub duration: i64,
    #[serde(deserialize_with = "truthy")]
    pub current: bool,
    pub children: Vec<PlaylistNode>,
}

impl PlaylistNode {
    /// Entries of the first child group, or `None` when the tree has no groups
    pub fn first_group_entries(&self) -> Option<&[PlaylistNode]> {
        self.children.first().map(|group| group.children.as_slice())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    })
}
