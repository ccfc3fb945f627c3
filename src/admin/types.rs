use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A named partition in the admin API. `name` is the path segment used for
/// the `/workspaces/<name>/meta` lookup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Workspace {
    pub name: String,
    #[serde(default)]
    pub id: String,
}

/// Envelope of `GET /workspaces`.
#[derive(Debug, Deserialize)]
pub(crate) struct WorkspaceList {
    #[serde(default)]
    pub data: Vec<Workspace>,
}

/// Body of `GET /workspaces/<name>/meta`.
///
/// `counts` is kept as a free-form JSON object: deployments report
/// different counters, and some nest them one level deeper. Flattening to
/// plain integers happens in [`crate::report::aggregate::flatten`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub counts: Map<String, Value>,
}

/// `"counts": null` reads as no counters rather than a decode failure.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}
