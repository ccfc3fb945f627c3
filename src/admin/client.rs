use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::types::{Metadata, Workspace, WorkspaceList};

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url:    String,
        #[source]
        source: Box<ureq::Transport>,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("decoding response from {url}: {source}")]
    Decode {
        url:    String,
        #[source]
        source: std::io::Error,
    },
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Blocking client for the two admin endpoints this tool reads.
///
/// No timeouts are configured: ureq's transport defaults apply. Responses are
/// consumed whole by `into_json`, which drops the reader on every path.
pub struct AdminClient {
    base_url: String,
    headers:  Vec<(String, String)>,
    agent:    ureq::Agent,
}

impl AdminClient {
    /// `headers` are attached to metadata requests only; the workspace list
    /// is fetched unauthenticated.
    pub fn new(base_url: &str, headers: Vec<(String, String)>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers,
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn workspaces_url(&self) -> String {
        format!("{}/workspaces", self.base_url)
    }

    /// The name is inserted unescaped; Kong restricts workspace names to
    /// URL-safe characters.
    pub fn meta_url(&self, workspace: &str) -> String {
        format!("{}/workspaces/{}/meta", self.base_url, workspace)
    }

    /// `GET /workspaces`, returning `data` in API order.
    pub fn list_workspaces(&self) -> Result<Vec<Workspace>, AdminError> {
        let url = self.workspaces_url();
        let list: WorkspaceList = self.get_json(&url, &[])?;
        Ok(list.data)
    }

    /// `GET <url>` with the configured headers, decoded as [`Metadata`].
    pub fn fetch_metadata(&self, url: &str) -> Result<Metadata, AdminError> {
        self.get_json(url, &self.headers)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: &[(String, String)],
    ) -> Result<T, AdminError> {
        debug!(%url, headers = headers.len(), "GET");

        let mut request = self.agent.get(url);
        for (key, value) in headers {
            request = request.set(key, value);
        }

        let response = match request.call() {
            Ok(r) => r,
            Err(ureq::Error::Status(status, _)) => {
                return Err(AdminError::Status { url: url.to_string(), status })
            }
            Err(ureq::Error::Transport(t)) => {
                return Err(AdminError::Transport { url: url.to_string(), source: Box::new(t) })
            }
        };

        response
            .into_json::<T>()
            .map_err(|source| AdminError::Decode { url: url.to_string(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{refused_base_url, Reply, StubServer};

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let client = AdminClient::new("http://kong:8001/", Vec::new());
        assert_eq!(client.base_url(), "http://kong:8001");
        assert_eq!(client.workspaces_url(), "http://kong:8001/workspaces");
        assert_eq!(client.meta_url("default"), "http://kong:8001/workspaces/default/meta");
    }

    #[test]
    fn list_workspaces_returns_api_order() {
        let server = StubServer::start(vec![(
            "/workspaces",
            Reply::Json(200, r#"{"data":[{"name":"b","id":"2"},{"name":"a","id":"1"}]}"#.into()),
        )]);
        let client = AdminClient::new(&server.base_url, Vec::new());

        let names: Vec<String> =
            client.list_workspaces().unwrap().into_iter().map(|w| w.name).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn list_workspaces_sends_no_configured_headers() {
        let server = StubServer::start(vec![(
            "/workspaces",
            Reply::Json(200, r#"{"data":[]}"#.into()),
        )]);
        let client = AdminClient::new(
            &server.base_url,
            vec![("x-admin-token".into(), "secret".into())],
        );

        client.list_workspaces().unwrap();
        let seen = server.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].header("x-admin-token"), None);
    }

    #[test]
    fn fetch_metadata_attaches_headers() {
        let server = StubServer::start(vec![(
            "/workspaces/default/meta",
            Reply::Json(200, r#"{"counts":{"plugins":2}}"#.into()),
        )]);
        let client = AdminClient::new(
            &server.base_url,
            vec![("x-admin-token".into(), "secret".into())],
        );

        let meta = client.fetch_metadata(&client.meta_url("default")).unwrap();
        assert_eq!(meta.counts["plugins"], 2);

        let seen = server.requests();
        assert_eq!(seen[0].path, "/workspaces/default/meta");
        assert_eq!(seen[0].header("x-admin-token"), Some("secret"));
    }

    #[test]
    fn non_success_status_is_an_error() {
        let server = StubServer::start(vec![(
            "/workspaces",
            Reply::Json(500, r#"{"message":"boom"}"#.into()),
        )]);
        let client = AdminClient::new(&server.base_url, Vec::new());

        match client.list_workspaces() {
            Err(AdminError::Status { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let server = StubServer::start(vec![(
            "/workspaces/x/meta",
            Reply::Json(200, "not json".into()),
        )]);
        let client = AdminClient::new(&server.base_url, Vec::new());

        let err = client.fetch_metadata(&client.meta_url("x")).unwrap_err();
        assert!(matches!(err, AdminError::Decode { .. }), "got {err:?}");
    }

    #[test]
    fn refused_connection_is_a_transport_error() {
        let client = AdminClient::new(&refused_base_url(), Vec::new());
        let err = client.list_workspaces().unwrap_err();
        assert!(matches!(err, AdminError::Transport { .. }), "got {err:?}");
        assert!(err.to_string().contains("/workspaces"));
    }
}
