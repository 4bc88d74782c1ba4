//! [`ForgeApi`] implementation backed by the GitHub REST API.
//!
//! Requests go out through octocrab's raw transport so the response status
//! is inspected before the body is decoded. A non-success answer becomes an
//! [`ApiError::Status`] whatever its body looks like.

use super::{ApiError, ContentMetadata, ForgeApi, IssueSummary};
use crate::config::RepoRef;
use async_trait::async_trait;
use http::StatusCode;
use octocrab::Octocrab;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use tracing::debug;
use url::{Position, Url};

/// Placeholder origin used to assemble relative routes; octocrab supplies the real one.
const ROUTE_ORIGIN: &str = "https://api.github.com/";

/// GitHub client used for label scans and content metadata lookups.
#[derive(Clone)]
pub struct GitHubApi {
    octocrab: Octocrab,
}

impl GitHubApi {
    /// Builds an authenticated client.
    ///
    /// # Arguments
    ///
    /// * `token` - Bearer credential sent with every request
    /// * `base_url` - Optional API root (GitHub Enterprise); defaults to api.github.com
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be constructed.
    pub fn new(token: &str, base_url: Option<&Url>) -> Result<Self, octocrab::Error> {
        let mut builder = Octocrab::builder();
        if let Some(url) = base_url {
            builder = builder.base_uri(url.as_str())?;
        }
        let octocrab = builder.personal_token(token.to_string()).build()?;
        Ok(Self { octocrab })
    }

    /// Wraps an already configured client.
    #[must_use]
    pub fn from_octocrab(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }

    /// Sends a GET and decodes a successful JSON answer.
    async fn get_json<T: DeserializeOwned>(&self, route: String) -> Result<T, ApiError> {
        let response = self.octocrab._get(route).await?;
        let status = response.status();
        let body = self.octocrab.body_to_string(response).await?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ForgeApi for GitHubApi {
    async fn list_open_issues(
        &self,
        repo: &RepoRef,
        label: &str,
        per_page: u8,
    ) -> Result<Vec<IssueSummary>, ApiError> {
        debug!(repo = %repo, label, per_page, "Listing open labeled issues");

        let per_page = per_page.to_string();
        let route = route(
            &["repos", &repo.owner, &repo.name, "issues"],
            &[("state", "open"), ("labels", label), ("per_page", &per_page)],
        )?;
        let items: Vec<IssueItem> = self.get_json(route).await?;

        Ok(items
            .into_iter()
            .map(|issue| IssueSummary {
                number: issue.number,
                title: issue.title,
                is_pull_request: issue.pull_request.is_some(),
            })
            .collect())
    }

    async fn content_metadata(
        &self,
        repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> Result<ContentMetadata, ApiError> {
        debug!(repo = %repo, path, git_ref, "Fetching content metadata");

        let mut segments = vec!["repos", repo.owner.as_str(), repo.name.as_str(), "contents"];
        segments.extend(path.split('/').filter(|segment| !segment.is_empty()));
        let route = route(&segments, &[("ref", git_ref)])?;

        let entries = match self.get_json(route).await? {
            ContentResponse::Entry(item) => vec![item],
            ContentResponse::Listing(items) => items,
        };

        select_file_entry(entries, path)
    }
}

impl From<octocrab::Error> for ApiError {
    fn from(error: octocrab::Error) -> Self {
        match &error {
            octocrab::Error::GitHub { source, .. } => {
                ApiError::from_status(source.status_code, source.message.clone())
            }
            octocrab::Error::Serde { .. } | octocrab::Error::Json { .. } => ApiError::Decode {
                message: describe(&error),
            },
            _ => ApiError::Transport {
                message: describe(&error),
            },
        }
    }
}

/// One-line description of an error and its causes.
///
/// Only the first line of each message is kept, which drops the backtrace
/// octocrab appends to its own display output.
fn describe(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = first_line(&error.to_string());
    let mut cause = error.source();
    while let Some(inner) = cause {
        let line = first_line(&inner.to_string());
        if !line.is_empty() && !message.contains(&line) {
            message.push_str(": ");
            message.push_str(&line);
        }
        cause = inner.source();
    }
    message
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().trim().to_string()
}

/// Error document GitHub returns alongside most failures.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Turns a non-success answer into a status error, whatever its body holds.
fn status_error(status: StatusCode, body: &str) -> ApiError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(document) => document.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => format!("unstructured response body ({} bytes)", body.len()),
    };
    ApiError::from_status(status, message)
}

/// Builds a percent-encoded relative route from path segments and a query.
fn route(segments: &[&str], query: &[(&str, &str)]) -> Result<String, ApiError> {
    let invalid = || ApiError::Transport {
        message: format!("cannot build route for '{}'", segments.join("/")),
    };

    let mut url = Url::parse(ROUTE_ORIGIN).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|()| invalid())?
        .clear()
        .extend(segments);
    url.query_pairs_mut().extend_pairs(query);
    Ok(url[Position::BeforePath..].to_string())
}

#[derive(Deserialize)]
struct IssueItem {
    number: u64,
    title: String,
    pull_request: Option<IgnoredAny>,
}

/// A contents endpoint entry before it is narrowed to a single file.
#[derive(Deserialize)]
struct ContentItem {
    name: String,
    path: String,
    #[serde(default)]
    sha: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Files answer with one object, directories with a listing.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentResponse {
    Entry(ContentItem),
    Listing(Vec<ContentItem>),
}

/// Picks the file entry for `path` out of a contents response.
///
/// Directory paths list their children, so anything other than one file
/// entry for the requested path is treated as an undecodable answer.
fn select_file_entry(entries: Vec<ContentItem>, path: &str) -> Result<ContentMetadata, ApiError> {
    let entry = entries
        .into_iter()
        .find(|entry| entry.kind == "file" && entry.path == path)
        .ok_or_else(|| ApiError::Decode {
            message: format!("no file entry for '{path}' in contents response"),
        })?;

    if entry.sha.is_empty() {
        return Err(ApiError::Decode {
            message: format!("contents entry for '{path}' has no sha"),
        });
    }

    Ok(ContentMetadata {
        name: entry.name,
        path: entry.path,
        sha: entry.sha,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    fn entry(kind: &str, path: &str, sha: &str) -> ContentItem {
        ContentItem {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            sha: sha.to_string(),
            kind: kind.to_string(),
        }
    }

    #[test]
    fn selects_matching_file_entry() {
        let entries = vec![entry("file", ".github/workflows/ci.yml", "abc123")];
        let metadata = select_file_entry(entries, ".github/workflows/ci.yml").unwrap();
        assert_eq!(metadata.sha, "abc123");
        assert_eq!(metadata.name, "ci.yml");
    }

    #[test]
    fn rejects_directory_listing() {
        let entries = vec![
            entry("file", ".github/workflows/ci.yml", "abc123"),
            entry("dir", ".github/workflows/nested", "def456"),
        ];
        let result = select_file_entry(entries, ".github/workflows");
        assert!(matches!(result, Err(ApiError::Decode { .. })));
    }

    #[test]
    fn rejects_entry_without_sha() {
        let entries = vec![entry("file", "README.md", "")];
        let result = select_file_entry(entries, "README.md");
        assert!(matches!(result, Err(ApiError::Decode { .. })));
    }

    #[test]
    fn decodes_file_and_directory_answers() {
        let file = r#"{"name":"ci.yml","path":".github/workflows/ci.yml","sha":"abc","type":"file","size":10}"#;
        let dir = r#"[{"name":"ci.yml","path":".github/workflows/ci.yml","sha":"abc","type":"file"}]"#;

        assert!(matches!(
            serde_json::from_str::<ContentResponse>(file).unwrap(),
            ContentResponse::Entry(_)
        ));
        assert!(matches!(
            serde_json::from_str::<ContentResponse>(dir).unwrap(),
            ContentResponse::Listing(ref items) if items.len() == 1
        ));
    }

    #[test]
    fn decodes_pull_request_marker() {
        let body = r#"[
            {"number": 7, "title": "sync", "pull_request": {"url": "x"}},
            {"number": 8, "title": "issue"}
        ]"#;
        let items: Vec<IssueItem> = serde_json::from_str(body).unwrap();
        assert!(items[0].pull_request.is_some());
        assert!(items[1].pull_request.is_none());
    }

    #[test]
    fn html_error_page_keeps_its_status() {
        let error = status_error(StatusCode::BAD_GATEWAY, "<html><body>Bad gateway</body></html>");
        assert!(matches!(
            error,
            ApiError::Status { code: 502, ref reason, .. } if reason == "Bad Gateway"
        ));

        let error = status_error(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(
            error.to_string(),
            "HTTP 503 Service Unavailable: empty response body"
        );
    }

    #[test]
    fn json_error_document_supplies_message() {
        let body = r#"{"message":"Not Found","documentation_url":"https://docs.github.com"}"#;
        let error = status_error(StatusCode::NOT_FOUND, body);
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "HTTP 404 Not Found: Not Found");
    }

    #[test]
    fn routes_are_relative_and_encoded() {
        let route = route(
            &["repos", "org", "svc", "contents", ".github", "my file.yml"],
            &[("ref", "release/1.x")],
        )
        .unwrap();
        assert_eq!(
            route,
            "/repos/org/svc/contents/.github/my%20file.yml?ref=release%2F1.x"
        );
    }

    #[derive(Debug)]
    struct Layer {
        text: &'static str,
        source: Option<Box<Layer>>,
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.text)
        }
    }

    impl std::error::Error for Layer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            self.source
                .as_deref()
                .map(|inner| inner as &(dyn std::error::Error + 'static))
        }
    }

    #[test]
    fn transport_message_is_a_single_line() {
        let error = Layer {
            text: "Service Error: client error (Connect)\n\nFound at\n   0: snafu::backtrace\n",
            source: Some(Box::new(Layer {
                text: "client error (Connect)",
                source: Some(Box::new(Layer {
                    text: "tcp connect error: Connection refused",
                    source: None,
                })),
            })),
        };

        let message = describe(&error);

        assert_eq!(
            message,
            "Service Error: client error (Connect): tcp connect error: Connection refused"
        );
        assert!(!message.contains('\n'));
    }
}
