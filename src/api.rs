// API client module: a small blocking GraphQL client for the Hashnode API.
// Each operation sends at most one POST to the configured endpoint and
// returns a typed result. Transport and decoding failures come back as
// `PublishError` values; nothing here panics on a bad response.

use crate::error::{GraphQlError, PublishError};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};

pub const DEFAULT_ENDPOINT: &str = "https://api.hashnode.com";
pub const API_KEY_VAR: &str = "HASHNODE_API_KEY";
pub const ENDPOINT_VAR: &str = "HASHNODE_API_ENDPOINT";

/// Tags sent when a draft carries none.
pub const DEFAULT_TAGS: [&str; 2] = ["automation", "ai"];

const POST_URL_PREFIX: &str = "https://hashnode.com/@";

const ME_QUERY: &str = r#"
query {
    me {
        username
        name
        publication {
            _id
            domain
            name
        }
    }
}
"#;

const PUBLICATIONS_QUERY: &str = r#"
query {
    me {
        publications {
            _id
            name
            domain
        }
    }
}
"#;

const CREATE_STORY_MUTATION: &str = r#"
mutation createStory($input: CreateStoryInput!) {
    createStory(input: $input) {
        code
        success
        message
        post {
            _id
            title
            slug
            url
        }
    }
}
"#;

/// Endpoint and credential for a `PublisherClient`. Built explicitly or
/// from the environment by the binary; the client itself never reads the
/// environment.
#[derive(Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
}

// The key never shows up in logs or panic messages.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            endpoint: DEFAULT_ENDPOINT.into(),
            api_key: None,
        }
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        ClientConfig::default().with_api_key(api_key)
    }

    /// Read `HASHNODE_API_KEY` and the optional `HASHNODE_API_ENDPOINT`
    /// override. A missing or blank key leaves the config without one.
    pub fn from_env() -> Self {
        let mut config = ClientConfig::default();
        if let Ok(endpoint) = std::env::var(ENDPOINT_VAR) {
            config = config.with_endpoint(endpoint);
        }
        if let Ok(key) = std::env::var(API_KEY_VAR) {
            config = config.with_api_key(key);
        }
        config
    }

    /// Set the credential. Blank keys count as no key at all.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = if key.trim().is_empty() { None } else { Some(key) };
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// What to publish. `tags`, `slug` and `publication_id` are optional:
/// empty tags fall back to [`DEFAULT_TAGS`], and an absent or empty slug
/// or publication id is left out of the request entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub slug: Option<String>,
    pub publication_id: Option<String>,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        PostDraft {
            title: title.into(),
            content: content.into(),
            ..PostDraft::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_publication_id(mut self, publication_id: impl Into<String>) -> Self {
        self.publication_id = Some(publication_id.into());
        self
    }
}

/// A successfully created post. `url` is always derived from the slug.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishedPost {
    pub url: String,
    pub slug: String,
    pub title: String,
}

impl PublishedPost {
    fn from_slug(slug: String, title: String) -> Self {
        PublishedPost {
            url: format!("{POST_URL_PREFIX}{slug}"),
            slug,
            title,
        }
    }
}

/// Outcome of a single `create_post` call: exactly one of a published
/// post or an error.
pub type PublishResult = Result<PublishedPost, PublishError>;

/// A publication (blog) owned by the authenticated user.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub domain: Option<String>,
}

/// The authenticated account, as returned by the `me` query.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub username: String,
    pub name: Option<String>,
    pub publication: Option<Publication>,
}

#[derive(Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<V>,
}

// Both fields stay untyped until `errors` has been checked, so a partial
// payload next to an errors array is still reported as a remote error and
// error entries of any shape survive.
#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    errors: Option<Value>,
}

fn collect_errors(errors: Value) -> Vec<GraphQlError> {
    match errors {
        Value::Array(entries) => entries.into_iter().map(GraphQlError::from).collect(),
        other => vec![GraphQlError::from(other)],
    }
}

#[derive(Deserialize)]
struct MeData<T> {
    me: Option<T>,
}

#[derive(Deserialize)]
struct PublicationsField {
    publications: Option<Vec<Publication>>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct CreateStoryInput<'a> {
    title: &'a str,
    content_format: &'static str,
    body_markdown: &'a str,
    tags: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publication_id: Option<&'a str>,
}

impl<'a> From<&'a PostDraft> for CreateStoryInput<'a> {
    fn from(draft: &'a PostDraft) -> Self {
        let tags = if draft.tags.is_empty() {
            DEFAULT_TAGS.to_vec()
        } else {
            draft.tags.iter().map(String::as_str).collect()
        };
        CreateStoryInput {
            title: &draft.title,
            content_format: "MARKDOWN",
            body_markdown: &draft.content,
            tags,
            slug: draft.slug.as_deref().filter(|s| !s.is_empty()),
            publication_id: draft.publication_id.as_deref().filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Serialize, Debug)]
struct CreateStoryVariables<'a> {
    input: CreateStoryInput<'a>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateStoryData {
    create_story: Option<CreateStoryPayload>,
}

#[derive(Deserialize, Default)]
struct CreateStoryPayload {
    code: Option<Value>,
    success: Option<bool>,
    message: Option<String>,
    post: Option<StoryPost>,
}

#[derive(Deserialize)]
struct StoryPost {
    title: String,
    slug: String,
    // Requested for completeness; the published URL is built from `slug`.
    url: Option<String>,
}

/// Blocking client for the Hashnode GraphQL endpoint. The credential is
/// fixed at construction and sent verbatim in `Authorization`.
#[derive(Clone)]
pub struct PublisherClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl PublisherClient {
    /// Build a client from `config`. Fails only if the key cannot be used
    /// as a header value or the HTTP client cannot be created; a missing
    /// key is reported later, by each operation.
    pub fn new(config: ClientConfig) -> Result<Self, PublishError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let mut value = HeaderValue::from_str(key)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(PublishError::Client)?;
        Ok(PublisherClient {
            client,
            endpoint: config.endpoint,
            api_key: config.api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch the authenticated user's username, name and publication.
    pub fn fetch_current_user(&self) -> Result<UserInfo, PublishError> {
        let data: MeData<UserInfo> = self.query(ME_QUERY)?;
        let user = data
            .me
            .ok_or_else(|| PublishError::malformed("`me` is missing"))?;
        debug!(username = %user.username, "fetched current user");
        Ok(user)
    }

    /// Fetch every publication of the authenticated user.
    pub fn fetch_publications(&self) -> Result<Vec<Publication>, PublishError> {
        let data: MeData<PublicationsField> = self.query(PUBLICATIONS_QUERY)?;
        let publications = data
            .me
            .ok_or_else(|| PublishError::malformed("`me` is missing"))?
            .publications
            .unwrap_or_default();
        debug!(count = publications.len(), "fetched publications");
        Ok(publications)
    }

    /// Create a story from `draft`. Always returns a value: transport
    /// failures, GraphQL errors and rejected mutations are all `Err`.
    pub fn create_post(&self, draft: &PostDraft) -> PublishResult {
        info!(title = %draft.title, "publishing story");
        let variables = CreateStoryVariables {
            input: CreateStoryInput::from(draft),
        };
        let result = self
            .execute::<_, CreateStoryData>(CREATE_STORY_MUTATION, Some(variables))
            .and_then(interpret_create_story);
        match &result {
            Ok(post) => info!(url = %post.url, "story published"),
            Err(err) => warn!(error = %err, "publishing failed"),
        }
        result
    }

    fn query<T: DeserializeOwned>(&self, query: &str) -> Result<T, PublishError> {
        self.execute::<(), T>(query, None)
    }

    /// POST one GraphQL document and decode its `data` as `T`.
    fn execute<V, T>(&self, query: &str, variables: Option<V>) -> Result<T, PublishError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        if !self.has_api_key() {
            warn!("refusing to call the API without a key");
            return Err(PublishError::MissingCredential);
        }

        let body = GraphQlRequest { query, variables };
        let res = self.client.post(&self.endpoint).json(&body).send()?;
        debug!(status = %res.status(), "received response");

        let payload: Value = res.json()?;
        let response: GraphQlResponse =
            serde_json::from_value(payload).map_err(PublishError::malformed)?;
        if let Some(errors) = response.errors.map(collect_errors) {
            warn!(count = errors.len(), "API returned errors");
            return Err(PublishError::Remote(errors));
        }

        let data = response
            .data
            .ok_or_else(|| PublishError::malformed("response carried no data"))?;
        serde_json::from_value(data).map_err(PublishError::malformed)
    }
}

fn interpret_create_story(data: CreateStoryData) -> PublishResult {
    let payload = data.create_story.unwrap_or_default();
    debug!(code = ?payload.code, success = ?payload.success, "createStory payload");
    if payload.success != Some(true) {
        let message = payload
            .message
            .unwrap_or_else(|| "createStory did not report success".into());
        return Err(PublishError::Application { message });
    }
    let post = payload
        .post
        .ok_or_else(|| PublishError::malformed("`createStory.post` is missing"))?;
    debug!(api_url = ?post.url, "ignoring returned url");
    Ok(PublishedPost::from_slug(post.slug, post.title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input_json(draft: &PostDraft) -> Value {
        let variables = CreateStoryVariables {
            input: CreateStoryInput::from(draft),
        };
        serde_json::to_value(variables).unwrap()["input"].clone()
    }

    #[test]
    fn input_omits_slug_and_publication_when_absent() {
        let input = input_json(&PostDraft::new("Title", "Body"));
        assert!(input.get("slug").is_none());
        assert!(input.get("publicationId").is_none());
        assert_eq!(input["contentFormat"], "MARKDOWN");
        assert_eq!(input["bodyMarkdown"], "Body");
    }

    #[test]
    fn input_omits_empty_slug() {
        let input = input_json(&PostDraft::new("Title", "Body").with_slug(""));
        assert!(input.get("slug").is_none());
    }

    #[test]
    fn input_defaults_tags() {
        let input = input_json(&PostDraft::new("Title", "Body"));
        assert_eq!(input["tags"], json!(["automation", "ai"]));

        let no_tags: Vec<String> = Vec::new();
        let input = input_json(&PostDraft::new("Title", "Body").with_tags(no_tags));
        assert_eq!(input["tags"], json!(["automation", "ai"]));
    }

    #[test]
    fn input_keeps_given_fields() {
        let draft = PostDraft::new("Title", "Body")
            .with_tags(["rust", "cli"])
            .with_slug("my-post")
            .with_publication_id("pub-1");
        let input = input_json(&draft);
        assert_eq!(input["tags"], json!(["rust", "cli"]));
        assert_eq!(input["slug"], "my-post");
        assert_eq!(input["publicationId"], "pub-1");
    }

    #[test]
    fn request_without_variables_has_only_query() {
        let body = GraphQlRequest::<()> {
            query: "query { me { username } }",
            variables: None,
        };
        let value = serde_json::to_value(body).unwrap();
        assert_eq!(value, json!({ "query": "query { me { username } }" }));
    }

    #[test]
    fn success_url_comes_from_slug() {
        let data: CreateStoryData = serde_json::from_value(json!({
            "createStory": {
                "code": 200,
                "success": true,
                "message": null,
                "post": {
                    "_id": "abc",
                    "title": "Hello",
                    "slug": "foo",
                    "url": "https://someone.hashnode.dev/foo"
                }
            }
        }))
        .unwrap();
        let post = interpret_create_story(data).unwrap();
        assert_eq!(post.url, "https://hashnode.com/@foo");
        assert_eq!(post.slug, "foo");
        assert_eq!(post.title, "Hello");
    }

    #[test]
    fn unsuccessful_story_carries_message() {
        let data: CreateStoryData = serde_json::from_value(json!({
            "createStory": { "success": false, "message": "Duplicate slug", "post": null }
        }))
        .unwrap();
        match interpret_create_story(data) {
            Err(PublishError::Application { message }) => assert_eq!(message, "Duplicate slug"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn missing_create_story_is_an_application_error() {
        let data: CreateStoryData = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            interpret_create_story(data),
            Err(PublishError::Application { .. })
        ));
    }

    #[test]
    fn success_without_post_is_malformed() {
        let data: CreateStoryData = serde_json::from_value(json!({
            "createStory": { "success": true, "post": null }
        }))
        .unwrap();
        assert!(matches!(
            interpret_create_story(data),
            Err(PublishError::Remote(_))
        ));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        assert!(!ClientConfig::new("   ").has_api_key());
        assert!(ClientConfig::new("abc").has_api_key());
        assert_eq!(ClientConfig::default().endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn errors_of_any_shape_are_kept() {
        let errors = collect_errors(json!([
            "boom",
            { "message": "Bad tag", "path": ["createStory"] }
        ]));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "boom");
        assert_eq!(errors[1].message, "Bad tag");
        assert_eq!(errors[1].extra["path"], json!(["createStory"]));

        let errors = collect_errors(json!("not an array"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "not an array");
    }

    #[test]
    fn debug_hides_the_key() {
        let shown = format!("{:?}", ClientConfig::new("super-secret"));
        assert!(!shown.contains("super-secret"), "{shown}");
        assert!(shown.contains("<redacted>"), "{shown}");

        let shown = format!("{:?}", ClientConfig::default());
        assert!(shown.contains("api_key: None"), "{shown}");
    }

    #[test]
    fn key_with_newline_is_rejected() {
        let result = PublisherClient::new(ClientConfig::new("bad\nkey"));
        assert!(matches!(result, Err(PublishError::InvalidCredential(_))));
    }
}
