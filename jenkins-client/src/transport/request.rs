//! Request descriptor
//!
//! An [`ApiRequest`] describes one logical API call before any transport sees
//! it: server-relative path, credentials, extra headers and body fields. It is
//! assembled by value and then only read, so it can be logged or reused freely.

use std::collections::BTreeMap;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Basic-auth credentials (user name and API token)
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    token: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Value of the `Authorization` header
    pub fn basic_auth(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.token));
        format!("Basic {encoded}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// One part of a multipart form body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub contents: String,
}

impl FormField {
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}

/// Request body fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fields {
    /// Sent as-is (XML job configuration)
    Raw(String),
    /// Sent as `multipart/form-data`
    Form(Vec<FormField>),
}

impl Fields {
    pub fn form<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Fields::Form(
            pairs
                .into_iter()
                .map(|(name, contents)| FormField::new(name, contents))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Fields::Raw(raw) => raw.is_empty(),
            Fields::Form(fields) => fields.is_empty(),
        }
    }
}

/// Descriptor of one logical API call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    path: String,
    credentials: Credentials,
    headers: BTreeMap<String, String>,
    fields: Option<Fields>,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            path: path.into(),
            credentials,
            headers: BTreeMap::new(),
            fields: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_headers<I>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.headers.extend(headers);
        self
    }

    /// Attach body fields; empty field sets send no body at all
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = (!fields.is_empty()).then_some(fields);
        self
    }

    /// Server-relative path, query string included
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn username(&self) -> &str {
        self.credentials.username()
    }

    pub fn token(&self) -> &str {
        self.credentials.token()
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn fields(&self) -> Option<&Fields> {
        self.fields.as_ref()
    }
}
