use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("url has no host: {0}")]
    MissingHost(String),
}

/// Parts of an HTTP target given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlData {
    /// Lowercase scheme, `http` when none is given
    pub protocol: String,
    pub host: String,
    /// Empty when the target has no path at all
    pub path: String,
    /// Only set when the target names a non-default port
    pub port: Option<u16>,
    pub query: String,
}

impl UrlData {
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let input = if input.contains("://") {
            input.to_string()
        } else {
            format!("http://{input}")
        };
        let url = Url::parse(&input)?;

        let host = url
            .host_str()
            .ok_or_else(|| TargetError::MissingHost(input.clone()))?
            .to_string();

        // The url crate reports "/" for a bare host.
        let rest = input.split_once("://").map_or("", |(_, rest)| rest);
        let has_path = rest
            .find(['/', '?', '#'])
            .is_some_and(|i| rest[i..].starts_with('/'));
        let path = if has_path {
            url.path().to_string()
        } else {
            String::new()
        };

        Ok(Self {
            protocol: url.scheme().to_string(),
            host,
            path,
            port: url.port(),
            query: url.query().unwrap_or_default().to_string(),
        })
    }
}

/// Returns `new` unless it is the default value, in which case `orig` is kept.
pub fn override_opt<T: Default + PartialEq>(orig: T, new: T) -> T {
    if new == T::default() { orig } else { new }
}
