//! Reddit listing client over libcurl (via the `curl` crate).
//!
//! Anonymous clients read the public `.json` endpoints; a configured account
//! logs in with the OAuth password grant and uses `oauth.reddit.com`.

use curl::easy::{Easy, List};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::AccountConfig;

use super::listing::{parse_comment_thread, parse_submissions};
use super::{Comment, DiscoveryError, FeedClient, ListingRequest, Submission};

const PUBLIC_ROOT: &str = "https://www.reddit.com";
const OAUTH_ROOT: &str = "https://oauth.reddit.com";
const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const DEFAULT_USER_AGENT: &str = concat!("rdl/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Blocking reddit client. Each request runs on the calling thread.
#[derive(Debug, Clone)]
pub struct RedditClient {
    api_root: String,
    user_agent: String,
    bearer: Option<String>,
}

impl RedditClient {
    /// Client for the public JSON endpoints (no account).
    pub fn anonymous(user_agent: Option<&str>) -> Self {
        Self {
            api_root: PUBLIC_ROOT.to_string(),
            user_agent: user_agent.unwrap_or(DEFAULT_USER_AGENT).to_string(),
            bearer: None,
        }
    }

    /// Log in with a script app's password grant. Fails with [`DiscoveryError::Auth`]
    /// when reddit refuses the credentials.
    pub fn login(account: &AccountConfig) -> Result<Self, DiscoveryError> {
        let user_agent = account
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "password")
            .append_pair("username", &account.user)
            .append_pair("password", &account.password)
            .finish();

        let mut easy = new_handle(TOKEN_URL, &user_agent)?;
        easy.post(true)?;
        easy.post_fields_copy(form.as_bytes())?;
        easy.username(&account.client_id)?;
        easy.password(&account.client_secret)?;
        let body = perform(&mut easy, TOKEN_URL)?;

        let token: TokenResponse = serde_json::from_slice(&body)?;
        match (token.access_token, token.error) {
            (Some(access), _) if !access.is_empty() => {
                tracing::info!(user = %account.user, "logged in to reddit");
                Ok(Self {
                    api_root: OAUTH_ROOT.to_string(),
                    user_agent,
                    bearer: Some(access),
                })
            }
            (_, Some(err)) => Err(DiscoveryError::Auth(err)),
            _ => Err(DiscoveryError::Auth("no access token in response".to_string())),
        }
    }

    fn get(&self, url: &Url) -> Result<Vec<u8>, DiscoveryError> {
        tracing::debug!(%url, "GET");
        let mut easy = new_handle(url.as_str(), &self.user_agent)?;
        if let Some(token) = &self.bearer {
            let mut headers = List::new();
            headers.append(&format!("Authorization: bearer {}", token))?;
            easy.http_headers(headers)?;
        }
        perform(&mut easy, url.as_str())
    }
}

impl FeedClient for RedditClient {
    fn submissions(&self, request: &ListingRequest) -> Result<Vec<Submission>, DiscoveryError> {
        let url = listing_url(&self.api_root, self.bearer.is_none(), request)?;
        let body = self.get(&url)?;
        parse_submissions(&body)
    }

    fn comments(&self, submission: &Submission) -> Result<Vec<Comment>, DiscoveryError> {
        let url = comments_url(&self.api_root, self.bearer.is_none(), &submission.id)?;
        let body = self.get(&url)?;
        parse_comment_thread(&body)
    }
}

/// Public endpoints need a `.json` suffix; the OAuth host serves JSON directly.
fn endpoint(api_root: &str, path: &str, json_suffix: bool) -> Result<Url, DiscoveryError> {
    let suffix = if json_suffix { ".json" } else { "" };
    Ok(Url::parse(&format!("{}{}{}", api_root, path, suffix))?)
}

fn listing_url(
    api_root: &str,
    json_suffix: bool,
    request: &ListingRequest,
) -> Result<Url, DiscoveryError> {
    let mut url = endpoint(api_root, &request.path(), json_suffix)?;
    url.query_pairs_mut()
        .append_pair("limit", &request.limit.to_string())
        .append_pair("raw_json", "1");
    Ok(url)
}

fn comments_url(api_root: &str, json_suffix: bool, id: &str) -> Result<Url, DiscoveryError> {
    let mut url = endpoint(api_root, &format!("/comments/{}", id), json_suffix)?;
    url.query_pairs_mut().append_pair("raw_json", "1");
    Ok(url)
}

fn new_handle(url: &str, user_agent: &str) -> Result<Easy, DiscoveryError> {
    let mut easy = Easy::new();
    easy.url(url)?;
    easy.useragent(user_agent)?;
    easy.follow_location(true)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(30))?;
    Ok(easy)
}

fn perform(easy: &mut Easy, url: &str) -> Result<Vec<u8>, DiscoveryError> {
    let mut body = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }
    let status = easy.response_code()?;
    if !(200..300).contains(&status) {
        return Err(DiscoveryError::Status {
            url: url.to_string(),
            status,
        });
    }
    Ok(body)
}
