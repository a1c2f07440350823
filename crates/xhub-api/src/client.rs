// Hand-crafted async HTTP client for the XNAT REST API (`/xapi/…`) as
// exposed by the JupyterHub plugin.
//
// XNAT embeds its CSRF token as a query parameter rather than a header;
// when a token is configured, every request URL carries `XNAT_CSRF=…`.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;

// ── Credentials ──────────────────────────────────────────────────────

/// How to authenticate against the XNAT server.
#[derive(Clone)]
pub enum Auth {
    /// HTTP basic auth — a real account or an XNAT alias token pair.
    Basic {
        username: String,
        password: SecretString,
    },
    /// Bearer token in the `Authorization` header.
    Bearer(SecretString),
    /// No credentials (an already-authenticated cookie jar, or tests).
    None,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for an XNAT server.
///
/// One instance per server; endpoint groups (`configs`, `dashboards`,
/// `hub`, `users`) hang their calls off this shared transport.
pub struct XnatClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Auth,
    csrf_token: Option<String>,
}

impl XnatClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL, credentials, and transport config.
    pub fn new(base_url: &str, auth: Auth, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self {
            http,
            base_url,
            auth,
            csrf_token: None,
        })
    }

    /// Attach a CSRF token, appended to every request URL.
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Base URL always ends with a trailing slash so relative joins work.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"xapi/jupyterhub/info"`) onto the base
    /// URL, carrying the CSRF token when one is configured.
    fn url(&self, path: &str) -> Result<Url, Error> {
        let mut url = self.base_url.join(path)?;
        if let Some(ref token) = self.csrf_token {
            url.query_pairs_mut().append_pair("XNAT_CSRF", token);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.auth {
            Auth::Basic { username, password } => {
                builder.basic_auth(username, Some(password.expose_secret()))
            }
            Auth::Bearer(token) => builder.bearer_auth(token.expose_secret()),
            Auth::None => builder,
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.request(Method::GET, url).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.request(Method::GET, url).query(params).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.request(Method::POST, url).json(body).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post_no_body<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.request(Method::POST, url).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.request(Method::POST, url).send().await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn post_empty_with_params(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url} params={params:?}");

        let resp = self.request(Method::POST, url).query(params).send().await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn post_body_empty<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.request(Method::POST, url).json(body).send().await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.request(Method::PUT, url).json(body).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn put_body_empty<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.request(Method::PUT, url).json(body).send().await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.request(Method::DELETE, url).send().await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn delete_with_params(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url} params={params:?}");

        let resp = self
            .request(Method::DELETE, url)
            .query(params)
            .send()
            .await?;
        self.handle_empty(resp).await
    }

    pub(crate) async fn delete_with_body<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.request(Method::DELETE, url).json(body).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Error::Authentication {
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
            };
        }

        Error::Api {
            status: status.as_u16(),
            message: if raw.is_empty() {
                status.to_string()
            } else {
                raw
            },
        }
    }
}
