//! Remote portal access
//!
//! `Document` is one fetched page: its final URL plus the raw HTML. Selector
//! queries parse on demand and return owned values, so a `Document` can be
//! held across await points. `Portal` is the capability the navigation state
//! machine runs on; `HttpPortal` is the production implementation (reqwest
//! with a cookie store for the portal session, every request gated by the
//! shared throttle).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};
use scraper::{Html, Selector};
use tokio::time::Instant;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, NavigationError, TransportError};
use crate::infrastructure::throttle::AutoThrottle;

/// CSS selector for the patent-services link on the portal entry page
const MENU_LINK_SELECTOR: &str = r#"area[data-mce-href="menu-servicos/patente"]"#;

/// CSS selector for the visited result link on the search response
const DETAILS_LINK_SELECTOR: &str = r#"a.visitado"#;

fn selector(css: &'static str) -> Selector {
    // All selectors in this module are hard-coded literals
    Selector::parse(css).expect("hard-coded selector is valid CSS")
}

/// One fetched portal page
#[derive(Debug, Clone)]
pub struct Document {
    url: Url,
    html: String,
}

/// HTTP method of a parsed form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

/// Shape of the first form on a page, as needed to re-submit it
#[derive(Debug, Clone)]
pub struct SearchForm {
    pub action: Option<String>,
    pub method: FormMethod,
    /// Named inputs with their pre-filled values, in document order
    pub fields: Vec<(String, String)>,
}

impl SearchForm {
    /// Replace the value of a named input in place, appending when absent
    ///
    /// Field order stays as parsed; extra inputs sharing the overridden name
    /// collapse into the first occurrence.
    pub fn override_field(&mut self, name: &str, value: &str) {
        let mut replaced = false;
        self.fields.retain_mut(|(n, v)| {
            if n == name {
                if replaced {
                    return false;
                }
                *v = value.to_string();
                replaced = true;
            }
            true
        });
        if !replaced {
            self.fields.push((name.to_string(), value.to_string()));
        }
    }
}

impl Document {
    pub fn new(url: Url, html: String) -> Self {
        Self { url, html }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// `href` of the patent-services menu link, if present
    pub fn menu_link(&self) -> Option<String> {
        self.first_href(MENU_LINK_SELECTOR)
    }

    /// `href` of the visited result link, if present
    pub fn details_link(&self) -> Option<String> {
        self.first_href(DETAILS_LINK_SELECTOR)
    }

    fn first_href(&self, css: &'static str) -> Option<String> {
        let dom = Html::parse_document(&self.html);
        let sel = selector(css);
        dom.select(&sel)
            .find_map(|el| el.value().attr("href"))
            .map(|href| href.to_string())
    }

    /// First form on the page, with its named inputs carried over
    ///
    /// Mirrors what the portal's own browser submission would send: every
    /// named input keeps its pre-filled value (hidden session fields
    /// included), and the caller overrides the search field.
    pub fn search_form(&self) -> Option<SearchForm> {
        let dom = Html::parse_document(&self.html);
        let form_sel = selector("form");
        let input_sel = selector("input[name]");

        let form = dom.select(&form_sel).next()?;
        let action = form.value().attr("action").map(|a| a.to_string());
        let method = match form.value().attr("method") {
            Some(m) if m.eq_ignore_ascii_case("post") => FormMethod::Post,
            // HTML defaults to GET when the method is absent or unknown
            _ => FormMethod::Get,
        };

        let fields = form
            .select(&input_sel)
            .filter_map(|input| {
                let name = input.value().attr("name")?;
                let value = input.value().attr("value").unwrap_or("");
                Some((name.to_string(), value.to_string()))
            })
            .collect();

        Some(SearchForm {
            action,
            method,
            fields,
        })
    }
}

/// Portal access capability
///
/// Treated as unreliable I/O: any call may fail with a transport error.
#[async_trait]
pub trait Portal: Send + Sync {
    /// Fetch an absolute URL
    async fn fetch(&self, url: &str) -> Result<Document, AppError>;

    /// Follow a (possibly relative) link found on `from`
    async fn follow(&self, from: &Document, href: &str) -> Result<Document, AppError>;

    /// Re-submit the first form on `from` with one field overridden
    ///
    /// Fails with `NavigationError::FormNotFound` when the page carries no
    /// submittable form.
    async fn submit_form(
        &self,
        from: &Document,
        field: &str,
        value: &str,
    ) -> Result<Document, AppError>;
}

/// Production portal implementation
pub struct HttpPortal {
    client: Client,
    throttle: Arc<AutoThrottle>,
}

impl HttpPortal {
    pub fn new(config: &Config, throttle: Arc<AutoThrottle>) -> Result<Self, AppError> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("inpi_status_sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::RequestFailed {
                url: config.entry_url.clone(),
                source: e,
            })?;
        Ok(Self { client, throttle })
    }

    fn parse_url(raw: &str) -> Result<Url, AppError> {
        Url::parse(raw).map_err(|e| {
            TransportError::InvalidUrl {
                url: raw.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn resolve(base: &Url, href: &str) -> Result<Url, AppError> {
        base.join(href).map_err(|e| {
            TransportError::InvalidUrl {
                url: href.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Send one throttled request and read the body
    async fn execute(&self, request: reqwest::RequestBuilder, url: Url) -> Result<Document, AppError> {
        self.throttle.acquire().await;

        let started = Instant::now();
        let response = request.send().await.map_err(|e| TransportError::RequestFailed {
            url: url.to_string(),
            source: e,
        });
        let latency = started.elapsed();

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                self.throttle.record(latency, false).await;
                return Err(e.into());
            }
        };

        let ok = response.status().is_success();
        self.throttle.record(latency, ok).await;
        if !ok {
            return Err(TransportError::BadStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            }
            .into());
        }

        let final_url = response.url().clone();
        let html = response.text().await.map_err(|e| TransportError::RequestFailed {
            url: final_url.to_string(),
            source: e,
        })?;
        debug!("fetched {} ({} bytes)", final_url, html.len());

        Ok(Document::new(final_url, html))
    }
}

#[async_trait]
impl Portal for HttpPortal {
    async fn fetch(&self, url: &str) -> Result<Document, AppError> {
        let url = Self::parse_url(url)?;
        self.execute(self.client.get(url.clone()), url).await
    }

    async fn follow(&self, from: &Document, href: &str) -> Result<Document, AppError> {
        let url = Self::resolve(from.url(), href)?;
        self.execute(self.client.get(url.clone()), url).await
    }

    async fn submit_form(
        &self,
        from: &Document,
        field: &str,
        value: &str,
    ) -> Result<Document, AppError> {
        let mut form = from
            .search_form()
            .ok_or_else(|| NavigationError::FormNotFound {
                url: from.url().to_string(),
            })?;

        let url = match &form.action {
            Some(action) => Self::resolve(from.url(), action)?,
            None => from.url().clone(),
        };

        // Carry over the form's own fields in order, overriding the search field
        form.override_field(field, value);

        let request = match form.method {
            FormMethod::Post => self.client.post(url.clone()).form(&form.fields),
            FormMethod::Get => self.client.get(url.clone()).query(&form.fields),
        };
        self.execute(request, url).await
    }
}
