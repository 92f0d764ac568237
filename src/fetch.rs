//! Page retrieval: the HTML document plus every reachable CSS source.
//!
//! Linked stylesheets are resolved against the final URL (redirects
//! included) and downloaded concurrently; inline `<style>` blocks are
//! collected as pseudo-files. A stylesheet that fails to download is
//! reported and skipped, never fatal.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::diagnostics::Diagnostics;
use crate::dom::DocumentModel;
use crate::error::Result;
use crate::pipeline::PageData;

const STAGE: &str = "fetch";

const USER_AGENT: &str = concat!("pagesift/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Download `url` and every CSS source the document references.
    pub async fn fetch_page(&self, url: &str, diag: &mut Diagnostics) -> Result<PageData> {
        let parsed_url = Url::parse(url)?;
        let response = self
            .client
            .get(parsed_url)
            .send()
            .await?
            .error_for_status()?;
        // Redirects may move us to another host; resolve CSS against where
        // we actually landed.
        let base_url = response.url().to_string();
        let html = response.text().await?;

        let doc = DocumentModel::parse(&html)?;
        let css_files = self.collect_css(&doc, &base_url, diag).await;
        diag.info(
            STAGE,
            format!("retrieved {} with {} CSS source(s)", base_url, css_files.len()),
        );

        Ok(PageData {
            html,
            base_url,
            css_files,
        })
    }

    async fn collect_css(
        &self,
        doc: &DocumentModel,
        base_url: &str,
        diag: &mut Diagnostics,
    ) -> BTreeMap<String, String> {
        let mut css_files = BTreeMap::new();

        for (index, style) in doc
            .find_all(Some(&["style"]), None, None)
            .into_iter()
            .enumerate()
        {
            let body = style.own_text();
            if !body.trim().is_empty() {
                css_files.insert(format!("inline-{}", index + 1), body);
            }
        }

        let base = Url::parse(base_url).ok();
        let mut targets = Vec::new();
        for link in doc.find_all(Some(&["link"]), None, None) {
            let rel_ok = link
                .attribute("rel")
                .map_or(false, |rel| rel.eq_ignore_ascii_case("stylesheet"));
            if !rel_ok {
                continue;
            }
            let Some(href) = link.attribute("href") else {
                continue;
            };
            match resolve(href, base.as_ref()) {
                Some(resolved) => {
                    if !targets.contains(&resolved) {
                        targets.push(resolved);
                    }
                }
                None => diag.warn(STAGE, format!("unresolvable stylesheet href {:?}", href)),
            }
        }

        let downloads = targets
            .iter()
            .map(|target| self.fetch_css(target.clone()));
        for (target, outcome) in targets
            .iter()
            .zip(futures::future::join_all(downloads).await)
        {
            match outcome {
                Ok(body) => {
                    css_files.insert(target.to_string(), body);
                }
                Err(err) => diag.warn(STAGE, format!("stylesheet {} skipped: {}", target, err)),
            }
        }
        css_files
    }

    async fn fetch_css(&self, url: Url) -> Result<String> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

fn resolve(href: &str, base: Option<&Url>) -> Option<Url> {
    if let Ok(absolute) = Url::parse(href) {
        return Some(absolute);
    }
    base?.join(href).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_hrefs_resolve_against_the_base() {
        let base = Url::parse("https://example.com/shop/index.html").ok();
        let resolved = resolve("css/main.css", base.as_ref()).expect("resolves");
        assert_eq!(resolved.as_str(), "https://example.com/shop/css/main.css");
    }

    #[test]
    fn absolute_hrefs_ignore_the_base() {
        let base = Url::parse("https://example.com/").ok();
        let resolved = resolve("https://cdn.example.net/a.css", base.as_ref()).expect("resolves");
        assert_eq!(resolved.as_str(), "https://cdn.example.net/a.css");
    }

    #[test]
    fn relative_hrefs_without_a_base_are_dropped() {
        assert!(resolve("css/main.css", None).is_none());
    }
}
