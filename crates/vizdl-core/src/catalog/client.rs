//! libcurl-backed catalog client.
//!
//! Each call uses a fresh `Easy` handle and runs in the current thread.

use super::{page_url, Catalog, CatalogPage};
use crate::retry::FetchError;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

const USER_AGENT: &str = concat!("vizdl/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: u32 = 10;

/// Catalog client over blocking libcurl transfers.
#[derive(Debug, Clone)]
pub struct CurlCatalog {
    endpoint: String,
    accept_language: String,
    timeout: Duration,
}

impl CurlCatalog {
    pub fn new(endpoint: impl Into<String>, accept_language: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            accept_language: accept_language.into(),
            timeout,
        }
    }

    fn easy(&self, url: &str) -> Result<curl::easy::Easy, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(MAX_REDIRECTS)?;
        easy.useragent(USER_AGENT)?;
        easy.fail_on_error(true)?;
        easy.connect_timeout(self.timeout)?;
        easy.timeout(self.timeout)?;
        Ok(easy)
    }
}

fn check_status(easy: &mut curl::easy::Easy) -> Result<(), FetchError> {
    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    Ok(())
}

impl Catalog for CurlCatalog {
    fn fetch_page(&self, page: u32) -> Result<CatalogPage, FetchError> {
        let url = page_url(&self.endpoint, page)?;
        tracing::debug!(page, url = %url, "fetching catalog page");

        let mut easy = self.easy(url.as_str())?;
        let mut list = curl::easy::List::new();
        list.append(&format!("Accept-Language: {}", self.accept_language))?;
        list.append("Accept: application/json")?;
        easy.http_headers(list)?;

        let mut body: Vec<u8> = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }
        check_status(&mut easy)?;

        let page: CatalogPage = serde_json::from_slice(&body)?;
        tracing::debug!(page_entries = page.entries().len(), bytes = body.len(), "decoded catalog page");
        Ok(page)
    }

    fn download(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        tracing::debug!(url, dest = %dest.display(), "downloading");

        // Truncates whatever an earlier attempt or run left behind.
        let mut file = File::create(dest)?;
        let mut written: u64 = 0;
        let mut write_err: Option<std::io::Error> = None;

        let mut easy = self.easy(url)?;
        let result = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match file.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };
        if let Some(e) = write_err {
            return Err(FetchError::Io(e));
        }
        result?;
        check_status(&mut easy)?;
        file.flush()?;
        Ok(written)
    }
}
