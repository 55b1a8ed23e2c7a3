//! Fetching the registry page from the network or a local file.

use std::path::PathBuf;

use crate::{
  Error, Result,
  config::{RfmConfig, RunEnv},
};

/// Browser-like `User-Agent`; the registry rejects unknown clients.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                              AppleWebKit/537.36 (KHTML, like Gecko) \
                              Chrome/123.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSource {
  Remote { url: String },
  File { path: PathBuf },
}

impl PageSource {
  /// `prod` always fetches remotely; `dev` reads the local file when
  /// `use_file` is set.
  pub fn select(env: RunEnv, rfm: &RfmConfig) -> Result<Self> {
    if env == RunEnv::Prod || !rfm.use_file {
      return Ok(Self::Remote {
        url: rfm.url.clone(),
      });
    }
    let path = rfm.file_path.clone().ok_or(Error::MissingFilePath)?;
    Ok(Self::File { path })
  }

  /// Read the full page body.
  pub fn fetch(&self) -> Result<String> {
    let content = match self {
      Self::Remote { url } => {
        tracing::info!(%url, "requesting registry page");
        fetch_remote(url)?
      }
      Self::File { path } => {
        tracing::info!(path = %path.display(), "reading registry page from file");
        std::fs::read_to_string(path).map_err(|source| Error::ReadFile {
          path: path.clone(),
          source,
        })?
      }
    };
    tracing::info!(bytes = content.len(), "fetched registry page");
    tracing::trace!(%content, "page content");
    Ok(content)
  }
}

/// The registry's certificate chain does not verify against common trust
/// stores, so certificate verification is disabled for this request.
fn fetch_remote(url: &str) -> Result<String> {
  let fetch_err = |source: reqwest::Error| Error::Fetch {
    url: url.to_string(),
    source,
  };

  let client = reqwest::blocking::Client::builder()
    .user_agent(USER_AGENT)
    .danger_accept_invalid_certs(true)
    .build()
    .map_err(fetch_err)?;

  client
    .get(url)
    .send()
    .and_then(|resp| resp.error_for_status())
    .and_then(|resp| resp.text())
    .map_err(fetch_err)
}
