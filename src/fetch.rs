use crate::error::{CollectorError, Result};
use crate::library::{FILE_EXT, FILE_PREFIX};
use crate::types::CollectorConfig;
use async_trait::async_trait;
use suppaftp::FtpStream;
use tracing::debug;

/// Where raw per-date files come from. The batch downloader only ever sees
/// this seam, so tests can substitute a canned source.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Retrieve the raw text of one date's file.
    async fn fetch_raw(&self, date: &str) -> Result<String>;
}

/// Anonymous FTP source for the Nasdaq Trader crosses archive. One
/// connect/login/retr cycle per date; no pooling, no retry.
#[derive(Debug, Clone)]
pub struct FtpSource {
    host: String,
    remote_dir: String,
}

impl FtpSource {
    pub fn new(host: &str, remote_dir: &str) -> Self {
        Self {
            host: host.to_string(),
            remote_dir: remote_dir.to_string(),
        }
    }

    pub fn new_nasdaq() -> Self {
        let config = CollectorConfig::default();
        Self::new(&config.ftp_host, &config.remote_dir)
    }

    pub fn from_config(config: &CollectorConfig) -> Self {
        Self::new(&config.ftp_host, &config.remote_dir)
    }

    pub fn remote_file_name(date: &str) -> String {
        format!("{}{}{}", FILE_PREFIX, date, FILE_EXT)
    }
}

#[async_trait]
impl FileSource for FtpSource {
    async fn fetch_raw(&self, date: &str) -> Result<String> {
        let host = self.host.clone();
        let remote_dir = self.remote_dir.clone();
        let file_name = Self::remote_file_name(date);
        debug!("fetching {}/{} from {}", remote_dir, file_name, host);

        // The FTP client is blocking; keep it off the async runtime
        let text = tokio::task::spawn_blocking(move || -> Result<String> {
            let mut ftp = FtpStream::connect(&host)?;
            ftp.login("anonymous", "anonymous")?;
            ftp.cwd(&remote_dir)?;
            let buffer = ftp.retr_as_buffer(&file_name)?;
            let _ = ftp.quit();
            Ok(String::from_utf8_lossy(&buffer.into_inner()).into_owned())
        })
        .await
        .map_err(|e| CollectorError::Other(format!("fetch task failed: {}", e)))??;

        Ok(text)
    }
}
