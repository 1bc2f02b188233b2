use std::fs;
use std::path::Path;

use anyhow::Context as _;

pub const GLCOREARB_URL: &str = "https://registry.khronos.org/OpenGL/api/GL/glcorearb.h";
pub const KHRPLATFORM_URL: &str = "https://registry.khronos.org/EGL/api/KHR/khrplatform.h";

// registry.khronos.org turns away requests with no browser-ish agent.
const USER_AGENT: &str = "Mozilla/5.0";

pub trait Download {
    fn download(&mut self, url: &str) -> anyhow::Result<Vec<u8>>;
}

pub struct HttpDownloader;

impl Download for HttpDownloader {
    fn download(&mut self, url: &str) -> anyhow::Result<Vec<u8>> {
        let mut response = ureq::get(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .with_context(|| format!("could not fetch {url}"))?;
        let body = response
            .body_mut()
            .read_to_vec()
            .with_context(|| format!("could not read response body of {url}"))?;
        Ok(body)
    }
}

/// Downloads `url` into `dst` unless `dst` already exists.
///
/// Any existing file counts, including an empty or truncated one left by an earlier
/// failed run. Delete it to force a refetch.
pub fn ensure_file<D: Download>(downloader: &mut D, url: &str, dst: &Path) -> anyhow::Result<()> {
    if dst.exists() {
        log::info!("reusing {}...", dst.display());
        return Ok(());
    }

    log::info!("downloading {}...", dst.display());
    let body = downloader.download(url)?;

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("could not create {}", parent.display()))?;
    }
    fs::write(dst, body).with_context(|| format!("could not write {}", dst.display()))?;

    Ok(())
}

#[cfg(test)]
struct CountingDownloader {
    requests: Vec<String>,
    body: &'static [u8],
}

#[cfg(test)]
impl Download for CountingDownloader {
    fn download(&mut self, url: &str) -> anyhow::Result<Vec<u8>> {
        self.requests.push(url.to_string());
        Ok(self.body.to_vec())
    }
}

#[cfg(test)]
struct FailingDownloader;

#[cfg(test)]
impl Download for FailingDownloader {
    fn download(&mut self, url: &str) -> anyhow::Result<Vec<u8>> {
        anyhow::bail!("connection refused: {url}")
    }
}

#[test]
fn test_ensure_file_downloads_once() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("GL/glcorearb.h");
    let mut downloader = CountingDownloader {
        requests: Vec::new(),
        body: b"GLAPI void APIENTRY glClear (GLbitfield mask);\n\0\xff",
    };

    ensure_file(&mut downloader, GLCOREARB_URL, &dst).unwrap();
    ensure_file(&mut downloader, GLCOREARB_URL, &dst).unwrap();

    assert_eq!(downloader.requests, [GLCOREARB_URL]);
    assert_eq!(fs::read(&dst).unwrap(), downloader.body);
}

#[test]
fn test_ensure_file_reuses_any_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("khrplatform.h");
    fs::write(&dst, b"").unwrap();
    let mut downloader = CountingDownloader {
        requests: Vec::new(),
        body: b"unused",
    };

    ensure_file(&mut downloader, KHRPLATFORM_URL, &dst).unwrap();

    assert!(downloader.requests.is_empty());
    assert_eq!(fs::read(&dst).unwrap(), b"");
}

#[test]
fn test_ensure_file_propagates_download_error() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("KHR/khrplatform.h");

    let err = ensure_file(&mut FailingDownloader, KHRPLATFORM_URL, &dst).unwrap_err();

    assert!(err.to_string().contains("connection refused"));
    assert!(!dst.exists());
}
