//! Image loading for canvas backgrounds.
//!
//! Resolves an image reference to bytes, decides whether the bytes are
//! origin-clean, and decodes them off the async executor.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::header::{ACCESS_CONTROL_ALLOW_ORIGIN, LOCATION, ORIGIN};
use url::{Origin, Url};

use super::types::{CorsMode, EngineError};

/// Redirect hops followed before a fetch gives up.
const MAX_REDIRECTS: usize = 10;

/// Where an image reference points.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageLocation {
    /// `http` / `https` resource
    Remote(Url),
    /// `file://` URL or bare filesystem path
    Local(PathBuf),
}

impl ImageLocation {
    /// Parses an image reference. Strings that are not absolute URLs are
    /// treated as filesystem paths.
    pub fn parse(raw: &str) -> Result<Self, EngineError> {
        match Url::parse(raw) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(ImageLocation::Remote(url)),
                "file" => url
                    .to_file_path()
                    .map(ImageLocation::Local)
                    .map_err(|_| EngineError::image_load(raw, "invalid file URL")),
                other => Err(EngineError::image_load(
                    raw,
                    format!("unsupported URL scheme '{}'", other),
                )),
            },
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Ok(ImageLocation::Local(PathBuf::from(raw)))
            }
            Err(err) => Err(EngineError::image_load(raw, err)),
        }
    }
}

/// Raw image bytes plus their origin verdict.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub origin_clean: bool,
}

/// Abstraction over how image bytes are obtained. Mocked in tests.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(
        &self,
        location: &ImageLocation,
        cors: CorsMode,
    ) -> Result<FetchedImage, EngineError>;
}

/// Fetches remote images over HTTP(S) and local images from disk.
pub struct HttpImageSource {
    client: reqwest::Client,
    page_origin: Option<Origin>,
}

impl HttpImageSource {
    /// Builds a source that treats `page_origin` as the editor's own origin.
    ///
    /// With no page origin every remote image is cross-origin.
    pub fn new(user_agent: &str, page_origin: Option<Origin>) -> Result<Self, EngineError> {
        // Redirects are followed by hand so every hop gets an origin check.
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| EngineError::Unavailable(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            page_origin,
        })
    }

    async fn fetch_remote(&self, url: &Url, cors: CorsMode) -> Result<FetchedImage, EngineError> {
        let page_origin = self.page_origin.as_ref();
        let mut current = url.clone();
        // Once any hop leaves the page origin the response stays cross-origin.
        let mut cross_origin = false;

        for _ in 0..=MAX_REDIRECTS {
            cross_origin |= !is_same_origin(page_origin, &current);
            let mut request = self.client.get(current.clone());
            if cross_origin && cors == CorsMode::Anonymous {
                request = request.header(ORIGIN, origin_header(page_origin));
            }

            let response = request
                .send()
                .await
                .map_err(|e| EngineError::image_load(url.as_str(), e))?;

            let status = response.status();
            if status.is_redirection() {
                current = redirect_target(&current, &response)
                    .map_err(|reason| EngineError::image_load(url.as_str(), reason))?;
                log::debug!("Following redirect from {} to {}", url, current);
                continue;
            }
            if !status.is_success() {
                return Err(EngineError::image_load(
                    url.as_str(),
                    format!("HTTP {}", status),
                ));
            }

            let allow_origin = response
                .headers()
                .get(ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let origin_clean =
                !cross_origin || cors_approved(page_origin, cors, allow_origin.as_deref());
            if !origin_clean {
                log::warn!(
                    "Image {} is cross-origin without CORS approval; export will be blocked",
                    current
                );
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| EngineError::image_load(url.as_str(), e))?;
            log::debug!("Fetched {} bytes from {}", bytes.len(), current);

            return Ok(FetchedImage {
                bytes: bytes.to_vec(),
                origin_clean,
            });
        }

        Err(EngineError::image_load(
            url.as_str(),
            format!("more than {} redirects", MAX_REDIRECTS),
        ))
    }
}

fn redirect_target(current: &Url, response: &reqwest::Response) -> Result<Url, String> {
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| format!("HTTP {} without a Location header", response.status()))?;
    let target = current
        .join(location)
        .map_err(|e| format!("bad redirect target '{}': {}", location, e))?;
    match target.scheme() {
        "http" | "https" => Ok(target),
        other => Err(format!("redirect to unsupported scheme '{}'", other)),
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(
        &self,
        location: &ImageLocation,
        cors: CorsMode,
    ) -> Result<FetchedImage, EngineError> {
        match location {
            ImageLocation::Remote(url) => self.fetch_remote(url, cors).await,
            ImageLocation::Local(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .map_err(|e| EngineError::image_load(path.display().to_string(), e))?;
                Ok(FetchedImage {
                    bytes,
                    origin_clean: true,
                })
            }
        }
    }
}

fn is_same_origin(page_origin: Option<&Origin>, url: &Url) -> bool {
    page_origin.is_some_and(|origin| origin.is_tuple() && *origin == url.origin())
}

fn origin_header(page_origin: Option<&Origin>) -> String {
    page_origin.map_or_else(|| "null".to_string(), Origin::ascii_serialization)
}

/// Decides whether a cross-origin response keeps the canvas exportable.
///
/// Only [`CorsMode::Anonymous`] fetches qualify, and only when the server
/// answered with an `Access-Control-Allow-Origin` of `*` or the page origin.
fn cors_approved(
    page_origin: Option<&Origin>,
    cors: CorsMode,
    allow_origin: Option<&str>,
) -> bool {
    match cors {
        CorsMode::NoCors => false,
        CorsMode::Anonymous => allow_origin.is_some_and(|allowed| {
            let allowed = allowed.trim();
            allowed == "*" || allowed == origin_header(page_origin)
        }),
    }
}

/// Decodes an encoded image into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> Result<(u32, u32, Vec<u8>), image::ImageError> {
    let decoded = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = decoded.dimensions();
    Ok((width, height, decoded.into_raw()))
}
