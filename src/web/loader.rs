use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::engine::loader::{DecodedImage, ImageLoader, LoadCallback, LoadError};
use crate::options::ImageSource;

/// Loads images with `fetch` and decodes them in the page.
pub(super) struct FetchImageLoader;

fn js_error(context: &str, value: &wasm_bindgen::JsValue) -> LoadError {
    LoadError::Fetch(format!("{context}: {value:?}"))
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
    let window = web_sys::window().ok_or(LoadError::Cancelled)?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| js_error(url, &e))?
        .dyn_into()
        .map_err(|e| js_error(url, &e))?;
    if !response.ok() {
        return Err(LoadError::Fetch(format!(
            "{url}: HTTP {}",
            response.status()
        )));
    }
    let buffer = JsFuture::from(
        response.array_buffer().map_err(|e| js_error(url, &e))?,
    )
    .await
    .map_err(|e| js_error(url, &e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

async fn fetch_all(
    sources: Vec<ImageSource>,
) -> Result<Vec<DecodedImage>, LoadError> {
    let mut images = Vec::with_capacity(sources.len());
    for source in &sources {
        let bytes = fetch_bytes(source.as_str()).await?;
        images.push(DecodedImage::from_bytes(&bytes)?);
    }
    Ok(images)
}

impl ImageLoader for FetchImageLoader {
    fn load(&self, sources: Vec<ImageSource>, on_done: LoadCallback) {
        wasm_bindgen_futures::spawn_local(async move {
            on_done(fetch_all(sources).await);
        });
    }
}
