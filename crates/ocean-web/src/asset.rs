use crate::dom::js_err;
use anyhow::bail;
use ocean_render::MaskImage;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

pub async fn fetch_bytes(window: &web::Window, path: &str) -> anyhow::Result<Vec<u8>> {
    let response: web::Response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !response.ok() {
        bail!("GET {} returned {}", path, response.status());
    }
    let buffer = JsFuture::from(response.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// The particle mask, or a solid sprite if it cannot be fetched or decoded.
pub async fn fetch_mask(window: &web::Window, path: &str) -> MaskImage {
    match fetch_bytes(window, path).await {
        Ok(bytes) => MaskImage::decode_or_solid(&bytes),
        Err(e) => {
            log::warn!("particle mask unavailable, using solid sprite: {:#}", e);
            MaskImage::solid()
        }
    }
}
