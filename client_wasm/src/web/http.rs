//! `GET /specs` and `GET /games`

use proto::{parse_game_list, GameSpecs, GameSummary};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::config::ClientConfig;

async fn get_text(url: &str) -> Result<String, JsValue> {
    let init = RequestInit::new();
    init.set_method("GET");
    init.set_mode(RequestMode::Cors);
    let request = Request::new_with_str_and_init(url, &init)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "GET {} failed with status {}",
            url,
            response.status()
        )));
    }
    JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("response body is not text"))
}

/// Field description, fetched once per session
pub async fn fetch_specs(config: &ClientConfig) -> Result<GameSpecs, JsValue> {
    let url = config.specs_url().map_err(to_js)?;
    let body = get_text(url.as_str()).await?;
    let specs = GameSpecs::from_json(&body).map_err(to_js)?;
    tracing::debug!(?specs, "loaded game specs");
    Ok(specs)
}

/// Open games. Polling is up to the caller.
pub async fn fetch_games(config: &ClientConfig) -> Result<Vec<GameSummary>, JsValue> {
    let url = config.games_url().map_err(to_js)?;
    let body = get_text(url.as_str()).await?;
    parse_game_list(&body).map_err(to_js)
}

pub fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
