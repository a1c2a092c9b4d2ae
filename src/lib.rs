#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use tones_core::{Command, Dataset, EngineConfig, PlaybackEngine};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod keys;
mod render;
mod ticker;

pub(crate) type WebEngine =
    PlaybackEngine<audio::WebAudioSink, render::DomRenderer, ticker::IntervalTicker>;

async fn fetch_text(window: &web::Window, url: &str) -> anyhow::Result<String> {
    let resp_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(dom::js_err)?;
    let resp: web::Response = resp_value.dyn_into().map_err(dom::js_err)?;
    if !resp.ok() {
        anyhow::bail!("GET {} -> {}", url, resp.status());
    }
    let body = JsFuture::from(resp.text().map_err(dom::js_err)?)
        .await
        .map_err(dom::js_err)?;
    body.as_string()
        .ok_or_else(|| anyhow::anyhow!("{} is not text", url))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("gas-tones starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let config = EngineConfig::default();

    // Controls are only wired once the data is in, so play can never run ahead of it.
    let text = fetch_text(&window, constants::DATA_URL).await?;
    let dataset = Arc::new(Dataset::from_csv(&text, &config)?);

    let audio_ctx = web::AudioContext::new().map_err(dom::js_err)?;
    let sink = audio::WebAudioSink::new(audio_ctx.clone())?;
    let renderer = render::DomRenderer::new(
        document.clone(),
        config.color_mapper()?,
        config.headline_entity.clone(),
    );
    let ticker = ticker::IntervalTicker::new(window.clone());
    let tick_slot = ticker.slot();

    let engine: Rc<RefCell<WebEngine>> = Rc::new(RefCell::new(PlaybackEngine::new(
        dataset, sink, renderer, ticker, &config,
    )?));

    let weak = Rc::downgrade(&engine);
    ticker::install(&tick_slot, move || {
        if let Some(engine) = weak.upgrade() {
            events::dispatch(&engine, Command::Tick);
        }
    });

    events::wire_controls(&document, &engine, &audio_ctx);
    events::wire_map_clicks(&document, &engine, &audio_ctx);
    events::wire_global_keydown(&document, engine.clone(), audio_ctx.clone());
    log::info!("[engine] controls wired");
    Ok(())
}
