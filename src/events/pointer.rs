use crate::constants::*;
use crate::dom;
use crate::WebEngine;
use std::cell::RefCell;
use std::rc::Rc;
use tones_core::Command;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Play/pause and reset buttons.
pub fn wire_controls(
    document: &web::Document,
    engine: &Rc<RefCell<WebEngine>>,
    audio_ctx: &web::AudioContext,
) {
    let engine_play = engine.clone();
    let audio_play = audio_ctx.clone();
    dom::add_click_listener(document, PLAY_BUTTON_ID, move || {
        // browsers keep the context suspended until a user gesture
        _ = audio_play.resume();
        super::dispatch(&engine_play, Command::Play);
    });

    let engine_reset = engine.clone();
    dom::add_click_listener(document, RESET_BUTTON_ID, move || {
        super::dispatch(&engine_reset, Command::Reset);
    });
}

/// Entity id of the map region under a click, if any.
fn clicked_entity(ev: &web::MouseEvent) -> Option<String> {
    let target = ev.target()?.dyn_into::<web::Element>().ok()?;
    let region = target.closest(&format!("[{ENTITY_ATTR}]")).ok()??;
    region.get_attribute(ENTITY_ATTR)
}

/// One delegated listener on the map container toggles the clicked region.
pub fn wire_map_clicks(
    document: &web::Document,
    engine: &Rc<RefCell<WebEngine>>,
    audio_ctx: &web::AudioContext,
) {
    let Some(map) = document.get_element_by_id(MAP_CONTAINER_ID) else {
        log::warn!("missing #{}", MAP_CONTAINER_ID);
        return;
    };
    let engine = engine.clone();
    let audio_ctx = audio_ctx.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
        if let Some(id) = clicked_entity(&ev) {
            _ = audio_ctx.resume();
            log::debug!("[pointer] toggle {}", id);
            super::dispatch(&engine, Command::Toggle(id));
        }
    }) as Box<dyn FnMut(_)>);
    _ = map.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}
