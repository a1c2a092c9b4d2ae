use crate::keys::command_for_key;
use crate::WebEngine;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_global_keydown(
    ev: &web::KeyboardEvent,
    engine: &Rc<RefCell<WebEngine>>,
    audio_ctx: &web::AudioContext,
) {
    if ev.repeat() || ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
        return;
    }
    let Some(command) = command_for_key(&ev.key()) else {
        return;
    };
    // keep Space from scrolling the page or re-clicking a focused button
    ev.prevent_default();
    _ = audio_ctx.resume();
    log::debug!("[keys] {:?}", command);
    super::dispatch(engine, command);
}

pub fn wire_global_keydown(
    document: &web::Document,
    engine: Rc<RefCell<WebEngine>>,
    audio_ctx: web::AudioContext,
) {
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_global_keydown(&ev, &engine, &audio_ctx);
    }) as Box<dyn FnMut(_)>);
    _ = document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}
