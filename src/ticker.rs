use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tones_core::Ticker;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type TickSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `setInterval` timer. The callback is installed after the engine exists,
/// since it needs a handle back to it.
pub struct IntervalTicker {
    window: web::Window,
    callback: TickSlot,
    handle: Option<i32>,
}

impl IntervalTicker {
    pub fn new(window: web::Window) -> Self {
        Self {
            window,
            callback: Rc::new(RefCell::new(None)),
            handle: None,
        }
    }

    pub fn slot(&self) -> TickSlot {
        self.callback.clone()
    }
}

pub fn install(slot: &TickSlot, callback: impl FnMut() + 'static) {
    *slot.borrow_mut() = Some(Closure::wrap(Box::new(callback) as Box<dyn FnMut()>));
}

impl Ticker for IntervalTicker {
    fn start(&mut self, interval: Duration) {
        self.stop();
        let callback = self.callback.borrow();
        let Some(cb) = callback.as_ref() else {
            log::error!("[ticker] started before a callback was installed");
            return;
        };
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                cb.as_ref().unchecked_ref(),
                interval.as_millis() as i32,
            ) {
            Ok(h) => self.handle = Some(h),
            Err(e) => log::error!("[ticker] setInterval failed: {:?}", e),
        }
    }

    fn stop(&mut self) {
        if let Some(h) = self.handle.take() {
            self.window.clear_interval_with_handle(h);
        }
    }
}
