use crate::constants::*;
use crate::dom;
use fnv::FnvHashMap;
use tones_core::{ColorMapper, Readout, Record, Renderer, ToneLookup};
use web_sys as web;

/// Paints the readouts and fills each map region with its shaded price color.
pub struct DomRenderer {
    document: web::Document,
    colors: ColorMapper,
    headline_entity: String,
    regions: FnvHashMap<String, Vec<web::Element>>,
}

impl DomRenderer {
    pub fn new(document: web::Document, colors: ColorMapper, headline_entity: String) -> Self {
        let mut regions: FnvHashMap<String, Vec<web::Element>> = FnvHashMap::default();
        if let Some(root) = document.get_element_by_id(MAP_CONTAINER_ID) {
            for el in dom::query_all(&root, &format!("[{ENTITY_ATTR}]")) {
                if let Some(id) = el.get_attribute(ENTITY_ATTR) {
                    regions.entry(id).or_default().push(el);
                }
            }
        } else {
            log::warn!("missing #{}", MAP_CONTAINER_ID);
        }
        log::info!("[render] {} map regions", regions.len());
        Self {
            document,
            colors,
            headline_entity,
            regions,
        }
    }
}

impl Renderer for DomRenderer {
    fn render(&mut self, _index: usize, record: &Record, tones: &dyn ToneLookup) {
        let readout = Readout::from_record(record, &self.headline_entity);
        if let Some(price) = &readout.price {
            dom::set_text(&self.document, PRICE_SPAN_ID, price);
        }
        dom::set_text(&self.document, MONTH_SPAN_ID, &readout.month);
        dom::set_text(&self.document, YEAR_SPAN_ID, &readout.year);

        for (id, price) in record.entities() {
            let Some(elements) = self.regions.get(id) else {
                continue;
            };
            // NaN prices produce an invalid fill, leaving the region's default color.
            let fill = format!("fill:{}", self.colors.shaded(price, tones.is_enabled(id)).to_hex());
            for el in elements {
                _ = el.set_attribute("style", &fill);
            }
        }
    }

    fn playback_changed(&mut self, playing: bool) {
        let label = if playing { PAUSE_LABEL } else { PLAY_LABEL };
        dom::set_text(&self.document, PLAY_BUTTON_ID, label);
    }
}
