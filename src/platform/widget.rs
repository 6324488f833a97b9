//! SoundCloud widget as the playback collaborator

use wasm_bindgen::prelude::*;

use crate::game::Playback;

#[wasm_bindgen(inline_js = "
    export function widget_for(id) {
        const el = document.getElementById(id);
        return el ? SC.Widget(el) : null;
    }

    export function widget_on_progress(widget, on_progress) {
        widget.bind(SC.Widget.Events.READY, () => {
            widget.bind(SC.Widget.Events.PLAY_PROGRESS, (e) => on_progress(e.currentPosition));
        });
    }

    export function widget_load(widget, url) {
        widget.load(url, { auto_play: false });
    }

    export function widget_seek(widget, ms) { widget.seekTo(ms); }
    export function widget_play(widget) { widget.play(); }
    export function widget_pause(widget) { widget.pause(); }
")]
extern "C" {
    pub type ScWidget;

    fn widget_for(id: &str) -> Option<ScWidget>;
    fn widget_on_progress(widget: &ScWidget, on_progress: &Closure<dyn FnMut(f64)>);
    fn widget_load(widget: &ScWidget, url: &str);
    fn widget_seek(widget: &ScWidget, ms: f64);
    fn widget_play(widget: &ScWidget);
    fn widget_pause(widget: &ScWidget);
}

/// Widget wrapper; commands are dropped if the iframe is missing
pub struct WidgetPlayback {
    widget: Option<ScWidget>,
}

impl WidgetPlayback {
    /// Attach to the widget iframe with the given element id
    pub fn attach(iframe_id: &str) -> Self {
        let widget = widget_for(iframe_id);
        if widget.is_none() {
            log::warn!("No player iframe #{iframe_id} - audio disabled");
        }
        Self { widget }
    }

    /// Deliver playback positions (ms) once the widget is ready
    pub fn on_progress(&self, callback: Closure<dyn FnMut(f64)>) {
        if let Some(widget) = &self.widget {
            widget_on_progress(widget, &callback);
            callback.forget();
        }
    }
}

impl Playback for WidgetPlayback {
    fn load(&mut self, track: &str) {
        if let Some(widget) = &self.widget {
            widget_load(widget, track);
        }
    }

    fn seek_to(&mut self, position_ms: f64) {
        if let Some(widget) = &self.widget {
            widget_seek(widget, position_ms);
        }
    }

    fn play(&mut self) {
        if let Some(widget) = &self.widget {
            widget_play(widget);
        }
    }

    fn pause(&mut self) {
        if let Some(widget) = &self.widget {
            widget_pause(widget);
        }
    }
}
