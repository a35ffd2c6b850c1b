use console_error_panic_hook::set_once;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

use archive::{Archive, ArchiveConfig, Layer, UiOutbox};
use scene::{Body, PointerKind};
use timeline::Timeline;

mod snapshot;
pub use snapshot::StageSnapshot;

thread_local! {
    static ARCHIVE: RefCell<Option<Archive<UiOutbox>>> = const { RefCell::new(None) };
}

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn with_archive<T>(f: impl FnOnce(&mut Archive<UiOutbox>) -> T) -> Result<T, JsValue> {
    ARCHIVE.with(|cell| {
        let mut slot = cell.borrow_mut();
        let archive = slot
            .as_mut()
            .ok_or_else(|| JsValue::from_str("archive not initialised; call init_archive first"))?;
        Ok(f(archive))
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_err)
}

fn parse_body(body: &str) -> Result<Body, JsValue> {
    match body {
        "earth" => Ok(Body::Earth),
        "moon" => Ok(Body::Moon),
        other => Err(JsValue::from_str(&format!("unknown body `{other}`"))),
    }
}

fn parse_layer(layer: &str) -> Result<Layer, JsValue> {
    match layer {
        "satellites" => Ok(Layer::Satellites),
        "city_lights" => Ok(Layer::CityLights),
        other => Err(JsValue::from_str(&format!("unknown layer `{other}`"))),
    }
}

fn parse_pointer(kind: &str) -> PointerKind {
    match kind {
        "touch" => PointerKind::Touch,
        "pen" => PointerKind::Pen,
        _ => PointerKind::Mouse,
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    #[cfg(target_arch = "wasm32")]
    tracing_wasm::set_as_global_default();
    Ok(())
}

/// Builds the archive. `config_json` may be empty for defaults; the built-in
/// Earth timeline is used unless `timeline_json` is given.
#[wasm_bindgen]
pub fn init_archive(config_json: &str, timeline_json: &str) -> Result<(), JsValue> {
    let config = if config_json.trim().is_empty() {
        ArchiveConfig::default()
    } else {
        ArchiveConfig::from_json(config_json).map_err(js_err)?
    };
    let timeline = if timeline_json.trim().is_empty() {
        Timeline::earth()
    } else {
        Timeline::from_json(timeline_json)
    }
    .map_err(js_err)?;

    let archive = Archive::new(config, timeline, UiOutbox::new());
    ARCHIVE.with(|cell| *cell.borrow_mut() = Some(archive));
    tracing::info!("archive initialised");
    Ok(())
}

/// Drains queued panel/scrubber commands as a JSON array.
#[wasm_bindgen]
pub fn take_ui_commands() -> Result<String, JsValue> {
    with_archive(|a| a.ui_mut().drain_json())?.map_err(js_err)
}

/// Drains archive events as a JSON array.
#[wasm_bindgen]
pub fn take_events() -> Result<String, JsValue> {
    let events = with_archive(|a| {
        a.drain_events()
            .into_iter()
            .map(|e| e.payload)
            .collect::<Vec<_>>()
    })?;
    to_json(&events)
}

/// Advances one animation frame and returns the stage snapshot as JSON.
#[wasm_bindgen]
pub fn frame(now_ms: f64) -> Result<String, JsValue> {
    let snapshot = with_archive(|a| {
        a.frame(now_ms);
        StageSnapshot::capture(a.stage())
    })?;
    to_json(&snapshot)
}

#[wasm_bindgen]
pub fn snapshot() -> Result<String, JsValue> {
    let snapshot = with_archive(|a| StageSnapshot::capture(a.stage()))?;
    to_json(&snapshot)
}

#[wasm_bindgen]
pub fn set_viewport(width: f64, height: f64) -> Result<(), JsValue> {
    with_archive(|a| a.set_viewport(width, height))
}

#[wasm_bindgen]
pub fn slider_input(position: f64) -> Result<(), JsValue> {
    with_archive(|a| a.slider_input(position))
}

#[wasm_bindgen]
pub fn slider_release(position: f64) -> Result<(), JsValue> {
    with_archive(|a| a.slider_release(position))?.map_err(js_err)
}

#[wasm_bindgen]
pub fn hover(position: f64) -> Result<bool, JsValue> {
    with_archive(|a| a.hover(position))
}

#[wasm_bindgen]
pub fn hover_end() -> Result<(), JsValue> {
    with_archive(|a| a.hover_end())
}

/// Refused drill-downs leave everything unchanged and return `false`.
#[wasm_bindgen]
pub fn drill_down(child_id: &str) -> Result<bool, JsValue> {
    with_archive(|a| match a.drill_down(child_id) {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(%err, "drill-down refused");
            false
        }
    })
}

#[wasm_bindgen]
pub fn navigate_to_level(index: usize) -> Result<bool, JsValue> {
    with_archive(|a| a.navigate_to_level(index).is_ok())
}

#[wasm_bindgen]
pub fn return_to_present() -> Result<(), JsValue> {
    with_archive(|a| a.return_to_present())
}

#[wasm_bindgen]
pub fn close_panel() -> Result<(), JsValue> {
    with_archive(|a| a.close_panel())
}

/// Returns the activation result as JSON.
#[wasm_bindgen]
pub fn activate_event(index: usize) -> Result<String, JsValue> {
    let activation = with_archive(|a| a.activate_event(index))?.map_err(js_err)?;
    to_json(&activation)
}

#[wasm_bindgen]
pub fn trigger_moon_formation() -> Result<bool, JsValue> {
    with_archive(|a| a.trigger_moon_formation())
}

/// Returns the focus outcome as JSON (`"started"`, `"already_focused"`, `"dropped"`,
/// `"unavailable"`).
#[wasm_bindgen]
pub fn request_focus(body: &str) -> Result<String, JsValue> {
    let body = parse_body(body)?;
    let outcome = with_archive(|a| a.request_focus(body))?;
    to_json(&outcome)
}

#[wasm_bindgen]
pub fn toggle_layer(layer: &str) -> Result<bool, JsValue> {
    let layer = parse_layer(layer)?;
    with_archive(|a| a.toggle_layer(layer))
}

#[wasm_bindgen]
pub fn toggle_playback() -> Result<bool, JsValue> {
    with_archive(|a| a.toggle_playback())
}

#[wasm_bindgen]
pub fn pointer_down(id: i32, kind: &str, x: f64, y: f64) -> Result<(), JsValue> {
    let kind = parse_pointer(kind);
    with_archive(|a| a.pointer_down(id, kind, x, y))
}

#[wasm_bindgen]
pub fn pointer_move(id: i32, x: f64, y: f64) -> Result<(), JsValue> {
    with_archive(|a| a.pointer_move(id, x, y))
}

/// Returns the focus outcome of a click as JSON, or `null`.
#[wasm_bindgen]
pub fn pointer_up(id: i32, x: f64, y: f64) -> Result<String, JsValue> {
    let outcome = with_archive(|a| a.pointer_up(id, x, y))?;
    to_json(&outcome)
}

#[wasm_bindgen]
pub fn pointer_cancel(id: i32) -> Result<(), JsValue> {
    with_archive(|a| a.pointer_cancel(id))
}

#[wasm_bindgen]
pub fn wheel(delta_y: f64) -> Result<(), JsValue> {
    with_archive(|a| a.wheel(delta_y))
}

/// Nodes in chronological playback order, as JSON.
#[wasm_bindgen]
pub fn playback_queue() -> Result<String, JsValue> {
    let items = with_archive(|a| a.playback().queue().items().to_vec())?;
    to_json(&items)
}

#[wasm_bindgen]
pub fn current_year_label() -> Result<String, JsValue> {
    with_archive(|a| {
        a.navigator()
            .displayed()
            .map(|n| timeline::format_year(n.year_start))
            .unwrap_or_else(|| timeline::format_year(a.config().playback.present_year))
    })
}
