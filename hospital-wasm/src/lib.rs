//! Cầu nối WASM <-> JavaScript cho dashboard bệnh viện.

use hospital_core::{PartialReconcileConfig, ReconcileConfig, ReconcileError};
use hospital_reconcile::RecordGraph;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

/// Tính change-set giữa snapshot và bản sao đang chỉnh sửa.
#[wasm_bindgen]
pub fn diff_records(original: JsValue, updated: JsValue) -> Result<JsValue, JsValue> {
    init();
    let original = record_from_js(original, "snapshot")?;
    let updated = record_from_js(updated, "bản sao chỉnh sửa")?;
    record_to_js(&hospital_reconcile::diff(&original, &updated))
}

/// Loại bỏ null, mảng rỗng và object rỗng khỏi payload.
#[wasm_bindgen]
pub fn strip_empty(input: JsValue) -> Result<JsValue, JsValue> {
    init();
    let input = record_from_js(input, "payload")?;
    record_to_js(&hospital_reconcile::strip_empty(&input))
}

/// Tạo payload PATCH hoàn chỉnh: diff, bỏ khóa do server quản lý, làm sạch.
#[wasm_bindgen]
pub fn prepare_update(
    original: JsValue,
    updated: JsValue,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    init();
    let original = record_from_js(original, "snapshot")?;
    let updated = record_from_js(updated, "bản sao chỉnh sửa")?;

    let cfg = match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: PartialReconcileConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            ReconcileConfig::from(cfg)
        }
        _ => ReconcileConfig::default(),
    };

    record_to_js(&hospital_reconcile::prepare_update(
        &original, &updated, &cfg,
    ))
}

fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn record_from_js(value: JsValue, what: &str) -> Result<RecordGraph, JsValue> {
    let value = from_value::<serde_json::Value>(value)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON {what}: {err}")))?;
    hospital_reconcile::into_record(value)
        .map_err(|err| JsValue::from_str(&format_reconcile_error(err)))
}

fn record_to_js(record: &RecordGraph) -> Result<JsValue, JsValue> {
    // Trả về object thường thay vì Map của JS.
    let serializer = Serializer::json_compatible();
    record
        .serialize(&serializer)
        .map_err(|err| JsValue::from_str(&format!("Không serialize payload: {err}")))
}

fn format_reconcile_error(err: ReconcileError) -> String {
    format!("Reconcile error: {err}")
}
