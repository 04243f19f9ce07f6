use wasm_bindgen::prelude::*;

use shared::{Metrics, ProjectFile, ProjectSnapshot, Usage};

/// Пишет предупреждение в консоль браузера
fn console_warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

fn parse_project(project_json: &str) -> Result<ProjectFile, String> {
    serde_json::from_str(project_json).map_err(|e| {
        let message = format!("Invalid project JSON: {e}");
        console_warn(&message);
        message
    })
}

fn metrics_json(project_json: &str) -> Result<String, String> {
    let project = parse_project(project_json)?;
    let metrics: Metrics = shared::calculate_metrics(&project.blocks, &project.land);
    serde_json::to_string(&metrics).map_err(|e| e.to_string())
}

fn snapshot_json(project_json: &str) -> Result<String, String> {
    let snapshot = ProjectSnapshot::evaluate(parse_project(project_json)?);
    serde_json::to_string(&snapshot).map_err(|e| e.to_string())
}

fn color_for(usage: &str) -> Result<&'static str, String> {
    serde_json::from_value::<Usage>(serde_json::Value::String(usage.to_string()))
        .map(|u| u.color())
        .map_err(|_| format!("Unknown usage '{usage}'"))
}

/// Метрики проекта (`{blocks, land}`) в JSON
#[wasm_bindgen]
pub fn compute_metrics(project_json: &str) -> Result<String, JsError> {
    metrics_json(project_json).map_err(|e| JsError::new(&e))
}

/// Полный снимок проекта: цвета блоков пересчитаны, метрики пересчитаны
#[wasm_bindgen]
pub fn evaluate_project(project_json: &str) -> Result<String, JsError> {
    snapshot_json(project_json).map_err(|e| JsError::new(&e))
}

/// Цвет назначения (`"residential"`, `"hotel"`, ...)
#[wasm_bindgen]
pub fn usage_color(usage: &str) -> Result<String, JsError> {
    color_for(usage)
        .map(str::to_string)
        .map_err(|e| JsError::new(&e))
}

#[wasm_bindgen]
pub fn floors_for_height(height: f64) -> u32 {
    shared::floors_for_height(height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_json_for_podium() {
        let json = r#"{"blocks": [{"id": "a", "type": "podium", "baseArea": 500, "height": 12}], "land": {}}"#;
        let metrics: Metrics = serde_json::from_str(&metrics_json(json).unwrap()).unwrap();
        assert_eq!(metrics.gfa, 2000.0);
        assert_eq!(metrics.far, 2.0);
        assert!(metrics.is_far_valid);
    }

    #[test]
    fn test_snapshot_json_rederives_colors() {
        let json = r##"{"blocks": [{"id": "a", "usage": "parking", "color": "#ffffff"}], "land": {}}"##;
        let snapshot: ProjectSnapshot = serde_json::from_str(&snapshot_json(json).unwrap()).unwrap();
        assert_eq!(snapshot.blocks[0].color, "#6b7280");
    }

    #[test]
    fn test_invalid_project() {
        assert!(metrics_json("{").unwrap_err().starts_with("Invalid project JSON"));
        assert!(metrics_json(r#"{"blocks": []}"#).is_err());
    }

    #[test]
    fn test_usage_colors() {
        assert_eq!(color_for("amenities").unwrap(), "#10b981");
        assert!(color_for("warehouse").is_err());
        assert_eq!(floors_for_height(10.0), 3);
    }
}
