//! Name-based option access over serde configuration structs.
//!
//! Plain-data options are read and written through the struct's JSON field
//! names, so the string option surface stays in lockstep with the typed one.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::core::{Color, ColorScheme};
use crate::error::{ChartError, ChartResult};

fn to_object<C: Serialize>(config: &C) -> ChartResult<Map<String, Value>> {
    match serde_json::to_value(config) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ChartError::InvalidData(
            "configuration must serialize to a JSON object".to_owned(),
        )),
        Err(e) => Err(ChartError::InvalidData(format!(
            "failed to serialize configuration: {e}"
        ))),
    }
}

/// Copy of `config` with field `name` replaced, or `None` when `config`
/// has no such field.
pub(crate) fn with_field<C>(config: &C, name: &str, value: Value) -> ChartResult<Option<C>>
where
    C: Serialize + DeserializeOwned,
{
    let mut object = to_object(config)?;
    if !object.contains_key(name) {
        return Ok(None);
    }
    object.insert(name.to_owned(), value);
    serde_json::from_value(Value::Object(object))
        .map(Some)
        .map_err(|e| ChartError::invalid_option(name, e.to_string()))
}

/// Current JSON value of field `name`.
pub(crate) fn field<C: Serialize>(config: &C, name: &str) -> Option<Value> {
    to_object(config).ok()?.remove(name)
}

/// Splits an options object into `(name, value)` pairs in document order.
pub(crate) fn entries(options: Value) -> ChartResult<Vec<(String, Value)>> {
    match options {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(ChartError::InvalidData(format!(
            "options must be a JSON object, got {other}"
        ))),
    }
}

/// Palette from a JSON color string or array of color strings.
pub(crate) fn color_scheme_from_json(name: &str, value: Value) -> ChartResult<ColorScheme> {
    let texts = match value {
        Value::String(text) => vec![text],
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(text) => Ok(text),
                other => Err(ChartError::invalid_option(
                    name,
                    format!("expected a color string, got {other}"),
                )),
            })
            .collect::<ChartResult<Vec<_>>>()?,
        other => {
            return Err(ChartError::invalid_option(
                name,
                format!("expected a color or list of colors, got {other}"),
            ));
        }
    };
    let colors = texts
        .iter()
        .map(|text| Color::from_hex(text))
        .collect::<ChartResult<Vec<_>>>()
        .map_err(|e| ChartError::invalid_option(name, e.to_string()))?;
    ColorScheme::palette(colors)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::{color_scheme_from_json, entries, field, with_field};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        point_size: f64,
        label: Option<String>,
    }

    #[test]
    fn replaces_known_fields_only() {
        let sample = Sample {
            point_size: 16.0,
            label: None,
        };
        let updated = with_field(&sample, "pointSize", json!(4.0))
            .expect("valid")
            .expect("known field");
        assert_eq!(updated.point_size, 4.0);
        assert_eq!(field(&updated, "label"), Some(json!(null)));
        assert!(with_field(&sample, "missing", json!(1)).expect("valid").is_none());
    }

    #[test]
    fn reports_type_mismatch_as_invalid_option() {
        let sample = Sample {
            point_size: 16.0,
            label: None,
        };
        let err = with_field(&sample, "pointSize", json!("big")).expect_err("type mismatch");
        assert!(err.to_string().contains("pointSize"));
    }

    #[test]
    fn entries_require_an_object() {
        assert_eq!(entries(json!({"a": 1})).expect("object").len(), 1);
        assert!(entries(json!([1, 2])).is_err());
    }

    #[test]
    fn parses_single_color_and_palettes() {
        assert!(color_scheme_from_json("color", json!("#ff0000")).is_ok());
        assert!(color_scheme_from_json("color", json!(["#ff0000", "#00ff00"])).is_ok());
        assert!(color_scheme_from_json("color", json!([])).is_err());
        assert!(color_scheme_from_json("color", json!([1])).is_err());
    }

    #[test]
    fn non_ascii_colors_are_rejected_without_panicking() {
        for text in ["aééb", "#aééb", "éa", "#+f+f+f"] {
            let err = color_scheme_from_json("color", json!(text)).expect_err(text);
            assert!(err.to_string().contains("color"), "{text}: {err}");
        }
    }
}
