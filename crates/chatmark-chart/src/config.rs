//! Chart configuration as produced by the chart tool call.
//!
//! The model describes a chart as JSON (`chartId`, `type`, `data`,
//! `options`). [`ChartConfig::build`] validates it and fills in the styling
//! defaults the chat view uses, producing a Chart.js configuration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::ChartError;

/// Colours assigned to datasets in order.
pub const COLOR_PALETTE: [&str; 10] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#FF6384", "#C9CBCF",
    "#4BC0C0", "#36A2EB",
];

/// Number of palette colours used as per-slice backgrounds of round charts.
const ROUND_CHART_COLORS: usize = 8;

/// Background alpha for datasets of non-round charts.
const BACKGROUND_ALPHA: f64 = 0.2;

const DEFAULT_BORDER_WIDTH: u64 = 2;

/// Chart description from a tool call.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    /// Identifier referenced by ```` ```chart ```` fences.
    #[serde(default)]
    pub chart_id: String,
    /// Chart.js chart type (`bar`, `line`, `pie`, ...).
    #[serde(rename = "type", default)]
    pub chart_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ChartData>,
    /// Chart.js options merged over the defaults.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

/// Labels and datasets of a chart.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Option<Vec<Value>>,
    #[serde(default)]
    pub datasets: Option<Vec<Map<String, Value>>>,
}

impl ChartConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check required parameters and data shape.
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.chart_id.is_empty() {
            return Err(ChartError::MissingParameter("chartId"));
        }
        if self.chart_type.is_empty() {
            return Err(ChartError::MissingParameter("type"));
        }
        let data = self
            .data
            .as_ref()
            .ok_or(ChartError::MissingParameter("data"))?;

        match (&data.labels, &data.datasets) {
            (Some(_), Some(datasets)) if datasets.is_empty() => {
                Err(ChartError::InvalidData("at least one dataset is required"))
            }
            (Some(_), Some(_)) => Ok(()),
            _ => Err(ChartError::InvalidData("data must contain labels and datasets")),
        }
    }

    /// Validate and build the Chart.js configuration.
    pub fn build(&self) -> Result<Value, ChartError> {
        self.validate()?;
        let data = self.data.as_ref().ok_or(ChartError::MissingParameter("data"))?;

        let datasets: Vec<Value> = data
            .datasets
            .iter()
            .flatten()
            .enumerate()
            .map(|(index, dataset)| self.style_dataset(index, dataset))
            .collect();

        Ok(json!({
            "type": self.chart_type,
            "data": {
                "labels": data.labels,
                "datasets": datasets,
            },
            "options": build_options(&self.chart_type, &self.options),
        }))
    }

    fn is_round(&self) -> bool {
        matches!(self.chart_type.as_str(), "pie" | "doughnut")
    }

    /// Fill in colours, border width and fill for one dataset.
    fn style_dataset(&self, index: usize, dataset: &Map<String, Value>) -> Value {
        let base_color = COLOR_PALETTE[index % COLOR_PALETTE.len()];
        let mut styled = dataset.clone();

        if !is_truthy(dataset.get("backgroundColor")) {
            let background = if self.is_round() {
                json!(COLOR_PALETTE[..ROUND_CHART_COLORS])
            } else {
                json!(hex_to_rgba(base_color, BACKGROUND_ALPHA))
            };
            styled.insert("backgroundColor".to_owned(), background);
        }
        if !is_truthy(dataset.get("borderColor")) {
            styled.insert("borderColor".to_owned(), json!(base_color));
        }
        if !is_truthy(dataset.get("borderWidth")) {
            styled.insert("borderWidth".to_owned(), json!(DEFAULT_BORDER_WIDTH));
        }
        if !dataset.contains_key("fill") {
            styled.insert("fill".to_owned(), json!(self.chart_type != "line"));
        }

        Value::Object(styled)
    }
}

/// Default options for `chart_type` with `options` merged over them.
fn build_options(chart_type: &str, options: &Map<String, Value>) -> Value {
    let mut defaults = json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "plugins": {
            "title": { "display": false },
            "legend": {
                "display": true,
                "position": "top",
                "labels": { "usePointStyle": true, "padding": 20 },
            },
        },
    });

    if chart_type == "line" {
        defaults["scales"] = json!({
            "x": { "display": true, "grid": { "display": true } },
            "y": { "display": true, "beginAtZero": true, "grid": { "display": true } },
        });
    }

    match defaults {
        Value::Object(defaults) => Value::Object(deep_merge(defaults, options)),
        other => other,
    }
}

/// Merge `source` into `target`, recursing into nested objects.
///
/// Arrays and scalars in `source` replace the target value.
pub fn deep_merge(mut target: Map<String, Value>, source: &Map<String, Value>) -> Map<String, Value> {
    for (key, value) in source {
        let merged = match value {
            Value::Object(nested) => {
                let base = match target.remove(key) {
                    Some(Value::Object(existing)) => existing,
                    _ => Map::new(),
                };
                Value::Object(deep_merge(base, nested))
            }
            other => other.clone(),
        };
        target.insert(key.clone(), merged);
    }
    target
}

/// `#RRGGBB` to `rgba(r, g, b, alpha)`.
#[must_use]
pub fn hex_to_rgba(hex: &str, alpha: f64) -> String {
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
            .unwrap_or(0)
    };
    format!("rgba({}, {}, {}, {alpha})", channel(1..3), channel(3..5), channel(5..7))
}

/// Truthiness of an optional JSON value, as a script would see it.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n < 0.0 || n > 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(json: &str) -> ChartConfig {
        ChartConfig::from_json(json).unwrap()
    }

    #[test]
    fn test_missing_parameters() {
        let err = config(r#"{"type":"bar","data":{}}"#).validate().unwrap_err();
        assert!(matches!(err, ChartError::MissingParameter("chartId")));

        let err = config(r#"{"chartId":"a","data":{}}"#).validate().unwrap_err();
        assert!(matches!(err, ChartError::MissingParameter("type")));

        let err = config(r#"{"chartId":"a","type":"bar"}"#).validate().unwrap_err();
        assert!(matches!(err, ChartError::MissingParameter("data")));
    }

    #[test]
    fn test_invalid_data() {
        let err = config(r#"{"chartId":"a","type":"bar","data":{"labels":[]}}"#)
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid chart data: data must contain labels and datasets");

        let err = config(r#"{"chartId":"a","type":"bar","data":{"labels":[],"datasets":[]}}"#)
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid chart data: at least one dataset is required");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(ChartConfig::from_json("{"), Err(ChartError::Json(_))));
    }

    #[test]
    fn test_bar_dataset_styling() {
        let built = config(
            r#"{"chartId":"s","type":"bar","data":{"labels":["a","b"],
                "datasets":[{"label":"x","data":[1,2]},{"label":"y","data":[3,4],"borderWidth":0}]}}"#,
        )
        .build()
        .unwrap();

        let datasets = &built["data"]["datasets"];
        assert_eq!(datasets[0]["backgroundColor"], "rgba(255, 99, 132, 0.2)");
        assert_eq!(datasets[0]["borderColor"], "#FF6384");
        assert_eq!(datasets[0]["borderWidth"], 2);
        assert_eq!(datasets[0]["fill"], true);
        assert_eq!(datasets[0]["label"], "x");
        assert_eq!(datasets[1]["borderColor"], "#36A2EB");
        // Zero is replaced like any other falsy width.
        assert_eq!(datasets[1]["borderWidth"], 2);
        assert!(built["options"].get("scales").is_none());
    }

    #[test]
    fn test_pie_uses_palette_backgrounds() {
        let built = config(
            r#"{"chartId":"p","type":"pie","data":{"labels":["a"],"datasets":[{"data":[1]}]}}"#,
        )
        .build()
        .unwrap();

        let background = built["data"]["datasets"][0]["backgroundColor"]
            .as_array()
            .unwrap();
        assert_eq!(background.len(), 8);
        assert_eq!(background[0], "#FF6384");
    }

    #[test]
    fn test_line_chart_defaults() {
        let built = config(
            r#"{"chartId":"l","type":"line","data":{"labels":[],"datasets":[{"data":[],"fill":true}]}}"#,
        )
        .build()
        .unwrap();

        assert_eq!(built["data"]["datasets"][0]["fill"], true);
        assert_eq!(built["options"]["scales"]["y"]["beginAtZero"], true);
        assert_eq!(built["options"]["plugins"]["legend"]["position"], "top");
    }

    #[test]
    fn test_explicit_colors_are_kept() {
        let built = config(
            r##"{"chartId":"c","type":"bar","data":{"labels":[],
                "datasets":[{"backgroundColor":"#000","borderColor":"#111"}]}}"##,
        )
        .build()
        .unwrap();

        assert_eq!(built["data"]["datasets"][0]["backgroundColor"], "#000");
        assert_eq!(built["data"]["datasets"][0]["borderColor"], "#111");
    }

    #[test]
    fn test_options_deep_merged() {
        let built = config(
            r#"{"chartId":"o","type":"line","data":{"labels":[],"datasets":[{}]},
                "options":{"plugins":{"title":{"display":true,"text":"T"}},"scales":{"y":{"beginAtZero":false}}}}"#,
        )
        .build()
        .unwrap();

        let options = &built["options"];
        assert_eq!(options["plugins"]["title"], json!({"display": true, "text": "T"}));
        assert_eq!(options["plugins"]["legend"]["display"], true);
        assert_eq!(options["scales"]["y"]["beginAtZero"], false);
        assert_eq!(options["scales"]["y"]["grid"]["display"], true);
        assert_eq!(options["responsive"], true);
    }

    #[test]
    fn test_deep_merge_replaces_arrays_and_scalars() {
        let target = json!({"a": [1, 2], "b": {"c": 1}, "d": 5});
        let source = json!({"a": [3], "b": 7, "d": {"e": 1}});
        let (Value::Object(target), Value::Object(source)) = (target, source) else {
            unreachable!()
        };

        assert_eq!(
            Value::Object(deep_merge(target, &source)),
            json!({"a": [3], "b": 7, "d": {"e": 1}})
        );
    }

    #[test]
    fn test_hex_to_rgba() {
        assert_eq!(hex_to_rgba("#36A2EB", 0.2), "rgba(54, 162, 235, 0.2)");
        assert_eq!(hex_to_rgba("#zzzzzz", 1.0), "rgba(0, 0, 0, 1)");
    }
}
