//! Chart-ready projections of a FeatureRecord's file-type distribution.
//!
//! Pure formatting only: no I/O, no shared state. The payload shape
//! (`chartData` / `chartOptions`) is the contract expected by the charting
//! frontend.

use crate::feature::FeatureRecord;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;

/// Categorical color palette cycled across file-type labels.
const PALETTE: [&str; 8] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#FF6384", "#C9CBCF",
];

/// Supported chart projections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Histogram,
    Bar,
    Pie,
    Line,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Histogram => "histogram",
            Self::Bar => "bar",
            Self::Pie => "pie",
            Self::Line => "line",
        }
    }
}

impl FromStr for ChartKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "histogram" => Ok(Self::Histogram),
            "bar" => Ok(Self::Bar),
            "pie" => Ok(Self::Pie),
            "line" => Ok(Self::Line),
            other => Err(crate::Error::UnknownChartKind(other.to_string())),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Chart payload handed to the frontend.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPayload {
    pub chart_data: Value,
    pub chart_options: Value,
}

impl ChartPayload {
    /// Project a FeatureRecord's file-type mapping into the requested chart.
    pub fn project(kind: ChartKind, record: &FeatureRecord) -> Self {
        let (labels, values) = sorted_distribution(record);
        match kind {
            ChartKind::Histogram => histogram(labels, values),
            ChartKind::Bar => bar(labels, values),
            ChartKind::Pie => pie(labels, values),
            ChartKind::Line => line(labels, values),
        }
    }
}

/// Labels sorted for a stable projection regardless of map iteration order.
fn sorted_distribution(record: &FeatureRecord) -> (Vec<String>, Vec<u64>) {
    let mut pairs: Vec<(&String, &u64)> = record.file_types.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs.into_iter().map(|(k, v)| (k.clone(), *v)).unzip()
}

fn colors(n: usize) -> Vec<&'static str> {
    PALETTE.iter().cycle().take(n).copied().collect()
}

fn histogram(labels: Vec<String>, values: Vec<u64>) -> ChartPayload {
    let colors = colors(labels.len());
    ChartPayload {
        chart_data: json!({
            "labels": labels,
            "datasets": [{
                "label": "File Count",
                "data": values,
                "backgroundColor": colors,
                "borderColor": colors,
                "borderWidth": 1
            }]
        }),
        chart_options: json!({
            "responsive": true,
            "maintainAspectRatio": true,
            "plugins": {
                "legend": { "display": false },
                "title": { "display": true, "text": "File Type Distribution (Histogram)" }
            },
            "scales": {
                "y": { "beginAtZero": true, "title": { "display": true, "text": "Number of Files" } },
                "x": { "title": { "display": true, "text": "File Type" } }
            }
        }),
    }
}

fn bar(labels: Vec<String>, values: Vec<u64>) -> ChartPayload {
    let colors = colors(labels.len());
    ChartPayload {
        chart_data: json!({
            "labels": labels,
            "datasets": [{
                "label": "File Count",
                "data": values,
                "backgroundColor": colors,
                "borderColor": colors,
                "borderWidth": 2
            }]
        }),
        chart_options: json!({
            "responsive": true,
            "maintainAspectRatio": true,
            "plugins": {
                "legend": { "display": true, "position": "top" },
                "title": { "display": true, "text": "File Type Distribution (Bar Chart)" }
            },
            "scales": {
                "y": { "beginAtZero": true, "title": { "display": true, "text": "Number of Files" } }
            }
        }),
    }
}

fn pie(labels: Vec<String>, values: Vec<u64>) -> ChartPayload {
    let colors = colors(labels.len());
    ChartPayload {
        chart_data: json!({
            "labels": labels,
            "datasets": [{
                "data": values,
                "backgroundColor": colors,
                "borderColor": "#ffffff",
                "borderWidth": 2
            }]
        }),
        chart_options: json!({
            "responsive": true,
            "maintainAspectRatio": true,
            "plugins": {
                "legend": { "display": true, "position": "right" },
                "title": { "display": true, "text": "File Type Distribution (Pie Chart)" }
            }
        }),
    }
}

fn line(labels: Vec<String>, values: Vec<u64>) -> ChartPayload {
    ChartPayload {
        chart_data: json!({
            "labels": labels,
            "datasets": [{
                "label": "File Count Trend",
                "data": values,
                "backgroundColor": "rgba(102, 126, 234, 0.2)",
                "borderColor": "#667eea",
                "borderWidth": 3,
                "fill": true,
                "tension": 0.4,
                "pointRadius": 5,
                "pointHoverRadius": 7,
                "pointBackgroundColor": "#667eea",
                "pointBorderColor": "#fff",
                "pointBorderWidth": 2
            }]
        }),
        chart_options: json!({
            "responsive": true,
            "maintainAspectRatio": true,
            "plugins": {
                "legend": { "display": true, "position": "top" },
                "title": { "display": true, "text": "File Type Distribution (Line Chart)" }
            },
            "scales": {
                "y": {
                    "beginAtZero": true,
                    "title": { "display": true, "text": "Number of Files" },
                    "grid": { "color": "rgba(0, 0, 0, 0.1)" }
                },
                "x": {
                    "title": { "display": true, "text": "File Type" },
                    "grid": { "display": false }
                }
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{RawFeatures, normalize};
    use std::collections::HashMap;

    fn record() -> FeatureRecord {
        let mut file_types = HashMap::new();
        file_types.insert("PDF".to_string(), 12u64);
        file_types.insert("JPG".to_string(), 30u64);
        file_types.insert("EXE".to_string(), 5u64);
        normalize(RawFeatures {
            filename: Some("disk.dd".to_string()),
            total_files: Some(47),
            file_types: Some(file_types),
            ..Default::default()
        })
    }

    #[test]
    fn chart_kind_parse() {
        assert_eq!("histogram".parse::<ChartKind>().unwrap(), ChartKind::Histogram);
        assert_eq!("line".parse::<ChartKind>().unwrap(), ChartKind::Line);
        assert!("scatter".parse::<ChartKind>().is_err());
    }

    #[test]
    fn projection_labels_match_distribution() {
        let record = record();
        let payload = ChartPayload::project(ChartKind::Bar, &record);
        let labels = payload.chart_data["labels"].as_array().unwrap();
        assert_eq!(labels.len(), 3);
        // Sorted for stable output.
        assert_eq!(labels[0], "EXE");
        assert_eq!(labels[1], "JPG");
        assert_eq!(labels[2], "PDF");

        let values = payload.chart_data["datasets"][0]["data"].as_array().unwrap();
        assert_eq!(values[0], 5);
        assert_eq!(values[1], 30);
        assert_eq!(values[2], 12);
    }

    #[test]
    fn pie_has_no_dataset_label() {
        let payload = ChartPayload::project(ChartKind::Pie, &record());
        assert!(payload.chart_data["datasets"][0].get("label").is_none());
        assert_eq!(payload.chart_data["datasets"][0]["borderColor"], "#ffffff");
    }

    #[test]
    fn payload_serializes_camel_case() {
        let payload = ChartPayload::project(ChartKind::Histogram, &record());
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("chartData").is_some());
        assert!(json.get("chartOptions").is_some());
    }
}
