//! Chart options
//!
//! Builds ECharts option documents for the two gauges and the combined
//! element line chart. The browser only draws what is built here.

use serde::Serialize;
use serde_json::{json, Value};

use crate::sensor::{parse_timestamp, Reading};

/// Rendered height of every chart
pub const CHART_HEIGHT: &str = "400px";

/// Upper bound of the AQI gauge
pub const AQI_MAX: f64 = 500.0;

const GREEN: &str = "#58D68D";
const YELLOW: &str = "#F4D03F";
const ORANGE: &str = "#E67E22";
const RED: &str = "#E74C3C";

/// Measured quantities in a reading, in chart series order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Aqi,
    Dust,
    Gas,
    Humidity,
    Temperature,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Aqi,
        Element::Dust,
        Element::Gas,
        Element::Humidity,
        Element::Temperature,
    ];

    /// Series name in the line chart legend
    pub fn label(&self) -> &'static str {
        match self {
            Element::Aqi => "AQI",
            Element::Dust => "dust",
            Element::Gas => "gas",
            Element::Humidity => "humidity",
            Element::Temperature => "temperature",
        }
    }

    /// Row caption on the latest-reading card
    pub fn caption(&self) -> &'static str {
        match self {
            Element::Aqi => "Air Quality Index (AQI)",
            Element::Dust => "Dust",
            Element::Gas => "Gas",
            Element::Humidity => "Humidity",
            Element::Temperature => "Temperature",
        }
    }

    /// Display unit, empty for the index
    pub fn unit(&self) -> &'static str {
        match self {
            Element::Aqi => "",
            Element::Dust => "µg/m³",
            Element::Gas => "ppm",
            Element::Humidity => "%",
            Element::Temperature => "°C",
        }
    }

    pub fn value(&self, reading: &Reading) -> Option<f64> {
        match self {
            Element::Aqi => reading.corrected_gas,
            Element::Dust => reading.dust,
            Element::Gas => reading.gas,
            Element::Humidity => reading.humidity,
            Element::Temperature => reading.temperature,
        }
    }
}

/// One row of the melted (long-form) reading table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementPoint {
    pub timestamp: String,
    pub element: Element,
    pub value: Option<f64>,
}

/// Reshape readings into long form: one row per (reading, element).
///
/// Rows are grouped by element in [`Element::ALL`] order, readings in input
/// order within each group.
pub fn melt(readings: &[Reading]) -> Vec<ElementPoint> {
    Element::ALL
        .iter()
        .flat_map(|element| {
            readings.iter().map(move |r| ElementPoint {
                timestamp: chart_timestamp(&r.timestamp),
                element: *element,
                value: element.value(r),
            })
        })
        .collect()
}

/// RFC 3339 form of a timestamp when parseable, the raw string otherwise
fn chart_timestamp(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| raw.to_string())
}

fn gauge_series(
    name: &str,
    datum: &str,
    value: Option<f64>,
    detail: &str,
    bands: Value,
) -> Value {
    json!({
        "name": name,
        "type": "gauge",
        "data": [{ "value": value, "name": datum }],
        "axisLine": {
            "lineStyle": {
                "width": 10,
                "color": bands,
            }
        },
        "pointer": { "width": 5 },
        "title": {
            "fontWeight": "bolder",
            "fontSize": 20,
        },
        "detail": {
            "formatter": detail,
            "fontSize": 20,
        },
    })
}

/// Gauge options for the air quality index, range 0-500
pub fn aqi_gauge(aqi: Option<f64>) -> Value {
    let mut series = gauge_series(
        "Air Quality",
        "AQI",
        aqi,
        "{value}",
        json!([
            [50.0 / AQI_MAX, GREEN],
            [100.0 / AQI_MAX, YELLOW],
            [150.0 / AQI_MAX, ORANGE],
            [1, RED],
        ]),
    );
    series["min"] = json!(0);
    series["max"] = json!(AQI_MAX);

    json!({
        "tooltip": { "formatter": "{a} <br/>{b}: {c} " },
        "series": [series],
    })
}

/// Gauge options for dust concentration, default 0-100 range
pub fn dust_gauge(dust: Option<f64>) -> Value {
    let series = gauge_series(
        "Dust Level",
        "Dust",
        dust,
        "{value} µg/m³",
        json!([
            [0.25, GREEN],
            [0.75, YELLOW],
            [1, RED],
        ]),
    );

    json!({
        "tooltip": { "formatter": "{a} <br/>{b}: {c} µg/m³" },
        "series": [series],
    })
}

/// Combined line chart of every element over time.
///
/// Missing values become `null` points, drawn as gaps.
pub fn line_chart(readings: &[Reading]) -> Value {
    let all_parse = readings.iter().all(|r| r.parsed_timestamp().is_some());
    let points = melt(readings);

    let series: Vec<Value> = Element::ALL
        .iter()
        .map(|element| {
            let data: Vec<Value> = points
                .iter()
                .filter(|p| p.element == *element)
                .map(|p| json!([p.timestamp, p.value]))
                .collect();

            json!({
                "name": element.label(),
                "type": "line",
                "showSymbol": false,
                "data": data,
            })
        })
        .collect();

    json!({
        "title": { "text": "Combined Element Values Over Time" },
        "tooltip": { "trigger": "axis" },
        "legend": {
            "data": Element::ALL.iter().map(|e| e.label()).collect::<Vec<_>>(),
            "top": 30,
            "left": 90,
        },
        "graphic": [{
            "type": "text",
            "left": 10,
            "top": 32,
            "style": { "text": "Element", "fontWeight": "bold" },
        }],
        "grid": { "top": 80 },
        "xAxis": {
            "type": if all_parse { "time" } else { "category" },
            "name": "Timestamp",
        },
        "yAxis": {
            "type": "value",
            "name": "Value",
        },
        "series": series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(timestamp: &str, aqi: f64, dust: f64) -> Reading {
        Reading {
            device_id: "device1".to_string(),
            corrected_gas: Some(aqi),
            dust: Some(dust),
            gas: Some(400.0),
            humidity: Some(40.0),
            temperature: Some(20.0),
            timestamp: timestamp.to_string(),
            location: Some("Lab".to_string()),
        }
    }

    #[test]
    fn test_aqi_gauge_shows_value() {
        let options = aqi_gauge(Some(123.4));
        let series = &options["series"][0];

        assert_eq!(series["type"], "gauge");
        assert_eq!(series["min"], 0);
        assert_eq!(series["max"], 500.0);
        assert_eq!(series["data"][0]["value"], 123.4);
        assert_eq!(series["data"][0]["name"], "AQI");
        assert_eq!(series["detail"]["formatter"], "{value}");
    }

    #[test]
    fn test_aqi_gauge_bands() {
        let options = aqi_gauge(Some(0.0));
        let bands = options["series"][0]["axisLine"]["lineStyle"]["color"]
            .as_array()
            .unwrap()
            .clone();

        assert_eq!(bands.len(), 4);
        assert_eq!(bands[0][0], 0.1);
        assert_eq!(bands[0][1], GREEN);
        assert_eq!(bands[2][0], 0.3);
        assert_eq!(bands[2][1], ORANGE);
        assert_eq!(bands[3][1], RED);
    }

    #[test]
    fn test_dust_gauge_default_range_and_unit() {
        let options = dust_gauge(Some(30.0));
        let series = &options["series"][0];

        assert!(series.get("min").is_none());
        assert!(series.get("max").is_none());
        assert_eq!(series["data"][0]["value"], 30.0);
        assert_eq!(series["detail"]["formatter"], "{value} µg/m³");
        assert_eq!(series["axisLine"]["lineStyle"]["color"][1][0], 0.75);
        assert_eq!(options["tooltip"]["formatter"], "{a} <br/>{b}: {c} µg/m³");
    }

    #[test]
    fn test_melt_rows() {
        let readings = vec![
            reading("2024-10-15 10:00:00", 10.0, 1.0),
            reading("2024-10-15 11:00:00", 20.0, 2.0),
        ];

        let rows = melt(&readings);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].element, Element::Aqi);
        assert_eq!(rows[0].value, Some(10.0));
        assert_eq!(rows[1].value, Some(20.0));
        assert_eq!(rows[2].element, Element::Dust);
        assert_eq!(rows[0].timestamp, "2024-10-15T10:00:00+00:00");
    }

    #[test]
    fn test_line_chart_series_match_readings() {
        let readings = vec![
            reading("2024-10-15T10:00:00Z", 10.0, 1.0),
            reading("2024-10-15T11:00:00Z", 20.0, 2.0),
        ];

        let chart = line_chart(&readings);
        let series = chart["series"].as_array().unwrap();
        let names: Vec<&str> = series.iter().map(|s| s["name"].as_str().unwrap()).collect();

        assert_eq!(names, vec!["AQI", "dust", "gas", "humidity", "temperature"]);
        assert_eq!(series[0]["data"][1][1], 20.0);
        assert_eq!(series[1]["data"][0][1], 1.0);
        assert_eq!(chart["xAxis"]["type"], "time");
    }

    #[test]
    fn test_line_chart_missing_value_is_null_point() {
        let mut gap = reading("2024-10-15T11:00:00Z", 20.0, 2.0);
        gap.dust = None;
        let readings = vec![reading("2024-10-15T10:00:00Z", 10.0, 1.0), gap];

        let chart = line_chart(&readings);
        let dust = &chart["series"][1]["data"];
        assert_eq!(dust[0][1], 1.0);
        assert!(dust[1][1].is_null());
        assert_eq!(chart["series"][0]["data"][1][1], 20.0);
    }

    #[test]
    fn test_line_chart_legend_is_named() {
        let chart = line_chart(&[reading("2024-10-15T10:00:00Z", 1.0, 1.0)]);
        assert_eq!(chart["graphic"][0]["style"]["text"], "Element");
        assert_eq!(chart["legend"]["data"][0], "AQI");
    }

    #[test]
    fn test_gauge_without_value() {
        let options = dust_gauge(None);
        assert!(options["series"][0]["data"][0]["value"].is_null());
    }

    #[test]
    fn test_line_chart_unparsed_timestamps_use_category_axis() {
        let readings = vec![reading("tick-1", 5.0, 5.0)];

        let chart = line_chart(&readings);
        assert_eq!(chart["xAxis"]["type"], "category");
        assert_eq!(chart["series"][0]["data"][0][0], "tick-1");
    }
}
