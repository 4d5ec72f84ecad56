//! HTML rendering
//!
//! Server-side page for a [`PageView`]. Charts are drawn in the browser by
//! ECharts from the option documents embedded in the page.

use serde_json::Value;
use std::fmt::Write;

use super::charts::{Element, CHART_HEIGHT};
use super::view::{BannerLevel, DeviceView, PageView};

pub const PAGE_TITLE: &str = "Air Quality Monitoring System";

const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5/dist/echarts.min.js";

const STYLE: &str = r#"
body { margin: 0; font-family: sans-serif; background: #0e1117; color: #fafafa; }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 220px; padding: 24px 16px; background: #262730; }
.sidebar a { display: block; padding: 6px 8px; color: #fafafa; text-decoration: none; border-radius: 4px; }
.sidebar a.selected { background: #ff4b4b; }
main { flex: 1; padding: 24px 48px; }
.banner { padding: 12px 16px; margin-bottom: 12px; border-radius: 6px; }
.banner.error { background: #3e2428; color: #ffabab; }
.banner.warning { background: #3d3a25; color: #ffe08a; }
.card { padding: 16px 24px; margin-bottom: 24px; border-radius: 8px; background: #1c1f26; box-shadow: 0 2px 6px rgba(0,0,0,.4); }
.chart { width: 100%; }
footer { margin-top: 32px; font-size: 12px; color: #888; }
"#;

/// Page-level rendering options
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Seconds between automatic page reloads
    pub refresh_secs: u64,
    /// Footer note, e.g. when the data was last fetched
    pub footer: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            refresh_secs: 600,
            footer: None,
        }
    }
}

/// Escape text for interpolation into HTML
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize JSON so it is safe inside a script element
fn script_json(value: &Value) -> String {
    value
        .to_string()
        .replace("</", "<\\/")
        .replace("<!--", "<\\!--")
}

/// Display form of a measured value, `-` when missing
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

/// Link target for a device page
pub fn device_href(device_id: &str) -> String {
    format!("/devices/{}", urlencoding::encode(device_id))
}

/// Render a complete dashboard page
pub fn render_page(page: &PageView, options: &RenderOptions) -> String {
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta http-equiv=\"refresh\" content=\"{refresh}\">\n\
         <title>{title}</title>\n<style>{style}</style>\n\
         <script src=\"{cdn}\"></script>\n</head>\n<body>\n<div class=\"layout\">\n",
        refresh = options.refresh_secs,
        title = PAGE_TITLE,
        style = STYLE,
        cdn = ECHARTS_CDN,
    );

    render_sidebar(&mut html, page);

    html.push_str("<main>\n");
    let _ = writeln!(html, "<h1>{}</h1>", PAGE_TITLE);

    for banner in &page.banners {
        let class = match banner.level {
            BannerLevel::Error => "error",
            BannerLevel::Warning => "warning",
        };
        let _ = writeln!(
            html,
            "<div class=\"banner {}\">{}</div>",
            class,
            escape_html(&banner.message)
        );
    }

    if let Some(device) = &page.device {
        render_device(&mut html, device);
    }

    if let Some(footer) = &options.footer {
        let _ = writeln!(html, "<footer>{}</footer>", escape_html(footer));
    }

    html.push_str("</main>\n</div>\n</body>\n</html>\n");
    html
}

fn render_sidebar(html: &mut String, page: &PageView) {
    if page.device_ids.is_empty() {
        return;
    }

    html.push_str("<nav class=\"sidebar\">\n<h3>Select a device:</h3>\n");
    for id in &page.device_ids {
        let class = if page.selected.as_deref() == Some(id.as_str()) {
            " class=\"selected\""
        } else {
            ""
        };
        let _ = writeln!(
            html,
            "<a href=\"{}\"{}>{}</a>",
            escape_html(&device_href(id)),
            class,
            escape_html(id)
        );
    }
    html.push_str("</nav>\n");
}

fn render_device(html: &mut String, device: &DeviceView) {
    let r = &device.latest;
    let location = r.location.as_deref().unwrap_or("Unknown");

    let _ = write!(
        html,
        "<div class=\"card\">\n<h3>Device ID: {id}</h3>\n<h4>Location: {location}</h4>\n<hr>\n<ul>\n",
        id = escape_html(&device.device_id),
        location = escape_html(location),
    );

    for element in Element::ALL {
        let value = element.value(r);
        let unit = match element.unit() {
            unit if value.is_some() && !unit.is_empty() => format!(" {}", unit),
            _ => String::new(),
        };
        let _ = writeln!(
            html,
            "<li>{}: {}{}</li>",
            element.caption(),
            format_value(value),
            unit
        );
    }

    let _ = write!(
        html,
        "<li>Timestamp: {}</li>\n</ul>\n</div>\n",
        escape_html(&r.timestamp)
    );

    html.push_str("<h2>Air Quality Index (AQI):</h2>\n");
    render_chart(html, "aqi-gauge", &device.aqi_gauge);

    html.push_str("<h2>Dust Level: </h2>\n");
    render_chart(html, "dust-gauge", &device.dust_gauge);

    let _ = writeln!(
        html,
        "<h2>Line Chart for Data Over Time - Device ID: {}</h2>",
        escape_html(&device.device_id)
    );
    render_chart(html, "history-chart", &device.line_chart);
}

fn render_chart(html: &mut String, id: &str, options: &Value) {
    let _ = write!(
        html,
        "<div id=\"{id}\" class=\"chart\" style=\"height: {height}\"></div>\n\
         <script>echarts.init(document.getElementById(\"{id}\")).setOption({options});</script>\n",
        id = id,
        height = CHART_HEIGHT,
        options = script_json(options),
    );
}
