//! # codestream-report
//!
//! HTML rendering for the CodeStream dashboards.
//!
//! [`HtmlPage`] is a small builder fed structured data by the endpoints:
//! paragraphs, section titles, tables, and Chart.js line charts (one
//! `<canvas>` per graph, chart data embedded as JSON). Pages always render,
//! even when every series is empty.

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::Serialize;
use serde_json::json;

/// One chart point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl From<(f64, f64)> for ChartPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Chart data: numeric x/y points or category labels with values
#[derive(Debug, Clone)]
pub enum GraphData {
    /// Scatter-style line chart over a linear x axis
    Points(Vec<ChartPoint>),
    /// Line chart over category labels (one value per label)
    Labeled {
        /// Category labels, one per value
        labels: Vec<String>,
        /// Y values
        values: Vec<f64>,
    },
}

/// One Chart.js line chart
#[derive(Debug, Clone)]
pub struct GraphSpec {
    /// DOM id of the canvas, unique per page
    pub graph_id: String,
    /// Dataset label
    pub label: String,
    /// X axis title
    pub x_label: String,
    /// Y axis title
    pub y_label: String,
    /// The series to plot
    pub data: GraphData,
}

impl GraphSpec {
    fn chart_config(&self) -> serde_json::Value {
        let (labels, data, x_scale) = match &self.data {
            GraphData::Points(points) => (
                serde_json::Value::Null,
                json!(points),
                json!({ "type": "linear", "title": { "display": true, "text": self.x_label } }),
            ),
            GraphData::Labeled { labels, values } => (
                json!(labels),
                json!(values),
                json!({ "title": { "display": true, "text": self.x_label } }),
            ),
        };
        json!({
            "type": "line",
            "data": {
                "labels": labels,
                "datasets": [{
                    "label": self.label,
                    "data": data,
                    "borderColor": "rgba(75, 192, 192, 1)",
                    "borderWidth": 1,
                    "fill": false,
                }],
            },
            "options": {
                "responsive": false,
                "scales": {
                    "x": x_scale,
                    "y": { "title": { "display": true, "text": self.y_label } },
                },
            },
        })
    }

    fn init_script(&self) -> String {
        format!(
            "document.addEventListener('DOMContentLoaded', () => {{\n  \
             const ctx = document.getElementById('{id}').getContext('2d');\n  \
             new Chart(ctx, {config});\n}});",
            id = self.graph_id,
            config = self.chart_config()
        )
    }
}

/// Escape text destined for HTML element content
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Builder for a dashboard page
#[derive(Debug)]
pub struct HtmlPage {
    title: String,
    body: String,
    graphs: Vec<GraphSpec>,
}

impl HtmlPage {
    /// Start a page with the given `<title>` and `<h1>`
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let body = format!("<h1>{}</h1>", escape_html(&title));
        Self {
            title,
            body,
            graphs: Vec::new(),
        }
    }

    /// Append a section title
    pub fn add_title(&mut self, title: &str) {
        self.add_raw(&format!("<h2>{}</h2>", escape_html(title)));
    }

    /// Append one paragraph
    pub fn add_paragraph(&mut self, text: &str) {
        self.add_raw(&format!("<p>{}</p>", escape_html(text)));
    }

    /// Append several paragraphs
    pub fn add_paragraphs<'a>(&mut self, texts: impl IntoIterator<Item = &'a str>) {
        for text in texts {
            self.add_paragraph(text);
        }
    }

    /// Append an unordered list
    pub fn add_list<'a>(&mut self, items: impl IntoIterator<Item = &'a str>) {
        let mut out = String::from("<ul>\n");
        for item in items {
            out.push_str(&format!("<li>{}</li>\n", escape_html(item)));
        }
        out.push_str("</ul>");
        self.add_raw(&out);
    }

    /// Append preformatted content (clone listings)
    pub fn add_code_block(&mut self, code: &str) {
        self.add_raw(&format!("<pre><code>{}</code></pre>", escape_html(code)));
    }

    /// Append a chart; the canvas lands here, the init script at the bottom
    pub fn add_graph(&mut self, graph: GraphSpec) {
        self.add_raw(&format!(
            "<canvas id='{}' width='800' height='400' \
             style=\"width: 800px; height: 400px;\"></canvas>",
            graph.graph_id
        ));
        self.graphs.push(graph);
    }

    /// Append a table. Row capping is the caller's concern.
    pub fn add_table(&mut self, headers: &[&str], rows: &[Vec<String>]) {
        let mut out = String::from("<table border='1'>\n<tr>");
        for header in headers {
            out.push_str(&format!("<th>{}</th>", escape_html(header)));
        }
        out.push_str("</tr>\n");
        for row in rows {
            out.push_str("<tr>");
            for cell in row {
                out.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</table>");
        self.add_raw(&out);
    }

    /// Append a horizontal rule
    pub fn add_rule(&mut self) {
        self.add_raw("<hr>");
    }

    fn add_raw(&mut self, content: &str) {
        self.body.push('\n');
        self.body.push_str(content);
    }

    /// Render the complete document
    pub fn render(&self) -> String {
        let scripts = self
            .graphs
            .iter()
            .map(|g| g.init_script())
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "<html>\n<head>\n<title>{title}</title>\n\
             <script src='https://cdn.jsdelivr.net/npm/chart.js'></script>\n\
             <script src='https://cdn.jsdelivr.net/npm/chartjs-adapter-date-fns'></script>\n\
             </head>\n<body>\n{body}\n<script>\n{scripts}\n</script>\n</body>\n</html>\n",
            title = escape_html(&self.title),
            body = self.body,
            scripts = scripts,
        )
    }
}
