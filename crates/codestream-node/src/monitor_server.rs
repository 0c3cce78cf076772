//! Monitor dashboard HTTP server

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::State, response::Html, routing::get, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use codestream_monitor::derive::{self, Point};
use codestream_monitor::{classify, SampleLog, SampleSnapshot};
use codestream_report::{ChartPoint, GraphData, GraphSpec, HtmlPage};
use codestream_store::{CloneDoc, MemoryStore, StatusEntry, StoreReader, StoreResult};

/// Rows shown in each dashboard table
const TABLE_ROW_CAP: usize = 100;

/// Shared state behind the monitor route
pub struct MonitorState {
    /// Store read surface
    pub store: Arc<MemoryStore>,
    /// Samples collected by the poller
    pub samples: Arc<SampleLog>,
}

/// Monitor dashboard server
pub struct MonitorServer {
    listen_addr: SocketAddr,
    state: Arc<MonitorState>,
}

impl MonitorServer {
    /// Create the server
    pub fn new(listen_addr: SocketAddr, state: Arc<MonitorState>) -> Self {
        Self { listen_addr, state }
    }

    fn build_router(&self) -> Router {
        Router::new()
            .route("/", get(dashboard))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .with_state(self.state.clone())
    }

    /// Run the server
    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.build_router();
        let listener = TcpListener::bind(self.listen_addr).await?;
        tracing::info!("visualization available on {}", self.listen_addr);
        axum::serve(listener, app).await?;
        Ok(())
    }
}

async fn dashboard(State(state): State<Arc<MonitorState>>) -> Html<String> {
    Html(render_dashboard(
        state.store.as_ref(),
        &state.samples.snapshot(),
    ))
}

fn chart_points(points: Vec<Point>) -> GraphData {
    GraphData::Points(
        points
            .into_iter()
            .map(|p| ChartPoint::from((p.x, p.y)))
            .collect(),
    )
}

fn graph(id: &str, label: &str, x_label: &str, y_label: &str, points: Vec<Point>) -> GraphSpec {
    GraphSpec {
        graph_id: id.to_string(),
        label: label.to_string(),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        data: chart_points(points),
    }
}

type Totals = (u64, u64, u64, Vec<CloneDoc>, Vec<StatusEntry>);

fn read_totals<S: StoreReader>(store: &S) -> StoreResult<Totals> {
    Ok((
        store.files_count()?,
        store.chunks_count()?,
        store.candidates_count()?,
        store.clones()?,
        store.status_log()?,
    ))
}

/// Monitor dashboard: totals, derived charts, and step tables.
///
/// All derived series are recomputed here from the sample snapshot on every
/// request; nothing is cached between renders.
pub fn render_dashboard<S: StoreReader>(store: &S, samples: &SampleSnapshot) -> String {
    let title = "Data Visualization";

    let (files, chunks, candidates, clones, status_log) = match read_totals(store) {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!("dashboard render degraded: {}", e);
            let mut page = HtmlPage::new(title);
            page.add_paragraph("Could not connect to store, try reloading the page");
            return page.render();
        }
    };

    let clones_count = clones.len() as u64;
    let avg_clone_size = clones
        .iter()
        .map(|c| c.source_size() as f64)
        .sum::<f64>()
        / clones_count.max(1) as f64;

    let mut page = HtmlPage::new(title);
    page.add_paragraphs([
        format!("Files: {}", files).as_str(),
        format!("Chunks: {}", chunks).as_str(),
        format!("Candidates: {}", candidates).as_str(),
        format!("Clones: {}", clones_count).as_str(),
        format!(
            "Average number of chunks per file: {:.2}",
            chunks as f64 / files.max(1) as f64
        )
        .as_str(),
        format!("Average clone size: {:.2}", avg_clone_size).as_str(),
    ]);

    // Chunk-processing step
    page.add_title("Chunks growth over time");
    page.add_graph(graph(
        "processedGraph",
        "Data visualization",
        "Time (s)",
        "Chunks",
        derive::growth_points(&samples.chunks),
    ));

    page.add_title("Chunks generated per interval");
    page.add_paragraph("First value is inaccurate due to start up");
    page.add_graph(graph(
        "newChunksVsTime",
        "New chunks",
        "Time (s)",
        "Chunks",
        derive::per_interval_points(&samples.chunks),
    ));

    let chunk_rates = derive::time_per_unit(&samples.chunks);
    page.add_title("Processing time per chunk compared to total amount of processed chunks");
    page.add_paragraphs([
        "First value is inaccurate due to start up",
        format!(
            "Average time to process one chunk: {:.2} ms",
            derive::average_excluding_first(&chunk_rates)
        )
        .as_str(),
    ]);
    page.add_graph(graph(
        "processingTimeGraph",
        "Processing time per chunks (ms)",
        "Total chunks",
        "Processing time (ms)",
        chunk_rates.clone(),
    ));

    // Candidate-expansion step
    let candidate_total = classify(&status_log)
        .candidates_found
        .unwrap_or(0);
    page.add_title("Expanded candidates vs remaining candidates");
    page.add_paragraph(&format!("Total number of candidates: {}", candidate_total));
    page.add_graph(graph(
        "expandedClonesGraph",
        "New clones compared to candidates",
        "Candidates",
        "New clones created for interval",
        derive::expansion_points(&samples.clones, &samples.candidates),
    ));

    let expand_rates = derive::time_per_unit(&samples.clones);
    let expand_ys: Vec<f64> = expand_rates.iter().map(|p| p.y).collect();
    page.add_paragraph(&format!(
        "Average expand time per candidate: {:.2} ms",
        derive::average(&expand_ys)
    ));
    page.add_graph(graph(
        "expandedTimePerCandidate",
        "Time to expand candidate, (time to process vs clones)",
        "Clones",
        "Expand time per candidate (ms)",
        expand_rates.clone(),
    ));

    // Step tables, capped to the first rows
    page.add_title("Table for process chunks step");
    let chunk_rows: Vec<Vec<String>> = samples
        .chunks
        .iter()
        .zip(&chunk_rates)
        .take(TABLE_ROW_CAP)
        .map(|(sample, rate)| {
            vec![
                sample.value.to_string(),
                format!("{:.2}", rate.y),
                format!("{:.1}", sample.offset_ms as f64 / 1000.0),
            ]
        })
        .collect();
    page.add_table(
        &["Chunks", "Process time per chunk (ms)", "Seconds since start"],
        &chunk_rows,
    );

    page.add_title("Table for expand candidates step");
    let expand_rows: Vec<Vec<String>> = samples
        .candidates
        .iter()
        .zip(&samples.clones)
        .zip(&expand_rates)
        .take(TABLE_ROW_CAP)
        .map(|((candidate, clone), rate)| {
            vec![
                candidate.value.to_string(),
                clone.value.to_string(),
                format!("{:.2}", rate.y),
                format!("{:.1}", candidate.offset_ms as f64 / 1000.0),
            ]
        })
        .collect();
    page.add_table(
        &[
            "Candidates",
            "Clones",
            "Time to expand candidate (ms)",
            "Seconds since start",
        ],
        &expand_rows,
    );

    page.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use codestream_monitor::Sample;
    use codestream_store::{CloneDoc, CloneInstance, StatusEntry, StoreError, StoreResult, StoreWriter};

    struct DownStore;

    impl StoreReader for DownStore {
        fn files_count(&self) -> StoreResult<u64> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        fn file_names(&self) -> StoreResult<Vec<String>> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        fn chunks_count(&self) -> StoreResult<u64> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        fn candidates_count(&self) -> StoreResult<u64> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        fn clones_count(&self) -> StoreResult<u64> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        fn clones(&self) -> StoreResult<Vec<CloneDoc>> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        fn status_log(&self) -> StoreResult<Vec<StatusEntry>> {
            Err(StoreError::Unavailable("down".to_string()))
        }
    }

    fn snapshot() -> SampleSnapshot {
        SampleSnapshot {
            chunks: vec![Sample::new(10_000, 100), Sample::new(20_000, 250)],
            candidates: vec![Sample::new(30_000, 40), Sample::new(40_000, 40)],
            clones: vec![Sample::new(30_000, 10), Sample::new(40_000, 25)],
        }
    }

    #[test]
    fn test_dashboard_renders_totals_and_charts() {
        let store = MemoryStore::new();
        store.add_file("a.java").unwrap();
        store.add_chunks(250).unwrap();
        store.add_candidates(40).unwrap();
        store
            .add_clones(vec![CloneDoc::new(vec![CloneInstance {
                file_name: "a.java".to_string(),
                start_line: 1,
                end_line: 9,
            }])])
            .unwrap();
        store.push_status("Found 42 candidates").unwrap();

        let html = render_dashboard(&store, &snapshot());
        assert!(html.contains("Files: 1"));
        assert!(html.contains("Chunks: 250"));
        assert!(html.contains("Average number of chunks per file: 250.00"));
        assert!(html.contains("Average clone size: 8.00"));
        assert!(html.contains("Total number of candidates: 42"));
        assert!(html.contains("processedGraph"));
        assert!(html.contains("expandedTimePerCandidate"));
        assert!(html.contains("Table for process chunks step"));
    }

    #[test]
    fn test_dashboard_renders_with_empty_samples() {
        let store = MemoryStore::new();
        let html = render_dashboard(&store, &SampleSnapshot::default());
        assert!(html.contains("Files: 0"));
        assert!(html.contains("Average number of chunks per file: 0.00"));
        assert!(html.contains("Total number of candidates: 0"));
        assert!(html.contains("Table for expand candidates step"));
    }

    #[test]
    fn test_dashboard_degrades_when_store_is_down() {
        let html = render_dashboard(&DownStore, &snapshot());
        assert!(html.contains("Could not connect to store"));
    }

    #[test]
    fn test_tables_are_capped() {
        let store = MemoryStore::new();
        let many = SampleSnapshot {
            chunks: (0..250)
                .map(|i| Sample::new(i * 1000, i * 10))
                .collect(),
            candidates: Vec::new(),
            clones: Vec::new(),
        };
        let html = render_dashboard(&store, &many);
        let rows = html.matches("<td>").count();
        // 100 chunk rows of 3 cells, empty expand table
        assert_eq!(rows, 300);
    }
}
