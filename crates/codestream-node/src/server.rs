//! Ingest and report HTTP server (consumer side)

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    response::Html,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use codestream_monitor::derive;
use codestream_pipeline::{Pipeline, RunStats, StatsSnapshot};
use codestream_report::{GraphData, GraphSpec, HtmlPage};
use codestream_store::{MemoryStore, StoreReader};

use crate::detector::WindowDetector;

/// Pipeline as wired by this binary
pub type AppPipeline = Pipeline<WindowDetector, MemoryStore>;

/// Maximum upload size (10 MB)
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Shared state behind the consumer routes
pub struct AppState {
    /// The per-file pipeline
    pub pipeline: Arc<AppPipeline>,
    /// Store read surface for the report pages
    pub store: Arc<MemoryStore>,
    /// Run statistics fed by the pipeline
    pub stats: Arc<RunStats>,
}

/// Ingest + report server
pub struct IngestServer {
    listen_addr: SocketAddr,
    state: Arc<AppState>,
}

impl IngestServer {
    /// Create the server
    pub fn new(listen_addr: SocketAddr, state: Arc<AppState>) -> Self {
        Self { listen_addr, state }
    }

    fn build_router(&self) -> Router {
        Router::new()
            .route("/", post(ingest).get(view_clones))
            .route("/timers", get(view_timers))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE)),
            )
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .with_state(self.state.clone())
    }

    /// Run the server
    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.build_router();
        let listener = TcpListener::bind(self.listen_addr).await?;
        tracing::info!("listening for files on {}", self.listen_addr);
        axum::serve(listener, app).await?;
        Ok(())
    }
}

/// Accept one `(name, content)` upload and acknowledge immediately.
///
/// Processing is fire-and-forget: the run executes on a blocking worker,
/// and a failed run is logged without affecting other in-flight runs or
/// the response.
async fn ingest(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> &'static str {
    let mut name = None;
    let mut content = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => name = field.text().await.ok(),
            Some("data") => content = field.text().await.ok(),
            _ => {}
        }
    }

    match (name, content) {
        (Some(name), Some(content)) => {
            let pipeline = Arc::clone(&state.pipeline);
            tokio::task::spawn_blocking(move || {
                if let Err(e) = pipeline.process(&name, content) {
                    tracing::error!("run for {} aborted: {}", name, e);
                }
            });
        }
        _ => tracing::warn!("upload rejected: missing name or data field"),
    }
    ""
}

async fn view_clones(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_clone_report(state.store.as_ref(), &state.stats))
}

async fn view_timers(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render_timers_page(
        state.store.as_ref(),
        &state.stats.snapshot(),
    ))
}

fn statistics_line<S: StoreReader>(store: &S) -> Option<String> {
    let files = store.files_count().ok()?;
    let clones = store.clones_count().ok()?;
    Some(format!(
        "Processed {} files containing {} clones.",
        files, clones
    ))
}

fn store_unavailable(title: &str) -> String {
    let mut page = HtmlPage::new(title);
    page.add_paragraph("Could not connect to store, try reloading the page");
    page.render()
}

/// Clone report: totals, last-run timers, clone listing, processed files
pub fn render_clone_report<S: StoreReader>(store: &S, stats: &RunStats) -> String {
    let title = "CodeStream Clone Detector";
    let (clones, file_names, stats_line) = match (
        store.clones(),
        store.file_names(),
        statistics_line(store),
    ) {
        (Ok(clones), Ok(file_names), Some(line)) => (clones, file_names, line),
        _ => return store_unavailable(title),
    };

    let mut page = HtmlPage::new(title);
    page.add_paragraph(&stats_line);

    let last_timers = stats.last_timers();
    if !last_timers.is_empty() {
        page.add_paragraph("Timers for last file processed:");
        let items: Vec<String> = last_timers
            .iter()
            .map(|(name, elapsed)| format!("{}: {} µs", name, elapsed.as_micros()))
            .collect();
        page.add_list(items.iter().map(String::as_str));
    }

    for clone in &clones {
        let Some(source) = clone.source() else { continue };
        page.add_rule();
        page.add_title(&format!("Source File: {}", source.file_name));
        page.add_paragraph(&format!(
            "Starting at line: {} , ending at line: {}",
            source.start_line, source.end_line
        ));
        let targets: Vec<String> = clone
            .targets()
            .iter()
            .map(|t| format!("Found in {} starting at line {}", t.file_name, t.start_line))
            .collect();
        page.add_list(targets.iter().map(String::as_str));
        if let Some(contents) = &clone.contents {
            page.add_paragraph("Contents:");
            page.add_code_block(contents);
        }
    }

    page.add_rule();
    page.add_title("Processed Files");
    page.add_list(file_names.iter().map(String::as_str));
    page.render()
}

/// Timing dashboard: per-file times, running averages, normalized charts
pub fn render_timers_page<S: StoreReader>(store: &S, snapshot: &StatsSnapshot) -> String {
    let title = "CodeStream Clone Detector Time Statistics";
    let Some(stats_line) = statistics_line(store) else {
        return store_unavailable(title);
    };

    let mut page = HtmlPage::new(title);
    page.add_paragraph(&stats_line);

    page.add_title("Overall Processing Times");
    let total_items: Vec<String> = snapshot
        .file_names
        .iter()
        .zip(&snapshot.total_ms)
        .map(|(name, ms)| format!("File {}: {:.3} ms", name, ms))
        .collect();
    page.add_list(total_items.iter().map(String::as_str));

    page.add_title("Match Detection Times");
    let match_items: Vec<String> = snapshot
        .file_names
        .iter()
        .zip(&snapshot.match_ms)
        .map(|(name, ms)| format!("File {}: {:.3} ms", name, ms))
        .collect();
    page.add_list(match_items.iter().map(String::as_str));

    page.add_title("Average Times");
    let total_avgs = derive::running_averages(&snapshot.total_ms);
    let match_avgs = derive::running_averages(&snapshot.match_ms);
    page.add_paragraphs([
        format!("Average time per file: {:.2} ms", total_avgs.overall).as_str(),
        format!(
            "Average match detection time per file: {:.2} ms",
            match_avgs.overall
        )
        .as_str(),
        format!(
            "Average time per last 100 files: {:.2} ms",
            total_avgs.last_100
        )
        .as_str(),
        format!(
            "Average match detection time per last 100 files: {:.2} ms",
            match_avgs.last_100
        )
        .as_str(),
        format!(
            "Average time per last 1000 files: {:.2} ms",
            total_avgs.last_1000
        )
        .as_str(),
        format!(
            "Average match detection time per last 1000 files: {:.2} ms",
            match_avgs.last_1000
        )
        .as_str(),
    ]);

    let normalize = |times: &[f64]| -> Vec<f64> {
        times
            .iter()
            .zip(&snapshot.line_counts)
            .map(|(ms, lines)| derive::normalize_per_line(*ms, *lines))
            .collect()
    };

    page.add_title("Overall Processing Times Graph Per File (Normalised to nr lines)");
    page.add_graph(GraphSpec {
        graph_id: "processingTimesChart".to_string(),
        label: "Processing Time (ms/line)".to_string(),
        x_label: "Filename".to_string(),
        y_label: "Time (ms/line)".to_string(),
        data: GraphData::Labeled {
            labels: snapshot.file_names.clone(),
            values: normalize(&snapshot.total_ms),
        },
    });

    page.add_title("Match Detection Times Graph Per File (Normalised to nr lines)");
    page.add_graph(GraphSpec {
        graph_id: "matchDetectTimesChart".to_string(),
        label: "Match Detection Time (ms/line)".to_string(),
        x_label: "Filename".to_string(),
        y_label: "Time (ms/line)".to_string(),
        data: GraphData::Labeled {
            labels: snapshot.file_names.clone(),
            values: normalize(&snapshot.match_ms),
        },
    });

    page.render()
}
