use clap::Parser;
use drilldown::engine::EngineBuilder;
use drilldown::prelude::*;
use serde_json::Value;
use std::fs;
use std::str::FromStr;

/// Replays a recorded drilldown and prints the derived filter payload
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Report type of the clicked widget, e.g. "tickets_report"
    report_type: String,
    /// Path to the widget query JSON file
    query_path: String,
    /// The click: a JSON value (`"viraj"`, `{"name":"02/10","value":"1612915200"}`) or a bare label
    click: String,
    /// Optional path to the dashboard context JSON file
    context_path: Option<String>,

    /// Optional registry overrides JSON file
    #[arg(long)]
    overrides: Option<String>,

    /// Optional engine configuration JSON file
    #[arg(long)]
    config: Option<String>,

    /// Freeze "now" at this epoch second
    #[arg(long)]
    now: Option<i64>,

    /// Fail instead of skipping a broken post-processor
    #[arg(long)]
    strict: bool,

    /// Print the per-stage derivation trace
    #[arg(short, long)]
    trace: bool,
}

fn main() {
    let env = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();

    let cli = Cli::parse();
    let engine = build_engine(&cli);

    let query = read_json(&cli.query_path);
    let context = cli
        .context_path
        .as_deref()
        .map(read_json)
        .unwrap_or(Value::Null);
    let click: Value = serde_json::from_str(&cli.click).unwrap_or_else(|_| Value::String(cli.click.clone()));

    let query: WidgetQuery = serde_json::from_value(query)
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid widget query: {}", e)));
    let context: DashboardContext = if context.is_null() {
        DashboardContext::default()
    } else {
        serde_json::from_value(context)
            .unwrap_or_else(|e| exit_with_error(&format!("Invalid dashboard context: {}", e)))
    };
    let click = ClickEvent::from_value(&click);
    if click.is_none() {
        eprintln!("Warning: click not recognized; deriving without a clicked value");
    }

    match engine.derive_traced(&cli.report_type, &query, click.as_ref(), &context) {
        Ok((payload, trace)) => {
            match serde_json::to_string_pretty(&payload) {
                Ok(json) => println!("{}", json),
                Err(e) => exit_with_error(&format!("Failed to serialize payload: {}", e)),
            }
            if cli.trace {
                println!("\n{}", TraceFormatter::format_trace(&trace));
            }
        }
        Err(e) => exit_with_error(&e.to_string()),
    }
}

fn build_engine(cli: &Cli) -> DrilldownEngine {
    let mut registry = ReportTypeRegistry::builder();
    if let Some(path) = &cli.overrides {
        let overrides = read_file(path);
        registry = registry
            .with_overrides_json(&overrides)
            .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    }

    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path).unwrap_or_else(|e| exit_with_error(&e.to_string())),
        None => EngineConfig::default(),
    };

    let mut builder = EngineBuilder::new()
        .with_registry(registry.build())
        .with_config(config);
    if cli.strict {
        builder = builder.strict_post_processors(true);
    }
    if let Some(now) = cli.now {
        builder = builder.with_clock(FixedClock(now));
    }
    builder
        .build()
        .unwrap_or_else(|e| exit_with_error(&e.to_string()))
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)))
}

fn read_json(path: &str) -> Value {
    serde_json::from_str(&read_file(path))
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid JSON in '{}': {}", path, e)))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
