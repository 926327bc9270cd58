//! Colorful console output for solver events.
//!
//! Provides a custom `tracing` layer that formats CrossForge solver events
//! with colors. Everything goes to stderr so stdout stays free for the
//! solution.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solve start/end, reduction, model, solutions, restarts)
//! - **WARN**: Inconsistent inputs the solver recovered from
//! - **DEBUG**: Progress updates (1/sec with nodes and incumbent)
//! - **TRACE**: Individual branching decisions

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "crossforge_solver=info";

/// Initializes the console output at the default verbosity.
///
/// Safe to call multiple times - only the first call has effect.
pub fn init() {
    init_with_directive(DEFAULT_DIRECTIVE);
}

/// Initializes the console output with a filter directive such as
/// `crossforge_solver=debug`.
///
/// `RUST_LOG` still applies on top. An unparsable directive falls back to
/// [`DEFAULT_DIRECTIVE`].
pub fn init_with_directive(directive: &str) {
    INIT.get_or_init(|| {
        print_banner();

        let directive = directive
            .parse::<Directive>()
            .or_else(|_| DEFAULT_DIRECTIVE.parse::<Directive>());
        let mut builder = EnvFilter::builder();
        if let Ok(directive) = directive {
            builder = builder.with_default_directive(directive);
        }
        let filter = builder.from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolverConsoleLayer)
            .try_init();
    });
}

/// Filter directive for a `-v` count: 0 info, 1 debug, 2+ trace.
pub fn directive_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "crossforge_solver=info",
        1 => "crossforge_solver=debug",
        _ => "crossforge_solver=trace",
    }
}

// Marks the start of solving for elapsed time tracking.
fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

// Returns elapsed time since solve start.
fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
  ____                    _____
 / ___|_ __ ___  ___ ___ |  ___|__  _ __ __ _  ___
| |   | '__/ _ \/ __/ __|| |_ / _ \| '__/ _` |/ _ \
| |___| | | (_) \__ \__ \|  _| (_) | | | (_| |  __/
 \____|_|  \___/|___/___/|_|  \___/|_|  \__, |\___|
                                        |___/
"#;

    let version_line = format!(
        "              v{} - Exact One-Sided Crossing Minimization\n",
        VERSION
    );

    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{}", banner.bright_cyan());
    let _ = writeln!(stderr, "{}", version_line.bright_white().bold());
    let _ = stderr.flush();
}

/// A tracing layer that formats solver events with colors.
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        if !target.starts_with("crossforge_solver") && !target.starts_with("crossforge::") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let level = *metadata.level();
        let output = format_event(&visitor, level);
        if !output.is_empty() {
            let _ = writeln!(io::stderr(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    status: Option<String>,
    strategy: Option<String>,
    objective: Option<String>,
    best: Option<String>,
    free_count: Option<u64>,
    fixed_count: Option<u64>,
    edge_count: Option<u64>,
    ordered_edges: Option<u64>,
    incomparable_pairs: Option<u64>,
    constant: Option<u64>,
    cost_vars: Option<u64>,
    propagators: Option<u64>,
    nodes: Option<u64>,
    fails: Option<u64>,
    depth: Option<u64>,
    index: Option<u64>,
    fail_limit: Option<u64>,
    nogoods: Option<u64>,
    var: Option<u64>,
    value: Option<u64>,
    claimed: Option<u64>,
    actual: Option<u64>,
    dropped: Option<u64>,
    duration_ms: Option<u64>,
}

// Unwraps `Some(17)` style debug output.
fn strip_option(s: &str) -> Option<String> {
    let s = s.trim_matches('"');
    if s == "None" {
        return None;
    }
    let inner = s
        .strip_prefix("Some(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(s);
    Some(inner.to_string())
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        match field.name() {
            "event" => self.event = Some(s.trim_matches('"').to_string()),
            "status" => self.status = Some(s.trim_matches('"').to_string()),
            "strategy" => self.strategy = Some(s.trim_matches('"').to_string()),
            "objective" => self.objective = strip_option(&s),
            "best" => self.best = strip_option(&s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "objective" => self.objective = Some(value.to_string()),
            "free_count" => self.free_count = Some(value),
            "fixed_count" => self.fixed_count = Some(value),
            "edge_count" => self.edge_count = Some(value),
            "ordered_edges" => self.ordered_edges = Some(value),
            "incomparable_pairs" => self.incomparable_pairs = Some(value),
            "constant" => self.constant = Some(value),
            "cost_vars" => self.cost_vars = Some(value),
            "propagators" => self.propagators = Some(value),
            "nodes" => self.nodes = Some(value),
            "fails" => self.fails = Some(value),
            "depth" => self.depth = Some(value),
            "index" => self.index = Some(value),
            "fail_limit" => self.fail_limit = Some(value),
            "nogoods" => self.nogoods = Some(value),
            "var" => self.var = Some(value),
            "value" => self.value = Some(value),
            "claimed" => self.claimed = Some(value),
            "actual" => self.actual = Some(value),
            "dropped_edges" => self.dropped = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value as u64);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            "strategy" => self.strategy = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "reduction_end" => format_reduction_end(v),
        "model_built" => format_model_built(v),
        "heuristic_end" => format_heuristic_end(v),
        "solution" => format_solution(v),
        "restart" => format_restart(v),
        "progress" => format_progress(v),
        "branch" | "refute" => format_branch(v, event, level),
        "warm_start_mismatch" => format_warm_start_mismatch(v),
        "cyclic_order" => format_cyclic_order(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    let free = v.free_count.unwrap_or(0);
    let fixed = v.fixed_count.unwrap_or(0);
    let edges = v.edge_count.unwrap_or(0);

    let mut output = format!(
        "{} {} Solving │ {} free │ {} fixed │ {} edges │ {} orders",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(free).bright_yellow(),
        count(fixed).bright_yellow(),
        count(edges).bright_yellow(),
        permutation_scale(free as usize).bright_magenta()
    );
    if let Some(ref strategy) = v.strategy {
        output.push_str(&format!(" │ {} search", strategy.bright_yellow()));
    }
    output
}

fn format_reduction_end(v: &EventVisitor) -> String {
    format!(
        "{} {} Reduced │ {} ordered edges │ {} open pairs │ constant {}",
        format_elapsed(),
        "◆".bright_blue(),
        count(v.ordered_edges.unwrap_or(0)).white(),
        count(v.incomparable_pairs.unwrap_or(0)).white(),
        count(v.constant.unwrap_or(0)).bright_yellow()
    )
}

fn format_model_built(v: &EventVisitor) -> String {
    format!(
        "{} {} Model │ {} cost variables │ {} propagators",
        format_elapsed(),
        "◆".bright_blue(),
        count(v.cost_vars.unwrap_or(0)).white(),
        count(v.propagators.unwrap_or(0)).white()
    )
}

fn format_heuristic_end(v: &EventVisitor) -> String {
    format!(
        "{} {} Heuristic │ {} crossings",
        format_elapsed(),
        "◇".bright_blue(),
        format_objective(v.objective.as_deref())
    )
}

fn format_solution(v: &EventVisitor) -> String {
    format!(
        "{} {} Solution │ {} crossings │ {} nodes",
        format_elapsed(),
        "★".bright_green().bold(),
        format_objective(v.objective.as_deref()),
        count(v.nodes.unwrap_or(0)).white()
    )
}

fn format_restart(v: &EventVisitor) -> String {
    format!(
        "{} {} Restart {} │ {} nogoods │ next limit {} fails │ best {}",
        format_elapsed(),
        "↻".bright_cyan(),
        count(v.index.unwrap_or(0)).white().bold(),
        count(v.nogoods.unwrap_or(0)).white(),
        count(v.fail_limit.unwrap_or(0)).white(),
        format_objective(v.best.as_deref())
    )
}

fn format_progress(v: &EventVisitor) -> String {
    format!(
        "{} {} {:>12} nodes │ {:>10} fails │ depth {:>4} │ best {}",
        format_elapsed(),
        "⚡".bright_cyan(),
        count(v.nodes.unwrap_or(0)).white(),
        count(v.fails.unwrap_or(0)).white(),
        v.depth.unwrap_or(0),
        format_objective(v.best.as_deref())
    )
}

fn format_branch(v: &EventVisitor, event: &str, level: Level) -> String {
    if level != Level::TRACE {
        return String::new();
    }
    let op = if event == "branch" { "=" } else { "≠" };
    format!(
        "{} {} depth {:>4} │ x{} {} {}",
        format_elapsed(),
        "·".bright_black(),
        v.depth.unwrap_or(0),
        v.var.unwrap_or(0),
        op,
        v.value.unwrap_or(0)
    )
    .bright_black()
    .to_string()
}

fn format_warm_start_mismatch(v: &EventVisitor) -> String {
    format!(
        "{} {} Warm start claims {} crossings, recounted {}",
        format_elapsed(),
        "!".bright_yellow().bold(),
        count(v.claimed.unwrap_or(0)).yellow(),
        count(v.actual.unwrap_or(0)).yellow()
    )
}

fn format_cyclic_order(v: &EventVisitor) -> String {
    format!(
        "{} {} Dropped {} cyclic order edges",
        format_elapsed(),
        "!".bright_yellow().bold(),
        count(v.dropped.unwrap_or(0)).yellow()
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("unknown");
    let objective = v.objective.as_deref();
    let duration = v.duration_ms.unwrap_or(0);

    let mut output = format!(
        "{} {} Solving complete │ {} │ {} │ {} nodes │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_status(status),
        format_objective(objective),
        count(v.nodes.unwrap_or(0)).white(),
        format_duration_ms(duration).yellow()
    );

    output.push_str("\n\n");
    output.push_str(
        &"╔══════════════════════════════════════════════════════════╗"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    let status_text = status.to_ascii_uppercase();
    let inner_width: usize = 58;
    let total_pad = inner_width.saturating_sub(status_text.len());
    let left_pad = total_pad / 2;
    let right_pad = total_pad - left_pad;
    output.push_str(&format!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(left_pad),
        format_status(&status_text),
        " ".repeat(right_pad),
        "║".bright_cyan()
    ));
    output.push('\n');

    output.push_str(
        &"╠══════════════════════════════════════════════════════════╣"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    for (label, value) in [
        ("Crossings:", objective.unwrap_or("N/A").to_string()),
        ("Nodes:", count(v.nodes.unwrap_or(0))),
        ("Fails:", count(v.fails.unwrap_or(0))),
        ("Time:", format_duration_ms(duration)),
    ] {
        output.push_str(&format!(
            "{}  {:<18}{:>36}  {}",
            "║".bright_cyan(),
            label,
            value,
            "║".bright_cyan()
        ));
        output.push('\n');
    }

    output.push_str(
        &"╚══════════════════════════════════════════════════════════╝"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    output
}

fn format_status(status: &str) -> String {
    match status.to_ascii_lowercase().as_str() {
        "optimal" => status.bright_green().bold().to_string(),
        "satisfiable" => status.bright_yellow().bold().to_string(),
        _ => status.bright_red().bold().to_string(),
    }
}

fn format_objective(objective: Option<&str>) -> String {
    match objective {
        Some(o) if o == "0" => o.bright_green().bold().to_string(),
        Some(o) => o.bright_white().bold().to_string(),
        None => "none".bright_black().to_string(),
    }
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

/// Number of orders of `n` vertices, `n!`, in scientific notation.
fn permutation_scale(n: usize) -> String {
    if n < 2 {
        return "1".to_string();
    }

    let log_scale: f64 = (2..=n).map(|k| (k as f64).log10()).sum();
    let exponent = log_scale.floor() as i32;
    let mantissa = 10f64.powf(log_scale - exponent as f64);

    format!("{:.3} x 10^{}", mantissa, exponent)
}

#[cfg(test)]
mod tests;
