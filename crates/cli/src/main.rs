//! CLI for the Warden fault-isolated batch runner.
//!
//! Pipeline: build jobs -> run each behind a fault boundary -> aggregate -> report.

mod demo;
mod orders;
mod status;

use clap::{Parser, Subcommand};
use std::time::Instant;
use warden_runner::sink::json_stream::JsonStreamSink;
use warden_runner::{sink, Report};

#[derive(Parser, Debug)]
#[command(name = "warden", version, about = "Fault-isolated batch runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the built-in demo batch.
    Demo {
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Sink output: "ndjson" writes NDJSON to stdout,
        /// "ndjson:/path/to/file" writes to file.
        #[arg(long, env = "WARDEN_SINK")]
        sink: Option<String>,

        /// Keep the default panic hook so absorbed faults print to stderr.
        #[arg(long, default_value_t = false)]
        show_panics: bool,
    },
    /// Look up an order through the layered service and print the response.
    Order {
        #[arg(short, long, allow_hyphen_values = true)]
        id: i64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            json,
            sink,
            show_panics,
        } => {
            if !show_panics {
                std::panic::set_hook(Box::new(|info| {
                    tracing::debug!(panic = %info, "panic captured");
                }));
            }

            let jobs = demo::jobs();
            tracing::info!(jobs = jobs.len(), "starting demo batch");

            let t0 = Instant::now();
            let result = warden_runner::run_batch_with(&jobs, |entry| {
                let status = if entry.outcome.is_success() {
                    "ok"
                } else if entry.outcome.is_fault() {
                    "fault"
                } else {
                    "failed"
                };
                eprintln!("running {} ... {}", entry.name, status);
            });
            let report = Report::build(&result, t0.elapsed());

            if let Some(ref sink_spec) = sink {
                let summary = report.to_summary_row();
                let entries = sink::entry_rows(&result);

                if sink_spec == "ndjson" {
                    let mut s = JsonStreamSink::stdout();
                    s.write_summary(&summary)?;
                    s.write_entries(&entries)?;
                    let n = s.finish()?;
                    tracing::info!(rows = n, "ndjson sink: wrote to stdout");
                } else if let Some(path) = sink_spec.strip_prefix("ndjson:") {
                    let file = std::fs::File::create(path)?;
                    let mut s = JsonStreamSink::new(file);
                    s.write_summary(&summary)?;
                    s.write_entries(&entries)?;
                    let n = s.finish()?;
                    tracing::info!(rows = n, path, "ndjson sink: wrote to file");
                } else {
                    return Err(
                        format!("unknown sink: {sink_spec}. Use 'ndjson' or 'ndjson:/path'").into(),
                    );
                }

                eprint!("{}", report.render());
            } else if json {
                let doc = sink::document(&report, &result);
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                print!("{}", report.render());
            }
        }
        Commands::Order { id } => {
            let response = orders::handle_order_request(id);
            println!(
                "HTTP {} {}: {}",
                response.status,
                status::reason(response.status),
                response.body
            );
        }
    }

    Ok(())
}
