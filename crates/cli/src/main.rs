// RegSheet CLI - multi-worksheet report generation from warehouse extracts

mod assemble;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use regsheet_config::{ReportConfig, ReportingPeriod};
use regsheet_engine::query;
use regsheet_engine::template::resolve_template;
use regsheet_io::SqliteExecutor;

use exit_codes::{EXIT_CONFIG, EXIT_PARTIAL, EXIT_SINK, EXIT_SOURCE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "regsheet")]
#[command(about = "Multi-worksheet spreadsheet reports from warehouse data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the report workbook
    #[command(after_help = "\
Examples:
  regsheet generate -c report.yaml -s extract.db -o report.xlsx \\
      --report-start-dt 2024-01-01 --report-end-dt 2024-12-31")]
    Generate {
        /// YAML report configuration
        #[arg(long, short = 'c')]
        config: PathBuf,

        /// Source database (warehouse extract)
        #[arg(long, short = 's')]
        source: PathBuf,

        /// Output workbook path
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Report period start (YYYY-MM-DD, MM/DD/YYYY, ...)
        #[arg(long)]
        report_start_dt: String,

        /// Report period end (same formats)
        #[arg(long)]
        report_end_dt: String,
    },

    /// Print resolved queries and template structure without executing
    #[command(after_help = "\
Examples:
  regsheet plan -c report.yaml
  regsheet plan -c report.yaml | jq '.[].query'")]
    Plan {
        /// YAML report configuration
        #[arg(long, short = 'c')]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Generate {
            config,
            source,
            output,
            report_start_dt,
            report_end_dt,
        } => cmd_generate(&config, &source, &output, &report_start_dt, &report_end_dt),
        Commands::Plan { config } => cmd_plan(&config),
    };
    ExitCode::from(code)
}

fn cmd_generate(
    config_path: &PathBuf,
    source: &PathBuf,
    output: &PathBuf,
    start: &str,
    end: &str,
) -> u8 {
    let config = match ReportConfig::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_CONFIG;
        }
    };

    let period = match ReportingPeriod::parse(start, end) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USAGE;
        }
    };
    println!("Reporting period: {}", period.display_long());

    let mut executor = match SqliteExecutor::open(source) {
        Ok(ex) => ex,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_SOURCE;
        }
    };

    let ctx = assemble::run_context(&config, Some(&period));
    let assembled = assemble::assemble(&config, &ctx, Some(&period), &mut executor);

    if assembled.reports.is_empty() && assembled.cover.is_none() {
        eprintln!("error: no worksheets could be synthesized");
        return exit_codes::EXIT_ERROR;
    }

    let sheets = assemble::render_sheets(&assembled);
    if let Err(e) = regsheet_io::write_workbook(output, assembled.cover.as_ref(), &sheets) {
        eprintln!("error: {e}");
        return EXIT_SINK;
    }
    println!("wrote {}", output.display());

    if assembled.failed > 0 {
        eprintln!(
            "{} worksheet(s) failed; workbook written without them",
            assembled.failed
        );
        return EXIT_PARTIAL;
    }
    EXIT_SUCCESS
}

/// Dry run: resolve each worksheet's template and query, emit JSON.
fn cmd_plan(config_path: &PathBuf) -> u8 {
    let config = match ReportConfig::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_CONFIG;
        }
    };

    let ctx = assemble::run_context(&config, None);
    let mut entries = Vec::new();

    for ws in &config.worksheets {
        let spec = assemble::to_spec(ws);
        let resolution = resolve_template(spec.template_type.as_deref());
        let descriptor = resolution.descriptor;
        if let Some(w) = &resolution.warning {
            eprintln!("warning: worksheet '{}': {w}", spec.name);
        }

        let entry = match query::resolve(&spec, descriptor, &ctx) {
            Ok(q) => serde_json::json!({
                "worksheet": spec.name,
                "template": descriptor.template.as_str(),
                "has_detail": descriptor.has_detail,
                "summaries": descriptor.summary_kinds.iter().map(|k| k.to_string()).collect::<Vec<_>>(),
                "query": q,
            }),
            Err(e) => serde_json::json!({
                "worksheet": spec.name,
                "template": descriptor.template.as_str(),
                "error": e.to_string(),
            }),
        };
        entries.push(entry);
    }

    match serde_json::to_string_pretty(&entries) {
        Ok(out) => {
            println!("{out}");
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            exit_codes::EXIT_ERROR
        }
    }
}
