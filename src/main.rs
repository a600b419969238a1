use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use u_metacalc::{conversion, evaluate, parameters_for, summaries, ConversionSpec};

#[derive(Parser)]
#[command(
    name = "metacalc",
    version,
    about = "Statistical conversions for meta-analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available conversions
    List {
        /// Print as JSON, including parameter metadata
        #[arg(long)]
        json: bool,
    },

    /// Show the inputs a conversion expects
    Params {
        /// Conversion id (see `metacalc list`)
        id: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a conversion
    Eval {
        /// Conversion id (see `metacalc list`)
        id: String,

        /// Input values, in the order shown by `metacalc params`
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,

        /// Decimal places in the result
        #[arg(
            short,
            long,
            env = "METACALC_DECIMALS",
            default_value_t = 6,
            value_parser = clap::value_parser!(u8).range(0..=15)
        )]
        decimals: u8,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { json } => cmd_list(json),
        Commands::Params { id, json } => cmd_params(&id, json),
        Commands::Eval {
            id,
            values,
            decimals,
        } => cmd_eval(&id, &values, decimals),
    }
}

fn cmd_list(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries())?);
        return Ok(());
    }

    for (id, name) in u_metacalc::list_conversions() {
        println!("{id:<30} {name}");
    }
    Ok(())
}

fn cmd_params(id: &str, json: bool) -> Result<()> {
    let params = parameters_for(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(params)?);
        return Ok(());
    }

    for (i, p) in params.iter().enumerate() {
        println!("{:>2}. {:<36} {}", i + 1, p.label, p.domain);
    }
    Ok(())
}

fn cmd_eval(id: &str, values: &[f64], decimals: u8) -> Result<()> {
    tracing::debug!(id, ?values, "evaluating");

    let value = evaluate(id, values).map_err(|e| {
        tracing::warn!(id, error = %e, "evaluation failed");
        e
    })?;
    let spec = conversion(id).with_context(|| format!("conversion {id} disappeared"))?;

    for line in render(spec, values, value, usize::from(decimals)) {
        println!("{line}");
    }
    Ok(())
}

/// The conversion's name, the echoed inputs, then the labeled result.
fn render(spec: &ConversionSpec, values: &[f64], value: f64, decimals: usize) -> Vec<String> {
    let mut lines = vec![spec.display_name.to_string()];
    lines.extend(
        spec.parameters
            .iter()
            .zip(values)
            .map(|(p, v)| format!("» {} = {v}", p.label)),
    );
    lines.push(format!("→ {} = {value:.decimals$}", spec.output_label));
    lines
}
