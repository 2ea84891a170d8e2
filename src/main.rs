use std::{
    fs,
    io::{self, Read},
};

use anyhow::{bail, Context, Result};
use is_terminal::IsTerminal;
use serde::Serialize;
use tracing::debug;

use mymetrics::{
    args,
    cli::{ArgsCommand, Cli, Command, NormalizeArgs},
    config::Config,
    contract::{self, CardPayload, CardType, FieldMappingConfig},
    execution::{self, ExecutionResult},
    logging,
    printer::{self, MarkdownPrinter, TextPrinter},
    series::{self, SeriesMode},
    utils::unicode::caret_line,
};

#[derive(Serialize)]
struct NormalizeReport<'a> {
    card_type: CardType,
    payload: &'a CardPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    series_mode: Option<SeriesMode>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = Config::load();
    logging::init(&cfg.log_level());
    debug!(path = %cfg.config_path.display(), "config loaded");

    match &cli.command {
        Command::Args { command } => run_args(&cli, command),
        Command::Normalize(args) => run_normalize(&cli, &cfg, args),
    }
}

fn run_args(cli: &Cli, command: &ArgsCommand) -> Result<()> {
    match command {
        ArgsCommand::Parse { text } => {
            let tokens = match args::parse(text) {
                Ok(tokens) => tokens,
                Err(err) => {
                    // Point at the offending quote so the text can be fixed in place.
                    eprintln!("{text}");
                    eprintln!("{}", caret_line(text, err.index()));
                    bail!(err);
                }
            };
            if cli.json {
                printer::print_json(&tokens)?;
            } else {
                for t in &tokens {
                    println!("{t}");
                }
            }
        }
        ArgsCommand::Format { tokens } => {
            let text = args::format(tokens);
            if cli.json {
                printer::print_json(&text)?;
            } else {
                println!("{text}");
            }
        }
    }
    Ok(())
}

fn read_script_output(args: &NormalizeArgs) -> Result<String> {
    if let Some(path) = &args.input {
        return fs::read_to_string(path)
            .with_context(|| format!("reading script output: {}", path.display()));
    }
    if io::stdin().is_terminal() {
        bail!("provide --input or pipe the script's stdout on stdin");
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn run_normalize(cli: &Cli, cfg: &Config, args: &NormalizeArgs) -> Result<()> {
    let mapping = match &args.mapping {
        Some(path) => FieldMappingConfig::load(path)?,
        None => FieldMappingConfig::default(),
    };

    let result = ExecutionResult {
        exit_code: args.exit_code,
        stdout: read_script_output(args)?,
        stderr: String::new(),
    };
    let raw = execution::decode(&result)?;
    let payload = contract::normalize(&raw, args.card_type, &mapping)?;

    let series_mode = payload.as_series().map(|s| {
        let threshold = args
            .threshold
            .filter(|t| t.is_finite() && *t > 0.0)
            .unwrap_or_else(|| cfg.dual_axis_ratio_threshold());
        let setting = args.mode.clone().unwrap_or_else(|| cfg.default_series_mode());
        series::resolve_mode(Some(setting.as_str()), s, cfg.fallback_series_mode(), threshold)
    });

    if cli.json {
        return printer::print_json(NormalizeReport {
            card_type: args.card_type,
            payload: &payload,
            series_mode,
        });
    }

    let text = printer::payload_text(&payload, series_mode);
    let md = !cli.no_md && cfg.get_bool("PRETTIFY_MARKDOWN");
    if matches!(payload, CardPayload::Digest(_)) && md && io::stdout().is_terminal() {
        MarkdownPrinter::default().print(&text);
    } else {
        let default_color = cfg.get("DEFAULT_COLOR").unwrap_or_default();
        let color = io::stdout()
            .is_terminal()
            .then(|| printer::payload_color(&payload, &default_color));
        TextPrinter { color }.print(&text);
    }
    Ok(())
}
