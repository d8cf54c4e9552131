//! The `labelscan extract` command.

use anyhow::Context;
use clap::{Args, ValueEnum};
use labelscan_core::{
    load_api_key, Config, Extraction, OpenAiProvider, OutputFormat as CoreOutputFormat,
    OutputWriter, Processor,
};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Supported output formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Single JSON document
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => CoreOutputFormat::Json,
            OutputFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Arguments for the `extract` command.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Photos of one product's packaging, in the order the model should see them
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Append to the output file instead of truncating it
    #[arg(long, requires = "output")]
    pub append: bool,

    /// Output format (defaults to the config file setting)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write compact JSON even when the config asks for pretty output
    #[arg(long)]
    pub compact: bool,

    /// Model identifier (overrides config)
    #[arg(long, env = "LABELSCAN_MODEL")]
    pub model: Option<String>,

    /// Base URL of the OpenAI-compatible API (overrides config)
    #[arg(long)]
    pub base_url: Option<String>,

    /// File holding the base64-encoded API key (overrides config)
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Request timeout in milliseconds (overrides config; default is no timeout)
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

/// Execute the extract command.
pub async fn execute(args: ExtractArgs, config: Config) -> anyhow::Result<()> {
    let config = apply_overrides(config, &args);
    config.validate()?;

    let key_path = args
        .credentials
        .clone()
        .unwrap_or_else(|| config.credential_path());
    let api_key = load_api_key(&key_path)
        .with_context(|| format!("Cannot load API key from {}", key_path.display()))?;

    let provider = OpenAiProvider::from_config(&config.llm, api_key);
    let mut processor = Processor::new(Box::new(provider));
    processor
        .initialize_images(args.images.clone())
        .context("Failed to encode images")?;
    tracing::info!(
        "Extracting label data from {} image(s) with {}",
        processor.images().len(),
        config.llm.model
    );

    let extraction = processor.run().await;
    report(&extraction);

    let format = resolve_format(args.format, &config)?;
    let pretty = resolve_pretty(args.compact, &config);

    if let Some(ref output_path) = args.output {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(args.append)
            .truncate(!args.append)
            .open(output_path)
            .with_context(|| format!("Cannot open output file {}", output_path.display()))?;
        write_record(BufWriter::new(file), format, pretty, &extraction)?;
        tracing::info!("Output written to {:?}", output_path);
    } else {
        write_record(std::io::stdout().lock(), format, pretty, &extraction)?;
    }

    Ok(())
}

/// Fold CLI overrides into the loaded config.
fn apply_overrides(mut config: Config, args: &ExtractArgs) -> Config {
    if let Some(ref model) = args.model {
        config.llm.model = model.clone();
    }
    if let Some(ref base_url) = args.base_url {
        config.llm.base_url = base_url.clone();
    }
    if let Some(ms) = args.timeout_ms {
        config.llm.timeout_ms = Some(ms);
    }
    config
}

fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> anyhow::Result<CoreOutputFormat> {
    match flag {
        Some(format) => Ok(format.into()),
        None => CoreOutputFormat::parse(&config.output.format)
            .with_context(|| format!("Unknown output format {:?}", config.output.format)),
    }
}

fn resolve_pretty(compact: bool, config: &Config) -> bool {
    config.output.pretty && !compact
}

fn report(extraction: &Extraction) {
    match &extraction.fallback {
        Some(reason) => tracing::warn!("Model output unusable, writing empty template: {reason}"),
        None => tracing::info!(
            "Extraction succeeded (model {}, {} tokens)",
            extraction.model.as_deref().unwrap_or("unknown"),
            extraction
                .tokens_used
                .map(|t| t.to_string())
                .unwrap_or_else(|| "?".to_string())
        ),
    }
}

fn write_record<W: Write>(
    writer: W,
    format: CoreOutputFormat,
    pretty: bool,
    extraction: &Extraction,
) -> anyhow::Result<()> {
    let mut writer = OutputWriter::new(writer, format, pretty);
    writer.write(&extraction.record)?;
    writer.flush()?;
    Ok(())
}
