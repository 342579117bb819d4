use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use aqm_core::{
    DecodeOptions, Decoder, FIELDS, FieldSpec, PAYLOAD_LEN, StatesOutput, UplinkInput,
    UplinkOutput,
};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use glob::glob;
use log::debug;
use serde::Serialize;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("AQM_BUILD_COMMIT"),
    ", ",
    env!("AQM_BUILD_DATE"),
    ")"
);

const EXAMPLES: &str = "Examples:\n  aqm decode --hex 013f32ff6feb010000ffff\n  aqm decode --input uplinks.jsonl -o decoded.json\n  aqm decode --input 'captures/*.jsonl' --format chirpstack --stdout\n  aqm schema --pretty";

#[derive(Parser, Debug)]
#[command(name = "aqm")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for air-quality monitor LoRaWAN uplinks.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode one payload (--hex) or every uplink of JSON-lines files (--input).
    #[command(after_help = EXAMPLES)]
    Decode(DecodeArgs),
    /// Print the frame layout as JSON.
    Schema {
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Raw payload as hex, e.g. 013f32ff6feb010000ffff
    #[arg(long, value_name = "HEX", required_unless_present = "input")]
    hex: Option<String>,

    /// JSON-lines uplink file (or glob pattern); one {"fPort", "bytes"|"hex"} per line
    #[arg(short, long, value_name = "PATH", conflicts_with = "hex")]
    input: Option<PathBuf>,

    /// LoRaWAN port used with --hex
    #[arg(short, long, default_value_t = 1)]
    port: u8,

    /// Result envelope
    #[arg(long, value_enum, default_value_t = OutputFormat::Ttn)]
    format: OutputFormat,

    /// Output path (JSON)
    #[arg(short = 'o', long, conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Write JSON to stdout (default when no output path is given)
    #[arg(long)]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Reject payloads longer than one frame
    #[arg(long)]
    strict: bool,

    /// Exit with a non-zero code if any uplink failed to decode
    #[arg(long)]
    fail_on_error: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// TTN v3 decodeUplink: {data, errors, warnings}
    Ttn,
    /// ChirpStack Decode: {states}
    Chirpstack,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let quiet = matches!(&cli.command, Commands::Decode(args) if args.quiet);
    init_logging(cli.verbose, quiet);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode(args),
        Commands::Schema { pretty } => cmd_schema(pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_filter = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

enum Decoded {
    Single(UplinkOutput),
    Batch(Vec<UplinkOutput>),
}

impl Decoded {
    fn len(&self) -> usize {
        match self {
            Decoded::Single(_) => 1,
            Decoded::Batch(outputs) => outputs.len(),
        }
    }

    fn failed(&self) -> usize {
        match self {
            Decoded::Single(output) => usize::from(!output.is_ok()),
            Decoded::Batch(outputs) => outputs.iter().filter(|o| !o.is_ok()).count(),
        }
    }
}

#[derive(Serialize)]
struct SchemaDoc {
    payload_len: usize,
    fields: &'static [FieldSpec],
}

fn cmd_schema(pretty: bool) -> Result<(), CliError> {
    let doc = SchemaDoc {
        payload_len: PAYLOAD_LEN,
        fields: &FIELDS,
    };
    println!("{}", to_json(&doc, pretty)?);
    Ok(())
}

fn cmd_decode(args: DecodeArgs) -> Result<(), CliError> {
    let decoder = Decoder::with_options(DecodeOptions {
        strict_length: args.strict,
    });

    let decoded = match (args.hex.as_deref(), args.input.as_ref()) {
        (Some(hex), _) => {
            let bytes = parse_hex(hex)?;
            Decoded::Single(decoder.decode_uplink(&UplinkInput {
                f_port: args.port,
                bytes,
            }))
        }
        (None, Some(input)) => {
            let inputs = resolve_input_paths(input)?;
            if let Some(output) = args.output.as_ref() {
                ensure_output_differs(output, &inputs)?;
            }
            let mut outputs = Vec::new();
            for path in &inputs {
                let decoded = decoder
                    .decode_file(path)
                    .with_context(|| format!("Failed to read uplinks: {}", path.display()))?;
                debug!("{}: {} uplink(s)", path.display(), decoded.len());
                outputs.extend(decoded);
            }
            Decoded::Batch(outputs)
        }
        (None, None) => {
            return Err(CliError::new(
                "missing payload",
                Some("use --hex or -i/--input".to_string()),
            ));
        }
    };

    let json = serialize_decoded(&decoded, args.format, args.pretty && !args.compact)?;

    match args.output.as_ref() {
        Some(output) if !args.stdout => {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create output directory: {}", parent.display())
                    })?;
                }
            }
            fs::write(output, &json)
                .with_context(|| format!("Failed to write output: {}", output.display()))?;
            if !args.quiet {
                eprintln!(
                    "OK: {} uplink(s) decoded -> {}",
                    decoded.len(),
                    output.display()
                );
            }
        }
        _ => println!("{}", json),
    }

    let failed = decoded.failed();
    if args.fail_on_error && failed > 0 {
        return Err(CliError::new(
            format!("{failed} uplink(s) failed to decode"),
            Some("inspect the `errors` field of the output".to_string()),
        ));
    }
    Ok(())
}

fn serialize_decoded(
    decoded: &Decoded,
    format: OutputFormat,
    pretty: bool,
) -> Result<String, CliError> {
    match (decoded, format) {
        (Decoded::Single(output), OutputFormat::Ttn) => to_json(output, pretty),
        (Decoded::Single(output), OutputFormat::Chirpstack) => {
            to_json(&StatesOutput::from(output.clone()), pretty)
        }
        (Decoded::Batch(outputs), OutputFormat::Ttn) => to_json(outputs, pretty),
        (Decoded::Batch(outputs), OutputFormat::Chirpstack) => {
            let states: Vec<StatesOutput> =
                outputs.iter().cloned().map(StatesOutput::from).collect();
            to_json(&states, pretty)
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("JSON serialization failed").map_err(Into::into)
}

fn parse_hex(input: &str) -> Result<Vec<u8>, CliError> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|err| {
        CliError::new(
            format!("invalid hex payload '{}': {}", input, err),
            Some("expected an even number of hex digits, e.g. 013f32ff6feb010000ffff".to_string()),
        )
    })
}

fn ensure_output_differs(output: &Path, inputs: &[PathBuf]) -> Result<(), CliError> {
    let Some(file_name) = output.file_name() else {
        return Err(CliError::new(
            format!("invalid output path: {}", output.display()),
            Some("pass a file path for -o/--output".to_string()),
        ));
    };
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let Ok(parent) = fs::canonicalize(parent) else {
        // Parent does not exist yet, so it cannot hold an input file.
        return Ok(());
    };
    let target = parent.join(file_name);
    for input in inputs {
        let input_abs = fs::canonicalize(input)
            .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
        if input_abs == target {
            return Err(CliError::new(
                format!("output path must differ from input: {}", output.display()),
                Some("choose a different output path".to_string()),
            ));
        }
    }
    Ok(())
}

fn resolve_input_paths(input: &Path) -> Result<Vec<PathBuf>, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        if !input.is_file() {
            return Err(CliError::new(
                format!("input file not found: {}", input.display()),
                Some("pass a JSON-lines uplink file".to_string()),
            ));
        }
        return Ok(vec![input.to_path_buf()]);
    }

    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    matches.sort();
    Ok(matches)
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
