//! FormScan CLI - Command-line interface for extracting form fields

use clap::{Parser, Subcommand, ValueEnum};
use formscan::{field_schema, FormExtractor, FormField, DEFAULT_MATCH_TAG};
use std::error::Error;
use std::io::{self, Write};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Output format for extract subcommand
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON array
    #[default]
    Json,
    /// Tab-separated values with a header line
    Tsv,
}

/// FormScan - extract form fields from a web page
#[derive(Parser, Debug)]
#[command(name = "formscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch URL and print the fields of its forms
    Extract {
        /// URL to fetch
        url: String,

        /// Output format
        #[arg(long, short, default_value = "json")]
        output: OutputFormat,

        /// Tag name collected as a field
        #[arg(long, default_value = DEFAULT_MATCH_TAG)]
        match_tag: String,

        /// Custom User-Agent
        #[arg(long)]
        user_agent: Option<String>,

        /// Total request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Fail if the HTML parser had to repair the document
        #[arg(long)]
        strict: bool,
    },
    /// Print the JSON schema of one field record
    Schema,
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Extract {
            url,
            output,
            match_tag,
            user_agent,
            timeout,
            strict,
        }) => {
            let mut builder = FormExtractor::builder(url)
                .match_tag(match_tag)
                .strict(strict);
            if let Some(ua) = user_agent {
                builder = builder.user_agent(ua);
            }
            if let Some(secs) = timeout {
                builder = builder.timeout(Duration::from_secs(secs));
            }
            run_extract(builder, output).await;
        }
        Some(Commands::Schema) => {
            let schema = field_schema();
            let json = serde_json::to_string_pretty(&schema).unwrap_or_else(|e| {
                eprintln!("Error serializing schema: {}", e);
                std::process::exit(1);
            });
            writeln_safe(&json);
        }
        None => {
            eprintln!("Usage: formscan extract <URL>");
            eprintln!("   or: formscan schema");
            eprintln!("   or: formscan --help");
            std::process::exit(1);
        }
    }
}

/// Log to stderr, `warn` unless RUST_LOG says otherwise
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

async fn run_extract(builder: formscan::FormExtractorBuilder, output: OutputFormat) {
    let result = match builder.build() {
        Ok(extractor) => extractor.extract().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(fields) => match output {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&fields).unwrap_or_else(|e| {
                    eprintln!("Error serializing fields: {}", e);
                    std::process::exit(1);
                });
                writeln_safe(&json);
            }
            OutputFormat::Tsv => writeln_safe(&format_tsv(&fields)),
        },
        Err(e) => {
            eprintln!("{}", format_error(&e));
            std::process::exit(1);
        }
    }
}

/// Format fields as TSV; tabs and newlines inside values become spaces
fn format_tsv(fields: &[FormField]) -> String {
    let clean = |s: &str| s.replace(['\t', '\n', '\r'], " ");
    let mut output = String::from("id\tname\ttype\tvalue");
    for field in fields {
        output.push('\n');
        output.push_str(&format!(
            "{}\t{}\t{}\t{}",
            clean(&field.id),
            clean(&field.name),
            clean(&field.field_type),
            clean(&field.value)
        ));
    }
    output
}

/// Render an error with its chain of causes
fn format_error(err: &dyn Error) -> String {
    let mut output = format!("Error: {}", err);
    let mut source = err.source();
    while let Some(cause) = source {
        output.push_str(&format!("\n  caused by: {}", cause));
        source = cause.source();
    }
    output
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formscan::FormExtractionError;

    #[test]
    fn test_format_tsv_header_only() {
        assert_eq!(format_tsv(&[]), "id\tname\ttype\tvalue");
    }

    #[test]
    fn test_format_tsv_rows() {
        let fields = vec![
            FormField::new("a", "n1", "", "text"),
            FormField::new("b", "n2", "on", "checkbox"),
        ];

        let output = format_tsv(&fields);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "a\tn1\ttext\t");
        assert_eq!(lines[2], "b\tn2\tcheckbox\ton");
    }

    #[test]
    fn test_format_tsv_escapes_separators() {
        let fields = vec![FormField::new("x", "note", "line1\nline2\tend", "hidden")];
        let output = format_tsv(&fields);
        assert!(output.ends_with("x\tnote\thidden\tline1 line2 end"));
    }

    #[test]
    fn test_format_error_includes_causes() {
        let err = FormExtractor::new("ftp://example.com").unwrap_err();
        let output = format_error(&err);
        assert_eq!(
            output,
            "Error: Invalid address\n  caused by: unsupported scheme 'ftp': must be http or https"
        );
        assert_eq!(output.matches("unsupported scheme").count(), 1);
        assert!(matches!(err, FormExtractionError::InvalidAddress(_)));
    }

    #[test]
    fn test_cli_parses_extract() {
        let cli = Cli::parse_from([
            "formscan",
            "extract",
            "https://example.com",
            "--output",
            "tsv",
            "--match-tag",
            "select",
            "--timeout",
            "5",
            "--strict",
        ]);
        match cli.command {
            Some(Commands::Extract {
                url,
                output,
                match_tag,
                timeout,
                strict,
                ..
            }) => {
                assert_eq!(url, "https://example.com");
                assert!(matches!(output, OutputFormat::Tsv));
                assert_eq!(match_tag, "select");
                assert_eq!(timeout, Some(5));
                assert!(strict);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
