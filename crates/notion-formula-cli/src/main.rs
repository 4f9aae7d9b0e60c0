//! notion-formula CLI - render formula trees to Notion formula text

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use notion_formula::{Builder, BuilderSettings, Expr, TypedTree, DEFAULT_MAX_DEPTH};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nformula")]
#[command(author, version, about = "Render typed formula trees as Notion formula text")]
struct Cli {
    /// Quoting style for text literals
    #[arg(short, long, value_enum, default_value_t = Quote::Double, global = true)]
    quote: Quote,

    /// Maximum nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, global = true)]
    max_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a typed tree (JSON) to formula text
    Render {
        /// Input JSON file (default: stdin)
        input: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a single JSON value (number, string or boolean) as a literal
    Literal {
        /// JSON value, e.g. `3`, `true` or `"text"`
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Quote {
    /// JSON string literals: "text"
    Double,
    /// Single-quoted literals: 'text'
    Single,
}

fn main() -> Result<()> {
    // Logs go to stderr, stdout carries only formula text
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nformula=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let builder = make_builder(cli.quote, cli.max_depth);

    match cli.command {
        Commands::Render { input, output } => {
            let text = render(&builder, input.as_deref())?;
            write_output(&text, output.as_deref())
        }
        Commands::Literal { value } => {
            let text = literal(&builder, &value)?;
            write_output(&text, None)
        }
    }
}

fn make_builder(quote: Quote, max_depth: usize) -> Builder {
    let string_converter = match quote {
        Quote::Double => None,
        Quote::Single => Some(Arc::new(single_quote) as notion_formula::StringConverter),
    };
    Builder::with_settings(BuilderSettings {
        string_converter,
        max_depth,
    })
}

/// Quote with `'`, escaping backslashes and single quotes
fn single_quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for c in text.chars() {
        match c {
            '\\' | '\'' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn render(builder: &Builder, input: Option<&Path>) -> Result<String> {
    let json = read_input(input)?;
    let tree: TypedTree =
        serde_json::from_str(&json).context("Input is not a valid typed tree")?;
    tracing::debug!(kind = ?tree.kind, "rendering typed tree");
    builder
        .render(&tree)
        .context("Failed to render typed tree")
}

fn literal(builder: &Builder, value: &str) -> Result<String> {
    let json: serde_json::Value =
        serde_json::from_str(value).with_context(|| format!("Invalid JSON value: {value}"))?;
    let expr = Expr::from_json(&json)?;
    Ok(builder.to_text(&expr)?)
}

fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    if let Some(output_path) = output {
        std::fs::write(output_path, text)
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        tracing::info!("Wrote formula to '{}'", output_path.display());
    } else {
        let mut stdout = io::stdout();
        writeln!(stdout, "{text}").context("Failed to write to stdout")?;
    }
    Ok(())
}
