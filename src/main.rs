use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;

use orgmark::config::OutputFormat;
use orgmark::lexer::tokenize;
use orgmark::{convert, header, parse};

#[derive(Parser)]
#[command(name = "orgmark")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Converts Org-style outline documents to HTML or plain text")]
struct Cli {
    /// Input file to convert (stdin if not provided)
    file: Option<PathBuf>,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Wrap HTML output in a complete page
    #[arg(long)]
    standalone: bool,

    /// Line width for text output
    #[arg(long)]
    line_width: Option<usize>,

    /// Print the header settings as TOML instead of converting
    #[arg(long, conflicts_with_all = ["tokens", "tree"])]
    metadata: bool,

    /// Print the token stream instead of converting
    #[arg(long, conflicts_with = "tree")]
    tokens: bool,

    /// Print the document tree instead of converting
    #[arg(long)]
    tree: bool,

    /// Write output to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn read_all(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn start_dir_for(input_path: &Option<PathBuf>) -> io::Result<PathBuf> {
    if let Some(p) = input_path {
        Ok(p.parent().unwrap_or(Path::new(".")).to_path_buf())
    } else {
        std::env::current_dir()
    }
}

fn dump_tokens(input: &str) -> String {
    let mut out = String::new();
    for token in tokenize(input) {
        out.push_str(&format!(
            "{}:{} {:?} {:?}\n",
            token.line, token.column, token.kind, token.text
        ));
    }
    out
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let start_dir = start_dir_for(&cli.file)?;
    let (mut cfg, cfg_path) = orgmark::config::load(cli.config.as_deref(), &start_dir)?;
    if let Some(path) = &cfg_path {
        log::debug!("Using config {}", path.display());
    }
    if cli.format.is_some() {
        cfg.format = cli.format;
    }
    if cli.standalone {
        cfg.standalone = Some(true);
    }
    if cli.line_width.is_some() {
        cfg.line_width = cli.line_width;
    }

    let input = read_all(cli.file.as_ref())?;

    let output = if cli.metadata {
        let metadata = header::extract(&input);
        toml::to_string(&metadata).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("cannot serialize metadata: {e}"),
            )
        })?
    } else if cli.tokens {
        dump_tokens(&input)
    } else if cli.tree {
        parse(&input).dump()
    } else {
        convert(&input, &cfg)
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &output)?;
            log::info!("Wrote {}", path.display());
        }
        None => print!("{output}"),
    }

    Ok(())
}
