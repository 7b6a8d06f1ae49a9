//! paperdown CLI - render a Markdown document to sanitized HTML.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser as _;
use log::{error, info};
use paperdown::source::{self, SourceError, STDIN_LABEL};
use paperdown::{Heading, Options, Parser, DEFAULT_LABEL};

#[derive(Debug, clap::Parser)]
#[command(name = "paperdown", version, about = "Render Markdown to sanitized HTML")]
struct Cli {
    /// Input file; reads standard input when absent or `-`.
    input: Option<PathBuf>,

    /// Write the result here instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name shown in the footer (defaults to the input file name).
    #[arg(long)]
    label: Option<String>,

    /// Do not prefix headings with chapter and section numbers.
    #[arg(long)]
    no_numbering: bool,

    /// Do not append the generated-by footer.
    #[arg(long)]
    no_footer: bool,

    /// Leave bare URLs as plain text.
    #[arg(long)]
    no_autolink: bool,

    /// Print the heading outline instead of HTML.
    #[arg(long)]
    outline: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            number_headings: !self.no_numbering,
            footer: !self.no_footer,
            autolink_urls: !self.no_autolink,
        }
    }

    fn input_path(&self) -> Option<&Path> {
        self.input.as_deref().filter(|p| *p != Path::new("-"))
    }
}

fn read_input(path: Option<&Path>) -> Result<(String, String), SourceError> {
    match path {
        Some(path) => Ok((source::load(path)?, source::label_for(path))),
        None => Ok((source::load_stdin()?, STDIN_LABEL.to_owned())),
    }
}

/// Markdown to render, its footer label, and whether reading failed.
///
/// A failed read renders an error document under the default label.
fn load_document(cli: &Cli) -> (String, String, bool) {
    let (markdown, label, failed) = match read_input(cli.input_path()) {
        Ok((text, label)) => (text, label, false),
        Err(err) => {
            error!("{err}");
            let shown = cli
                .input_path()
                .map_or_else(|| STDIN_LABEL.to_owned(), |p| p.display().to_string());
            (source::failure_document(&shown, &err), DEFAULT_LABEL.to_owned(), true)
        }
    };
    (markdown, cli.label.clone().unwrap_or(label), failed)
}

fn format_outline(headings: &[Heading]) -> String {
    let mut out = String::new();
    for heading in headings {
        let indent = usize::from(heading.level.saturating_sub(1)) * 2;
        out.extend(std::iter::repeat_n(' ', indent));
        if let Some(number) = &heading.number {
            out.push_str(number);
            out.push(' ');
        }
        out.push_str(&heading.text);
        out.push('\n');
    }
    out
}

fn write_output(path: Option<&Path>, text: &str) -> io::Result<()> {
    match path {
        Some(path) => fs::write(path, text),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    let mut parser = Parser::with_options(cli.options());

    let (markdown, label, failed) = load_document(&cli);

    let html = parser.parse(&markdown, &label);
    info!("rendered {label:?}: {} headings", parser.outline().len());
    let rendered = if cli.outline {
        format_outline(parser.outline())
    } else {
        html
    };

    if let Err(err) = write_output(cli.output.as_deref(), &rendered) {
        error!("cannot write output: {err}");
        return ExitCode::FAILURE;
    }
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;

    const MISSING: &str = "/nonexistent/paperdown/missing.md";

    #[test]
    fn test_failed_read_uses_default_label() {
        let cli = Cli::try_parse_from(["paperdown", MISSING]).unwrap();
        let (markdown, label, failed) = load_document(&cli);
        assert!(failed);
        assert_eq!(label, DEFAULT_LABEL);
        assert!(markdown.contains(MISSING));
    }

    #[test]
    fn test_failed_read_honours_label_flag() {
        let cli = Cli::try_parse_from(["paperdown", "--label", "notes", MISSING]).unwrap();
        let (_, label, failed) = load_document(&cli);
        assert!(failed);
        assert_eq!(label, "notes");
    }

    #[test]
    fn test_dash_reads_stdin() {
        let cli = Cli::try_parse_from(["paperdown", "-"]).unwrap();
        assert_eq!(cli.input_path(), None);
    }
}
