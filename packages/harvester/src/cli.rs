//! Command-line interface for `belex-extract`.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use console::style;

use crate::config::MarkupConfig;
use crate::error::Result;
use crate::extract::extract_page;
use crate::types::ExtractedDocument;

/// BELEX extractor - Print the law text contained in a saved XHTML page.
#[derive(Parser)]
#[command(name = "belex-extract")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Saved XHTML serialization of a rendered law-text page
    pub file: PathBuf,

    /// URL the page was rendered from (default: the file path)
    #[arg(short, long)]
    pub source_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    extract_command(&cli.file, cli.source_url.as_deref(), cli.format)
}

fn extract_command(file: &Path, source_url: Option<&str>, format: OutputFormat) -> Result<()> {
    let markup_text = std::fs::read_to_string(file)?;
    let source_url = source_url
        .map(String::from)
        .unwrap_or_else(|| file.display().to_string());

    let document = extract_page(&markup_text, &source_url, &MarkupConfig::default())?;

    print_summary(&document);
    println!("{}", render(&document, format)?);

    Ok(())
}

/// Serialize an extracted document.
pub fn render(document: &ExtractedDocument, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml_ng::to_string(document)?,
        OutputFormat::Json => serde_json::to_string_pretty(document)?,
    })
}

fn print_summary(document: &ExtractedDocument) {
    let header = &document.header;
    eprintln!(
        "{} {} {}",
        style("Extracted").bold(),
        style(header.systematic_number.as_deref().unwrap_or("?")).cyan(),
        style(header.title.as_deref().unwrap_or("(untitled)")).green()
    );
    eprintln!("  Articles: {}", document.articles.len());
    eprintln!("  Paragraphs: {}", document.paragraph_count());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LawTextHeader;

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::parse_from(["belex-extract", "page.xhtml"]);
        assert_eq!(cli.file, PathBuf::from("page.xhtml"));
        assert!(cli.source_url.is_none());
        assert_eq!(cli.format, OutputFormat::Yaml);
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::parse_from([
            "belex-extract",
            "page.xhtml",
            "--source-url",
            "https://example.test/101.1",
            "--format",
            "json",
        ]);
        assert_eq!(cli.source_url.as_deref(), Some("https://example.test/101.1"));
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_render_json() {
        let document = ExtractedDocument {
            header: LawTextHeader {
                systematic_number: Some("101.1".to_string()),
                ..LawTextHeader::default()
            },
            articles: Vec::new(),
        };
        let json = render(&document, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["header"]["systematic_number"], "101.1");
    }

    #[test]
    fn test_render_yaml() {
        let yaml = render(&ExtractedDocument::default(), OutputFormat::Yaml).unwrap();
        assert!(yaml.contains("articles: []"));
    }
}
