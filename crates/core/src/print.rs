//! Printable HTML rendering and print-document spooling.

use std::{
    fs,
    path::{Path, PathBuf},
    process::Stdio,
};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use html_escape::encode_text;
use tokio::process::Command;
use tracing::info;

use crate::{
    layout::chunk,
    models::{BingoCard, CardsPerPage, FREE_INDEX, FREE_MARKER, HEADER_LETTERS},
};

/// Size settings that vary with print density.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Density {
    columns: usize,
    gap: &'static str,
    card_width: &'static str,
    header_font: &'static str,
    header_padding: &'static str,
    cell_font: &'static str,
    free_font: &'static str,
}

impl Density {
    fn for_layout(per_page: CardsPerPage) -> Self {
        match per_page {
            CardsPerPage::One => Self {
                columns: 1,
                gap: "0.4in",
                card_width: "7.7in",
                header_font: "24px",
                header_padding: "16px",
                cell_font: "14px",
                free_font: "16px",
            },
            CardsPerPage::Two => Self {
                columns: 2,
                gap: "0.2in",
                card_width: "3.85in",
                header_font: "20px",
                header_padding: "12px",
                cell_font: "12px",
                free_font: "14px",
            },
            CardsPerPage::Four => Self {
                columns: 2,
                gap: "0.2in",
                card_width: "3.85in",
                header_font: "16px",
                header_padding: "8px",
                cell_font: "10px",
                free_font: "12px",
            },
        }
    }
}

/// Render `cards` as a standalone document that opens the print dialog on load.
pub fn render_print_document(cards: &[BingoCard], per_page: CardsPerPage, title: &str) -> String {
    let density = Density::for_layout(per_page);
    let pages: String = chunk(cards, per_page.count())
        .iter()
        .map(|page| render_page(page))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Bingo Cards - {title}</title>
  <style>
    @page {{
      size: letter portrait;
      margin: 0.2in;
    }}
    body {{
      font-family: system-ui, -apple-system, sans-serif;
      margin: 0 auto;
      padding: 0;
      background: white;
      max-width: 8.1in;
    }}
    .cards-container {{
      display: grid;
      grid-template-columns: repeat({columns}, 1fr);
      gap: {gap};
      page-break-after: always;
      width: 100%;
    }}
    .bingo-card {{
      page-break-inside: avoid;
      border: 1px solid #333;
      overflow: hidden;
      width: {card_width};
      aspect-ratio: 1.1;
    }}
    .bingo-header, .grid {{
      display: grid;
      grid-template-columns: repeat(5, 1fr);
      gap: 1px;
      background: #333;
    }}
    .bingo-header div {{
      background: linear-gradient(135deg, #7c3aed, #4f46e5);
      color: white;
      font-weight: bold;
      font-size: {header_font};
      padding: {header_padding};
      text-align: center;
      letter-spacing: 1px;
      aspect-ratio: 1;
      display: flex;
      align-items: center;
      justify-content: center;
    }}
    .cell {{
      background: white;
      aspect-ratio: 1;
      display: flex;
      align-items: center;
      justify-content: center;
      text-align: center;
      font-size: {cell_font};
      font-weight: 500;
      color: #333;
      padding: 4px;
      word-break: break-word;
      line-height: 1.2;
      border: 0.5px solid #e5e7eb;
    }}
    .free-space {{
      background: #f5f3ff;
      font-weight: bold;
      color: #7c3aed;
      font-size: {free_font};
    }}
  </style>
</head>
<body>
{pages}  <script>
    window.onload = () => window.print();
  </script>
</body>
</html>
"#,
        title = encode_text(title),
        columns = density.columns,
        gap = density.gap,
        card_width = density.card_width,
        header_font = density.header_font,
        header_padding = density.header_padding,
        cell_font = density.cell_font,
        free_font = density.free_font,
        pages = pages,
    )
}

fn render_page(cards: &[BingoCard]) -> String {
    let mut html = String::from("  <div class=\"cards-container\">\n");
    for card in cards {
        html.push_str(&render_card(card));
    }
    html.push_str("  </div>\n");
    html
}

fn render_card(card: &BingoCard) -> String {
    let mut html = String::from("    <div class=\"bingo-card\">\n      <div class=\"bingo-header\">");
    for letter in HEADER_LETTERS {
        html.push_str(&format!("<div>{letter}</div>"));
    }
    html.push_str("</div>\n      <div class=\"grid\">\n");
    for (index, word) in card.cells().iter().enumerate() {
        if index == FREE_INDEX {
            html.push_str(&format!(
                "        <div class=\"cell free-space\">{FREE_MARKER}</div>\n"
            ));
        } else {
            html.push_str(&format!(
                "        <div class=\"cell\">{}</div>\n",
                encode_text(word)
            ));
        }
    }
    html.push_str("      </div>\n    </div>\n");
    html
}

/// Writes print documents to an output directory.
#[derive(Debug, Clone)]
pub struct PrintSpooler {
    root: PathBuf,
}

impl PrintSpooler {
    /// Create a spooler writing into `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory receiving documents.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Render and write a document for `cards`, returning its path.
    pub fn spool(&self, cards: &[BingoCard], per_page: CardsPerPage, title: &str) -> Result<PathBuf> {
        self.spool_at(cards, per_page, title, Utc::now())
    }

    fn spool_at(
        &self,
        cards: &[BingoCard],
        per_page: CardsPerPage,
        title: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<PathBuf> {
        if cards.is_empty() {
            bail!("no cards to print");
        }
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;

        let file_name = format!(
            "bingo_{}_{}.html",
            sanitize_component(title),
            timestamp.format("%Y%m%d%H%M%S%3f")
        );
        let path = self.root.join(file_name);
        let document = render_print_document(cards, per_page, title);
        fs::write(&path, document).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), cards = cards.len(), per_page = per_page.count(), "Print document written");
        Ok(path)
    }
}

/// Open `path` with the platform's default handler so the browser raises the print dialog.
pub async fn open_document(path: &Path) -> Result<()> {
    let mut command = opener_command();
    let status = command
        .arg(path)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .with_context(|| format!("failed to launch viewer for {}", path.display()))?;

    if !status.success() {
        bail!("viewer exited with {}", status);
    }
    Ok(())
}

fn opener_command() -> Command {
    #[cfg(target_os = "windows")]
    {
        Command::new("explorer")
    }
    #[cfg(target_os = "macos")]
    {
        Command::new("open")
    }
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Command::new("xdg-open")
    }
}

fn sanitize_component(input: &str) -> String {
    let result: String = input
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_'))
        .collect();
    if result.is_empty() {
        "cards".to_string()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn card(prefix: &str) -> BingoCard {
        BingoCard::from_drawn((1..=24).map(|n| format!("{prefix}{n}")).collect())
            .expect("24 words")
    }

    fn cards(count: usize) -> Vec<BingoCard> {
        (0..count).map(|i| card(&format!("c{i}-"))).collect()
    }

    #[test]
    fn one_section_per_page() {
        let batch = cards(5);
        let doc = render_print_document(&batch, CardsPerPage::Two, "Fruits");
        assert_eq!(doc.matches("<div class=\"cards-container\">").count(), 3);
        assert_eq!(doc.matches("<div class=\"bingo-card\">").count(), 5);
        assert_eq!(doc.matches("free-space\">FREE</div>").count(), 5);
        assert!(doc.contains("<title>Bingo Cards - Fruits</title>"));
        assert!(doc.contains("window.print()"));
    }

    #[test]
    fn header_and_cells_follow_card_order() {
        let doc = render_print_document(&cards(1), CardsPerPage::One, "x");
        assert!(doc.contains("<div>B</div><div>I</div><div>N</div><div>G</div><div>O</div>"));
        let first = doc.find(">c0-1<").expect("first word");
        let free = doc.find(">FREE<").expect("free space");
        let last = doc.find(">c0-24<").expect("last word");
        assert!(first < free && free < last);
    }

    #[test]
    fn density_varies_with_layout() {
        let batch = cards(1);
        let one = render_print_document(&batch, CardsPerPage::One, "x");
        assert!(one.contains("repeat(1, 1fr)"));
        assert!(one.contains("width: 7.7in"));
        assert!(one.contains("font-size: 24px"));

        let four = render_print_document(&batch, CardsPerPage::Four, "x");
        assert!(four.contains("repeat(2, 1fr)"));
        assert!(four.contains("width: 3.85in"));
        assert!(four.contains("font-size: 10px"));
    }

    #[test]
    fn words_and_title_are_escaped() {
        let mut words: Vec<String> = (1..=24).map(|n| n.to_string()).collect();
        words[0] = "<b>Salt & Pepper</b>".to_string();
        let card = BingoCard::from_drawn(words).expect("24 words");
        let doc = render_print_document(&[card], CardsPerPage::One, "A<B");
        assert!(doc.contains("&lt;b&gt;Salt &amp; Pepper&lt;/b&gt;"));
        assert!(doc.contains("Bingo Cards - A&lt;B"));
        assert!(!doc.contains("<b>Salt"));
    }

    #[test]
    fn spooler_writes_named_document() -> Result<()> {
        let dir = tempdir()?;
        let spooler = PrintSpooler::new(dir.path().join("print"));
        let timestamp = Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 30, 0)
            .single()
            .expect("valid timestamp");

        let path = spooler.spool_at(&cards(2), CardsPerPage::Four, "My List!", timestamp)?;
        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("bingo_MyList_20240301123000000.html")
        );
        let contents = fs::read_to_string(&path)?;
        assert_eq!(contents.matches("class=\"bingo-card\"").count(), 2);
        Ok(())
    }

    #[test]
    fn spooler_refuses_empty_batch() -> Result<()> {
        let dir = tempdir()?;
        let spooler = PrintSpooler::new(dir.path());
        assert!(spooler.spool(&[], CardsPerPage::One, "empty").is_err());
        Ok(())
    }

    #[test]
    fn sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_component("Hello World!* 18??"), "HelloWorld18");
        assert_eq!(sanitize_component("***"), "cards");
    }
}
