//! Text and JSON rendering of the suggestion panel and listing pages
use crate::browse::{ListingView, PageWindow};
use crate::catalog::{CatalogItem, ItemKind};
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::suggest::{PanelState, PanelView, Suggestion};
use colored::*;
use serde_json::json;

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_panel(&self, panel: &PanelView) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(self.panel_text(panel)),
            OutputFormat::Json => {
                let value = json!({
                    "state": panel.state,
                    "text": panel.text,
                    "candidates": panel.candidates,
                    "highlighted": panel.highlighted,
                    "total_count": panel.total_count,
                    "footer": panel.footer(),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
        }
    }

    pub fn format_listing(&self, view: &ListingView<'_>) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(self.listing_text(view)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
        }
    }

    fn panel_text(&self, panel: &PanelView) -> String {
        let mut output = String::new();
        match panel.state {
            PanelState::Hidden => {}
            PanelState::Loading => output.push_str(&format!("{}\n", "Searching...".dimmed())),
            PanelState::NoResults => {
                output.push_str(&format!("{}\n", "No results found".yellow()));
                output.push_str(&format!("{}\n", "Try a different search term".dimmed()));
            }
            PanelState::Open => {
                let mut current_kind = None;
                for (i, candidate) in panel.candidates.iter().enumerate() {
                    if current_kind != Some(candidate.kind) {
                        current_kind = Some(candidate.kind);
                        output.push_str(&format!("{}\n", group_heading(candidate.kind)));
                    }
                    output.push_str(&candidate_line(i, candidate, panel.highlighted == Some(i)));
                }
                if let Some(footer) = panel.footer() {
                    output.push_str(&format!("{}\n", footer.dimmed()));
                }
            }
        }
        output
    }

    fn listing_text(&self, view: &ListingView<'_>) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {} item(s), sorted by {}\n\n",
            "Showing".green(),
            view.filtered_count,
            view.sort.to_string().cyan()
        ));

        if view.items.is_empty() {
            output.push_str(&format!("{}\n", "No items match the selected filters".yellow()));
        }
        for item in &view.items {
            output.push_str(&item_line(item));
        }

        output.push_str(&format!(
            "\npage {} of {}\n",
            view.current_page, view.total_pages
        ));
        output.push_str(&page_controls(view));
        output.push('\n');
        output
    }
}

fn group_heading(kind: ItemKind) -> ColoredString {
    match kind {
        ItemKind::Book => "Books".green().bold(),
        ItemKind::Author => "Authors".green().bold(),
    }
}

fn badge(kind: ItemKind) -> ColoredString {
    let text = format!("[{kind}]");
    match kind {
        ItemKind::Book => text.blue(),
        ItemKind::Author => text.magenta(),
    }
}

fn candidate_line(index: usize, candidate: &Suggestion, highlighted: bool) -> String {
    let marker = if highlighted { "→" } else { " " };
    let label = if highlighted {
        candidate.label.yellow().bold()
    } else {
        candidate.label.normal()
    };
    let mut line = format!(
        "{marker} {} {} {label}\n",
        format!("{}.", index + 1).dimmed(),
        badge(candidate.kind)
    );
    if let Some(subtitle) = &candidate.subtitle {
        line.push_str(&format!("      {}\n", subtitle.dimmed()));
    }
    line
}

fn item_line(item: &CatalogItem) -> String {
    match item {
        CatalogItem::Book(book) => {
            let mut details = Vec::new();
            if let Some(author) = &book.author_name {
                details.push(author.clone());
            }
            if let Some(publisher) = &book.publisher_name {
                details.push(publisher.clone());
            }
            if let Some(date) = &book.published_date {
                details.push(date.clone());
            }
            let stock = if book.stock > 0 {
                "in stock".green()
            } else {
                "out of stock".red()
            };
            format!(
                "  {} {} {} {}\n      {}\n",
                badge(ItemKind::Book),
                book.title.bold(),
                format!("${:.2}", book.price).yellow(),
                stock,
                details.join(" | ").dimmed()
            )
        }
        CatalogItem::Author(author) => {
            format!("  {} {}\n", badge(ItemKind::Author), author.name.bold())
        }
    }
}

fn page_controls(view: &ListingView<'_>) -> String {
    let mut parts = Vec::new();
    if view.has_prev {
        parts.push("< Prev".to_string());
    }
    parts.extend(numbered_links(&view.window, view.current_page, view.total_pages));
    if view.has_next {
        parts.push("Next >".to_string());
    }
    parts.join("  ")
}

fn numbered_links(window: &PageWindow, current: usize, total_pages: usize) -> Vec<String> {
    let mut links = Vec::new();
    if window.show_first {
        links.push("1".to_string());
    }
    if window.leading_gap {
        links.push("...".to_string());
    }
    for &page in &window.pages {
        if page == current {
            links.push(format!("[{page}]"));
        } else {
            links.push(page.to_string());
        }
    }
    if window.trailing_gap {
        links.push("...".to_string());
    }
    if window.show_last {
        links.push(total_pages.to_string());
    }
    links
}
