// ============================================================================
// convoy-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: Headings, Status Lines and the Batch Summary
//
// Plain (non progress bar) output of the CLI. Headings use console's styles,
// status markers use owo-colors. Nothing here is printed in --json mode.
//
// KEY COMPONENTS:
// - print_section / print_status: Run header and configuration lines
// - print_file_list: Inputs with their sizes
// - print_batch_summary: Succeeded/total and every failure
// - format_formats_table: Body of `convoy formats`

// ---- External crate imports ----
use console::style;
use convoy_core::{BatchResult, CapabilityEntry, format_bytes};
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

// ---- Standard library imports ----
use std::fs;
use std::path::PathBuf;

const SECTION_WIDTH: usize = 50;

/// Prints a section heading followed by a rule.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(title).bold().cyan());
    println!("{}", style("─".repeat(SECTION_WIDTH)).dim());
}

/// Prints a `label: value` line with the label padded to a common column.
pub fn print_status(label: &str, value: &str) {
    println!("  {} {}", style(pad(&format!("{label}:"), 14)).bold(), value);
}

/// Prints a fatal error with an optional hint.
pub fn print_error(message: &str, suggestion: Option<&str>) {
    eprintln!("{} {}", "✗ Error:".red().bold(), message);
    if let Some(hint) = suggestion {
        eprintln!("  {} {}", "hint:".dimmed(), hint);
    }
}

/// Lists the inputs of a batch with their sizes.
pub fn print_file_list(files: &[PathBuf]) {
    for file in files {
        let size = fs::metadata(file)
            .map(|meta| format_bytes(meta.len()))
            .unwrap_or_else(|_| "missing".to_string());
        println!("  {} {} ({})", style("•").cyan(), file.display(), style(size).dim());
    }
}

/// Prints the end-of-batch summary: counts, then each failed file.
pub fn print_batch_summary(result: &BatchResult) {
    print_section("Summary");
    let counts = format!("{}/{} converted", result.succeeded(), result.total());
    if result.is_success() {
        println!("  {} {}", "✓".green().bold(), counts.green());
        return;
    }

    println!(
        "  {} {} ({} failed)",
        "!".yellow().bold(),
        counts.yellow(),
        result.failures().len()
    );
    for failure in result.failures() {
        println!("    {} {}", "✗".red(), failure.source_path.display());
        println!("      {}", failure.message.dimmed());
    }
}

/// Renders the capability table: one line per format with its kind and
/// codecs, the default codec first and marked.
pub fn format_formats_table<'a>(entries: impl IntoIterator<Item = &'a CapabilityEntry>) -> String {
    let mut out = String::new();
    for entry in entries {
        let codecs = entry
            .allowed_codecs
            .iter()
            .enumerate()
            .map(|(i, codec)| if i == 0 { format!("{codec} (default)") } else { codec.to_string() })
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "{} {} {}\n",
            pad(entry.target_format, 8),
            pad(entry.media_kind.as_str(), 7),
            codecs
        ));
    }
    out
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(text));
    format!("{text}{}", " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_core::CapabilityRegistry;

    #[test]
    fn test_formats_table_lists_default_first() {
        let registry = CapabilityRegistry::global();
        let table = format_formats_table(registry.entries());
        let mp4 = table
            .lines()
            .find(|line| line.starts_with("mp4 "))
            .unwrap();
        assert!(mp4.contains("video"));
        let default = registry.default_codec_for("mp4");
        assert!(mp4.contains(&format!("{default} (default)")));
    }

    #[test]
    fn test_pad_uses_display_width() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abcdef");
    }
}
