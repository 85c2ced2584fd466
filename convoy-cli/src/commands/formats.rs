//! Implementation of the 'formats' subcommand.

use crate::cli::FormatsArgs;
use crate::terminal;

use convoy_core::CapabilityRegistry;

/// Prints every supported target format, optionally only those of one kind.
pub fn run_formats(args: &FormatsArgs) {
    print!("{}", render_formats(args, CapabilityRegistry::global()));
}

/// The `formats` output for `registry`.
pub fn render_formats(args: &FormatsArgs, registry: &CapabilityRegistry) -> String {
    let entries = registry
        .entries()
        .iter()
        .filter(|entry| args.kind.is_none_or(|kind| entry.media_kind == kind));
    terminal::format_formats_table(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_core::MediaKind;

    #[test]
    fn test_kind_filter() {
        let registry = CapabilityRegistry::global();
        let output = render_formats(&FormatsArgs { kind: Some(MediaKind::Image) }, registry);

        assert_eq!(output.lines().count(), registry.formats_of(MediaKind::Image).len());
        assert!(output.lines().all(|line| line.contains(" image ")));
    }

    #[test]
    fn test_unfiltered_lists_everything() {
        let registry = CapabilityRegistry::global();
        let output = render_formats(&FormatsArgs { kind: None }, registry);
        assert_eq!(output.lines().count(), registry.entries().len());
    }
}
