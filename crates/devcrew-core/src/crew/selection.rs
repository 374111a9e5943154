//! Name/index selection over a canonical list

use tracing::warn;

/// Outcome of resolving user input against a canonical list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Resolved names, first occurrence order, no duplicates
    pub selected: Vec<String>,
    /// Input items that matched nothing
    pub dropped: Vec<String>,
}

impl Selection {
    /// Nothing was resolved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Whether `name` was resolved
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.selected.iter().any(|s| s == name)
    }
}

/// Split comma-separated input into trimmed, non-empty items
#[must_use]
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve items against `names`
///
/// A pure number is a 1-based index into `names`; anything else must equal a
/// name exactly. Unresolved items are reported in [`Selection::dropped`] and
/// logged, never returned as errors.
#[must_use]
pub fn select<S: AsRef<str>>(inputs: &[S], names: &[&str]) -> Selection {
    let mut selection = Selection::default();

    for raw in inputs {
        let item = raw.as_ref().trim();
        if item.is_empty() {
            continue;
        }

        let resolved = if item.bytes().all(|b| b.is_ascii_digit()) {
            item.parse::<usize>()
                .ok()
                .and_then(|index| index.checked_sub(1))
                .and_then(|index| names.get(index).copied())
        } else {
            names.iter().copied().find(|name| *name == item)
        };

        match resolved {
            Some(name) if !selection.contains(name) => selection.selected.push(name.to_string()),
            Some(_) => {}
            None => {
                warn!(item = %item, "Dropping unknown selection");
                selection.dropped.push(item.to_string());
            }
        }
    }

    selection
}
