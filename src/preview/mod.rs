//! Preview selection - maps the focused preference to an illustrative snippet
//!
//! The selector only picks text. Formatting the snippet with the current
//! settings is the job of an external [`CodeFormatter`].

pub mod snippets;

pub use snippets::{Snippet, SnippetCorpus, SnippetKind};

use tracing::{debug, warn};

use crate::constants::preview::{PLACEHOLDER, SNIPPET_SEPARATOR};
use crate::error::FormatError;
use crate::preferences::{NodeId, PreferenceGraph};
use crate::settings::SettingsMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub text: String,
    pub kind: SnippetKind,
}

impl From<&Snippet> for Preview {
    fn from(snippet: &Snippet) -> Self {
        Self {
            text: snippet.text.clone(),
            kind: snippet.kind,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PreviewSelector<'c> {
    corpus: &'c SnippetCorpus,
}

impl PreviewSelector<'static> {
    pub fn builtin() -> Self {
        Self::new(SnippetCorpus::builtin())
    }
}

impl<'c> PreviewSelector<'c> {
    pub fn new(corpus: &'c SnippetCorpus) -> Self {
        Self { corpus }
    }

    fn own(&self, graph: &PreferenceGraph, node: NodeId) -> Option<&'c Snippet> {
        graph.preview_key(node).and_then(|key| self.corpus.lookup(key))
    }

    /// Snippet for `node`: its own key, else the first level of descendants
    /// with any match, else the nearest ancestor with one
    pub fn resolve(&self, graph: &PreferenceGraph, node: NodeId) -> Option<Preview> {
        if let Some(snippet) = self.own(graph, node) {
            return Some(snippet.into());
        }
        if let Some(preview) = self.resolve_descendants(graph, node) {
            return Some(preview);
        }

        let mut current = graph.parent(node);
        while let Some(ancestor) = current {
            if let Some(snippet) = self.own(graph, ancestor) {
                debug!(node = ?node, ancestor = ?ancestor, "Preview resolved from ancestor");
                return Some(snippet.into());
            }
            current = graph.parent(ancestor);
        }
        None
    }

    fn resolve_descendants(&self, graph: &PreferenceGraph, node: NodeId) -> Option<Preview> {
        let mut level: Vec<NodeId> = graph.children(node).to_vec();
        while !level.is_empty() {
            let mut found: Vec<&Snippet> = Vec::new();
            for &child in &level {
                if let Some(snippet) = self.own(graph, child) {
                    if !found.iter().any(|s| s.text == snippet.text) {
                        found.push(snippet);
                    }
                }
            }

            if let Some(first) = found.first() {
                let kind = if found.iter().all(|s| s.kind == first.kind) {
                    first.kind
                } else {
                    SnippetKind::Unknown
                };
                let text = found
                    .iter()
                    .map(|s| s.text.as_str())
                    .collect::<Vec<_>>()
                    .join(SNIPPET_SEPARATOR);
                return Some(Preview { text, kind });
            }

            level = level
                .iter()
                .flat_map(|&n| graph.children(n).iter().copied())
                .collect();
        }
        None
    }
}

/// The formatter that renders snippets under the current settings
pub trait CodeFormatter {
    fn format(&self, settings: &SettingsMap, source: &str, kind: SnippetKind) -> Result<String, FormatError>;
}

/// Returns snippets unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFormatter;

impl CodeFormatter for PassthroughFormatter {
    fn format(&self, _settings: &SettingsMap, source: &str, _kind: SnippetKind) -> Result<String, FormatError> {
        Ok(source.to_string())
    }
}

/// Text for the preview pane when `node` has focus
pub fn render_preview(
    selector: &PreviewSelector<'_>,
    graph: &PreferenceGraph,
    node: NodeId,
    formatter: &dyn CodeFormatter,
) -> String {
    let Some(preview) = selector.resolve(graph, node) else {
        return PLACEHOLDER.to_string();
    };
    match formatter.format(graph.settings(), &preview.text, preview.kind) {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, kind = ?preview.kind, "Formatter failed, showing unformatted snippet");
            preview.text
        }
    }
}
