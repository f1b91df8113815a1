//! Syntect-backed syntax highlighting collaborator.

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tome_viewer::Highlight;

/// Class-based highlighter over syntect's bundled syntax definitions.
///
/// Emits `span` classes rather than inline colors so the host page's
/// stylesheet controls the theme.
pub(crate) struct SyntectHighlight {
    syntaxes: SyntaxSet,
}

impl SyntectHighlight {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }
}

impl Highlight for SyntectHighlight {
    fn highlight(&self, language: Option<&str>, code: &str) -> Option<String> {
        let language = language?;
        let syntax = self.syntaxes.find_syntax_by_token(language)?;

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .ok()?;
        }

        Some(format!(
            r#"<pre><code class="language-{language}">{}</code></pre>"#,
            generator.finalize()
        ))
    }
}
