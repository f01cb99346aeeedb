//! Preview snippet corpus
//!
//! Snippets are short source fragments that illustrate a group of settings.
//! Settings keys (and section preview keys) map onto snippet IDs; several keys
//! usually share one snippet.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;
use tracing::debug;

use crate::constants::preview::{
    SECTION_BLANK_LINES, SECTION_BRACES, SECTION_COMMENTS, SECTION_INDENTATION, SECTION_LINE_WRAPPING,
};
use crate::error::SnippetError;
use crate::settings::keys::*;

/// Syntactic context the formatter needs to parse a snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnippetKind {
    CompilationUnit,
    ClassBody,
    Statements,
    Expression,
    /// Aggregate of snippets with differing kinds
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub kind: SnippetKind,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct SnippetCorpus {
    snippets: HashMap<String, Snippet>,
    /// Settings key -> snippet ID
    keys: HashMap<String, String>,
}

#[derive(Deserialize)]
struct CorpusFile {
    snippets: Vec<Snippet>,
    #[serde(default)]
    keys: BTreeMap<String, String>,
}

const INDENTATION_SNIPPET: &str = "\
class Example {
\tint[] myArray = { 1, 2, 3, 4, 5, 6 };

\tvoid foo(int parameter) {
\t\tswitch (parameter) {
\t\tcase 0:
\t\t\toneCase();
\t\t\tbreak;
\t\tdefault:
\t\t\totherCase();
\t\t}
\t}
}";

const BRACES_SNIPPET: &str = "\
interface Empty {}

class Example {
\tRunnable r = () -> { run(); };
\tint[] array = new int[] { 1, 2, 3 };

\tvoid bar(int p) {
\t\tfor (int i = 0; i < 10; i++) {
\t\t\tadd(i);
\t\t}
\t\tswitch (p) {
\t\tdefault:
\t\t}
\t}
}";

const BLANK_LINES_SNIPPET: &str = "\
package foo.bar.baz;
import java.util.List;
import java.util.Vector;
public class Another {
\tint field;
\tclass Inner {}
\tvoid method() {

\t\tdoSomething();



\t\tdoSomethingElse();
\t}
}";

const INVOCATION_SNIPPET: &str = "\
foo(a, b, c);
bar( x,y );
result = compute(first, second);";

const OPERATORS_SNIPPET: &str = "\
int a = b + c * d;
for (int i = 0; i < 10; i++) {}
list.forEach(item -> consume(item));";

const DECLARATIONS_SNIPPET: &str = "\
class Example{
\tvoid run(){
\t\tif (ready){ go(); }
\t}
}";

const NEW_LINES_SNIPPET: &str = "\
class Empty {}

class Example {
\tvoid empty() {}

\tvoid decide(boolean b) {
\t\tif (b) return; else if (!b) stop(); else retry();
\t\ttry { work(); } catch (Exception e) { log(e); }
\t}
}";

const LINE_WRAPPING_SNIPPET: &str = "\
class Example {
\tvoid foo() {
\t\tString message = \"first part of a long message \" + argumentNumberOne + \" and the second part \" + argumentNumberTwo;
\t\tcallWithManyArguments(firstArgument, secondArgument, thirdArgument, fourthArgument, fifthArgument);
\t}
}";

const COMMENTS_SNIPPET: &str = "\
/*
 * This is a header comment that is long enough to need wrapping when the comment line width is small.
 */
class Example {
\t/* A block comment
\t\tspanning several lines with uneven   spacing. */
\tvoid foo() {
\t\t// a line comment that runs past the configured comment line width and will be wrapped
\t}
}";

const JAVADOC_SNIPPET: &str = "\
/**
 * Describes the example.
 *
 * @param value   the value to describe
 * @return        the description
 */
String describe(int value);";

const TAGS_SNIPPET: &str = "\
class Example {
\t// @formatter:off
\tint[][] matrix = { {1, 0},
\t                   {0, 1} };
\t// @formatter:on
}";

const BUILTIN_SNIPPETS: &[(&str, SnippetKind, &str)] = &[
    ("indentation", SnippetKind::CompilationUnit, INDENTATION_SNIPPET),
    ("braces", SnippetKind::CompilationUnit, BRACES_SNIPPET),
    ("blank_lines", SnippetKind::CompilationUnit, BLANK_LINES_SNIPPET),
    ("white_space_invocation", SnippetKind::Statements, INVOCATION_SNIPPET),
    ("white_space_operators", SnippetKind::Statements, OPERATORS_SNIPPET),
    ("white_space_declarations", SnippetKind::CompilationUnit, DECLARATIONS_SNIPPET),
    ("new_lines", SnippetKind::CompilationUnit, NEW_LINES_SNIPPET),
    ("line_wrapping", SnippetKind::CompilationUnit, LINE_WRAPPING_SNIPPET),
    ("comments", SnippetKind::CompilationUnit, COMMENTS_SNIPPET),
    ("javadoc", SnippetKind::ClassBody, JAVADOC_SNIPPET),
    ("formatter_tags", SnippetKind::CompilationUnit, TAGS_SNIPPET),
];

const BUILTIN_KEYS: &[(&str, &str)] = &[
    (SECTION_INDENTATION, "indentation"),
    (TAB_CHAR, "indentation"),
    (TAB_SIZE, "indentation"),
    (INDENTATION_SIZE, "indentation"),
    (USE_TABS_ONLY_FOR_LEADING_INDENTATIONS, "indentation"),
    (INDENT_STATEMENTS_COMPARE_TO_BLOCK, "indentation"),
    (INDENT_STATEMENTS_COMPARE_TO_BODY, "indentation"),
    (INDENT_SWITCHSTATEMENTS_COMPARE_TO_SWITCH, "indentation"),
    (INDENT_SWITCHSTATEMENTS_COMPARE_TO_CASES, "indentation"),
    (INDENT_BREAKS_COMPARE_TO_CASES, "indentation"),
    (INDENT_BODY_DECLARATIONS_COMPARE_TO_TYPE_HEADER, "indentation"),
    (INDENT_EMPTY_LINES, "indentation"),
    (SECTION_BRACES, "braces"),
    (BRACE_POSITION_FOR_TYPE_DECLARATION, "braces"),
    (BRACE_POSITION_FOR_METHOD_DECLARATION, "braces"),
    (BRACE_POSITION_FOR_BLOCK, "braces"),
    (BRACE_POSITION_FOR_SWITCH, "braces"),
    (BRACE_POSITION_FOR_ARRAY_INITIALIZER, "braces"),
    (BRACE_POSITION_FOR_LAMBDA_BODY, "braces"),
    (SECTION_BLANK_LINES, "blank_lines"),
    (BLANK_LINES_BEFORE_PACKAGE, "blank_lines"),
    (BLANK_LINES_AFTER_PACKAGE, "blank_lines"),
    (BLANK_LINES_BEFORE_IMPORTS, "blank_lines"),
    (BLANK_LINES_AFTER_IMPORTS, "blank_lines"),
    (BLANK_LINES_BEFORE_FIRST_CLASS_BODY_DECLARATION, "blank_lines"),
    (BLANK_LINES_BEFORE_METHOD, "blank_lines"),
    (BLANK_LINES_BEFORE_FIELD, "blank_lines"),
    (BLANK_LINES_BEFORE_MEMBER_TYPE, "blank_lines"),
    (BLANK_LINES_AT_BEGINNING_OF_METHOD_BODY, "blank_lines"),
    (NUMBER_OF_EMPTY_LINES_TO_PRESERVE, "blank_lines"),
    (INSERT_SPACE_AFTER_COMMA_IN_METHOD_INVOCATION_ARGUMENTS, "white_space_invocation"),
    (INSERT_SPACE_BEFORE_COMMA_IN_METHOD_INVOCATION_ARGUMENTS, "white_space_invocation"),
    (INSERT_SPACE_AFTER_OPENING_PAREN_IN_METHOD_INVOCATION, "white_space_invocation"),
    (INSERT_SPACE_BEFORE_CLOSING_PAREN_IN_METHOD_INVOCATION, "white_space_invocation"),
    (INSERT_SPACE_BEFORE_OPENING_BRACE_IN_TYPE_DECLARATION, "white_space_declarations"),
    (INSERT_SPACE_BEFORE_OPENING_BRACE_IN_BLOCK, "white_space_declarations"),
    (INSERT_SPACE_AFTER_BINARY_OPERATOR, "white_space_operators"),
    (INSERT_SPACE_BEFORE_BINARY_OPERATOR, "white_space_operators"),
    (INSERT_SPACE_AFTER_ASSIGNMENT_OPERATOR, "white_space_operators"),
    (INSERT_SPACE_BEFORE_ASSIGNMENT_OPERATOR, "white_space_operators"),
    (INSERT_SPACE_BEFORE_SEMICOLON, "white_space_operators"),
    (INSERT_SPACE_AFTER_SEMICOLON_IN_FOR, "white_space_operators"),
    (INSERT_SPACE_BEFORE_LAMBDA_ARROW, "white_space_operators"),
    (INSERT_SPACE_AFTER_LAMBDA_ARROW, "white_space_operators"),
    (INSERT_NEW_LINE_IN_EMPTY_METHOD_BODY, "new_lines"),
    (INSERT_NEW_LINE_IN_EMPTY_TYPE_DECLARATION, "new_lines"),
    (INSERT_NEW_LINE_BEFORE_ELSE_IN_IF_STATEMENT, "new_lines"),
    (INSERT_NEW_LINE_BEFORE_CATCH_IN_TRY_STATEMENT, "new_lines"),
    (INSERT_NEW_LINE_AT_END_OF_FILE_IF_MISSING, "new_lines"),
    (KEEP_THEN_STATEMENT_ON_SAME_LINE, "new_lines"),
    (KEEP_ELSE_STATEMENT_ON_SAME_LINE, "new_lines"),
    (COMPACT_ELSE_IF, "new_lines"),
    (SECTION_LINE_WRAPPING, "line_wrapping"),
    (LINE_SPLIT, "line_wrapping"),
    (WRAP_LONG_LINES, "line_wrapping"),
    (CONTINUATION_INDENTATION, "line_wrapping"),
    (WRAP_BEFORE_BINARY_OPERATOR, "line_wrapping"),
    (WRAP_OUTER_EXPRESSIONS_WHEN_NESTED, "line_wrapping"),
    (JOIN_WRAPPED_LINES, "line_wrapping"),
    (ALIGNMENT_FOR_ARGUMENTS_IN_METHOD_INVOCATION, "line_wrapping"),
    (ALIGNMENT_FOR_PARAMETERS_IN_METHOD_DECLARATION, "line_wrapping"),
    (ALIGNMENT_FOR_BINARY_EXPRESSION, "line_wrapping"),
    (SECTION_COMMENTS, "comments"),
    (COMMENT_FORMAT_LINE_COMMENTS, "comments"),
    (COMMENT_FORMAT_BLOCK_COMMENTS, "comments"),
    (COMMENT_FORMAT_HEADER, "comments"),
    (COMMENT_LINE_LENGTH, "comments"),
    (COMMENT_CLEAR_BLANK_LINES_IN_BLOCK_COMMENT, "comments"),
    (COMMENT_COUNT_LINE_LENGTH_FROM_STARTING_POSITION, "comments"),
    (COMMENT_FORMAT_JAVADOC_COMMENTS, "javadoc"),
    (COMMENT_INDENT_PARAMETER_DESCRIPTION, "javadoc"),
    (USE_ON_OFF_TAGS, "formatter_tags"),
    (DISABLING_TAG, "formatter_tags"),
    (ENABLING_TAG, "formatter_tags"),
];

impl SnippetCorpus {
    /// The corpus shipped with the crate, built on first use
    pub fn builtin() -> &'static SnippetCorpus {
        static BUILTIN: OnceLock<SnippetCorpus> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let snippets = BUILTIN_SNIPPETS
                .iter()
                .map(|&(id, kind, text)| {
                    let snippet = Snippet {
                        id: id.to_string(),
                        kind,
                        text: text.to_string(),
                    };
                    (id.to_string(), snippet)
                })
                .collect();
            let keys = BUILTIN_KEYS
                .iter()
                .map(|&(key, id)| (key.to_string(), id.to_string()))
                .collect();
            SnippetCorpus { snippets, keys }
        })
    }

    /// Parse a corpus of the form
    /// `{ "snippets": [{ "id", "kind", "text" }], "keys": { key: id } }`
    pub fn from_json(json: &str) -> Result<Self, SnippetError> {
        let file: CorpusFile = serde_json::from_str(json)?;
        let snippets: HashMap<String, Snippet> = file
            .snippets
            .into_iter()
            .map(|snippet| (snippet.id.clone(), snippet))
            .collect();

        for (key, id) in &file.keys {
            if !snippets.contains_key(id) {
                return Err(SnippetError::UnknownSnippet {
                    key: key.clone(),
                    snippet: id.clone(),
                });
            }
        }

        debug!(snippets = snippets.len(), keys = file.keys.len(), "Loaded snippet corpus");
        Ok(SnippetCorpus {
            snippets,
            keys: file.keys.into_iter().collect(),
        })
    }

    /// Snippet illustrating `key`
    pub fn lookup(&self, key: &str) -> Option<&Snippet> {
        self.keys.get(key).and_then(|id| self.snippets.get(id))
    }

    pub fn snippet(&self, id: &str) -> Option<&Snippet> {
        self.snippets.get(id)
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}
