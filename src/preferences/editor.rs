//! The stock preference tree
//!
//! Builds every section of the formatter settings editor over a working
//! copy of a profile's settings, wires up the dependencies between
//! preferences and installs the cross-node validators.

use tracing::debug;

use super::tab_policy::TabPolicy;
use super::{NodeId, PreferenceGraph, Validation};
use crate::constants::preview::{
    SECTION_BLANK_LINES, SECTION_BRACES, SECTION_COMMENTS, SECTION_INDENTATION, SECTION_LINE_WRAPPING,
    SECTION_WHITE_SPACE,
};
use crate::settings::SettingsMap;
use crate::settings::keys::*;

const BRACE_POSITIONS: &[&str] = &[END_OF_LINE, NEXT_LINE, NEXT_LINE_SHIFTED, NEXT_LINE_ON_WRAP];
const TAB_POLICIES: &[&str] = &[TAB_POLICY_SPACE, TAB_POLICY_TAB, TAB_POLICY_MIXED];

const MAX_INDENT: i64 = 32;
const MAX_BLANK_LINES: i64 = 99;
const MAX_LINE_WIDTH: i64 = 9999;

/// Nodes other components address directly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardNodes {
    pub indentation: NodeId,
    pub braces: NodeId,
    pub blank_lines: NodeId,
    pub white_space: NodeId,
    pub line_wrapping: NodeId,
    pub comments: NodeId,

    pub tab_policy: NodeId,
    pub indentation_size: NodeId,
    pub tab_size: NodeId,
    pub tabs_only_leading: NodeId,
    pub blank_lines_before_first: NodeId,
    pub blank_lines_to_preserve: NodeId,
    pub line_width: NodeId,
    pub wrap_long_lines: NodeId,
    pub continuation_indentation: NodeId,
    pub format_block_comments: NodeId,
    pub comment_line_length: NodeId,
    pub format_header: NodeId,
    pub use_on_off_tags: NodeId,
}

pub struct StandardEditor {
    pub graph: PreferenceGraph,
    pub nodes: StandardNodes,
}

impl StandardEditor {
    pub fn sections(&self) -> [NodeId; 6] {
        let n = &self.nodes;
        [n.indentation, n.braces, n.blank_lines, n.white_space, n.line_wrapping, n.comments]
    }

    /// Node currently bound to `key`
    pub fn node_for_key(&self, key: &str) -> Option<NodeId> {
        self.graph.find_by_key(key)
    }

    pub fn into_settings(self) -> SettingsMap {
        self.graph.into_settings()
    }
}

fn is_on(value: &str) -> bool {
    value == TRUE || value == INSERT
}

fn checkbox(graph: &mut PreferenceGraph, parent: NodeId, label: &str, key: &str) -> NodeId {
    graph.add_checkbox(parent, label, key, TRUE, FALSE)
}

fn insert_checkbox(graph: &mut PreferenceGraph, parent: NodeId, label: &str, key: &str) -> NodeId {
    graph.add_checkbox(parent, label, key, INSERT, DO_NOT_INSERT)
}

fn parse_count(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

pub fn build(mut settings: SettingsMap) -> StandardEditor {
    settings.complete();
    let mut graph = PreferenceGraph::new(settings);
    let root = graph.root();

    // Indentation
    let indentation = graph.add_section(root, "Indentation", Some(SECTION_INDENTATION));
    let tab_policy = graph.add_combo(indentation, "Tab policy", TAB_CHAR, TAB_POLICIES);
    let indentation_size = graph.add_number(indentation, "Indentation size", TAB_SIZE, 0, MAX_INDENT);
    let tab_size = graph.add_number(indentation, "Tab size", INDENTATION_SIZE, 1, MAX_INDENT);
    graph.bind_tab_policy(tab_policy, indentation_size, tab_size);
    let tabs_only_leading = checkbox(
        &mut graph,
        indentation,
        "Use tabs only for leading indentations",
        USE_TABS_ONLY_FOR_LEADING_INDENTATIONS,
    );
    graph.add_dependant(tab_policy, tabs_only_leading, |v| {
        TabPolicy::parse(v) != Some(TabPolicy::Space)
    });

    let indent_group = graph.add_section(indentation, "Indent", None);
    for (label, key) in [
        ("Statements within blocks", INDENT_STATEMENTS_COMPARE_TO_BLOCK),
        ("Statements within method bodies", INDENT_STATEMENTS_COMPARE_TO_BODY),
        ("Statements within 'switch' body", INDENT_SWITCHSTATEMENTS_COMPARE_TO_SWITCH),
        ("Statements within 'case' body", INDENT_SWITCHSTATEMENTS_COMPARE_TO_CASES),
        ("'break' statements", INDENT_BREAKS_COMPARE_TO_CASES),
        ("Declarations within class body", INDENT_BODY_DECLARATIONS_COMPARE_TO_TYPE_HEADER),
        ("Empty lines", INDENT_EMPTY_LINES),
    ] {
        checkbox(&mut graph, indent_group, label, key);
    }

    // Braces
    let braces = graph.add_section(root, "Braces", Some(SECTION_BRACES));
    for (label, key) in [
        ("Class or interface declaration", BRACE_POSITION_FOR_TYPE_DECLARATION),
        ("Method declaration", BRACE_POSITION_FOR_METHOD_DECLARATION),
        ("Blocks", BRACE_POSITION_FOR_BLOCK),
        ("'switch' statement", BRACE_POSITION_FOR_SWITCH),
        ("Array initializer", BRACE_POSITION_FOR_ARRAY_INITIALIZER),
        ("Lambda body", BRACE_POSITION_FOR_LAMBDA_BODY),
    ] {
        graph.add_combo(braces, label, key, BRACE_POSITIONS);
    }

    // Blank lines
    let blank_lines = graph.add_section(root, "Blank lines", Some(SECTION_BLANK_LINES));
    for (label, key) in [
        ("Before package declaration", BLANK_LINES_BEFORE_PACKAGE),
        ("After package declaration", BLANK_LINES_AFTER_PACKAGE),
        ("Before import declarations", BLANK_LINES_BEFORE_IMPORTS),
        ("After import declarations", BLANK_LINES_AFTER_IMPORTS),
    ] {
        graph.add_number(blank_lines, label, key, 0, MAX_BLANK_LINES);
    }
    let blank_lines_before_first = graph.add_number(
        blank_lines,
        "Before first declaration",
        BLANK_LINES_BEFORE_FIRST_CLASS_BODY_DECLARATION,
        0,
        MAX_BLANK_LINES,
    );
    for (label, key) in [
        ("Before methods", BLANK_LINES_BEFORE_METHOD),
        ("Before fields", BLANK_LINES_BEFORE_FIELD),
        ("Before member types", BLANK_LINES_BEFORE_MEMBER_TYPE),
        ("At beginning of method body", BLANK_LINES_AT_BEGINNING_OF_METHOD_BODY),
    ] {
        graph.add_number(blank_lines, label, key, 0, MAX_BLANK_LINES);
    }
    let blank_lines_to_preserve = graph.add_number(
        blank_lines,
        "Number of empty lines to preserve",
        NUMBER_OF_EMPTY_LINES_TO_PRESERVE,
        0,
        MAX_BLANK_LINES,
    );
    graph.set_validator(blank_lines_to_preserve, move |value, graph| {
        let Some(preserve) = parse_count(value) else {
            return Validation::Reject(format!("'{value}' is not a number"));
        };
        if preserve < 0 {
            return Validation::Reject("Number of empty lines to preserve cannot be negative".to_string());
        }
        let before_first = graph
            .value(blank_lines_before_first)
            .and_then(parse_count)
            .unwrap_or(0);
        if preserve < before_first {
            Validation::Advise(format!(
                "Preserving {preserve} empty lines will collapse the {before_first} blank lines before the first declaration"
            ))
        } else {
            Validation::Accept
        }
    });

    // White space
    let white_space = graph.add_section(root, "White space", Some(SECTION_WHITE_SPACE));
    let spaces = graph.add_section(white_space, "Insert space", None);
    for (label, key) in [
        ("After comma in method arguments", INSERT_SPACE_AFTER_COMMA_IN_METHOD_INVOCATION_ARGUMENTS),
        ("Before comma in method arguments", INSERT_SPACE_BEFORE_COMMA_IN_METHOD_INVOCATION_ARGUMENTS),
        ("After opening parenthesis in method invocation", INSERT_SPACE_AFTER_OPENING_PAREN_IN_METHOD_INVOCATION),
        ("Before closing parenthesis in method invocation", INSERT_SPACE_BEFORE_CLOSING_PAREN_IN_METHOD_INVOCATION),
        ("Before opening brace of a class", INSERT_SPACE_BEFORE_OPENING_BRACE_IN_TYPE_DECLARATION),
        ("Before opening brace of a block", INSERT_SPACE_BEFORE_OPENING_BRACE_IN_BLOCK),
        ("After binary operators", INSERT_SPACE_AFTER_BINARY_OPERATOR),
        ("Before binary operators", INSERT_SPACE_BEFORE_BINARY_OPERATOR),
        ("After assignment operator", INSERT_SPACE_AFTER_ASSIGNMENT_OPERATOR),
        ("Before assignment operator", INSERT_SPACE_BEFORE_ASSIGNMENT_OPERATOR),
        ("Before semicolon", INSERT_SPACE_BEFORE_SEMICOLON),
        ("After semicolon in 'for'", INSERT_SPACE_AFTER_SEMICOLON_IN_FOR),
        ("Before lambda arrow", INSERT_SPACE_BEFORE_LAMBDA_ARROW),
        ("After lambda arrow", INSERT_SPACE_AFTER_LAMBDA_ARROW),
    ] {
        insert_checkbox(&mut graph, spaces, label, key);
    }
    let new_lines = graph.add_section(white_space, "New lines", None);
    for (label, key) in [
        ("In empty method body", INSERT_NEW_LINE_IN_EMPTY_METHOD_BODY),
        ("In empty class body", INSERT_NEW_LINE_IN_EMPTY_TYPE_DECLARATION),
        ("Before 'else' in 'if' statement", INSERT_NEW_LINE_BEFORE_ELSE_IN_IF_STATEMENT),
        ("Before 'catch' in 'try' statement", INSERT_NEW_LINE_BEFORE_CATCH_IN_TRY_STATEMENT),
        ("At end of file", INSERT_NEW_LINE_AT_END_OF_FILE_IF_MISSING),
    ] {
        insert_checkbox(&mut graph, new_lines, label, key);
    }
    for (label, key) in [
        ("Keep 'then' statement on same line", KEEP_THEN_STATEMENT_ON_SAME_LINE),
        ("Keep 'else' statement on same line", KEEP_ELSE_STATEMENT_ON_SAME_LINE),
        ("Keep 'else if' on one line", COMPACT_ELSE_IF),
    ] {
        checkbox(&mut graph, new_lines, label, key);
    }

    // Line wrapping
    let line_wrapping = graph.add_section(root, "Line wrapping", Some(SECTION_LINE_WRAPPING));
    let line_width = graph.add_number(line_wrapping, "Maximum line width", LINE_SPLIT, 1, MAX_LINE_WIDTH);
    let wrap_long_lines = checkbox(&mut graph, line_wrapping, "Wrap long lines", WRAP_LONG_LINES);
    let continuation_indentation = graph.add_number(
        line_wrapping,
        "Continuation indentation",
        CONTINUATION_INDENTATION,
        0,
        MAX_INDENT,
    );
    graph.add_dependant(wrap_long_lines, continuation_indentation, is_on);
    let wrap_policy = graph.add_section(line_wrapping, "Wrapping policy", None);
    graph.add_dependant(wrap_long_lines, wrap_policy, is_on);
    for (label, key) in [
        ("Wrap before binary operators", WRAP_BEFORE_BINARY_OPERATOR),
        ("Prefer wrapping outer expressions", WRAP_OUTER_EXPRESSIONS_WHEN_NESTED),
        ("Join already wrapped lines", JOIN_WRAPPED_LINES),
    ] {
        checkbox(&mut graph, wrap_policy, label, key);
    }
    for (label, key) in [
        ("Arguments in method invocation", ALIGNMENT_FOR_ARGUMENTS_IN_METHOD_INVOCATION),
        ("Parameters in method declaration", ALIGNMENT_FOR_PARAMETERS_IN_METHOD_DECLARATION),
        ("Binary expressions", ALIGNMENT_FOR_BINARY_EXPRESSION),
    ] {
        graph.add_number(wrap_policy, label, key, 0, 255);
    }

    // Comments
    let comments = graph.add_section(root, "Comments", Some(SECTION_COMMENTS));
    let format_block_comments = checkbox(&mut graph, comments, "Enable block comment formatting", COMMENT_FORMAT_BLOCK_COMMENTS);
    checkbox(&mut graph, comments, "Enable line comment formatting", COMMENT_FORMAT_LINE_COMMENTS);
    checkbox(&mut graph, comments, "Enable Javadoc comment formatting", COMMENT_FORMAT_JAVADOC_COMMENTS);
    let comment_line_length = graph.add_number(
        comments,
        "Maximum line width for comments",
        COMMENT_LINE_LENGTH,
        4,
        MAX_LINE_WIDTH,
    );
    let format_header = checkbox(&mut graph, comments, "Format header comment", COMMENT_FORMAT_HEADER);
    graph.add_dependant(format_block_comments, comment_line_length, is_on);
    graph.add_dependant(format_block_comments, format_header, is_on);
    for (label, key) in [
        ("Indent parameter descriptions", COMMENT_INDENT_PARAMETER_DESCRIPTION),
        ("Remove blank lines in block comments", COMMENT_CLEAR_BLANK_LINES_IN_BLOCK_COMMENT),
        ("Count width from comment's starting position", COMMENT_COUNT_LINE_LENGTH_FROM_STARTING_POSITION),
    ] {
        checkbox(&mut graph, comments, label, key);
    }

    let tags = graph.add_section(comments, "Formatter tags", None);
    let use_on_off_tags = checkbox(&mut graph, tags, "Enable formatter on/off tags", USE_ON_OFF_TAGS);
    for (label, key) in [("Off tag", DISABLING_TAG), ("On tag", ENABLING_TAG)] {
        let tag = graph.add_text(tags, label, key);
        graph.add_dependant(use_on_off_tags, tag, is_on);
        graph.set_validator(tag, |value, _| {
            if value.trim().is_empty() {
                Validation::Reject("Tag must not be empty".to_string())
            } else if value.chars().any(char::is_whitespace) {
                Validation::Reject("Tag must not contain white space".to_string())
            } else {
                Validation::Accept
            }
        });
    }

    // Editor-only settings
    let view = graph.add_section(root, "Preview", None);
    graph.add_number(view, "Preview line width", UI_PREVIEW_LINE_WIDTH, 1, MAX_LINE_WIDTH);
    checkbox(&mut graph, view, "Show white space", UI_SHOW_WHITESPACE);

    debug!(nodes = graph.node_count(), "Built standard preference tree");
    StandardEditor {
        graph,
        nodes: StandardNodes {
            indentation,
            braces,
            blank_lines,
            white_space,
            line_wrapping,
            comments,
            tab_policy,
            indentation_size,
            tab_size,
            tabs_only_leading,
            blank_lines_before_first,
            blank_lines_to_preserve,
            line_width,
            wrap_long_lines,
            continuation_indentation,
            format_block_comments,
            comment_line_length,
            format_header,
            use_on_off_tags,
        },
    }
}
