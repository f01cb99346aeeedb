//! Known-key registry
//!
//! Every key a profile may carry, in canonical order, with its default value.
//! Core keys are consumed by the formatter itself; UI keys only affect how the
//! editor presents a profile.

use std::collections::HashMap;
use std::sync::OnceLock;

pub const INSERT: &str = "insert";
pub const DO_NOT_INSERT: &str = "do_not_insert";
pub const TRUE: &str = "true";
pub const FALSE: &str = "false";

// Indentation
pub const TAB_CHAR: &str = "tab_char";
pub const TAB_SIZE: &str = "tab_size";
pub const INDENTATION_SIZE: &str = "indentation_size";
pub const CONTINUATION_INDENTATION: &str = "continuation_indentation";
pub const INDENT_STATEMENTS_COMPARE_TO_BLOCK: &str = "indent_statements_compare_to_block";
pub const INDENT_STATEMENTS_COMPARE_TO_BODY: &str = "indent_statements_compare_to_body";
pub const INDENT_SWITCHSTATEMENTS_COMPARE_TO_SWITCH: &str = "indent_switchstatements_compare_to_switch";
pub const INDENT_SWITCHSTATEMENTS_COMPARE_TO_CASES: &str = "indent_switchstatements_compare_to_cases";
pub const INDENT_BREAKS_COMPARE_TO_CASES: &str = "indent_breaks_compare_to_cases";
pub const INDENT_BODY_DECLARATIONS_COMPARE_TO_TYPE_HEADER: &str =
    "indent_body_declarations_compare_to_type_header";
pub const INDENT_EMPTY_LINES: &str = "indent_empty_lines";
pub const USE_TABS_ONLY_FOR_LEADING_INDENTATIONS: &str = "use_tabs_only_for_leading_indentations";

// Braces
pub const BRACE_POSITION_FOR_TYPE_DECLARATION: &str = "brace_position_for_type_declaration";
pub const BRACE_POSITION_FOR_METHOD_DECLARATION: &str = "brace_position_for_method_declaration";
pub const BRACE_POSITION_FOR_BLOCK: &str = "brace_position_for_block";
pub const BRACE_POSITION_FOR_SWITCH: &str = "brace_position_for_switch";
pub const BRACE_POSITION_FOR_ARRAY_INITIALIZER: &str = "brace_position_for_array_initializer";
pub const BRACE_POSITION_FOR_LAMBDA_BODY: &str = "brace_position_for_lambda_body";

// Blank lines
pub const BLANK_LINES_BEFORE_PACKAGE: &str = "blank_lines_before_package";
pub const BLANK_LINES_AFTER_PACKAGE: &str = "blank_lines_after_package";
pub const BLANK_LINES_BEFORE_IMPORTS: &str = "blank_lines_before_imports";
pub const BLANK_LINES_AFTER_IMPORTS: &str = "blank_lines_after_imports";
pub const BLANK_LINES_BEFORE_FIRST_CLASS_BODY_DECLARATION: &str =
    "blank_lines_before_first_class_body_declaration";
pub const BLANK_LINES_BEFORE_METHOD: &str = "blank_lines_before_method";
pub const BLANK_LINES_BEFORE_FIELD: &str = "blank_lines_before_field";
pub const BLANK_LINES_BEFORE_MEMBER_TYPE: &str = "blank_lines_before_member_type";
pub const BLANK_LINES_AT_BEGINNING_OF_METHOD_BODY: &str = "blank_lines_at_beginning_of_method_body";
pub const NUMBER_OF_EMPTY_LINES_TO_PRESERVE: &str = "number_of_empty_lines_to_preserve";

// White space
pub const INSERT_SPACE_AFTER_COMMA_IN_METHOD_INVOCATION_ARGUMENTS: &str =
    "insert_space_after_comma_in_method_invocation_arguments";
pub const INSERT_SPACE_BEFORE_COMMA_IN_METHOD_INVOCATION_ARGUMENTS: &str =
    "insert_space_before_comma_in_method_invocation_arguments";
pub const INSERT_SPACE_AFTER_OPENING_PAREN_IN_METHOD_INVOCATION: &str =
    "insert_space_after_opening_paren_in_method_invocation";
pub const INSERT_SPACE_BEFORE_CLOSING_PAREN_IN_METHOD_INVOCATION: &str =
    "insert_space_before_closing_paren_in_method_invocation";
pub const INSERT_SPACE_BEFORE_OPENING_BRACE_IN_TYPE_DECLARATION: &str =
    "insert_space_before_opening_brace_in_type_declaration";
pub const INSERT_SPACE_BEFORE_OPENING_BRACE_IN_BLOCK: &str = "insert_space_before_opening_brace_in_block";
pub const INSERT_SPACE_AFTER_BINARY_OPERATOR: &str = "insert_space_after_binary_operator";
pub const INSERT_SPACE_BEFORE_BINARY_OPERATOR: &str = "insert_space_before_binary_operator";
pub const INSERT_SPACE_AFTER_ASSIGNMENT_OPERATOR: &str = "insert_space_after_assignment_operator";
pub const INSERT_SPACE_BEFORE_ASSIGNMENT_OPERATOR: &str = "insert_space_before_assignment_operator";
pub const INSERT_SPACE_BEFORE_SEMICOLON: &str = "insert_space_before_semicolon";
pub const INSERT_SPACE_AFTER_SEMICOLON_IN_FOR: &str = "insert_space_after_semicolon_in_for";
pub const INSERT_SPACE_BEFORE_LAMBDA_ARROW: &str = "insert_space_before_lambda_arrow";
pub const INSERT_SPACE_AFTER_LAMBDA_ARROW: &str = "insert_space_after_lambda_arrow";

// New lines
pub const INSERT_NEW_LINE_IN_EMPTY_METHOD_BODY: &str = "insert_new_line_in_empty_method_body";
pub const INSERT_NEW_LINE_IN_EMPTY_TYPE_DECLARATION: &str = "insert_new_line_in_empty_type_declaration";
pub const INSERT_NEW_LINE_BEFORE_ELSE_IN_IF_STATEMENT: &str = "insert_new_line_before_else_in_if_statement";
pub const INSERT_NEW_LINE_BEFORE_CATCH_IN_TRY_STATEMENT: &str = "insert_new_line_before_catch_in_try_statement";
pub const INSERT_NEW_LINE_AT_END_OF_FILE_IF_MISSING: &str = "insert_new_line_at_end_of_file_if_missing";
pub const KEEP_THEN_STATEMENT_ON_SAME_LINE: &str = "keep_then_statement_on_same_line";
pub const KEEP_ELSE_STATEMENT_ON_SAME_LINE: &str = "keep_else_statement_on_same_line";
pub const COMPACT_ELSE_IF: &str = "compact_else_if";

// Line wrapping
pub const LINE_SPLIT: &str = "line_split";
pub const WRAP_LONG_LINES: &str = "wrap_long_lines";
pub const WRAP_BEFORE_BINARY_OPERATOR: &str = "wrap_before_binary_operator";
pub const WRAP_OUTER_EXPRESSIONS_WHEN_NESTED: &str = "wrap_outer_expressions_when_nested";
pub const JOIN_WRAPPED_LINES: &str = "join_wrapped_lines";
pub const ALIGNMENT_FOR_ARGUMENTS_IN_METHOD_INVOCATION: &str = "alignment_for_arguments_in_method_invocation";
pub const ALIGNMENT_FOR_PARAMETERS_IN_METHOD_DECLARATION: &str =
    "alignment_for_parameters_in_method_declaration";
pub const ALIGNMENT_FOR_BINARY_EXPRESSION: &str = "alignment_for_binary_expression";

// Comments
pub const COMMENT_FORMAT_LINE_COMMENTS: &str = "comment_format_line_comments";
pub const COMMENT_FORMAT_BLOCK_COMMENTS: &str = "comment_format_block_comments";
pub const COMMENT_FORMAT_JAVADOC_COMMENTS: &str = "comment_format_javadoc_comments";
pub const COMMENT_FORMAT_HEADER: &str = "comment_format_header";
pub const COMMENT_LINE_LENGTH: &str = "comment_line_length";
pub const COMMENT_INDENT_PARAMETER_DESCRIPTION: &str = "comment_indent_parameter_description";
pub const COMMENT_CLEAR_BLANK_LINES_IN_BLOCK_COMMENT: &str = "comment_clear_blank_lines_in_block_comment";
pub const COMMENT_COUNT_LINE_LENGTH_FROM_STARTING_POSITION: &str =
    "comment_count_line_length_from_starting_position";

// Off/on tags
pub const USE_ON_OFF_TAGS: &str = "use_on_off_tags";
pub const DISABLING_TAG: &str = "disabling_tag";
pub const ENABLING_TAG: &str = "enabling_tag";

// UI
pub const UI_PREVIEW_LINE_WIDTH: &str = "ui_preview_line_width";
pub const UI_SHOW_WHITESPACE: &str = "ui_show_whitespace";

/// Tab policy tokens stored under [`TAB_CHAR`]
pub const TAB_POLICY_SPACE: &str = "space";
pub const TAB_POLICY_TAB: &str = "tab";
pub const TAB_POLICY_MIXED: &str = "mixed";

/// Brace position tokens
pub const END_OF_LINE: &str = "end_of_line";
pub const NEXT_LINE: &str = "next_line";
pub const NEXT_LINE_SHIFTED: &str = "next_line_shifted";
pub const NEXT_LINE_ON_WRAP: &str = "next_line_on_wrap";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyGroup {
    /// Read by the formatter
    Core,
    /// Editor presentation only
    Ui,
}

#[derive(Debug, Clone, Copy)]
pub struct KeyDef {
    pub id: &'static str,
    pub default: &'static str,
    pub group: KeyGroup,
}

const fn core(id: &'static str, default: &'static str) -> KeyDef {
    KeyDef { id, default, group: KeyGroup::Core }
}

const fn ui(id: &'static str, default: &'static str) -> KeyDef {
    KeyDef { id, default, group: KeyGroup::Ui }
}

/// All known keys, in canonical (document) order
pub const KNOWN_KEYS: &[KeyDef] = &[
    core(TAB_CHAR, TAB_POLICY_TAB),
    core(TAB_SIZE, "4"),
    core(INDENTATION_SIZE, "4"),
    core(CONTINUATION_INDENTATION, "2"),
    core(INDENT_STATEMENTS_COMPARE_TO_BLOCK, TRUE),
    core(INDENT_STATEMENTS_COMPARE_TO_BODY, TRUE),
    core(INDENT_SWITCHSTATEMENTS_COMPARE_TO_SWITCH, FALSE),
    core(INDENT_SWITCHSTATEMENTS_COMPARE_TO_CASES, TRUE),
    core(INDENT_BREAKS_COMPARE_TO_CASES, TRUE),
    core(INDENT_BODY_DECLARATIONS_COMPARE_TO_TYPE_HEADER, TRUE),
    core(INDENT_EMPTY_LINES, FALSE),
    core(USE_TABS_ONLY_FOR_LEADING_INDENTATIONS, FALSE),
    core(BRACE_POSITION_FOR_TYPE_DECLARATION, END_OF_LINE),
    core(BRACE_POSITION_FOR_METHOD_DECLARATION, END_OF_LINE),
    core(BRACE_POSITION_FOR_BLOCK, END_OF_LINE),
    core(BRACE_POSITION_FOR_SWITCH, END_OF_LINE),
    core(BRACE_POSITION_FOR_ARRAY_INITIALIZER, END_OF_LINE),
    core(BRACE_POSITION_FOR_LAMBDA_BODY, END_OF_LINE),
    core(BLANK_LINES_BEFORE_PACKAGE, "0"),
    core(BLANK_LINES_AFTER_PACKAGE, "1"),
    core(BLANK_LINES_BEFORE_IMPORTS, "1"),
    core(BLANK_LINES_AFTER_IMPORTS, "1"),
    core(BLANK_LINES_BEFORE_FIRST_CLASS_BODY_DECLARATION, "0"),
    core(BLANK_LINES_BEFORE_METHOD, "1"),
    core(BLANK_LINES_BEFORE_FIELD, "0"),
    core(BLANK_LINES_BEFORE_MEMBER_TYPE, "1"),
    core(BLANK_LINES_AT_BEGINNING_OF_METHOD_BODY, "0"),
    core(NUMBER_OF_EMPTY_LINES_TO_PRESERVE, "1"),
    core(INSERT_SPACE_AFTER_COMMA_IN_METHOD_INVOCATION_ARGUMENTS, INSERT),
    core(INSERT_SPACE_BEFORE_COMMA_IN_METHOD_INVOCATION_ARGUMENTS, DO_NOT_INSERT),
    core(INSERT_SPACE_AFTER_OPENING_PAREN_IN_METHOD_INVOCATION, DO_NOT_INSERT),
    core(INSERT_SPACE_BEFORE_CLOSING_PAREN_IN_METHOD_INVOCATION, DO_NOT_INSERT),
    core(INSERT_SPACE_BEFORE_OPENING_BRACE_IN_TYPE_DECLARATION, INSERT),
    core(INSERT_SPACE_BEFORE_OPENING_BRACE_IN_BLOCK, INSERT),
    core(INSERT_SPACE_AFTER_BINARY_OPERATOR, INSERT),
    core(INSERT_SPACE_BEFORE_BINARY_OPERATOR, INSERT),
    core(INSERT_SPACE_AFTER_ASSIGNMENT_OPERATOR, INSERT),
    core(INSERT_SPACE_BEFORE_ASSIGNMENT_OPERATOR, INSERT),
    core(INSERT_SPACE_BEFORE_SEMICOLON, DO_NOT_INSERT),
    core(INSERT_SPACE_AFTER_SEMICOLON_IN_FOR, INSERT),
    core(INSERT_SPACE_BEFORE_LAMBDA_ARROW, INSERT),
    core(INSERT_SPACE_AFTER_LAMBDA_ARROW, INSERT),
    core(INSERT_NEW_LINE_IN_EMPTY_METHOD_BODY, INSERT),
    core(INSERT_NEW_LINE_IN_EMPTY_TYPE_DECLARATION, INSERT),
    core(INSERT_NEW_LINE_BEFORE_ELSE_IN_IF_STATEMENT, DO_NOT_INSERT),
    core(INSERT_NEW_LINE_BEFORE_CATCH_IN_TRY_STATEMENT, DO_NOT_INSERT),
    core(INSERT_NEW_LINE_AT_END_OF_FILE_IF_MISSING, DO_NOT_INSERT),
    core(KEEP_THEN_STATEMENT_ON_SAME_LINE, FALSE),
    core(KEEP_ELSE_STATEMENT_ON_SAME_LINE, FALSE),
    core(COMPACT_ELSE_IF, TRUE),
    core(LINE_SPLIT, "120"),
    core(WRAP_LONG_LINES, TRUE),
    core(WRAP_BEFORE_BINARY_OPERATOR, TRUE),
    core(WRAP_OUTER_EXPRESSIONS_WHEN_NESTED, TRUE),
    core(JOIN_WRAPPED_LINES, TRUE),
    core(ALIGNMENT_FOR_ARGUMENTS_IN_METHOD_INVOCATION, "16"),
    core(ALIGNMENT_FOR_PARAMETERS_IN_METHOD_DECLARATION, "16"),
    core(ALIGNMENT_FOR_BINARY_EXPRESSION, "16"),
    core(COMMENT_FORMAT_LINE_COMMENTS, TRUE),
    core(COMMENT_FORMAT_BLOCK_COMMENTS, TRUE),
    core(COMMENT_FORMAT_JAVADOC_COMMENTS, TRUE),
    core(COMMENT_FORMAT_HEADER, FALSE),
    core(COMMENT_LINE_LENGTH, "80"),
    core(COMMENT_INDENT_PARAMETER_DESCRIPTION, TRUE),
    core(COMMENT_CLEAR_BLANK_LINES_IN_BLOCK_COMMENT, FALSE),
    core(COMMENT_COUNT_LINE_LENGTH_FROM_STARTING_POSITION, TRUE),
    core(USE_ON_OFF_TAGS, FALSE),
    core(DISABLING_TAG, "@formatter:off"),
    core(ENABLING_TAG, "@formatter:on"),
    ui(UI_PREVIEW_LINE_WIDTH, "80"),
    ui(UI_SHOW_WHITESPACE, FALSE),
];

fn index() -> &'static HashMap<&'static str, usize> {
    static INDEX: OnceLock<HashMap<&'static str, usize>> = OnceLock::new();
    INDEX.get_or_init(|| {
        KNOWN_KEYS
            .iter()
            .enumerate()
            .map(|(pos, def)| (def.id, pos))
            .collect()
    })
}

pub fn lookup(id: &str) -> Option<&'static KeyDef> {
    index().get(id).map(|&pos| &KNOWN_KEYS[pos])
}

pub fn is_known(id: &str) -> bool {
    index().contains_key(id)
}

/// Canonical position of a known key
pub fn position(id: &str) -> Option<usize> {
    index().get(id).copied()
}

pub fn default_for(id: &str) -> Option<&'static str> {
    lookup(id).map(|def| def.default)
}
