use compiler::error::{CompileError, CompileFailure};
use compiler::event::Event;
use compiler::{legacy, preview};
use sxt::command::{CommandRegistry, Direction};
use sxt::template::TemplateRegistry;
use sxt::tool::ToolContext;

fn compile(source: &str) -> compiler::Compiled {
    compiler::compile(
        source,
        0,
        &CommandRegistry::builtin(),
        &TemplateRegistry::builtin(),
    )
    .expect("compile failed")
}

fn events(source: &str) -> Vec<Event> {
    compile(source).events
}

fn compile_err(source: &str) -> CompileFailure {
    compiler::compile(
        source,
        0,
        &CommandRegistry::builtin(),
        &TemplateRegistry::builtin(),
    )
    .expect_err("expected compilation to fail")
}

fn legacy_of(source: &str) -> String {
    legacy::encode(&events(source))
}

#[test]
fn code_block_types_its_text() {
    assert_eq!(
        events("<CODE>\nhello world\n</CODE>\n"),
        vec![Event::Literal("hello world".into())]
    );
}

#[test]
fn newline_between_code_lines_not_after_last() {
    assert_eq!(
        events("<CODE>\nfirst\nsecond\n</CODE>\n"),
        vec![
            Event::Literal("first".into()),
            Event::Newline(1),
            Event::Literal("second".into()),
        ]
    );
}

#[test]
fn blank_code_line_is_just_a_newline() {
    assert_eq!(
        events("<CODE>\na\n\nb\n</CODE>\n"),
        vec![
            Event::Literal("a".into()),
            Event::Newline(1),
            Event::Newline(1),
            Event::Literal("b".into()),
        ]
    );
}

#[test]
fn dedent_preserves_relative_indentation() {
    assert_eq!(
        events("<CODE>\n    def f():\n        return 1\n</CODE>\n"),
        vec![
            Event::Literal("def f():".into()),
            Event::Newline(1),
            Event::Literal("    return 1".into()),
        ]
    );
}

#[test]
fn dedent_is_idempotent() {
    let flush = events("<CODE>\ndef f():\n    return 1\n</CODE>\n");
    let indented = events("<CODE>\n        def f():\n            return 1\n</CODE>\n");
    assert_eq!(flush, indented);
}

#[test]
fn short_command_tokens_expand() {
    assert_eq!(
        events("<COMMANDS>\n<l3>\n<b>\n<e2>\n</COMMANDS>\n"),
        vec![
            Event::Arrow(Direction::Left, 3),
            Event::Backspace(1),
            Event::Newline(2),
        ]
    );
}

#[test]
fn malformed_short_count_warns_and_defaults_to_one() {
    let compiled = compile("<COMMANDS>\n<uabc>\n</COMMANDS>\n");
    assert_eq!(compiled.events, vec![Event::Arrow(Direction::Up, 1)]);
    assert_eq!(compiled.warnings.len(), 1);
    assert!(compiled.warnings[0].is_warning);
    assert!(compiled.warnings[0].to_string().contains("malformed count"));
}

#[test]
fn unknown_short_letter_is_an_unresolved_command() {
    let failure = compile_err("<COMMANDS>\n<x3>\n</COMMANDS>\n");
    match failure {
        CompileFailure::Compile(diag) => match diag.error {
            CompileError::UnresolvedCommand { name, .. } => assert_eq!(name, "<x3>"),
            other => panic!("unexpected error: {other}"),
        },
        other => panic!("unexpected failure: {other}"),
    }
}

#[test]
fn empty_bracket_pair_is_an_unresolved_command() {
    let failure = compile_err("<COMMANDS>\n<>\n</COMMANDS>\n");
    match failure {
        CompileFailure::Compile(diag) => match diag.error {
            CompileError::UnresolvedCommand { name, .. } => assert_eq!(name, "<>"),
            other => panic!("unexpected error: {other}"),
        },
        other => panic!("unexpected failure: {other}"),
    }
}

#[test]
fn short_command_tolerates_internal_whitespace() {
    assert_eq!(
        events("<COMMANDS>\n< u 5 >\n</COMMANDS>\n"),
        vec![Event::Arrow(Direction::Up, 5)]
    );
}

#[test]
fn long_command_with_count() {
    assert_eq!(
        events("<COMMANDS>\nBACKSPACE 6\n</COMMANDS>\n"),
        vec![Event::Backspace(6)]
    );
}

#[test]
fn count_zero_emits_nothing() {
    assert_eq!(
        events("<COMMANDS>\nARROW_UP 0\nENTER\n</COMMANDS>\n"),
        vec![Event::Newline(1)]
    );
}

#[test]
fn count_on_non_repeatable_command_warns_and_runs_once() {
    let compiled = compile("<COMMANDS>\nHOME 3\n</COMMANDS>\n");
    assert_eq!(compiled.events, vec![Event::Home]);
    assert_eq!(compiled.warnings.len(), 1);
    assert!(compiled.warnings[0].to_string().contains("count 3 ignored"));
}

#[test]
fn unresolved_command_names_command_and_tool() {
    let failure = compile_err("<COMMANDS: PYTHON>\nFROBNICATE\n</COMMANDS>\n");
    match failure {
        CompileFailure::Compile(diag) => {
            let message = diag.to_string();
            assert!(message.contains("FROBNICATE"));
            assert!(message.contains("PYTHON"));
        }
        other => panic!("unexpected failure: {other}"),
    }
}

#[test]
fn vim_save_types_colon_w_enter() {
    assert_eq!(
        events("<COMMANDS: VIM>\nSAVE\n</COMMANDS>\n"),
        vec![Event::Literal(":w".into()), Event::Newline(1)]
    );
}

#[test]
fn vscode_save_differs_from_vim_save() {
    let vim = events("<COMMANDS: VIM>\nSAVE\n</COMMANDS>\n");
    let vscode = events("<COMMANDS: VSCODE>\nSAVE\n</COMMANDS>\n");
    assert_eq!(vscode, vec![Event::ShiftPress]);
    assert_ne!(vim, vscode);
}

#[test]
fn generic_commands_resolve_inside_tool_blocks() {
    assert_eq!(
        events("<COMMANDS: VIM>\nARROW_UP 2\n</COMMANDS>\n"),
        vec![Event::Arrow(Direction::Up, 2)]
    );
}

#[test]
fn command_names_are_case_insensitive() {
    assert_eq!(
        events("<COMMANDS>\nbackspace 2\n</COMMANDS>\n"),
        vec![Event::Backspace(2)]
    );
}

#[test]
fn comments_and_blank_lines_are_skipped() {
    assert_eq!(
        events("<COMMANDS>\n# position the cursor\n\nENTER\n</COMMANDS>\n"),
        vec![Event::Newline(1)]
    );
}

#[test]
fn python_macro_expands_in_python_blocks() {
    assert_eq!(
        events("<CODE: PYTHON>\n{{IF_NAME_MAIN}}\n    main()\n</CODE>\n"),
        vec![
            Event::Literal("if __name__ == \"__main__\":".into()),
            Event::Newline(1),
            Event::Literal("    main()".into()),
        ]
    );
}

#[test]
fn import_snippets_end_with_a_newline() {
    assert_eq!(
        events("<CODE: PYTHON>\n{{IMPORT_NUMPY}}\n</CODE>\n"),
        vec![
            Event::Literal("import numpy as np".into()),
            Event::Newline(1),
        ]
    );
    // The same snippet is also available as a command.
    assert_eq!(
        events("<COMMANDS: PYTHON>\nIMPORT_PANDAS\n</COMMANDS>\n"),
        vec![
            Event::Literal("import pandas as pd".into()),
            Event::Newline(1),
        ]
    );
}

#[test]
fn tool_keystroke_macros_expand_in_code_blocks() {
    assert_eq!(legacy_of("<CODE: VIM>\n{{SAVE}}\n</CODE>\n"), ":w\n");
    assert_eq!(
        events("<CODE: VIM>\n{{DELETE_LINE}}\n</CODE>\n"),
        vec![Event::Literal("dd".into())]
    );
    assert_eq!(legacy_of("<CODE: SHELL>\n{{TAB_COMPLETE}}ls\n</CODE>\n"), "\tls");
}

#[test]
fn macro_stays_literal_outside_its_tool_context() {
    assert_eq!(
        events("<CODE>\n{{IF_NAME_MAIN}}\n</CODE>\n"),
        vec![Event::Literal("{{IF_NAME_MAIN}}".into())]
    );
}

#[test]
fn multiline_macro_expands_across_lines() {
    assert_eq!(
        legacy_of("<CODE: PYTHON>\n{{TRY_EXCEPT}}\n</CODE>\n"),
        "try:\n    \nexcept Exception as e:\n    print(f\"Error: {e}\")"
    );
}

#[test]
fn cursor_marker_is_preview_metadata_only() {
    assert_eq!(
        legacy_of("<CODE: PYTHON>\n{{PRINT_DEBUG}}\n</CODE>\n"),
        "print(f\"DEBUG: {}\")"
    );

    let templates = TemplateRegistry::builtin();
    let template = templates
        .lookup(ToolContext::Python, "PRINT_DEBUG")
        .expect("builtin macro");
    let (text, cursor) = template.render();
    assert_eq!(text, "print(f\"DEBUG: {}\")");
    assert_eq!(cursor, Some(16));
}

#[test]
fn loose_text_outside_blocks_is_typed_verbatim() {
    assert_eq!(
        events("hello\n\n<COMMANDS>\nENTER\n</COMMANDS>\n"),
        vec![Event::Literal("hello".into()), Event::Newline(1)]
    );
}

#[test]
fn loose_text_is_not_dedented() {
    assert_eq!(
        events("  indented\n"),
        vec![Event::Literal("  indented".into())]
    );
}

#[test]
fn unknown_tool_degrades_to_generic_with_warning() {
    let compiled = compile("<CODE: EMACS>\nx\n</CODE>\n");
    assert_eq!(compiled.events, vec![Event::Literal("x".into())]);
    assert_eq!(compiled.warnings.len(), 1);
    assert!(compiled.warnings[0].to_string().contains("unknown tool"));
}

#[test]
fn unclosed_block_is_a_parse_error() {
    match compile_err("<CODE>\nx\n") {
        CompileFailure::Parse(errors) => {
            assert!(errors[0].message.contains("never closed"));
        }
        other => panic!("unexpected failure: {other}"),
    }
}

#[test]
fn mismatched_close_tag_is_a_parse_error() {
    match compile_err("<CODE>\nx\n</COMMANDS>\n") {
        CompileFailure::Parse(errors) => {
            assert!(errors[0].message.contains("closed by"));
        }
        other => panic!("unexpected failure: {other}"),
    }
}

#[test]
fn close_without_open_is_a_parse_error() {
    match compile_err("</CODE>\n") {
        CompileFailure::Parse(errors) => {
            assert!(errors[0].message.contains("without a matching open tag"));
        }
        other => panic!("unexpected failure: {other}"),
    }
}

#[test]
fn empty_command_block_keeps_block_ordering() {
    assert_eq!(
        events("<COMMANDS: VIM>\n</COMMANDS>\n<CODE>\nx\n</CODE>\n"),
        vec![Event::Literal("x".into())]
    );
}

#[test]
fn correction_scenario_compiles_and_previews() {
    let source = "<CODE>\n    Hello, Wrold!\n</CODE>\n\n\
                  <COMMANDS>\n    BACKSPACE 6\n</COMMANDS>\n\n\
                  <CODE>\n    World!\n</CODE>\n";
    let events = events(source);
    assert_eq!(
        events,
        vec![
            Event::Literal("Hello, Wrold!".into()),
            Event::Backspace(6),
            Event::Literal("World!".into()),
        ]
    );
    assert_eq!(
        legacy::encode(&events),
        "Hello, Wrold!\u{8}\u{8}\u{8}\u{8}\u{8}\u{8}World!"
    );
    assert_eq!(preview::render(&events, None).text(), "Hello, World!");
}

#[test]
fn control_events_encode_as_escape_pairs() {
    assert_eq!(
        legacy_of("<COMMANDS>\n<u2>\nSHIFT_PRESS\nSLEEP\nCTRL_END\nEXIT_ARROW_MODE\n</COMMANDS>\n"),
        "\u{7}u\u{7}u\u{7}s\u{7}z\u{7}E\u{7}Q"
    );
}

#[test]
fn decode_coalesces_repeated_events() {
    assert_eq!(
        legacy::decode("ab\n\n\u{7}u\u{7}u\u{7}d").unwrap(),
        vec![
            Event::Literal("ab".into()),
            Event::Newline(2),
            Event::Arrow(Direction::Up, 2),
            Event::Arrow(Direction::Down, 1),
        ]
    );
}

#[test]
fn canonical_event_lists_round_trip() {
    let canonical = vec![
        Event::Literal("x".into()),
        Event::Newline(2),
        Event::Backspace(3),
        Event::Arrow(Direction::Left, 2),
        Event::Home,
        Event::Escape,
    ];
    let decoded = legacy::decode(&legacy::encode(&canonical)).unwrap();
    assert_eq!(decoded, canonical);
}

#[test]
fn decode_rejects_bad_input() {
    assert_eq!(
        legacy::decode("abc\u{7}"),
        Err(legacy::DecodeError::TruncatedEscape)
    );
    assert_eq!(
        legacy::decode("\u{7}x"),
        Err(legacy::DecodeError::UnknownDesignator('x'))
    );
}

#[test]
fn preview_tracks_cursor_through_movement() {
    let events = events(
        "<CODE>\nalpha\nbeta\n</CODE>\n<COMMANDS>\nARROW_UP\nEND\n</COMMANDS>\n",
    );
    let preview = preview::render(&events, None);
    assert_eq!(preview.text(), "alpha\nbeta");
    assert_eq!((preview.line, preview.column), (0, 5));
    assert_eq!(preview.text_with_marker(), "alpha│\nbeta");
}

#[test]
fn preview_upto_replays_a_prefix() {
    let events = events("<CODE>\nalpha\nbeta\n</CODE>\n");
    assert_eq!(preview::render(&events, Some(1)).text(), "alpha");
    assert_eq!(preview::render(&events, Some(0)).text(), "");
    // Beyond the end clamps to the full stream.
    assert_eq!(preview::render(&events, Some(99)).text(), "alpha\nbeta");
}

#[test]
fn preview_newline_splits_the_line_at_the_cursor() {
    let events = events("<CODE>\nab\n</CODE>\n<COMMANDS>\nARROW_LEFT\nENTER\n</COMMANDS>\n");
    let preview = preview::render(&events, None);
    assert_eq!(preview.text(), "a\nb");
    assert_eq!(preview.text_with_marker(), "a\n│b");
}

#[test]
fn preview_backspace_at_line_start_joins_lines() {
    let events = events("<CODE>\na\nb\n</CODE>\n<COMMANDS>\nHOME\nBACKSPACE\n</COMMANDS>\n");
    let preview = preview::render(&events, None);
    assert_eq!(preview.text(), "ab");
    assert_eq!(preview.text_with_marker(), "a│b");
}

#[test]
fn preview_page_movement_jumps_ten_lines() {
    let events = vec![Event::Newline(15), Event::PageUp];
    let preview = preview::render(&events, None);
    assert_eq!(preview.line, 5);
    assert_eq!(preview.cursor_offset(), 5);
}
