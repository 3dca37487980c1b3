//! End-to-end interpreter suites.
//!
//! Programs go through the real lexer and run to completion;
//! assertions are on captured PRINT output, final variable state, and
//! error banners.

use filament_core::Value;
use filament_lexer::tokenize;
use filament_rt::{Interpreter, RuntimeError};
use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

fn program(source: &str) -> Interpreter {
    Interpreter::new(tokenize(source).expect("lex failure"))
}

fn run_ok(source: &str) -> Interpreter {
    let mut interp = program(source);
    if let Err(err) = interp.run() {
        panic!(
            "program failed\n--- source ---\n{}\n--- error ---\n{}",
            source, err
        );
    }
    interp
}

fn run_err(source: &str) -> RuntimeError {
    let mut interp = program(source);
    match interp.run() {
        Ok(()) => panic!("program unexpectedly succeeded\n--- source ---\n{}", source),
        Err(err) => err,
    }
}

fn assert_output(source: &str, expected: &[&str]) {
    let interp = run_ok(source);
    assert_eq!(interp.output, expected, "output mismatch for\n{}", source);
}

fn assert_error(source: &str, banner: &str) {
    let err = run_err(source);
    assert_eq!(err.to_string(), banner, "error mismatch for\n{}", source);
}

// ============================================================================
// Arithmetic and expressions
// ============================================================================

#[test]
fn variables_add_up() {
    assert_output("10 LET A = 3\n20 LET B = 4\n30 PRINT A+B\n40 END\n", &["7"]);
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    assert_output("10 LET A = 2+3*4\n20 PRINT A\n30 END\n", &["14"]);
}

#[test]
fn parentheses_group() {
    assert_output("10 PRINT (1+2)*3\n20 END\n", &["9"]);
}

#[test]
fn modulo_and_bitwise_logicals() {
    assert_output(
        "10 LET M = 7 % 3\n20 PRINT M\n30 LET A = 6 AND 3\n40 PRINT A\n50 LET B = 6 OR 3\n60 PRINT B\n70 END\n",
        &["1", "2", "7"],
    );
}

#[test]
fn string_concatenation() {
    assert_output(
        "10 LET A$ = \"foo\"\n20 LET B$ = \"bar\"\n30 PRINT A$+B$\n40 END\n",
        &["foobar"],
    );
}

#[test]
fn division_by_zero_is_reported_on_its_line() {
    assert_error("10 LET A = 10/0\n20 END\n", "Line 10 : Division by zero");
}

#[test]
fn unclosed_bracket_is_reported() {
    assert_error(
        "10 LET A = (1+2\n20 END\n",
        "Line 10 : unclosed bracket around expression",
    );
}

#[test]
fn undefined_variable_is_reported() {
    assert_error(
        "10 PRINT X\n20 END\n",
        "Line 10 : variable 'X' doesn't exist",
    );
}

#[test]
fn statement_starting_with_a_bare_identifier_is_not_handled() {
    assert_error("10 A\n20 END\n", "Line 10 : Token not handled");
}

// ============================================================================
// Type discipline
// ============================================================================

#[test]
fn string_times_string_fails() {
    assert_error(
        "10 LET A$ = \"foo\"\n20 LET B$ = \"bar\"\n30 PRINT A$*B$\n40 END\n",
        "Line 30 : type mismatch: string * string",
    );
}

#[test]
fn number_plus_string_fails() {
    assert_error(
        "10 LET A = 1 + \"X\"\n20 END\n",
        "Line 10 : type mismatch: number + string",
    );
}

#[test]
fn mixed_comparison_fails() {
    assert_error(
        "10 IF 1 < \"X\" THEN PRINT \"Y\"\n20 END\n",
        "Line 10 : type mismatch: number < string",
    );
}

// ============================================================================
// IF / THEN / ELSE
// ============================================================================

#[test]
fn and_chain_takes_the_then_branch() {
    assert_output(
        "10 IF 1=1 AND 2=2 THEN PRINT \"YES\" ELSE PRINT \"NO\"\n20 END\n",
        &["YES"],
    );
}

#[test]
fn failed_and_chain_takes_the_else_branch() {
    assert_output(
        "10 IF 1=1 AND 2=3 THEN PRINT \"YES\" ELSE PRINT \"NO\"\n20 END\n",
        &["NO"],
    );
}

#[test]
fn or_chain_short_of_nothing_still_folds() {
    assert_output(
        "10 IF 1=2 OR 2=2 THEN PRINT \"YES\" ELSE PRINT \"NO\"\n20 END\n",
        &["YES"],
    );
}

#[test]
fn false_condition_without_else_skips_the_line() {
    assert_output("10 IF 1=2 THEN PRINT \"Y\"\n20 PRINT \"Z\"\n30 END\n", &["Z"]);
}

#[test]
fn bare_numeric_condition_is_truthy_when_nonzero() {
    assert_output(
        "10 IF 1 THEN PRINT \"T\"\n20 IF 0 THEN PRINT \"F\"\n30 END\n",
        &["T"],
    );
}

#[test]
fn if_then_goto_lands_on_target() {
    assert_output(
        "10 IF 1=1 THEN GOTO 40\n20 PRINT \"NO\"\n30 END\n40 PRINT \"YES\"\n50 END\n",
        &["YES"],
    );
}

#[test]
fn else_branch_may_jump_too() {
    assert_output(
        "10 IF 1=2 THEN PRINT \"NO\" ELSE GOTO 40\n20 PRINT \"FELL\"\n30 END\n40 PRINT \"YES\"\n50 END\n",
        &["YES"],
    );
}

#[test]
fn consequent_chain_after_colon_is_swallowed() {
    // THEN runs exactly one nested statement; the rest of the line is
    // skipped along with any ELSE branch.
    assert_output(
        "10 IF 1=1 THEN PRINT \"A\" : PRINT \"B\"\n20 PRINT \"C\"\n30 END\n",
        &["A", "C"],
    );
}

// ============================================================================
// FOR / NEXT
// ============================================================================

#[test]
fn counted_loop_prints_each_value() {
    assert_output(
        "10 FOR I = 1 TO 3\n20 PRINT I\n30 NEXT I\n40 END\n",
        &["1", "2", "3"],
    );
}

#[test]
fn nested_loops_with_distinct_counters_compose() {
    assert_output(
        "10 FOR I = 1 TO 2\n20 FOR J = 1 TO 2\n30 PRINT I,J\n40 NEXT J\n50 NEXT I\n60 END\n",
        &["1 1", "1 2", "2 1", "2 2"],
    );
}

#[test]
fn final_counter_is_end_plus_step() {
    // NEXT increments even on the terminating pass.
    let interp = run_ok("10 FOR I = 1 TO 3\n20 NEXT I\n30 END\n");
    assert_eq!(interp.get_variable("I"), Value::Number(4.0));
}

#[test]
fn one_trip_loop_runs_the_body_once() {
    let interp = run_ok("10 FOR I = 5 TO 5\n20 PRINT I\n30 NEXT I\n40 END\n");
    assert_eq!(interp.output, vec!["5"]);
    assert_eq!(interp.get_variable("I"), Value::Number(6.0));
}

#[test]
fn bounds_resolve_through_variables() {
    assert_output(
        "10 LET A = 2\n20 FOR I = A TO 4\n30 PRINT I\n40 NEXT I\n50 END\n",
        &["2", "3", "4"],
    );
}

#[test]
fn positive_step_walks_to_the_endpoint() {
    let interp = run_ok("10 FOR I = 1 TO 7 STEP 2\n20 PRINT I\n30 NEXT I\n40 END\n");
    assert_eq!(interp.output, vec!["1", "3", "5", "7"]);
    assert_eq!(interp.get_variable("I"), Value::Number(9.0));
}

#[test]
fn negative_step_counts_down() {
    assert_output(
        "10 FOR I = 3 TO 1 STEP -1\n20 PRINT I\n30 NEXT I\n40 END\n",
        &["3", "2", "1"],
    );
}

#[test]
fn fractional_step_is_rejected() {
    assert_error(
        "10 FOR I = 1 TO 3 STEP 1.5\n20 NEXT I\n30 END\n",
        "Line 10 : STEP must be an integer, got '1.5'",
    );
}

#[test]
fn next_without_for_fails() {
    assert_error("10 NEXT I\n20 END\n", "Line 10 : NEXT without FOR");
}

#[test]
fn loop_left_open_at_termination_is_reported() {
    let err = run_err("10 FOR I = 1 TO 10\n20 END\n");
    assert_eq!(err, RuntimeError::UnclosedFor);
    assert_eq!(err.to_string(), "Unclosed FOR loop");
}

// ============================================================================
// GOTO / GOSUB / RETURN
// ============================================================================

#[test]
fn gosub_runs_the_subroutine_once() {
    assert_output(
        "10 GOSUB 100\n20 END\n100 PRINT \"HI\"\n110 RETURN\n",
        &["HI"],
    );
}

#[test]
fn gosubs_nest() {
    assert_output(
        "10 GOSUB 100\n20 PRINT \"BACK\"\n30 END\n100 GOSUB 200\n110 RETURN\n200 PRINT \"DEEP\"\n210 RETURN\n",
        &["DEEP", "BACK"],
    );
}

#[test]
fn call_stack_is_empty_after_a_balanced_run() {
    assert_output(
        "10 GOSUB 100\n20 DUMP\n30 END\n100 RETURN\n",
        &["VARIABLES:", "GOSUB STACK DEPTH: 0", "ACTIVE LOOPS:"],
    );
}

#[test]
fn return_without_gosub_fails() {
    assert_error("10 RETURN\n20 END\n", "Line 10 : RETURN without GOSUB");
}

#[test]
fn goto_to_a_missing_line_fails() {
    assert_error("10 GOTO 99\n20 END\n", "Line 10 : Failed to GOTO line 99");
}

#[test]
fn goto_first_line_resolves() {
    // The original treated a zero offset as "not found", so jumping to
    // the program's first line failed; this implementation uses a real
    // presence check and the jump resolves.
    let mut interp = program(
        "10 LET A = A + 1\n20 IF A = 2 THEN GOTO 50\n30 GOTO 10\n40 PRINT \"UNREACHED\"\n50 PRINT A\n60 END\n",
    );
    interp.set_variable("A", Value::Number(0.0));
    interp.run().expect("program failed");
    assert_eq!(interp.output, vec!["2"]);
}

#[test]
fn errors_are_attributed_to_the_jumped_to_line() {
    assert_error(
        "10 GOTO 30\n20 END\n30 PRINT X\n",
        "Line 30 : variable 'X' doesn't exist",
    );
}

#[test]
fn duplicate_line_numbers_resolve_to_the_first_occurrence() {
    assert_output(
        "10 PRINT \"A\"\n20 GOTO 50\n50 PRINT \"first\"\n60 END\n50 PRINT \"second\"\n70 END\n",
        &["A", "first"],
    );
}

#[test]
fn jump_targets_are_deterministic_across_runs() {
    let source = "10 GOSUB 100\n20 GOTO 40\n30 END\n40 PRINT \"END\"\n50 END\n100 PRINT \"SUB\"\n110 RETURN\n";
    let first = run_ok(source).output;
    let second = run_ok(source).output;
    assert_eq!(first, vec!["SUB", "END"]);
    assert_eq!(first, second);
}

// ============================================================================
// PRINT
// ============================================================================

#[test]
fn numeric_literals_print_verbatim() {
    assert_output("10 PRINT 007\n20 END\n", &["007"]);
}

#[test]
fn comma_prints_a_single_space() {
    assert_output("10 PRINT \"A\" , \"B\"\n20 END\n", &["A B"]);
}

#[test]
fn exact_integers_print_without_fraction() {
    assert_output(
        "10 LET A = 6/2\n20 PRINT A\n30 LET B = 7/2\n40 PRINT B\n50 END\n",
        &["3", "3.5"],
    );
}

#[test]
fn statements_separated_by_colon_share_a_line() {
    assert_output("10 LET A = 5 : PRINT A\n20 END\n", &["5"]);
}

#[test]
fn rem_lines_are_ignored() {
    assert_output(
        "10 REM this whole line is commentary: <>!\n20 PRINT \"OK\"\n30 END\n",
        &["OK"],
    );
}

// ============================================================================
// Builtins in programs
// ============================================================================

#[test]
fn string_builtins_compose_with_print() {
    assert_output(
        "10 PRINT LEFT$ \"HELLO\", 2\n20 PRINT MID$ \"HELLO\", 1, 3\n30 PRINT RIGHT$ \"HELLO\", 3\n40 PRINT TL$ \"HELLO\"\n50 PRINT CHR$ 65\n60 PRINT LEN \"HELLO\"\n70 PRINT STR$ 3.5\n80 END\n",
        &["HE", "ELL", "LLO", "ELLO", "A", "5", "3.5"],
    );
}

#[test]
fn builtins_nest_inside_argument_lists() {
    assert_output("10 PRINT LEN LEFT$ \"HELLO\", 3\n20 END\n", &["3"]);
}

#[test]
fn zero_arity_builtins_work_in_expressions() {
    assert_output("10 LET A = PI * 2\n20 PRINT INT A\n30 END\n", &["6"]);
}

#[test]
fn nan_comparisons_follow_ieee() {
    assert_output(
        "10 LET N = ACS 2\n20 IF N = N THEN PRINT \"EQ\" ELSE PRINT \"NE\"\n30 IF N <> N THEN PRINT \"NEQ\" ELSE PRINT \"SAME\"\n40 END\n",
        &["NE", "NEQ"],
    );
}

#[test]
fn missing_arguments_are_reported() {
    assert_error(
        "10 PRINT LEFT$ \"HELLO\"\n20 END\n",
        "Line 10 : hit end of line while collecting arguments for LEFT$",
    );
}

// ============================================================================
// INPUT
// ============================================================================

#[test]
fn input_parses_numbers() {
    let mut interp = program("10 INPUT \"N? \", A\n20 PRINT A\n30 END\n");
    interp.set_input(Box::new(Cursor::new(Vec::from("42\n"))));
    interp.run().expect("program failed");
    assert_eq!(interp.output, vec!["42"]);
}

#[test]
fn input_stores_strings_for_sigil_variables() {
    let mut interp = program("10 INPUT \"WHO? \", A$\n20 PRINT A$\n30 END\n");
    interp.set_input(Box::new(Cursor::new(Vec::from("hello world\n"))));
    interp.run().expect("program failed");
    assert_eq!(interp.output, vec!["hello world"]);
}

#[test]
fn unparsable_numeric_input_fails() {
    let mut interp = program("10 INPUT \"N? \", A\n20 END\n");
    interp.set_input(Box::new(Cursor::new(Vec::from("abc\n"))));
    let err = interp.run().expect_err("program should fail");
    assert_eq!(
        err.to_string(),
        "Line 10 : failed to parse 'abc' as a number"
    );
}

// ============================================================================
// Host-registered primitives
// ============================================================================

#[test]
fn host_primitives_see_interpreter_variables() {
    let mut interp = program("10 LET A = 20\n20 PRINT ADDA 22\n30 END\n");
    interp.register_primitive("ADDA", 1, |interp, args| {
        match (&args[0], interp.get_variable("A")) {
            (Value::Number(x), Value::Number(a)) => Value::Number(x + a),
            _ => Value::Error("ADDA: numeric arguments only".into()),
        }
    });
    interp.run().expect("program failed");
    assert_eq!(interp.output, vec!["42"]);
}

#[test]
fn host_primitives_may_close_over_external_state() {
    let mut interp = program("10 EMIT 1\n20 EMIT 2\n30 EMIT 3\n40 END\n");
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    interp.register_primitive("EMIT", 1, move |_, args| {
        if let Value::Number(n) = args[0] {
            sink.borrow_mut().push(n);
        }
        Value::Number(0.0)
    });
    interp.run().expect("program failed");
    assert_eq!(*seen.borrow(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn host_primitives_may_write_variables() {
    let mut interp = program("10 SEED 7\n20 PRINT S\n30 END\n");
    interp.register_primitive("SEED", 1, |interp, args| {
        interp.set_variable("S", args[0].clone());
        Value::Number(0.0)
    });
    interp.run().expect("program failed");
    assert_eq!(interp.output, vec!["7"]);
}

// ============================================================================
// Stepping and tracing
// ============================================================================

#[test]
fn run_once_is_a_single_step() {
    let mut interp = program("10 LET A = 1\n20 END\n");
    // First step reads the line marker; nothing is assigned yet.
    interp.run_once().expect("step failed");
    assert!(interp.get_variable("A").is_error());
    interp.run_once().expect("step failed");
    assert_eq!(interp.get_variable("A"), Value::Number(1.0));
}

#[test]
fn tracing_does_not_disturb_execution() {
    let mut interp = program("10 LET A = 3\n20 PRINT A\n30 END\n");
    interp.set_trace(true);
    interp.run().expect("program failed");
    assert_eq!(interp.output, vec!["3"]);
}
