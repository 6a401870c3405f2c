use test_utils::{check_failing_program, check_program, Expected};

#[test]
fn run_nullable_const_with_coalesced_null() {
    check_program(
        "const a?: int = null ?? null; print(a);",
        Expected { stdout: "null\n" },
    );
}

#[test]
fn run_not_nullable_const_with_coalesced_null() {
    check_failing_program("const a: int = null ?? null;", "not nullable");
}

#[test]
fn run_inner_shadowing_does_not_leak() {
    check_program(
        "let a: int = 0; if (true) { let a: float = 100; } print(a);",
        Expected { stdout: "0\n" },
    );
}

#[test]
fn run_const_assignment_fails() {
    check_failing_program("const a: int = 0; a = 1;", "it is a constant");
}

#[test]
fn run_const_redeclaration_fails() {
    check_failing_program(
        "const a: int = 0; if (true) { let a: float = 100; }",
        "there already exists one, which is a constant",
    );
}

#[test]
fn run_block_local_is_undefined_outside() {
    check_failing_program("if (true) { const a: int = 0; } a = 10;", "a is not defined");
}

#[test]
fn run_widened_declaration() {
    check_program(
        "let a: float = 1; print(a);",
        Expected { stdout: "1.0\n" },
    );
}

#[test]
fn run_uninitialized_nullable_let_holds_null() {
    check_program("let a?: str; print(a);", Expected { stdout: "null\n" });
}
