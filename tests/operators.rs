use test_utils::{check_failing_program, check_program, Expected};

#[test]
fn run_arithmetic() {
    check_program(
        "print(1 + 2 * 3 - 4 / 2);",
        Expected { stdout: "5\n" },
    );
    check_program(
        "print((1 + 2) * 3);",
        Expected { stdout: "9\n" },
    );
    check_program(
        "print(1 + 0.5, 12 - 2.50, 2 * 3.0, 2 / 4.0);",
        Expected {
            stdout: "1.5 9.5 6.0 0.5\n",
        },
    );
}

#[test]
fn run_string_concatenation() {
    check_program(
        "print(\"Hello\" + \" \" + \"world!\");",
        Expected {
            stdout: "Hello world!\n",
        },
    );
}

#[test]
fn run_division_by_zero() {
    check_failing_program("print(3 / 0);", "Division by 0");
    check_failing_program("print(3 % 0);", "Division by 0");
}

#[test]
fn run_null_comparisons() {
    check_program(
        "print(null == null, null != null, null == \"123\", null != \"123\");",
        Expected {
            stdout: "true false false true\n",
        },
    );
}

#[test]
fn run_logic_chain() {
    check_program(
        "print(not true or false and not true);",
        Expected { stdout: "false\n" },
    );
}

#[test]
fn run_null_coalesce_chain() {
    let text = r#"
    const a?: int = null;
    const b?: int = null;
    print(a ?? b ?? 42);
    "#;
    check_program(text, Expected { stdout: "42\n" });
}

#[test]
fn run_mixed_type_addition_fails() {
    check_failing_program("print(1 + \"\");", "Cannot add type Integer to type String");
}
