use test_utils::{check_failing_program, check_program, Expected};

#[test]
fn run_counting_loop() {
    check_program(
        "let i: int = 0; while (i < 5) { print(i); i = i + 1; }",
        Expected {
            stdout: "0\n1\n2\n3\n4\n",
        },
    );
}

#[test]
fn run_loop_mutating_outer_binding() {
    check_program(
        "let a: int = 0; while (a == 0) { a = 1; } print(a);",
        Expected { stdout: "1\n" },
    );
}

#[test]
fn run_nested_loops() {
    let text = r#"
    let i: int = 0;
    while (i < 10) {
        while (i < 5) {
            i = i + 1;
        }
        i = i + 1;
    }
    print(i);
    "#;
    check_program(text, Expected { stdout: "10\n" });
}

#[test]
fn run_loop_with_mixed_statements() {
    let text = r#"
    let a: bool = true;
    while (a) {
        if (0 > 10) print("never");
        let i: int = 0;
        if (i == 0) {
            a = false;
        } else {
            while (false) { print("never"); }
        }
    }
    print("done");
    "#;
    check_program(text, Expected { stdout: "done\n" });
}

#[test]
fn run_loop_with_non_boolean_condition() {
    check_failing_program("while (1) {}", "Expected a boolean condition");
}
