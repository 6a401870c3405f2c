use test_utils::{check_failing_program, check_program, Expected};

#[test]
fn run_if_elif_else() {
    let text = r#"
    let x: int = 7;
    if (x < 5) {
        print("small");
    } elif (x < 10) {
        print("medium");
    } else {
        print("large");
    }
    "#;
    check_program(text, Expected { stdout: "medium\n" });
}

#[test]
fn run_nested_conditionals() {
    let text = r#"
    if (true) {
        if (false) {
            print("inner if");
        } else {
            print("inner else");
        }
    }
    "#;
    check_program(text, Expected { stdout: "inner else\n" });
}

#[test]
fn run_condition_with_call() {
    check_program(
        "def f(): bool => true\nif (f()) { print(\"condition\"); }",
        Expected {
            stdout: "condition\n",
        },
    );
}

#[test]
fn run_numeric_condition_fails() {
    check_failing_program("if (55 * 0) {}", "Expected a boolean condition");
}
