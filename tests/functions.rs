use test_utils::{check_failing_program, check_program, Expected};

#[test]
fn run_factorial() {
    let text = r#"
    def factorial(n: int): int => {
        if (n == 1) {
            return n;
        }
        return n * factorial(n - 1);
    }

    print(factorial(5));
    "#;
    check_program(text, Expected { stdout: "120\n" });
}

#[test]
fn run_fibonacci() {
    let text = r#"
    def fib(n: int): int => {
        if (n < 2) {
            return n;
        }
        return fib(n - 1) + fib(n - 2);
    }

    print(fib(10));
    "#;
    check_program(text, Expected { stdout: "55\n" });
}

#[test]
fn run_chained_call_of_returned_lambda() {
    check_program(
        "def f(): func(() => void) => (): void => {}\nf()();",
        Expected { stdout: "" },
    );
}

#[test]
fn run_chained_call_with_output() {
    let text = r#"
    def f(): func(() => void) => {
        print("1st call");
        return (): void => { print("2nd call"); };
    }

    f()();
    "#;
    check_program(
        text,
        Expected {
            stdout: "1st call\n2nd call\n",
        },
    );
}

#[test]
fn run_chained_call_of_non_function() {
    check_failing_program(
        "def f(): func(() => int) => (): int => 1\nf()()();",
        "is not callable",
    );
}

#[test]
fn run_unbounded_recursion() {
    check_failing_program(
        "def f(): void => { f(); }\nf();",
        "Exceeded recursion limit",
    );
}

#[test]
fn run_lambda_through_variable() {
    let text = r#"
    const power: func((a: int) => int) = (a: int): int => a * a;
    print(power(15));
    "#;
    check_program(text, Expected { stdout: "225\n" });
}

#[test]
fn run_function_invisible_caller_locals() {
    check_failing_program(
        "def f(): void => { print(x); }\nif (true) { let x: int = 1; f(); }",
        "x is not defined",
    );
}

#[test]
fn run_return_at_top_level() {
    check_failing_program("return;", "not allowed outside of a function");
    check_failing_program(
        "while (true) { return; }",
        "not allowed outside of a function",
    );
}

#[test]
fn run_overwritten_builtin() {
    check_program(
        "def print(a: int): void => {}\nprint(1);",
        Expected { stdout: "" },
    );
}
