use test_utils::{check_failing_program, check_program, Expected};

#[test]
fn run_print_with_mixed_arguments() {
    check_program(
        "print(1, \"Hello world\", true, false, null);",
        Expected {
            stdout: "1 Hello world true false null\n",
        },
    );
}

#[test]
fn run_print_rejects_function_values() {
    check_failing_program(
        "def f(): func(() => void) => (): void => {}\nprint(f());",
        "Unsupported argument type Func",
    );
}

#[test]
fn run_string_conversion() {
    check_program(
        "print(String(1), String(1.5), String(true), String(null), String(\"x\"));",
        Expected {
            stdout: "1 1.5 true null x\n",
        },
    );
}

#[test]
fn run_integer_conversion() {
    check_program(
        "print(Integer(1), Integer(1.2), Integer(2.0));",
        Expected { stdout: "1 1 2\n" },
    );
    check_failing_program("print(Integer(\"2\"));", "should be type Integer");
}

#[test]
fn run_float_conversion() {
    check_program(
        "print(Float(1), Float(2.1));",
        Expected { stdout: "1.0 2.1\n" },
    );
}

#[test]
fn run_boolean_conversion() {
    check_program(
        "print(Boolean(true), Boolean(false), Boolean(null));",
        Expected {
            stdout: "true false false\n",
        },
    );
    check_failing_program("print(Boolean(1));", "should be type Bool");
}

#[test]
fn run_conversions_require_exactly_one_argument() {
    check_failing_program("print(String());", "takes 1 arguments but 0 were given");
    check_failing_program(
        "print(Integer(1, 2));",
        "takes 1 arguments but 2 were given",
    );
}

#[test]
fn run_literal_round_trip() {
    check_program(
        "const x: int = 42; const y: float = 0.5; const z: str = \"abc\"; print(String(x), String(y), String(z));",
        Expected {
            stdout: "42 0.5 abc\n",
        },
    );
}
