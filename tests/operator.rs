#[macro_use]
mod common;

#[cfg(test)]
mod operator {
    tests! {
        arithmetic in operator is OK
        "3"
        "2"
        "8"
        "2.5"
        "-5"
    }

    tests! {
        string_concat in operator is OK
        "hello world"
        "value: 42"
    }

    tests! {
        comparison in operator is OK
        "true"
        "true"
        "false"
        "true"
        "false"
    }

    tests! {
        type_mismatch in operator is ERR
        "[line 1] Error at '+': Binary operation '+' is not supported between number and boolean"
    }

    tests! {
        divide_by_zero in operator is ERR
        "[line 1] Error at '/': Division by zero"
    }
}
