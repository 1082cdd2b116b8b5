#[macro_use]
mod common;

#[cfg(test)]
mod function {
    tests! {
        arguments in function is OK
        "6"
    }

    tests! {
        recursion in function is OK
        "21"
    }

    tests! {
        arity_mismatch in function is ERR
        "[line 2] Error at ')': Expected 2 arguments but got 1"
    }
}
