#[macro_use]
mod common;

#[cfg(test)]
mod error {
    tests! {
        parse_error in error is ERR
        "[line 1] Error at '=': Expect variable name"
    }

    tests! {
        resolve_error_this in error is ERR
        "[line 1] Error at 'this': Cannot use 'this' outside of a class"
    }
}
