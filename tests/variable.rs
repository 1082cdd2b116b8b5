#[macro_use]
mod common;

#[cfg(test)]
mod variable {
    tests! {
        global in variable is OK
        "before"
        "after"
    }

    tests! {
        scope in variable is OK
        "local"
        "global"
    }

    tests! {
        undefined in variable is ERR
        "[line 1] Error at 'x': Undefined variable 'x'"
    }

    tests! {
        undefined_assignment in variable is ERR
        "[line 1] Error at 'x': Undefined variable 'x'"
    }
}
