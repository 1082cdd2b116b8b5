#[macro_use]
mod common;

#[cfg(test)]
mod closure {
    tests! {
        counter in closure is OK
        "1"
        "2"
    }
}
