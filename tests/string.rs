#[macro_use]
mod common;

#[cfg(test)]
mod string {
    tests! {
        format_numbers in string is OK
        "10"
        "3.25"
        "100000000000000"
    }
}
