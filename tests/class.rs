#[macro_use]
mod common;

#[cfg(test)]
mod class {
    tests! {
        init_and_method in class is OK
        "The German chocolate cake is delicious!"
    }

    tests! {
        to_string in class is OK
        "<class Foo>"
        "<Foo instance>"
    }

    tests! {
        undefined_property in class is ERR
        "[line 3] Error at 'bar': Undefined property 'bar'"
    }
}
