#[macro_use]
mod common;

#[cfg(test)]
mod inheritance {
    tests! {
        super_call in inheritance is OK
        "Fry until golden brown."
        "Pipe full of custard and coat with chocolate."
    }

    tests! {
        inherit_self in inheritance is ERR
        "[line 1] Error at 'Foo': A class cannot inherit from itself"
    }
}
