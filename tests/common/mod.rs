use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// A `Write` sink backed by a shared buffer, so a test can hand `Lox` an
/// owned writer while still reading back what it printed afterward.
#[derive(Clone)]
pub struct SharedBuffer(pub Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.borrow_mut().flush()
    }
}

#[macro_export]
macro_rules! tests {
    ($file:ident in $scope:ident is OK $($expected:expr)*) => {
        #[test]
        fn $file() {
            use loxido::Lox;
            use $crate::common::SharedBuffer;

            let mut expected = vec![$($expected),*];

            // if exists, concat expected lines with new lines
            let expected = match expected.len() {
                0 => "".to_string(),
                _ => {
                    // add empty string to end to add new line to end of output
                    expected.push("");
                    expected.join("\n")
                }
            };

            let buffer = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
            let mut lox = Lox::new(SharedBuffer(buffer.clone()));

            lox.run_file(format!("tests/target/{}/{}.lox", stringify!($scope), stringify!($file)));

            // drop lox here to release the clone it holds on the buffer
            drop(lox);
            let output = buffer.borrow();
            assert_eq!(expected, std::str::from_utf8(&output).unwrap());
        }
    };

    ($file:ident in $scope:ident is ERR $($expected:expr)+) => {
        #[test]
        fn $file() {
            use assert_cmd::Command;
            // output concats expected with new line
            let output = vec![$($expected),+].join("\n");
            let file = format!("tests/target/{}/{}.lox", stringify!($scope), stringify!($file));

            Command::cargo_bin("loxido").unwrap()
                .arg(file)
                .assert()
                .stderr(format!("{output}\n"))
                .failure();
        }
    };
}
