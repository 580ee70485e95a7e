//! C ABI surface of the shared library.
//!
//! ```c
//! extern const int32_t version;
//! int64_t fib(int64_t n);
//! void printFib(int64_t n);
//! void printfib(int64_t n);   /* alias of printFib */
//! int print_library_info(void);
//! ```

use crate::engine::{self, ACTIVE, VERSION};
use std::ffi::c_int;
use std::io::{self, Write};

/// Version of the variant behind `fib`. Loaders read it as an `int32_t`.
#[export_name = "version"]
pub static EXPORTED_VERSION: i32 = VERSION;

#[no_mangle]
pub extern "C" fn fib(n: i64) -> i64 {
    ACTIVE.fib(n)
}

/// Nothing can be reported across the boundary, so a failed write is dropped.
#[export_name = "printFib"]
pub extern "C" fn print_fib(n: i64) {
    let _ = engine::print_fib(n);
}

/// Lowercase spelling some drivers link against.
#[export_name = "printfib"]
pub extern "C" fn print_fib_lowercase(n: i64) {
    print_fib(n);
}

/// Returns the number of bytes written to stdout, or `-1`.
#[no_mangle]
pub extern "C" fn print_library_info() -> c_int {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match engine::write_library_info(&mut out, ACTIVE).and_then(|n| out.flush().map(|_| n)) {
        Ok(n) => c_int::try_from(n).unwrap_or(c_int::MAX),
        Err(_) => -1,
    }
}
