use crate::engine::{self, Algorithm, ACTIVE};
use crate::{DriverConfig, Result};
use log::debug;
use std::io::{self, Write};
use std::thread;

/// Largest input whose Fibonacci number still fits in an `i64`.
pub const LAST_VALID_INPUT: i64 = 92;

/// Something that answers `fib` calls, in-process or across the C ABI.
pub trait FibBackend {
    fn fib(&self, n: i64) -> i64;
    fn print_fib(&self, n: i64, out: &mut dyn Write) -> io::Result<()>;
    fn version(&self) -> i32;
    fn library_info(&self, out: &mut dyn Write) -> io::Result<()>;
    fn describe(&self) -> String;
}

/// The engine linked into this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin(pub Algorithm);

impl Default for Builtin {
    fn default() -> Self {
        Self(ACTIVE)
    }
}

impl FibBackend for Builtin {
    fn fib(&self, n: i64) -> i64 {
        self.0.fib(n)
    }

    fn print_fib(&self, n: i64, out: &mut dyn Write) -> io::Result<()> {
        engine::write_fib(out, self.0, n)
    }

    fn version(&self) -> i32 {
        self.0.version()
    }

    fn library_info(&self, out: &mut dyn Write) -> io::Result<()> {
        engine::write_library_info(out, self.0).map(|_| ())
    }

    fn describe(&self) -> String {
        format!("builtin {}", self.0)
    }
}

pub fn open_backend(config: &DriverConfig) -> Result<Box<dyn FibBackend>> {
    config.validate()?;

    if let Some(path) = &config.library {
        return open_library(path);
    }

    Ok(Box::new(Builtin(config.algorithm.unwrap_or(ACTIVE))))
}

#[cfg(not(target_os = "windows"))]
fn open_library(path: &std::path::Path) -> Result<Box<dyn FibBackend>> {
    Ok(Box::new(crate::loader::FibLibrary::open(path)?))
}

#[cfg(target_os = "windows")]
fn open_library(path: &std::path::Path) -> Result<Box<dyn FibBackend>> {
    Err(crate::FibError::InvalidConfig(format!(
        "cannot load {}: dynamic loading is not supported on this platform",
        path.display()
    )))
}

/// Prints the banner, then `count` iterations of `fib(i)` and
/// `printFib(i + offset)`, sleeping between iterations.
pub fn run<W: Write>(backend: &dyn FibBackend, config: &DriverConfig, out: &mut W) -> Result<()> {
    writeln!(
        out,
        "Calling {} v{} ({})",
        engine::LIBRARY_NAME,
        backend.version(),
        backend.describe()
    )?;

    let delay = config.delay();
    for step in 0..config.count {
        let n = config.start.wrapping_add(i64::from(step));
        let value = backend.fib(n);
        debug!("fib({}) returned {}", n, value);

        writeln!(out, "fib({n})={value}")?;
        if n == LAST_VALID_INPUT {
            writeln!(out, "(last valid number)")?;
        }

        backend.print_fib(n.wrapping_add(config.offset), out)?;
        if config.show_info {
            backend.library_info(out)?;
        }
        out.flush()?;

        if step + 1 < config.count && !delay.is_zero() {
            thread::sleep(delay);
        }
    }

    Ok(())
}
