//! Calls into a compiled copy of the library through `libloading`.

use crate::driver::FibBackend;
use crate::{FibError, Result};
use libloading::Library;
use log::{debug, info};
use std::ffi::c_int;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

type FibFn = unsafe extern "C" fn(i64) -> i64;
type PrintFibFn = unsafe extern "C" fn(i64);
type LibraryInfoFn = unsafe extern "C" fn() -> c_int;

pub struct FibLibrary {
    path: PathBuf,
    version: i32,
    fib: FibFn,
    print_fib: PrintFibFn,
    print_library_info: Option<LibraryInfoFn>,
    // Keeps the code behind the function pointers mapped.
    _library: Library,
}

impl FibLibrary {
    /// Opens the library and resolves `fib`, `printFib` (or `printfib`) and
    /// `version`. `print_library_info` is optional.
    ///
    /// `version` must be a 4-byte `int32_t`, as declared in the header of
    /// [`crate::ffi`]. A narrower symbol (e.g. `unsigned short`) is read
    /// past its end.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading {}", path.display());

        // SAFETY: loading runs the library's initialisers; the caller picks
        // the path and takes responsibility for what it points at.
        let library = unsafe { Library::new(path) }.map_err(|source| FibError::LibraryLoad {
            path: path.display().to_string(),
            source,
        })?;

        let fib: FibFn = symbol(&library, "fib")?;
        let print_fib: PrintFibFn = symbol(&library, "printFib")
            .or_else(|_| symbol(&library, "printfib"))?;
        let version_ptr: *const i32 = symbol(&library, "version")?;
        let print_library_info = symbol::<LibraryInfoFn>(&library, "print_library_info").ok();

        // SAFETY: `version` is an exported, immutable `int32_t` (see `open`).
        let version = unsafe { *version_ptr };
        info!("loaded {} (v{})", path.display(), version);

        Ok(Self {
            path: path.to_path_buf(),
            version,
            fib,
            print_fib,
            print_library_info,
            _library: library,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn symbol<T: Copy>(library: &Library, name: &str) -> Result<T> {
    // SAFETY: `T` matches the signature declared in the library's C header.
    let symbol = unsafe { library.get::<T>(name.as_bytes()) }.map_err(|source| {
        FibError::MissingSymbol {
            symbol: name.to_string(),
            source,
        }
    })?;
    Ok(*symbol)
}

impl FibBackend for FibLibrary {
    fn fib(&self, n: i64) -> i64 {
        // SAFETY: resolved from the library held in `self`.
        unsafe { (self.fib)(n) }
    }

    fn print_fib(&self, n: i64, out: &mut dyn Write) -> io::Result<()> {
        // The library writes straight to the process stdout.
        out.flush()?;
        // SAFETY: resolved from the library held in `self`.
        unsafe { (self.print_fib)(n) };
        Ok(())
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn library_info(&self, out: &mut dyn Write) -> io::Result<()> {
        match self.print_library_info {
            Some(print_library_info) => {
                out.flush()?;
                // SAFETY: resolved from the library held in `self`.
                if unsafe { print_library_info() } < 0 {
                    return Err(io::Error::other("print_library_info failed"));
                }
                Ok(())
            }
            None => writeln!(out, "[using Fibonacci library v{}]", self.version),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
