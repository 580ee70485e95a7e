//! Fibonacci algorithms.
//!
//! Every variant follows the same contract: negative input yields `0`,
//! `fib(0) == 0`, `fib(1) == 1`, and all arithmetic wraps at 64 bits so the
//! variants agree bit for bit on every non-negative input.

use crate::FibError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

pub const LIBRARY_NAME: &str = "Fibonacci Library";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Recursive,
    Table,
    Iterative,
    Matrix,
}

/// Variant compiled into the exported `fib` symbol.
pub const ACTIVE: Algorithm = if cfg!(feature = "matrix") {
    Algorithm::Matrix
} else if cfg!(feature = "iterative") {
    Algorithm::Iterative
} else if cfg!(feature = "table") {
    Algorithm::Table
} else {
    Algorithm::Recursive
};

pub const VERSION: i32 = ACTIVE.version();

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Recursive,
        Algorithm::Table,
        Algorithm::Iterative,
        Algorithm::Matrix,
    ];

    pub const fn version(self) -> i32 {
        match self {
            Algorithm::Recursive => 1,
            Algorithm::Table => 2,
            Algorithm::Iterative => 3,
            Algorithm::Matrix => 4,
        }
    }

    pub const fn complexity(self) -> &'static str {
        match self {
            Algorithm::Recursive => "O(2^n)",
            Algorithm::Table => "O(n)",
            Algorithm::Iterative => "O(n)",
            Algorithm::Matrix => "O(log(n))",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Recursive => "recursive",
            Algorithm::Table => "table",
            Algorithm::Iterative => "iterative",
            Algorithm::Matrix => "matrix",
        }
    }

    pub fn from_version(version: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.version() == version)
    }

    pub fn fib(self, n: i64) -> i64 {
        match self {
            Algorithm::Recursive => fib_recursive(n),
            Algorithm::Table => fib_table(n),
            Algorithm::Iterative => fib_iterative(n),
            Algorithm::Matrix => fib_matrix(n),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = FibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| FibError::InvalidConfig(format!("unknown algorithm `{s}`")))
    }
}

/// Direct translation of the recurrence. Exponential time.
pub fn fib_recursive(n: i64) -> i64 {
    if n < 2 {
        return n.max(0);
    }
    fib_recursive(n - 1).wrapping_add(fib_recursive(n - 2))
}

/// Largest input `fib_table` fills a table for; above it the matrix
/// variant answers.
pub const TABLE_LIMIT: i64 = 1 << 16;

/// Fills `f[0..=n]` front to back. Linear time and memory.
pub fn fib_table(n: i64) -> i64 {
    if n < 2 {
        return n.max(0);
    }
    if n > TABLE_LIMIT {
        return fib_matrix(n);
    }
    let len = n as usize + 1;
    let mut f = vec![0i64; len];
    f[1] = 1;
    for i in 2..len {
        f[i] = f[i - 1].wrapping_add(f[i - 2]);
    }
    f[len - 1]
}

/// Two running values advanced from `1` to `n - 1`.
pub fn fib_iterative(n: i64) -> i64 {
    if n < 0 {
        return 0;
    }
    let mut previous: i64 = 0;
    let mut current: i64 = 1;
    let mut result = n;
    for _ in 1..n {
        result = previous.wrapping_add(current);
        previous = current;
        current = result;
    }
    result
}

// Row-major 2x2 matrix.
type Matrix = [i64; 4];

const STEP: Matrix = [1, 1, 1, 0];

fn multiply(a: &Matrix, b: &Matrix) -> Matrix {
    let dot = |x: i64, y: i64, z: i64, w: i64| x.wrapping_mul(y).wrapping_add(z.wrapping_mul(w));
    [
        dot(a[0], b[0], a[1], b[2]),
        dot(a[0], b[1], a[1], b[3]),
        dot(a[2], b[0], a[3], b[2]),
        dot(a[2], b[1], a[3], b[3]),
    ]
}

// Raises `f` (holding STEP) to the power `n` by squaring.
fn power(f: &mut Matrix, n: i64) {
    if n > 1 {
        power(f, n / 2);
        *f = multiply(f, f);
        if n % 2 != 0 {
            *f = multiply(f, &STEP);
        }
    }
}

/// `STEP^(n-1)` holds `fib(n)` in its top-left cell. Logarithmic time.
pub fn fib_matrix(n: i64) -> i64 {
    if n < 2 {
        return n.max(0);
    }
    let mut f = STEP;
    power(&mut f, n - 1);
    f[0]
}

/// Writes `[<LIBRARY_NAME> v<version>] fib(<n>) = <result>`.
pub fn write_fib<W: Write + ?Sized>(out: &mut W, algorithm: Algorithm, n: i64) -> io::Result<()> {
    writeln!(
        out,
        "[{} v{}] fib({}) = {}",
        LIBRARY_NAME,
        algorithm.version(),
        n,
        algorithm.fib(n)
    )
}

/// Prints the result line for the active variant on stdout.
pub fn print_fib(n: i64) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_fib(&mut out, ACTIVE, n)?;
    out.flush()
}

pub fn library_info(algorithm: Algorithm) -> String {
    format!(
        "[using Fibonacci library v{}: {}]",
        algorithm.version(),
        algorithm.complexity()
    )
}

pub fn write_library_info<W: Write + ?Sized>(out: &mut W, algorithm: Algorithm) -> io::Result<usize> {
    let line = format!("{}\n", library_info(algorithm));
    out.write_all(line.as_bytes())?;
    Ok(line.len())
}
