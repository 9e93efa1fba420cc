//! Host functions installed into every interpreter's global scope.

use std::sync::OnceLock;
use std::time::Instant;

use crate::value::{NativeFn, Value};

static CLOCK_ORIGIN: OnceLock<Instant> = OnceLock::new();

/// Seconds elapsed since the process first asked for the time.  Monotonic.
pub fn clock(_args: &[Value]) -> Result<Value, String> {
    let origin: &Instant = CLOCK_ORIGIN.get_or_init(Instant::now);

    Ok(Value::Number(origin.elapsed().as_secs_f64()))
}

/// `(name, arity, body)` for every built‑in.
pub const BUILTINS: &[(&str, usize, NativeFn)] = &[("clock", 0, clock)];
