//! Native functions available in the global frame.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::errors::EvalResult;
use crate::{NativeFunction, Value};

/// `clock()`: seconds since the Unix epoch.
pub const CLOCK: NativeFunction = NativeFunction {
    name: "clock",
    arity: 0,
    func: clock,
};

/// Natives registered by default.
pub const PRELUDE: &[NativeFunction] = &[CLOCK];

fn clock(_args: &[Value]) -> EvalResult {
    // A clock set before 1970 reads as zero rather than failing the program.
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |elapsed| elapsed.as_secs_f64());
    Ok(Value::Number(seconds))
}
