//! Integer helpers.
//!
//! Hosts cannot observe overflow, so every operation wraps at 32 bits rather
//! than trapping.

use std::ffi::c_int;

pub extern "C" fn add_two_numbers(a: c_int, b: c_int) -> c_int {
    a.wrapping_add(b)
}

/// `n!` by plain recursion; `n <= 1` yields 1.
///
/// Recursion depth is `n`, so very large inputs exhaust the stack.
pub extern "C" fn factorial(n: c_int) -> c_int {
    if n <= 1 {
        1
    } else {
        n.wrapping_mul(factorial(n - 1))
    }
}

/// The `n`th Fibonacci number by the exponential-time recursive definition.
pub extern "C" fn fibonacci(n: c_int) -> c_int {
    match n {
        n if n <= 0 => 0,
        1 => 1,
        n => fibonacci(n - 1).wrapping_add(fibonacci(n - 2)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        assert_eq!(add_two_numbers(2, 3), 5);
        assert_eq!(add_two_numbers(-7, 7), 0);
        assert_eq!(add_two_numbers(c_int::MAX, 1), c_int::MIN);
    }

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(-3), 1);
        assert_eq!(factorial(0), 1);
        assert_eq!(factorial(1), 1);
        assert_eq!(factorial(5), 120);
        assert_eq!(factorial(12), 479_001_600);
        // 13! does not fit in 32 bits
        assert_eq!(factorial(13), 6_227_020_800_i64 as c_int);
    }

    #[test]
    fn test_fibonacci() {
        assert_eq!(fibonacci(-1), 0);
        assert_eq!(fibonacci(0), 0);
        assert_eq!(fibonacci(1), 1);
        assert_eq!(fibonacci(2), 1);
        assert_eq!(fibonacci(10), 55);
        assert_eq!(fibonacci(20), 6765);
    }
}
