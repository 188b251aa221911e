//! Wide-width fixed-point primitives
//!
//! Every ratio, share and fee computation in the engine routes through these
//! helpers. Operands are widened before multiplying (256 bits for a single
//! product, 512 bits for the three-factor swap formula) and narrowed back to
//! `u128` only after the division, so intermediate products never overflow.

use alloy_primitives::{U256, U512};

use crate::error::{AmmError, AmmResult};

/// Largest decimals value whose power of ten fits in `u128`
pub const MAX_DECIMALS: u32 = 38;

/// `floor(a * b / denom)` over a 256-bit intermediate
///
/// A zero denominator is reported as [`AmmError::EmptyReserve`]: inside the
/// engine denominators are always reserves or share supplies.
pub fn mul_div(a: u128, b: u128, denom: u128) -> AmmResult<u128> {
    if denom == 0 {
        return Err(AmmError::EmptyReserve);
    }

    // 128 x 128 bits always fits in 256
    let product = U256::from(a) * U256::from(b);
    let quotient = product / U256::from(denom);

    quotient.try_into().map_err(|_| AmmError::Overflow)
}

/// `floor(prod(numerators) / prod(denominators))` over a 512-bit intermediate
///
/// Accepts up to three 128-bit numerator factors without loss; anything wider
/// fails with [`AmmError::Overflow`] instead of wrapping.
pub fn wide_ratio(numerators: &[u128], denominators: &[u128]) -> AmmResult<u128> {
    let numerator = wide_product(numerators)?;
    let denominator = wide_product(denominators)?;

    if denominator.is_zero() {
        return Err(AmmError::EmptyReserve);
    }

    (numerator / denominator)
        .try_into()
        .map_err(|_| AmmError::Overflow)
}

/// `ceil(prod(numerators) / (a*b - c*d))` where `minuend = (a, b)` and
/// `subtrahend = (c, d)`
///
/// Fails with [`AmmError::InsufficientLiquidity`] when the difference is not
/// positive; in the reverse swap quote that means the output is unreachable.
pub fn ratio_over_difference_ceil(
    numerators: &[u128],
    minuend: (u128, u128),
    subtrahend: (u128, u128),
) -> AmmResult<u128> {
    let numerator = wide_product(numerators)?;
    let lhs = U512::from(minuend.0) * U512::from(minuend.1);
    let rhs = U512::from(subtrahend.0) * U512::from(subtrahend.1);

    if lhs <= rhs {
        return Err(AmmError::InsufficientLiquidity);
    }
    let denominator = lhs - rhs;

    let mut quotient = numerator / denominator;
    if !(numerator % denominator).is_zero() {
        quotient += U512::from(1u8);
    }

    quotient.try_into().map_err(|_| AmmError::Overflow)
}

fn wide_product(factors: &[u128]) -> AmmResult<U512> {
    factors
        .iter()
        .try_fold(U512::from(1u8), |acc, &factor| {
            acc.checked_mul(U512::from(factor))
        })
        .ok_or(AmmError::Overflow)
}

/// Integer square root, `floor(sqrt(n))`, by Newton iteration
pub fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }

    // (n + 1) / 2 without overflowing at u128::MAX
    let mut x = n;
    let mut y = n / 2 + (n & 1);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// `floor(sqrt(a * b))` with the product held in 256 bits
///
/// Used for the first deposit, where the geometric mean of two raw amounts
/// can exceed the working width before the root is taken.
pub fn isqrt_product(a: u128, b: u128) -> AmmResult<u128> {
    let n = U256::from(a) * U256::from(b);
    if n.is_zero() {
        return Ok(0);
    }

    let two = U256::from(2u8);
    let mut x = n;
    let mut y = n / two + n % two;
    while y < x {
        x = y;
        y = (x + n / x) / two;
    }

    x.try_into().map_err(|_| AmmError::Overflow)
}

/// `10^decimals`
pub fn pow10(decimals: u32) -> AmmResult<u128> {
    10u128.checked_pow(decimals).ok_or(AmmError::Overflow)
}

/// Re-express `amount` from `from_decimals` precision to `to_decimals` (floor)
///
/// Example: `convert_decimals(1_500_000, 6, 8) == 150_000_000`
pub fn convert_decimals(amount: u128, from_decimals: u32, to_decimals: u32) -> AmmResult<u128> {
    if from_decimals == to_decimals {
        return Ok(amount);
    }
    wide_ratio(&[amount, pow10(to_decimals)?], &[pow10(from_decimals)?])
}
