// crates/lagoon-core/src/math.rs
//
// Checked integer arithmetic for ledger calculations.
//
// Amounts are 18-decimal wei in u128, so a reserve product like E * T is
// routinely wider than 128 bits. Every multiply-then-divide goes through
// `mul_div`, which carries the intermediate product in 256 bits and
// reports an unrepresentable quotient or division by zero as a typed
// rejection instead of wrapping or panicking. All division truncates
// toward zero, which is the rounding contract the accrual and exchange
// formulas depend on.

use crate::error::LagoonError;

/// Compute `a * b / d` via a 256-bit intermediate, truncating toward zero.
///
/// # Errors
/// Returns `LagoonError::Overflow` if the quotient does not fit in u128
/// or `d` is zero.
pub fn mul_div(a: u128, b: u128, d: u128) -> Result<u128, LagoonError> {
    if d == 0 {
        return Err(LagoonError::Overflow(
            "mul_div division by zero".to_string(),
        ));
    }
    if let Some(product) = a.checked_mul(b) {
        return Ok(product / d);
    }
    let (hi, lo) = widening_mul(a, b);
    // The quotient fits in u128 iff the high word is below the divisor.
    if hi >= d {
        return Err(LagoonError::Overflow(format!(
            "mul_div quotient overflow: {} * {} / {}",
            a, b, d
        )));
    }
    Ok(div_wide(hi, lo, d))
}

/// Full 128x128 -> 256-bit multiply, as `(high, low)` words.
fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = (1 << 64) - 1;
    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    let mid = (ll >> 64) + (lh & MASK) + (hl & MASK);
    let lo = (mid << 64) | (ll & MASK);
    let hi = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (hi, lo)
}

/// Divide the 256-bit value `(hi, lo)` by `d` via restoring long
/// division. Requires `hi < d`, which bounds the quotient to u128.
fn div_wide(hi: u128, lo: u128, d: u128) -> u128 {
    let mut rem = hi;
    let mut quotient = 0u128;
    for i in (0..128).rev() {
        let bit = (lo >> i) & 1;
        // rem < d, so 2*rem + bit < 2d; a carry out of the shift means
        // the true value exceeds u128 and certainly exceeds d.
        let carry = rem >> 127 != 0;
        rem = (rem << 1) | bit;
        quotient <<= 1;
        if carry || rem >= d {
            rem = rem.wrapping_sub(d);
            quotient |= 1;
        }
    }
    quotient
}

/// Floor square root of the product `a * b`, carried in 256 bits.
///
/// Used for first-deposit liquidity-position minting,
/// `L = floor(sqrt(E * T))`: the root of a 256-bit product always fits
/// in u128, so this cannot fail.
pub fn sqrt_of_product(a: u128, b: u128) -> u128 {
    if let Some(product) = a.checked_mul(b) {
        return isqrt(product);
    }
    let target = widening_mul(a, b);
    // Largest r with r * r <= target, by binary search on r.
    let mut low = 0u128;
    let mut high = u128::MAX;
    while low < high {
        // Upper midpoint, written to avoid overflowing `high + 1`
        let mid = high - (high - low) / 2;
        if widening_mul(mid, mid) <= target {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    low
}

/// Integer square root of `n` (floor), by Newton's method.
pub fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_exact() {
        assert_eq!(mul_div(6, 4, 3).unwrap(), 8);
    }

    #[test]
    fn test_mul_div_truncates() {
        // 7 * 3 / 2 = 21 / 2 = 10 (truncation toward zero)
        assert_eq!(mul_div(7, 3, 2).unwrap(), 10);
    }

    #[test]
    fn test_mul_div_zero_divisor() {
        assert!(mul_div(1, 1, 0).is_err());
    }

    #[test]
    fn test_mul_div_quotient_overflow() {
        assert!(mul_div(u128::MAX, 2, 1).is_err());
        assert!(mul_div(u128::MAX, u128::MAX, 1).is_err());
    }

    #[test]
    fn test_mul_div_large_but_fitting() {
        // 10^18 * 10^18 = 10^36 fits in u128 (max ~3.4 * 10^38)
        let e18 = 1_000_000_000_000_000_000u128;
        assert_eq!(mul_div(e18, e18, e18).unwrap(), e18);
    }

    #[test]
    fn test_mul_div_wide_intermediate() {
        // 18-decimal reserve products routinely exceed u128: a 50-coin
        // reserve times a 1-coin LP burn is 5 * 10^37 wei^2 per unit of
        // supply, and squaring anything past ~18.4 coins overflows.
        let e18 = 1_000_000_000_000_000_000u128;
        let reserve = 50 * e18;
        let lp_amount = 10 * e18;
        let lp_supply = 10 * e18;
        assert_eq!(mul_div(reserve, lp_amount, lp_supply).unwrap(), reserve);

        let big = 100 * e18;
        assert!(big.checked_mul(big).is_none());
        assert_eq!(mul_div(big, big, big).unwrap(), big);
    }

    #[test]
    fn test_mul_div_wide_exact_quotient() {
        // 2^127 * 6 = 3 * 2^128 needs the 256-bit path; / 4 = 3 * 2^126
        assert_eq!(mul_div(1 << 127, 6, 4).unwrap(), 3 << 126);
        // Truncation still applies on the wide path
        assert_eq!(mul_div(u128::MAX, 10, u128::MAX).unwrap(), 10);
        assert_eq!(mul_div(u128::MAX, 10, u128::MAX - 1).unwrap(), 10);
    }

    #[test]
    fn test_isqrt_small() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(2), 1);
        assert_eq!(isqrt(3), 1);
        assert_eq!(isqrt(4), 2);
    }

    #[test]
    fn test_isqrt_perfect_square() {
        assert_eq!(isqrt(144), 12);
        let e18 = 1_000_000_000_000_000_000u128;
        // sqrt(10 coins * 0.1 coin) = sqrt(10^36) = 10^18
        assert_eq!(isqrt(10 * e18 * (e18 / 10)), e18);
    }

    #[test]
    fn test_isqrt_floor() {
        assert_eq!(isqrt(145), 12);
        assert_eq!(isqrt(168), 12);
        assert_eq!(isqrt(169), 13);
    }

    #[test]
    fn test_sqrt_of_product_narrow_matches_isqrt() {
        let e18 = 1_000_000_000_000_000_000u128;
        assert_eq!(sqrt_of_product(10 * e18, e18 / 10), e18);
        assert_eq!(sqrt_of_product(144, 1), 12);
    }

    #[test]
    fn test_sqrt_of_product_wide() {
        let e18 = 1_000_000_000_000_000_000u128;
        // 100 coins squared is 10^40, past u128
        let amount = 100 * e18;
        assert!(amount.checked_mul(amount).is_none());
        assert_eq!(sqrt_of_product(amount, amount), amount);

        // Floor contract on the wide path: r*r <= a*b < (r+1)*(r+1)
        let (a, b) = (1_000 * e18, 100 * e18);
        let r = sqrt_of_product(a, b);
        assert!(widening_mul(r, r) <= widening_mul(a, b));
        assert!(widening_mul(r + 1, r + 1) > widening_mul(a, b));
    }
}
