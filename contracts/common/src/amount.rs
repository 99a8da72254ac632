//! Exact money arithmetic.
//!
//! Amounts are `i128` fixed-point values with [`DECIMALS`] implied decimal
//! places. Rates are basis points. Every operation is checked and returns
//! `None` on overflow; division always rounds toward zero, so derived amounts
//! never exceed their exact value.

/// Implied decimal places of every stored amount.
pub const DECIMALS: u32 = 7;

/// One whole unit expressed in base units.
pub const SCALE: i128 = 10_000_000;

/// 100 % in basis points.
pub const BPS_DENOMINATOR: i128 = 10_000;

pub const SECONDS_PER_YEAR: i128 = 31_536_000;

/// Converts a whole-unit count into base units.
pub fn units(whole: i128) -> Option<i128> {
    whole.checked_mul(SCALE)
}

/// `amount × bps / 10 000`.
pub fn apply_bps(amount: i128, bps: u32) -> Option<i128> {
    amount
        .checked_mul(bps as i128)?
        .checked_div(BPS_DENOMINATOR)
}

/// Share paid to the ancestor `level` steps above the earner: the full plan
/// rate at level 1, halved at each further level.
pub fn referral_share(amount: i128, bps: u32, level: u32) -> Option<i128> {
    if level == 0 {
        return None;
    }
    let halvings = 1i128.checked_shl(level - 1)?;
    amount
        .checked_mul(bps as i128)?
        .checked_div(BPS_DENOMINATOR.checked_mul(halvings)?)
}

/// Simple (non-compounding) yield of `principal` at `apy_bps` over
/// `elapsed_secs`.
pub fn accrued_yield(principal: i128, apy_bps: u32, elapsed_secs: u64) -> Option<i128> {
    principal
        .checked_mul(apy_bps as i128)?
        .checked_mul(elapsed_secs as i128)?
        .checked_div(BPS_DENOMINATOR.checked_mul(SECONDS_PER_YEAR)?)
}
