//! Level curve: reaching level `L` takes `50 * L * (L - 1)` lifetime XP.

const LEVEL_STEP_XP: u64 = 50;

/// Lifetime XP needed to reach `level`. Levels start at one.
///
/// Saturates at `u64::MAX` for levels no XP total can reach.
pub fn xp_for_level(level: u32) -> u64 {
    threshold(u64::from(level)).unwrap_or(u64::MAX)
}

fn threshold(level: u64) -> Option<u64> {
    if level <= 1 {
        return Some(0);
    }
    LEVEL_STEP_XP.checked_mul(level)?.checked_mul(level - 1)
}

/// Highest level whose threshold `xp` meets.
///
/// `50·L·(L−1) ≤ xp` holds exactly when `L(L−1) ≤ ⌊xp / 50⌋`, whose largest
/// solution is `⌊(1 + isqrt(1 + 4q)) / 2⌋` for `q = ⌊xp / 50⌋`.
pub fn level_for_xp(xp: u64) -> u32 {
    let steps = xp.div_euclid(LEVEL_STEP_XP);
    // `steps` is at most u64::MAX / 50, so neither product overflows.
    let level = (1 + (1 + 4 * steps).isqrt()).div_euclid(2);
    u32::try_from(level).unwrap_or(u32::MAX)
}
