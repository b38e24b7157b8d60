use anyhow::{Result, bail};

/// Seed used when no usable token is supplied.
pub const DEFAULT_SEED: u64 = 1337;

/// Seeds run by the `sweep` keyword.
pub const SWEEP_SEEDS: [u64; 8] = [1, 7, 42, 1337, 2024, 0xBA77_1E, 0x00C0_FFEE, u64::MAX];

/// Resolve CLI seed arguments into a deduplicated, ordered seed list.
///
/// Supports decimal integers (negative values use their magnitude), `0x`
/// hexadecimal literals and the keyword `sweep`.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut pending: Vec<u64> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if token.eq_ignore_ascii_case("sweep") {
            pending.extend(SWEEP_SEEDS);
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(value.unsigned_abs());
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(value);
            continue;
        }

        if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            && let Ok(value) = u64::from_str_radix(&hex.replace('_', ""), 16)
        {
            pending.push(value);
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    let mut deduped: Vec<u64> = Vec::with_capacity(pending.len());
    for seed in pending {
        if !deduped.contains(&seed) {
            deduped.push(seed);
        }
    }

    if deduped.is_empty() {
        deduped.push(DEFAULT_SEED);
    }

    Ok(deduped)
}
