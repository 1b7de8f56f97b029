use anyhow::{anyhow, Context, Result};

/// Accepts `0x`-prefixed hex or plain decimal.
pub fn parse_seed(seed: &str) -> Result<u32> {
    let trimmed = seed.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("empty seed"));
    }
    match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16)
            .with_context(|| format!("invalid hex seed: {trimmed}")),
        None => trimmed
            .parse()
            .with_context(|| format!("invalid decimal seed: {trimmed}")),
    }
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

pub fn parse_seed_csv(input: &str) -> Result<Vec<u32>> {
    let seeds = input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_seed)
        .collect::<Result<Vec<u32>>>()?;
    if seeds.is_empty() {
        return Err(anyhow!("no seeds parsed from --seeds"));
    }
    Ok(seeds)
}

/// Consecutive seeds from `start`, wrapping on overflow.
pub fn seed_range(start: u32, count: u32) -> Vec<u32> {
    (0..count).map(|offset| start.wrapping_add(offset)).collect()
}
