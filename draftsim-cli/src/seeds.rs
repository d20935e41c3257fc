use anyhow::{Context, Result, bail};
use draftsim_engine::Position;

/// Parse a seed given as a decimal integer or a `0x`-prefixed hex literal.
///
/// Underscores are accepted as digit separators in either form.
pub fn parse_seed(token: &str) -> Result<u64> {
    let cleaned: String = token.trim().chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        bail!("empty seed");
    }

    if let Some(hex) = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        return u64::from_str_radix(hex, 16)
            .with_context(|| format!("invalid hex seed: {token}"));
    }

    cleaned
        .parse::<u64>()
        .with_context(|| format!("unrecognized seed token: {token}"))
}

/// Parse a position abbreviation, ignoring case.
pub fn parse_position(token: &str) -> Result<Position> {
    let code = token.trim().to_ascii_uppercase();
    match Position::from_code(&code) {
        Some(position) => Ok(position),
        None => bail!(
            "unknown position {token:?} (expected one of {})",
            Position::ALL.map(Position::code).join(", ")
        ),
    }
}
