mod article;
mod preview;

use anyhow::Context as _;

use crate::{Context, Error};
use article::article;
use preview::{error, info, success};

#[poise::command(
    slash_command,
    rename = "embed",
    subcommands("info", "error", "success", "article")
)]
pub async fn embed_command(_: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Accepts `3498db`, `#3498db` or `0x3498db` (any case).
pub fn parse_hex_color(raw: &str) -> Result<u32, Error> {
    let trimmed = raw.trim();
    let digits = match trimmed.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("0x") => &trimmed[2..],
        _ => trimmed.strip_prefix('#').unwrap_or(trimmed),
    };

    anyhow::ensure!(
        !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()),
        "invalid color `{raw}`"
    );
    let color = u32::from_str_radix(digits, 16)
        .with_context(|| format!("invalid color `{raw}`"))?;
    anyhow::ensure!(color <= 0xffffff, "color `{raw}` is out of range");
    Ok(color)
}
