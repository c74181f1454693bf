mod ask;
mod config;
mod dashboard;
mod logs;
mod manage;
mod open;
mod search;
mod upload;

use crate::api::Notice;
use crate::state::Context;
use crate::views::SessionKey;

/// Knowledge base admin dashboard
#[poise::command(
    slash_command,
    subcommands(
        "dashboard::dashboard",
        "logs::logs",
        "logs::inspect",
        "search::search",
        "ask::ask",
        "open::open",
        "upload::upload",
        "manage::reset",
        "config::config"
    )
)]
pub async fn kb(_ctx: Context<'_>) -> Result<(), anyhow::Error> {
    Ok(())
}

/// View sessions are per user per channel.
fn session_key(ctx: &Context<'_>) -> SessionKey {
    SessionKey {
        channel_id: ctx.channel_id().get(),
        user_id: ctx.author().id.get(),
    }
}

/// Prefix any notices to `body`.
fn with_notices(notices: &[Notice], body: &str) -> String {
    let mut out = String::new();
    for notice in notices {
        out.push_str(&notice.to_string());
        out.push('\n');
    }
    if !notices.is_empty() {
        out.push('\n');
    }
    out.push_str(body);
    out
}

/// Send a message in Discord-safe chunks (max 1990 chars).
/// Uses ctx.say() for all chunks — poise routes follow-ups through the
/// interaction webhook, which doesn't require Send Messages channel permission.
async fn send_chunked(ctx: &Context<'_>, text: &str) -> Result<(), anyhow::Error> {
    for chunk in split_chunks(text, 1990) {
        ctx.say(chunk).await?;
    }
    Ok(())
}

const FENCE: &str = "```";

/// Split `text` into messages of at most `max` bytes. A code block cut
/// across a boundary is closed at the end of one chunk and reopened at the
/// start of the next, so every chunk carries balanced fences.
fn split_chunks(text: &str, max: usize) -> Vec<String> {
    // Room for a reopening "```\n" and a closing "\n```".
    let budget = max.saturating_sub(2 * (FENCE.len() + 1)).max(1);

    let mut chunks = Vec::new();
    let mut in_fence = false;
    for piece in split_raw(text, budget) {
        let mut chunk = String::with_capacity(piece.len() + 2 * (FENCE.len() + 1));
        if in_fence {
            chunk.push_str(FENCE);
            chunk.push('\n');
        }
        chunk.push_str(piece);
        if piece.matches(FENCE).count() % 2 == 1 {
            in_fence = !in_fence;
        }
        if in_fence {
            if !chunk.ends_with('\n') {
                chunk.push('\n');
            }
            chunk.push_str(FENCE);
        }
        chunks.push(chunk);
    }
    chunks
}

/// Split on line (then word) boundaries so no piece exceeds `max` bytes.
fn split_raw(text: &str, max: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut remaining = text;
    while !remaining.is_empty() {
        let mut chunk_len = remaining.len().min(max);
        while !remaining.is_char_boundary(chunk_len) {
            chunk_len -= 1;
        }
        // A single multi-byte char wider than `max` still has to go somewhere.
        if chunk_len == 0 {
            chunk_len = remaining
                .char_indices()
                .nth(1)
                .map(|(i, _)| i)
                .unwrap_or(remaining.len());
        }
        let split_at = if chunk_len < remaining.len() {
            remaining[..chunk_len]
                .rfind('\n')
                .or_else(|| remaining[..chunk_len].rfind(' '))
                .map(|i| i + 1)
                .unwrap_or(chunk_len)
        } else {
            chunk_len
        };
        chunks.push(&remaining[..split_at]);
        remaining = &remaining[split_at..];
    }
    chunks
}
