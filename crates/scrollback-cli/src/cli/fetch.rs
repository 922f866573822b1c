//! Retrieval CLI commands: fetch and probe.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use scrollback_core::surface::rendering::RenderingSurface;
use scrollback_types::chat::ChatHandle;
use scrollback_types::message::ChatMessage;
use scrollback_types::scroll::{ConvergenceOutcome, ConvergenceReport};
use scrollback_types::search::SearchOptions;

use crate::state::AppState;

const BODY_PREVIEW: usize = 60;

fn spinner(message: String, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

fn parse_chat(raw: &str) -> Result<ChatHandle> {
    raw.parse::<ChatHandle>()
        .with_context(|| format!("invalid chat handle '{raw}'"))
}

/// Scroll the chat to its origin and print its messages.
///
/// # Examples
///
/// ```bash
/// scrollback fetch 12345@c.us
/// scrollback fetch 12345@c.us --from-me true --json
/// ```
pub async fn fetch_messages(
    state: &AppState,
    chat: &str,
    from_me: Option<bool>,
    limit: Option<usize>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let chat = parse_chat(chat)?;
    let mut options = SearchOptions {
        from_me,
        ..SearchOptions::default()
    };
    if let Some(limit) = limit {
        options = options.with_limit(limit);
    }

    let spinner = spinner(format!("Loading history of {chat}..."), quiet || json);
    let retrieval = state
        .retriever
        .retrieve(&chat, &options)
        .await
        .with_context(|| format!("failed to retrieve messages for '{chat}'"))?;
    spinner.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&retrieval)?);
        return Ok(());
    }

    if quiet {
        return Ok(());
    }

    println!();
    print_convergence(&chat, &retrieval.convergence, retrieval.from_cache);

    if retrieval.messages.is_empty() {
        let reason = if retrieval.stats.store_available {
            "no messages matched"
        } else {
            "the surface exposes no message store for this chat"
        };
        println!();
        println!("  {} No messages: {reason}.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    println!();
    println!("{}", message_table(&retrieval.messages));
    println!();
    println!(
        "  {} message{} ({} filtered, {} dropped)",
        style(retrieval.messages.len()).bold(),
        if retrieval.messages.len() == 1 { "" } else { "s" },
        retrieval.stats.filtered_out,
        retrieval.stats.dropped,
    );
    println!();

    Ok(())
}

/// Run only the convergence scroller for a chat.
pub async fn probe(state: &AppState, chat: &str, json: bool, quiet: bool) -> Result<()> {
    let chat = parse_chat(chat)?;

    let spinner = spinner(format!("Scrolling {chat} to its origin..."), quiet || json);
    let (report, from_cache) = state
        .retriever
        .converge(&chat)
        .await
        .with_context(|| format!("failed to scroll '{chat}'"))?;
    spinner.finish_and_clear();

    if json {
        let body = serde_json::json!({
            "chat": chat,
            "surface": state.surface().name(),
            "from_cache": from_cache,
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if !quiet {
        println!();
        print_convergence(&chat, &report, from_cache);
        println!();
    }
    Ok(())
}

fn print_convergence(chat: &ChatHandle, report: &ConvergenceReport, from_cache: bool) {
    let outcome = match report.outcome {
        ConvergenceOutcome::Stable => style(report.outcome.to_string()).green(),
        ConvergenceOutcome::ContainerNotFound => style(report.outcome.to_string()).yellow(),
        ConvergenceOutcome::AttemptsExhausted => style(report.outcome.to_string()).red(),
    };

    println!(
        "  {} {} after {} attempt{} (extent {}){}",
        style(chat.as_str()).cyan().bold(),
        outcome,
        report.attempts,
        if report.attempts == 1 { "" } else { "s" },
        report.last_extent,
        if from_cache {
            style(" [cached]").dim().to_string()
        } else {
            String::new()
        },
    );
    if let Some(strategy) = &report.strategy {
        println!("  {} {}", style("container:").dim(), strategy);
    }
}

fn message_table(messages: &[ChatMessage]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("From").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Body").fg(Color::White),
    ]);

    for message in messages {
        let sender = if message.from_me {
            Cell::new("me").fg(Color::Green)
        } else {
            let from = message.author.as_deref().unwrap_or(&message.from);
            Cell::new(from).fg(Color::Cyan)
        };

        table.add_row(vec![
            Cell::new(message.timestamp.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
            sender,
            Cell::new(message.kind.to_string()).fg(Color::White),
            Cell::new(preview(&message.body)),
        ]);
    }

    table
}

fn preview(body: &str) -> String {
    let line = body.lines().next().unwrap_or_default();
    if line.chars().count() > BODY_PREVIEW {
        let cut: String = line.chars().take(BODY_PREVIEW - 3).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_char_boundary() {
        let body = "é".repeat(100);
        let shown = preview(&body);
        assert_eq!(shown.chars().count(), BODY_PREVIEW);
        assert!(shown.ends_with("..."));
    }

    #[test]
    fn preview_keeps_first_line_only() {
        assert_eq!(preview("hello\nworld"), "hello");
        assert_eq!(preview(""), "");
    }
}
