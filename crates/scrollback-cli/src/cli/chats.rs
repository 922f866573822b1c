//! `scrollback chats`: list chats known to the surface.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use crate::state::AppState;

pub fn list_chats(state: &AppState, json: bool) -> Result<()> {
    let chats = state.surface().chats();

    if json {
        println!("{}", serde_json::to_string_pretty(&chats)?);
        return Ok(());
    }

    if chats.is_empty() {
        println!();
        println!("  {} The snapshot contains no chats.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Chat").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Pages").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Container").fg(Color::White),
        Cell::new("Store").fg(Color::White),
    ]);

    let yes_no = |ok: bool| {
        if ok {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Red)
        }
    };

    for chat in &chats {
        table.add_row(vec![
            Cell::new(chat.handle.as_str()).fg(Color::Cyan),
            Cell::new(chat.name.as_deref().unwrap_or("-")),
            Cell::new(format!("{}/{}", chat.revealed_pages, chat.pages)).fg(Color::DarkGrey),
            Cell::new(chat.messages.to_string()),
            yes_no(chat.has_container),
            yes_no(chat.store_available),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} chat{}",
        style(chats.len()).bold(),
        if chats.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
