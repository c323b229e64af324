//! Plain-text deck lists.
//!
//! ```text
//! Deck: Lost Box
//!
//! Pokémon (2)
//! 2x Comfey (sv2 #79)
//!
//! Trainer (1)
//! 1x Iono (sv2 #185)
//! ```

use serde::{Deserialize, Serialize};

use super::Deck;

/// Player details for tournament registration lists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfo {
    pub name: String,
    pub dob: String,
    pub player_id: String,
    pub event_name: String,
    pub event_date: String,
}

/// The deck header followed by one block per non-empty category.
pub fn export_text(deck: &Deck) -> String {
    let mut lines = vec![format!("Deck: {}\n", deck.name)];
    for (supertype, stacks) in deck.by_category() {
        let count: u32 = stacks.iter().map(|stack| stack.quantity).sum();
        lines.push(format!("{} ({})", supertype, count));
        for stack in stacks {
            lines.push(format!(
                "{}x {} ({} #{})",
                stack.quantity,
                stack.card.name,
                stack.card.set_id().unwrap_or(""),
                stack.card.number
            ));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// [`export_text`] preceded by the player block.
pub fn export_event_text(deck: &Deck, player: &PlayerInfo) -> String {
    let header = [
        format!("Player Name: {}", player.name),
        format!("DOB: {}", player.dob),
        format!("Player ID: {}", player.player_id),
        format!("Event: {}", player.event_name),
        format!("Date: {}", player.event_date),
        String::new(),
    ];
    header.join("\n") + &export_text(deck)
}

/// File name for an exported deck: `{name}.txt`, or `deck.txt` when unnamed.
pub fn export_file_name(deck: &Deck) -> String {
    let name = deck.name.trim();
    if name.is_empty() {
        "deck.txt".to_string()
    } else {
        format!("{}.txt", name)
    }
}
