//! Writer for Forge `.dck` deck files.

use itertools::Itertools;

use crate::{cards::{CardEntry, DeckRecord}, classify::Classification};

pub const DEFAULT_DECK_NAME: &str = "Converted Deck";

const METADATA_HEADER: &str = "[metadata]";
const COMMANDER_HEADER: &str = "[Commander]";
const MAIN_HEADER: &str = "[Main]";
const SIDEBOARD_HEADER: &str = "[Sideboard]";

const SPLIT_CARD_SEPARATOR: &str = " / ";

/// Forge has no separate promo editions: a four letter code starting with
/// `P` maps to the code without the `P`.
pub fn normalize_set_code(set_code: &str) -> &str {
    match set_code.strip_prefix('P') {
        Some(rest) if set_code.chars().count() == 4 => rest,
        _ => set_code,
    }
}

/// Front face of a split or double-faced card name.
pub fn front_face(name: &str) -> &str {
    name.split_once(SPLIT_CARD_SEPARATOR)
        .map_or(name, |(front, _)| front)
}

/// `<qty> <name>[|<set>[|[<collector>]]][ <markers>]`
pub fn card_line(name: &str, card: &CardEntry) -> String {
    let mut line = format!("{} {}", card.quantity, name);
    if let Some(set_code) = &card.set_code {
        line.push('|');
        line.push_str(normalize_set_code(set_code));
        if let Some(collector_number) = &card.collector_number {
            line.push_str(&format!("|[{}]", collector_number));
        }
    }
    if let Some(markers) = card.special_markers.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        line.push(' ');
        line.push_str(markers);
    }
    line
}

pub fn render(deck: &DeckRecord, classification: &Classification) -> String {
    let mut lines = vec![
        METADATA_HEADER.to_string(),
        format!("Name={}", deck.name.as_deref().unwrap_or(DEFAULT_DECK_NAME)),
    ];

    let main: Vec<String> = deck
        .main
        .iter()
        .map(|card| card_line(front_face(&card.name), card))
        .collect();

    match main.split_first() {
        Some((commander, rest)) if classification.is_singleton_format => {
            lines.push(COMMANDER_HEADER.to_string());
            lines.push(commander.clone());
            lines.push(MAIN_HEADER.to_string());
            lines.extend_from_slice(rest);
        }
        _ => {
            lines.push(MAIN_HEADER.to_string());
            lines.extend(main);
        }
    }

    if !deck.side.is_empty() {
        lines.push(SIDEBOARD_HEADER.to_string());
        lines.extend(deck.side.iter().map(|card| card_line(&card.name, card)));
    }

    lines.iter().join("\n")
}
