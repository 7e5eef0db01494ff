use std::sync::LazyLock;

use regex::Regex;
use serde::de::IgnoredAny;
use tracing::debug;

use crate::{cards::{Board, CardEntry, DeckRecord}, error::{ConvertError, Result}};

// "1 Luxury Suite (PCLB) 355s *F*": quantity, name, set, collector token, markers
static CARD_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s+(.+?)\s*\(([^)]+)\)\s*(\S*)\s*(.*?)$").unwrap()
});
// "4 Lightning Bolt"
static BARE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\s+(.+)$").unwrap());

const COMMENT_MARKER: &str = "//";
const SIDEBOARD_MARKERS: [&str; 2] = ["sideboard", "side board"];

/// Parses a deck export. A structured (JSON) document is taken as-is; anything
/// that is not JSON is read as a line-oriented list. JSON that does not have
/// the deck record shape is an error.
pub fn parse(raw: &str) -> Result<DeckRecord> {
    if serde_json::from_str::<IgnoredAny>(raw).is_err() {
        debug!("input is not JSON, reading it as a text list");
        return Ok(parse_text(raw));
    }
    let deck: DeckRecord = serde_json::from_str(raw).map_err(ConvertError::DeckShape)?;
    debug!(main = deck.main.len(), side = deck.side.len(), "parsed structured deck");
    Ok(deck)
}

pub fn parse_text(text: &str) -> DeckRecord {
    let mut deck = DeckRecord::default();
    let mut board = Board::Main;

    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }
        if is_sideboard_marker(line) {
            board = Board::Side;
            continue;
        }
        if let Some(entry) = parse_card_line(line) {
            deck.board_mut(board).add(entry);
        }
    }

    deck
}

fn is_sideboard_marker(line: &str) -> bool {
    let lower = line.to_lowercase();
    SIDEBOARD_MARKERS.contains(&lower.as_str())
}

/// Reads one trimmed card line. Lines matching neither form, or with a zero or
/// out-of-range quantity, yield `None`.
pub fn parse_card_line(line: &str) -> Option<CardEntry> {
    if let Some(caps) = CARD_LINE_RE.captures(line) {
        let quantity = parse_quantity(&caps[1])?;
        return Some(CardEntry::with_printing(
            caps[2].trim().to_string(),
            quantity,
            Some(caps[3].to_string()),
            caps.get(4).map(|m| m.as_str().to_string()),
            caps.get(5).map(|m| m.as_str().to_string()),
        ));
    }

    let caps = BARE_LINE_RE.captures(line)?;
    let quantity = parse_quantity(&caps[1])?;
    Some(CardEntry::new(caps[2].trim().to_string(), quantity))
}

fn parse_quantity(digits: &str) -> Option<u32> {
    digits.parse().ok().filter(|&q| q > 0)
}

#[test]
fn full_card_line() {
    let entry = parse_card_line("1 Luxury Suite (PCLB) 355s *F*").unwrap();
    assert_eq!(
        entry,
        CardEntry::with_printing(
            "Luxury Suite".to_string(),
            1,
            Some("PCLB".to_string()),
            Some("355s".to_string()),
            Some("*F*".to_string()),
        )
    );
}

#[test]
fn set_without_collector_number() {
    let entry = parse_card_line("2 Arcane Signet (M3C)").unwrap();
    assert_eq!(entry.name, "Arcane Signet");
    assert_eq!(entry.quantity, 2);
    assert_eq!(entry.set_code.as_deref(), Some("M3C"));
    assert_eq!(entry.collector_number, None);
    assert_eq!(entry.special_markers, None);
}

#[test]
fn bare_card_line() {
    let entry = parse_card_line("4 Lightning Bolt").unwrap();
    assert_eq!(entry, CardEntry::new("Lightning Bolt".to_string(), 4));
}

#[test]
fn name_stops_at_first_parenthesis() {
    let entry = parse_card_line("1 Foo (Bar) Baz (SET) 12").unwrap();
    assert_eq!(entry.name, "Foo");
    assert_eq!(entry.set_code.as_deref(), Some("Bar"));
    assert_eq!(entry.collector_number.as_deref(), Some("Baz"));
    assert_eq!(entry.special_markers.as_deref(), Some("(SET) 12"));
}

#[test]
fn unmatched_lines_are_dropped() {
    assert_eq!(parse_card_line("Lightning Bolt"), None);
    assert_eq!(parse_card_line("0 Lightning Bolt"), None);
    assert_eq!(parse_card_line("-1 Lightning Bolt"), None);
    assert_eq!(parse_card_line("99999999999 Lightning Bolt"), None);
    assert_eq!(parse_card_line("4"), None);
}

#[test]
fn split_names_are_kept_whole() {
    let entry = parse_card_line("1 Fire / Ice (MH2) 290").unwrap();
    assert_eq!(entry.name, "Fire / Ice");
}

#[test]
fn sideboard_switch_and_comments() {
    let deck = parse_text(
        "// Deck\n\n4 Forest\n1 Sol Ring (MIC) 162\n  SIDE BOARD  \n2 Duress (M21) 96\nnot a card\n3 Forest\n",
    );
    assert_eq!(deck.name, None);
    assert_eq!(deck.main.len(), 2);
    assert_eq!(deck.main.get("Forest").unwrap().quantity, 4);
    assert_eq!(deck.side.len(), 2);
    assert_eq!(deck.side.get("Forest").unwrap().quantity, 3);
    assert_eq!(deck.side.get("Duress").unwrap().set_code.as_deref(), Some("M21"));
}

#[test]
fn repeated_lines_merge() {
    let deck = parse_text("4 Forest\n1 Sol Ring (MIC) 162\n3 Forest\n1 Sol Ring (C21) 263\n");
    assert_eq!(deck.main.get("Forest").unwrap().quantity, 7);
    let sol_ring = deck.main.get("Sol Ring").unwrap();
    assert_eq!(sol_ring.quantity, 2);
    assert_eq!(sol_ring.set_code.as_deref(), Some("MIC"));
    assert_eq!(sol_ring.collector_number.as_deref(), Some("162"));
}

#[test]
fn structured_input() {
    let deck = parse(
        r#"{
            "name": "Gruul Stompy",
            "mainboard": {
                "Ghalta, Primal Hunger": {"quantity": 1, "set": "RIX", "collector_number": "130"},
                "Forest": {"quantity": 12},
                "Llanowar Elves": {}
            },
            "sideboard": {
                "Fire / Ice": {"quantity": 1, "set": "MH2", "special_markers": "*F*"}
            }
        }"#,
    ).unwrap();
    assert_eq!(deck.name.as_deref(), Some("Gruul Stompy"));
    let names: Vec<_> = deck.main.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Ghalta, Primal Hunger", "Forest", "Llanowar Elves"]);
    assert_eq!(deck.main.get("Llanowar Elves").unwrap().quantity, 1);
    assert_eq!(deck.main.total_quantity(), 14);
    let fire_ice = deck.side.get("Fire / Ice").unwrap();
    assert_eq!(fire_ice.special_markers.as_deref(), Some("*F*"));
    assert_eq!(fire_ice.collector_number, None);
}

#[test]
fn structured_input_without_boards() {
    let deck = parse(r#"{"name": "Empty", "sideboard": null}"#).unwrap();
    assert_eq!(deck.name.as_deref(), Some("Empty"));
    assert!(deck.main.is_empty());
    assert!(deck.side.is_empty());
}

#[test]
fn structured_numbers_are_text() {
    let deck = parse(
        r#"{"name": 5, "mainboard": {"Sol Ring": {"quantity": "2", "set": "MIC", "collector_number": 162, "special_markers": true}}}"#,
    ).unwrap();
    assert_eq!(deck.name.as_deref(), Some("5"));
    let sol_ring = deck.main.get("Sol Ring").unwrap();
    assert_eq!(sol_ring.quantity, 2);
    assert_eq!(sol_ring.set_code.as_deref(), Some("MIC"));
    assert_eq!(sol_ring.collector_number.as_deref(), Some("162"));
    assert_eq!(sol_ring.special_markers.as_deref(), Some("true"));
}

#[test]
fn structured_non_positive_quantities_are_dropped() {
    let deck = parse(
        r#"{"mainboard": {"Forest": {"quantity": -1}, "Island": {"quantity": 0}, "Swamp": {"quantity": 4294967296}, "Plains": {"quantity": 3}}}"#,
    ).unwrap();
    assert_eq!(deck.main.len(), 1);
    assert_eq!(deck.main.get("Plains").unwrap().quantity, 3);
}

#[test]
fn structured_repeated_key_keeps_last() {
    let deck = parse(
        r#"{"mainboard": {
            "Sol Ring": {"quantity": 1, "set": "MIC"},
            "Forest": {"quantity": 4},
            "Sol Ring": {"quantity": 2, "set": "C21"},
            "Forest": {"quantity": 0}
        }}"#,
    ).unwrap();
    let names: Vec<_> = deck.main.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Sol Ring"]);
    let sol_ring = deck.main.get("Sol Ring").unwrap();
    assert_eq!(sol_ring.quantity, 2);
    assert_eq!(sol_ring.set_code.as_deref(), Some("C21"));
}

#[test]
fn misshaped_json_is_an_error() {
    assert!(matches!(parse("[1, 2, 3]"), Err(ConvertError::DeckShape(_))));
    assert!(matches!(parse(r#"{"mainboard": {"Sol Ring": {"set": ["MIC"]}}}"#), Err(ConvertError::DeckShape(_))));
    assert!(matches!(parse(r#"{"mainboard": {"Sol Ring": {"quantity": 1.5}}}"#), Err(ConvertError::DeckShape(_))));
}

#[test]
fn malformed_json_is_read_as_text() {
    let deck = parse("{\n4 Forest\n").unwrap();
    assert_eq!(deck.main.get("Forest").unwrap().quantity, 4);
}

#[test]
fn huge_quantities_saturate() {
    let deck = parse_text("4000000000 Forest\n4000000000 Forest\n4000000000 Island\n");
    assert_eq!(deck.main.get("Forest").unwrap().quantity, u32::MAX);
    assert_eq!(deck.main.total_quantity(), u64::from(u32::MAX) + 4_000_000_000);
}
