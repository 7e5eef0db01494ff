use std::fmt;

use crate::{cards::DeckRecord, classify::Classification};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SectionCount {
    pub unique: usize,
    pub total: u64,
}

impl fmt::Display for SectionCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} unique cards, {} total cards", self.unique, self.total)
    }
}

/// Card counts per output section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckStats {
    Commander {
        main: SectionCount,
        sideboard: Option<SectionCount>,
    },
    Regular {
        main: SectionCount,
        sideboard: Option<SectionCount>,
    },
}

impl DeckStats {
    pub fn new(deck: &DeckRecord, classification: &Classification) -> DeckStats {
        let main = SectionCount {
            unique: deck.main.len(),
            total: deck.main.total_quantity(),
        };
        let sideboard = (!deck.side.is_empty()).then(|| SectionCount {
            unique: deck.side.len(),
            total: deck.side.total_quantity(),
        });

        match deck.main.first() {
            Some(commander) if classification.is_singleton_format => DeckStats::Commander {
                main: SectionCount {
                    unique: main.unique - 1,
                    total: main.total - u64::from(commander.quantity),
                },
                sideboard,
            },
            _ => DeckStats::Regular { main, sideboard },
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let (mut lines, sideboard) = match self {
            DeckStats::Commander { main, sideboard } => (
                vec![
                    "Format: Commander/EDH deck (100 cards)".to_string(),
                    "Commander: 1 card".to_string(),
                    format!("Main deck: {}", main),
                ],
                sideboard,
            ),
            DeckStats::Regular { main, sideboard } => (vec![format!("Mainboard: {}", main)], sideboard),
        };
        if let Some(side) = sideboard {
            lines.push(format!("Sideboard: {}", side));
        }
        lines
    }

    pub fn print(&self) {
        println!("Deck statistics:");
        for line in self.lines() {
            println!("  {}", line);
        }
    }
}

#[test]
fn regular_stats() {
    let deck = crate::parsing::parse_text("4 Forest\n2 Llanowar Elves\nSideboard\n3 Naturalize\n");
    let stats = DeckStats::new(&deck, &Classification { is_singleton_format: false });
    assert_eq!(
        stats.lines(),
        ["Mainboard: 2 unique cards, 6 total cards", "Sideboard: 1 unique cards, 3 total cards"]
    );
}

#[test]
fn commander_stats_exclude_commander() {
    let deck = crate::parsing::parse_text("1 Kaalia of the Vast\n1 Sol Ring\n98 Plains\n");
    let stats = DeckStats::new(&deck, &Classification { is_singleton_format: true });
    assert_eq!(
        stats,
        DeckStats::Commander {
            main: SectionCount { unique: 2, total: 99 },
            sideboard: None,
        }
    );
    assert_eq!(stats.lines()[2], "Main deck: 2 unique cards, 99 total cards");
}
