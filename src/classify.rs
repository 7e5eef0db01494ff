use tracing::debug;

use crate::cards::DeckRecord;

pub const BASIC_LANDS: [&str; 5] = ["Plains", "Island", "Swamp", "Mountain", "Forest"];
pub const SINGLETON_DECK_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_singleton_format: bool,
}

pub fn is_basic_land(name: &str) -> bool {
    BASIC_LANDS.contains(&name)
}

/// A deck is singleton-format when both boards together hold exactly 100 cards
/// and no mainboard card other than a basic land has more than one copy.
/// Sideboard copies count toward the total but are not checked for singleton.
pub fn classify(deck: &DeckRecord) -> Classification {
    let total = deck.total_quantity();
    let is_singleton_format = total == SINGLETON_DECK_SIZE
        && deck
            .main
            .iter()
            .all(|card| card.quantity <= 1 || is_basic_land(&card.name));
    debug!(total, is_singleton_format, "classified deck");

    Classification { is_singleton_format }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardEntry, CardGroup, DeckRecord};

    fn singles(prefix: &str, count: u32) -> impl Iterator<Item = CardEntry> + '_ {
        (0..count).map(move |i| CardEntry::new(format!("{} {}", prefix, i), 1))
    }

    fn deck(main: impl Iterator<Item = CardEntry>, side: Vec<CardEntry>) -> DeckRecord {
        DeckRecord::new(None, main.collect(), side.into_iter().collect())
    }

    #[test]
    fn singleton_with_basics() {
        let main = singles("Card", 60)
            .chain([CardEntry::new("Forest".into(), 20), CardEntry::new("Mountain".into(), 15)]);
        let deck = deck(main, singles("Side", 5).collect());
        assert_eq!(deck.total_quantity(), 100);
        assert!(classify(&deck).is_singleton_format);
    }

    #[test]
    fn duplicate_nonbasic_disqualifies() {
        let main = singles("Card", 63)
            .chain([CardEntry::new("Sol Ring".into(), 2), CardEntry::new("Forest".into(), 35)]);
        let deck = deck(main, vec![]);
        assert_eq!(deck.total_quantity(), 100);
        assert!(!classify(&deck).is_singleton_format);
    }

    #[test]
    fn total_must_be_exactly_one_hundred() {
        let short = deck(singles("Card", 99), vec![]);
        let long = deck(singles("Card", 100), singles("Side", 1).collect());
        assert!(!classify(&short).is_singleton_format);
        assert!(!classify(&long).is_singleton_format);
    }

    #[test]
    fn sideboard_duplicates_are_not_checked() {
        let deck = deck(singles("Card", 97), vec![CardEntry::new("Counterspell".into(), 3)]);
        assert!(classify(&deck).is_singleton_format);
    }

    #[test]
    fn empty_deck() {
        let deck = DeckRecord::new(None, CardGroup::new(), CardGroup::new());
        assert!(!classify(&deck).is_singleton_format);
    }
}
