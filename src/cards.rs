use std::{collections::HashMap, fmt};

use serde::{de::{Error, MapAccess, Unexpected, Visitor}, Deserialize, Deserializer};
use serde_json::Value;

/// Which of the two card groups a line or entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Board {
    Main,
    Side,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardEntry {
    pub name: String,
    pub quantity: u32,
    pub set_code: Option<String>,
    pub collector_number: Option<String>,
    pub special_markers: Option<String>,
}

impl CardEntry {
    pub fn new(name: String, quantity: u32) -> CardEntry {
        CardEntry {
            name,
            quantity,
            set_code: None,
            collector_number: None,
            special_markers: None,
        }
    }

    pub fn with_printing(
        name: String,
        quantity: u32,
        set_code: Option<String>,
        collector_number: Option<String>,
        special_markers: Option<String>,
    ) -> CardEntry {
        CardEntry {
            name,
            quantity,
            set_code: non_empty(set_code),
            collector_number: non_empty(collector_number),
            special_markers: non_empty(special_markers),
        }
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Card name -> entry, iterated in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardGroup {
    entries: Vec<CardEntry>,
    index: HashMap<String, usize>,
}

impl CardGroup {
    pub fn new() -> CardGroup {
        CardGroup::default()
    }

    /// Adds an entry, or folds its quantity into the existing entry of the same
    /// name. The first entry's printing data is kept. Quantities saturate at
    /// `u32::MAX`.
    pub fn add(&mut self, entry: CardEntry) {
        if let Some(&i) = self.index.get(&entry.name) {
            let existing = &mut self.entries[i];
            existing.quantity = existing.quantity.saturating_add(entry.quantity);
        } else {
            self.index.insert(entry.name.clone(), self.entries.len());
            self.entries.push(entry);
        }
    }

    /// Stores an entry, overwriting any entry of the same name in place.
    pub fn insert(&mut self, entry: CardEntry) {
        match self.index.get(&entry.name) {
            Some(&i) => self.entries[i] = entry,
            None => self.add(entry),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<CardEntry> {
        let i = self.index.remove(name)?;
        let entry = self.entries.remove(i);
        for later in &self.entries[i..] {
            if let Some(pos) = self.index.get_mut(&later.name) {
                *pos -= 1;
            }
        }
        Some(entry)
    }

    pub fn get(&self, name: &str) -> Option<&CardEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CardEntry> {
        self.entries.iter()
    }

    pub fn first(&self) -> Option<&CardEntry> {
        self.entries.first()
    }

    /// Number of distinct card names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }
}

impl<'a> IntoIterator for &'a CardGroup {
    type Item = &'a CardEntry;
    type IntoIter = std::slice::Iter<'a, CardEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<CardEntry> for CardGroup {
    fn from_iter<I: IntoIterator<Item = CardEntry>>(iter: I) -> CardGroup {
        let mut group = CardGroup::new();
        for entry in iter {
            group.add(entry);
        }
        group
    }
}

/// A card object as it appears in a structured deck document. Exports are
/// loose about types, so text fields also take numbers and booleans.
#[derive(Deserialize)]
struct StructuredCard {
    #[serde(default = "one", deserialize_with = "loose_quantity")]
    quantity: i64,
    #[serde(default, deserialize_with = "loose_text")]
    set: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    collector_number: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    special_markers: Option<String>,
}

fn one() -> i64 {
    1
}

fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) => Err(D::Error::invalid_type(Unexpected::Seq, &"a string or number")),
        Value::Object(_) => Err(D::Error::invalid_type(Unexpected::Map, &"a string or number")),
    }
}

fn loose_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let quantity = match &value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    quantity.ok_or_else(|| D::Error::invalid_value(Unexpected::Other(&value.to_string()), &"an integer quantity"))
}

fn loose_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    loose_text(deserializer)
}

fn nullable_group<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CardGroup, D::Error> {
    Ok(Option::<CardGroup>::deserialize(deserializer)?.unwrap_or_default())
}

struct CardGroupVisitor;

impl<'de> Visitor<'de> for CardGroupVisitor {
    type Value = CardGroup;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of card names to card objects")
    }

    /// A repeated key replaces the earlier card. Cards whose quantity is not a
    /// positive `u32` are left out.
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<CardGroup, A::Error> {
        let mut group = CardGroup::new();
        while let Some((name, card)) = map.next_entry::<String, StructuredCard>()? {
            let quantity = match u32::try_from(card.quantity) {
                Ok(q) if q > 0 => q,
                _ => {
                    group.remove(&name);
                    continue;
                }
            };
            group.insert(CardEntry::with_printing(
                name,
                quantity,
                card.set,
                card.collector_number,
                card.special_markers,
            ));
        }
        Ok(group)
    }
}

impl<'de> Deserialize<'de> for CardGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<CardGroup, D::Error> {
        deserializer.deserialize_map(CardGroupVisitor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeckRecord {
    #[serde(default, deserialize_with = "loose_name")]
    pub name: Option<String>,
    #[serde(default, rename = "mainboard", deserialize_with = "nullable_group")]
    pub main: CardGroup,
    #[serde(default, rename = "sideboard", deserialize_with = "nullable_group")]
    pub side: CardGroup,
}

impl DeckRecord {
    pub fn new(name: Option<String>, main: CardGroup, side: CardGroup) -> DeckRecord {
        DeckRecord {
            name,
            main,
            side,
        }
    }

    pub fn board_mut(&mut self, board: Board) -> &mut CardGroup {
        match board {
            Board::Main => &mut self.main,
            Board::Side => &mut self.side,
        }
    }

    pub fn total_quantity(&self) -> u64 {
        self.main.total_quantity() + self.side.total_quantity()
    }
}
