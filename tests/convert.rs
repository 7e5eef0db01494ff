use moxforge::{config::Config, convert_file, error::ConvertError, stats::{DeckStats, SectionCount}};

use std::{fs::{read_to_string, remove_file}, panic, path::Path};

#[macro_use]
extern crate macro_rules_attribute;

// each test writes <test name>.dck and it is removed afterwards, pass or fail
macro_rules! convert_test {(
    fn $fname:ident ()
    $body: block
) => {
    #[test]
    fn $fname () {
        fn __original_func__ ()
        $body

        let file_name = format!("{}.dck", stringify!($fname));
        let result = panic::catch_unwind(|| {
            __original_func__();
        });
        let _ = remove_file(&file_name);
        if let Err(e) = result {
            panic::resume_unwind(e);
        }
    }
}}

#[macro_rules_attribute(convert_test)]
fn text_deck() {
    let conversion = convert_file(
        Path::new("test_files/gruul.txt"),
        Path::new("text_deck.dck"),
        None,
        &Config::default(),
    ).unwrap();

    assert!(!conversion.classification.is_singleton_format);
    assert_eq!(conversion.deck.main.total_quantity(), 23);
    assert_eq!(
        read_to_string("text_deck.dck").unwrap(),
        "[metadata]
Name=Converted Deck
[Main]
4 Llanowar Elves|DOM|[168]
8 Lightning Bolt|2XM|[141]
2 Fire|MH2|[290]
6 Forest
3 Mountain|MKM|[283] *F*
[Sideboard]
2 Fire / Ice|MH2|[290]
3 Naturalize|M19|[190]"
    );
    assert_eq!(
        conversion.stats(),
        DeckStats::Regular {
            main: SectionCount { unique: 5, total: 23 },
            sideboard: Some(SectionCount { unique: 2, total: 5 }),
        }
    );
}

#[macro_rules_attribute(convert_test)]
fn json_deck() {
    let conversion = convert_file(
        Path::new("test_files/gruul.json"),
        Path::new("json_deck.dck"),
        None,
        &Config::default(),
    ).unwrap();

    assert!(!conversion.classification.is_singleton_format);
    assert_eq!(
        read_to_string("json_deck.dck").unwrap(),
        "[metadata]
Name=Gruul Stompy
[Main]
2 Ghalta, Primal Hunger|RIX|[130]
4 Llanowar Elves|DOM|[168]
1 Wear|DGM|[135] *F*
10 Forest
6 Mountain
[Sideboard]
2 Wear / Tear|DGM"
    );
}

#[macro_rules_attribute(convert_test)]
fn commander_deck() {
    let conversion = convert_file(
        Path::new("test_files/kaalia.txt"),
        Path::new("commander_deck.dck"),
        Some("Kaalia Angels".to_string()),
        &Config::default(),
    ).unwrap();

    assert!(conversion.classification.is_singleton_format);
    let written = read_to_string("commander_deck.dck").unwrap();
    let lines: Vec<_> = written.lines().collect();
    assert_eq!(
        &lines[..6],
        [
            "[metadata]",
            "Name=Kaalia Angels",
            "[Commander]",
            "1 Kaalia of the Vast|MH3|[290]",
            "[Main]",
            "1 Sol Ring|MIC|[1]",
        ]
    );
    assert!(lines.contains(&"1 Lightning Greaves|LST|[4]"));
    assert!(lines.contains(&"1 Fire|CMR|[59]"));
    assert_eq!(lines.last(), Some(&"11 Mountain|MH3|[308]"));
    assert!(!lines.contains(&"[Sideboard]"));

    let rendered_total: u64 = lines
        .iter()
        .filter(|l| !l.starts_with('[') && !l.starts_with("Name="))
        .map(|l| l.split(' ').next().unwrap().parse::<u64>().unwrap())
        .sum();
    assert_eq!(rendered_total, conversion.deck.main.total_quantity());
    assert_eq!(rendered_total, 100);

    assert_eq!(
        conversion.stats(),
        DeckStats::Commander {
            main: SectionCount { unique: 68, total: 99 },
            sideboard: None,
        }
    );
}

#[macro_rules_attribute(convert_test)]
fn missing_input() {
    let err = convert_file(
        Path::new("test_files/missing.txt"),
        Path::new("missing_input.dck"),
        None,
        &Config::default(),
    ).unwrap_err();

    assert!(matches!(err, ConvertError::FileNotFound(_)));
    assert!(!Path::new("missing_input.dck").exists());
}

#[macro_rules_attribute(convert_test)]
fn unwritable_output() {
    let err = convert_file(
        Path::new("test_files/gruul.txt"),
        Path::new("test_files/no_such_dir/unwritable_output.dck"),
        None,
        &Config::default(),
    ).unwrap_err();

    assert!(matches!(err, ConvertError::Io { .. }));
}

#[macro_rules_attribute(convert_test)]
fn loosely_typed_json_deck() {
    let conversion = convert_file(
        Path::new("test_files/loose.json"),
        Path::new("loosely_typed_json_deck.dck"),
        None,
        &Config::default(),
    ).unwrap();

    assert_eq!(
        read_to_string("loosely_typed_json_deck.dck").unwrap(),
        "[metadata]
Name=2024
[Main]
1 Sol Ring|C21|[263]
1 Arcane Signet|M3C|[264]"
    );
}

#[macro_rules_attribute(convert_test)]
fn misshaped_json_is_not_written() {
    let err = convert_file(
        Path::new("test_files/misshaped.json"),
        Path::new("misshaped_json_is_not_written.dck"),
        None,
        &Config::default(),
    ).unwrap_err();

    assert!(matches!(err, ConvertError::DeckShape(_)));
    assert!(!Path::new("misshaped_json_is_not_written.dck").exists());
}
