use std::{fs, io, path::{Path, PathBuf}};

use tracing::{debug, info};

pub mod cards;
pub mod classify;
pub mod config;
pub mod error;
pub mod forge;
pub mod parsing;
pub mod stats;

use cards::DeckRecord;
use classify::Classification;
use config::Config;
use error::{ConvertError, Result};

/// Sample Moxfield text export used by `--demo`.
pub const DEMO_DECK: &str = "
1 Kaalia of the Vast (MH3) 290
1 Akroma's Will (CMR) 3
1 Lightning Greaves (C15) 257
1 Sol Ring (MIC) 162
1 Command Tower (LCC) 325
";

/// A parsed deck together with its classification and Forge rendering.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub deck: DeckRecord,
    pub classification: Classification,
    pub forge: String,
}

impl Conversion {
    pub fn from_deck(mut deck: DeckRecord, name: Option<String>, config: &Config) -> Conversion {
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            deck.name = Some(name);
        }
        if deck.name.is_none() {
            deck.name = Some(config.default_deck_name.clone());
        }
        let classification = classify::classify(&deck);
        let forge = forge::render(&deck, &classification);
        Conversion {
            deck,
            classification,
            forge,
        }
    }

    pub fn stats(&self) -> stats::DeckStats {
        stats::DeckStats::new(&self.deck, &self.classification)
    }
}

pub fn load(path: &Path) -> Result<String> {
    debug!("reading {}", path.display());
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConvertError::FileNotFound(path.to_path_buf()),
        _ => ConvertError::io(path, e),
    })
}

pub fn write_output(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|e| ConvertError::io(path, e))?;
    info!("wrote {}", path.display());
    Ok(())
}

pub fn convert_text(raw: &str, name: Option<String>, config: &Config) -> Result<Conversion> {
    Ok(Conversion::from_deck(parsing::parse(raw)?, name, config))
}

/// Runs the demo sample through the text parser.
pub fn convert_demo(name: Option<String>) -> Conversion {
    Conversion::from_deck(parsing::parse_text(DEMO_DECK), name, &Config::default())
}

pub fn convert_file(input: &Path, output: &Path, name: Option<String>, config: &Config) -> Result<Conversion> {
    let raw = load(input)?;
    let conversion = convert_text(&raw, name, config)?;
    write_output(output, &conversion.forge)?;
    Ok(conversion)
}

/// Output path next to the input: `.txt` and `.json` are swapped for the
/// configured extension, anything else gets it appended.
pub fn default_output_path(input: &Path, extension: &str) -> PathBuf {
    match input.extension().and_then(|e| e.to_str()) {
        Some("txt") | Some("json") => input.with_extension(extension),
        _ => {
            let mut path = input.as_os_str().to_owned();
            path.push(".");
            path.push(extension);
            PathBuf::from(path)
        }
    }
}

/// Converts `input` into `output` and reports the outcome on the console
/// instead of returning it.
pub fn convert_and_report(input: &Path, output: &Path) {
    match convert_file(input, output, None, &Config::default()) {
        Ok(_) => println!("Successfully converted deck to {}", output.display()),
        Err(e @ ConvertError::FileNotFound(_)) => println!("Error: {}", e),
        Err(e) => println!("Error during conversion: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_round_trip() {
        let conversion = convert_demo(None);
        assert!(!conversion.classification.is_singleton_format);
        assert_eq!(
            conversion.forge,
            "[metadata]\nName=Converted Deck\n[Main]\n\
             1 Kaalia of the Vast|MH3|[290]\n\
             1 Akroma's Will|CMR|[3]\n\
             1 Lightning Greaves|C15|[257]\n\
             1 Sol Ring|MIC|[162]\n\
             1 Command Tower|LCC|[325]"
        );
    }

    #[test]
    fn name_override_wins() {
        let config = Config::default();
        let conversion = convert_text(r#"{"name": "Old", "mainboard": {"Forest": {"quantity": 1}}}"#, Some("New".into()), &config).unwrap();
        assert_eq!(conversion.deck.name.as_deref(), Some("New"));
        assert!(conversion.forge.starts_with("[metadata]\nName=New\n"));
    }

    #[test]
    fn configured_default_name() {
        let config = Config {
            default_deck_name: "Imported".to_string(),
            ..Config::default()
        };
        let conversion = convert_text("1 Sol Ring", None, &config).unwrap();
        assert!(conversion.forge.starts_with("[metadata]\nName=Imported\n"));
    }

    #[test]
    fn empty_name_override_is_ignored() {
        let config = Config::default();
        let conversion = convert_text(r#"{"name": "Kept", "mainboard": {}}"#, Some(String::new()), &config).unwrap();
        assert_eq!(conversion.deck.name.as_deref(), Some("Kept"));
        let demo = convert_demo(Some(String::new()));
        assert!(demo.forge.starts_with("[metadata]\nName=Converted Deck\n"));
    }

    #[test]
    fn output_paths() {
        assert_eq!(default_output_path(Path::new("decks/kaalia.txt"), "dck"), PathBuf::from("decks/kaalia.dck"));
        assert_eq!(default_output_path(Path::new("kaalia.json"), "dck"), PathBuf::from("kaalia.dck"));
        assert_eq!(default_output_path(Path::new("kaalia.deck"), "dck"), PathBuf::from("kaalia.deck.dck"));
        assert_eq!(default_output_path(Path::new("kaalia"), "dck"), PathBuf::from("kaalia.dck"));
    }

    #[test]
    fn missing_input() {
        let err = load(Path::new("test_files/does_not_exist.txt")).unwrap_err();
        assert!(matches!(err, ConvertError::FileNotFound(_)));
        assert_eq!(err.to_string(), "Input file 'test_files/does_not_exist.txt' not found");
    }
}
