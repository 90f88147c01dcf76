//! Set grouping and YAML persistence: the interface boundary between the
//! canonicalization core and everything downstream (storage, scan
//! downloading, template generation).

use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use rustc_hash::FxHashMap;

use crate::models::{CanonicalCard, SetFile};

/// Card-number ordering: numeric when both sides parse, lexical otherwise
/// (promo numbers like "SM88" do not parse).
fn compare_numbers(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// Drop empty move damage/text left behind by older persisted files so
/// re-exports stay clean.
fn scrub(card: &mut CanonicalCard) {
    if let Some(moves) = &mut card.moves {
        for mv in moves {
            if mv.damage.as_deref() == Some("") {
                mv.damage = None;
            }
            if mv.text.as_deref() == Some("") {
                mv.text = None;
            }
        }
    }
}

/// Group cards into one `SetFile` per owning set, cards sorted by number,
/// sets in first-seen order so repeated runs emit identical output.
pub fn group_set_files(mut cards: Vec<CanonicalCard>) -> Result<Vec<SetFile>> {
    cards.sort_by(|a, b| compare_numbers(&a.number, &b.number));

    let mut files: Vec<SetFile> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    for card in cards {
        let set = card
            .set
            .clone()
            .ok_or_else(|| anyhow!("card {} has no owning set", card.id))?;
        let key = set.enum_id.clone();
        if let Some(i) = index.get(&key).copied() {
            files[i].cards.push(card);
        } else {
            index.insert(key, files.len());
            files.push(SetFile {
                set: (*set).clone(),
                cards: vec![card],
            });
        }
    }
    Ok(files)
}

/// Write one YAML file per set into `out_dir`, named
/// `{setId}-{enumId lowercased}.yaml`.
pub fn write_set_files(set_files: &[SetFile], out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
    for set_file in set_files {
        let mut clean = set_file.clone();
        for card in &mut clean.cards {
            scrub(card);
        }
        let filename = format!(
            "{}-{}.yaml",
            clean.set.id,
            clean.set.enum_id.to_lowercase()
        );
        let path = out_dir.join(&filename);
        let yaml = serde_yml::to_string(&clean)
            .with_context(|| format!("failed to serialize set {}", clean.set.enum_id))?;
        fs::write(&path, yaml)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Load a previously exported set file, re-linking every card to the
/// file's set descriptor.
pub fn read_set_file(path: &Path) -> Result<SetFile> {
    let yaml = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut set_file: SetFile = serde_yml::from_str(&yaml)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let set = Arc::new(set_file.set.clone());
    for card in &mut set_file.cards {
        card.set = Some(Arc::clone(&set));
    }
    Ok(set_file)
}

// ============================================================================
// Tests
// ============================================================================
