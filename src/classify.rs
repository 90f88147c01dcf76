//! Subtype classification: raw supertype/subtype strings, the card name,
//! and evolution linkage become the canonical tag set.
//!
//! Classification is stateful and order-sensitive: "Stage 1" names are
//! recorded into the [`StageRegistry`] as they are seen, and later "EX"
//! records consult it to decide between STAGE1 and STAGE2. Records must
//! therefore be classified in input order, one at a time.

use std::collections::BTreeSet;

use anyhow::{bail, Result};
use rustc_hash::FxHashSet;

use crate::models::{SubType, SuperType};

// ============================================================================
// Stage Registry
// ============================================================================

/// Run-scoped, append-only record of names observed at Stage 1.
///
/// Owned by the caller and threaded through classification explicitly so
/// separate runs (and tests) never share state.
#[derive(Debug, Default)]
pub struct StageRegistry {
    names: FxHashSet<String>,
}

impl StageRegistry {
    pub fn new() -> Self {
        Self {
            names: FxHashSet::default(),
        }
    }

    /// Record a name that reached Stage 1 classification.
    pub fn record(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    /// Whether a name has been seen at Stage 1 earlier in this run.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ============================================================================
// Supertype Parsing
// ============================================================================

/// Parse a raw supertype string. Anything outside the three known
/// categories is a configuration error naming the value.
pub fn parse_supertype(raw: &str) -> Result<SuperType> {
    match raw {
        "Pok\u{e9}mon" => Ok(SuperType::Pokemon),
        "Trainer" => Ok(SuperType::Trainer),
        "Energy" => Ok(SuperType::Energy),
        other => bail!(
            "{:?} cannot be accepted as a supertype, please fix the source record",
            other
        ),
    }
}

// ============================================================================
// Subtype Decision Table
// ============================================================================

/// Supported raw subtype vocabulary, one variant per source spelling.
/// A string outside this table is a fatal classification error, never a
/// silently empty tag set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawSubtype {
    Legend,
    Basic,
    Stage1,
    Stage2,
    Gx,
    Ex,
    Mega,
    Break,
    LevelUp,
    Restored,
    Stadium,
    Item,
    PokemonTool,
    RocketsSecretMachine,
    TechnicalMachine,
    Supporter,
    /// Blank subtype: plain trainers carry no tag of their own.
    Blank,
}

impl RawSubtype {
    pub fn parse(raw: &str) -> Option<RawSubtype> {
        match raw {
            "LEGEND" => Some(RawSubtype::Legend),
            "Basic" => Some(RawSubtype::Basic),
            "Stage 1" => Some(RawSubtype::Stage1),
            "Stage 2" => Some(RawSubtype::Stage2),
            "GX" => Some(RawSubtype::Gx),
            "EX" => Some(RawSubtype::Ex),
            "MEGA" => Some(RawSubtype::Mega),
            "BREAK" => Some(RawSubtype::Break),
            "Level Up" => Some(RawSubtype::LevelUp),
            "Restored" => Some(RawSubtype::Restored),
            "Stadium" => Some(RawSubtype::Stadium),
            "Item" => Some(RawSubtype::Item),
            "Pok\u{e9}mon Tool" => Some(RawSubtype::PokemonTool),
            "Rocket's Secret Machine" => Some(RawSubtype::RocketsSecretMachine),
            "Technical Machine" => Some(RawSubtype::TechnicalMachine),
            "Supporter" => Some(RawSubtype::Supporter),
            "" => Some(RawSubtype::Blank),
            _ => None,
        }
    }
}

/// Add the GX/EX tags implied by modern name suffixes.
fn add_name_suffix_tags(name: &str, tags: &mut BTreeSet<SubType>) {
    if name.contains("-GX") {
        tags.insert(SubType::PokemonGx);
    }
    if name.contains("-EX") {
        tags.insert(SubType::PokemonEx);
    }
}

/// Classify one record into its canonical tag set.
///
/// `has_text` is whether the card has any normalized free text; it drives
/// the SPECIAL_ENERGY / BASIC_ENERGY split. `evolves_from` is consulted
/// (together with the registry) only for "EX" records.
pub fn classify(
    super_type: SuperType,
    raw_subtype: &str,
    name: &str,
    evolves_from: Option<&str>,
    has_text: bool,
    registry: &mut StageRegistry,
) -> Result<BTreeSet<SubType>> {
    let mut tags = BTreeSet::new();

    if super_type == SuperType::Energy {
        if has_text {
            tags.insert(SubType::SpecialEnergy);
        } else {
            tags.insert(SubType::BasicEnergy);
        }
    }

    let Some(subtype) = RawSubtype::parse(raw_subtype) else {
        bail!(
            "{:?} cannot be accepted as a subtype for {:?}, please extend the subtype table",
            raw_subtype,
            name
        );
    };

    match subtype {
        RawSubtype::Legend => {
            tags.insert(SubType::Legend);
        }
        RawSubtype::Basic => {
            tags.insert(SubType::Basic);
            add_name_suffix_tags(name, &mut tags);
        }
        RawSubtype::Stage1 => {
            tags.insert(SubType::Evolution);
            tags.insert(SubType::Stage1);
            add_name_suffix_tags(name, &mut tags);
            registry.record(name);
        }
        RawSubtype::Stage2 => {
            tags.insert(SubType::Evolution);
            tags.insert(SubType::Stage2);
            add_name_suffix_tags(name, &mut tags);
        }
        RawSubtype::Gx => {
            tags.insert(SubType::Basic);
            tags.insert(SubType::PokemonGx);
        }
        RawSubtype::Ex => {
            // Older " ex" cards (lowercase suffix) carry the EX tag; the
            // later block-capital EX series carries POKEMON_EX.
            tags.insert(if name.ends_with(" ex") {
                SubType::Ex
            } else {
                SubType::PokemonEx
            });
            match evolves_from.map(str::trim).filter(|s| !s.is_empty()) {
                Some(from) => {
                    tags.insert(if registry.contains(from) {
                        SubType::Stage2
                    } else {
                        SubType::Stage1
                    });
                    tags.insert(SubType::Evolution);
                }
                None => {
                    tags.insert(SubType::Basic);
                }
            }
        }
        RawSubtype::Mega => {
            tags.insert(SubType::Evolution);
            tags.insert(SubType::MegaPokemon);
            tags.insert(SubType::PokemonEx);
        }
        RawSubtype::Break => {
            tags.insert(SubType::Evolution);
            tags.insert(SubType::Break);
        }
        RawSubtype::LevelUp => {
            tags.insert(SubType::Evolution);
            tags.insert(SubType::LevelUp);
        }
        RawSubtype::Restored => {
            tags.insert(SubType::Restored);
        }
        RawSubtype::Stadium => {
            tags.insert(SubType::Stadium);
        }
        RawSubtype::Item => {
            tags.insert(SubType::Item);
        }
        RawSubtype::PokemonTool => {
            tags.insert(SubType::PokemonTool);
            tags.insert(SubType::Item);
        }
        RawSubtype::RocketsSecretMachine => {
            tags.insert(SubType::RocketsSecretMachine);
        }
        RawSubtype::TechnicalMachine => {
            tags.insert(SubType::TechnicalMachine);
        }
        RawSubtype::Supporter => {
            tags.insert(SubType::Supporter);
        }
        RawSubtype::Blank => {}
    }

    Ok(tags)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_pokemon(
        subtype: &str,
        name: &str,
        evolves_from: Option<&str>,
        registry: &mut StageRegistry,
    ) -> BTreeSet<SubType> {
        classify(SuperType::Pokemon, subtype, name, evolves_from, false, registry).unwrap()
    }

    fn tags(tags: &[SubType]) -> BTreeSet<SubType> {
        tags.iter().copied().collect()
    }

    #[test]
    fn basic_with_gx_suffix() {
        let mut reg = StageRegistry::new();
        assert_eq!(
            classify_pokemon("Basic", "Tapu Koko-GX", None, &mut reg),
            tags(&[SubType::Basic, SubType::PokemonGx])
        );
    }

    #[test]
    fn stage_one_registers_name() {
        let mut reg = StageRegistry::new();
        let t = classify_pokemon("Stage 1", "Charmeleon", Some("Charmander"), &mut reg);
        assert_eq!(t, tags(&[SubType::Evolution, SubType::Stage1]));
        assert!(reg.contains("Charmeleon"));
    }

    #[test]
    fn ex_after_stage_one_is_stage_two() {
        let mut reg = StageRegistry::new();
        classify_pokemon("Stage 1", "Charmeleon", Some("Charmander"), &mut reg);
        let t = classify_pokemon("EX", "Charizard EX", Some("Charmeleon"), &mut reg);
        assert_eq!(
            t,
            tags(&[SubType::Evolution, SubType::PokemonEx, SubType::Stage2])
        );
    }

    #[test]
    fn ex_before_stage_one_is_stage_one() {
        // Same records, reversed order: the registry has not seen the
        // pre-evolution yet, so the EX record lands on STAGE1.
        let mut reg = StageRegistry::new();
        let t = classify_pokemon("EX", "Charizard EX", Some("Charmeleon"), &mut reg);
        assert_eq!(
            t,
            tags(&[SubType::Evolution, SubType::PokemonEx, SubType::Stage1])
        );
    }

    #[test]
    fn ex_without_evolves_from_is_basic() {
        let mut reg = StageRegistry::new();
        let t = classify_pokemon("EX", "Mewtwo-EX", None, &mut reg);
        assert_eq!(t, tags(&[SubType::Basic, SubType::PokemonEx]));
    }

    #[test]
    fn lowercase_ex_suffix_uses_ex_tag() {
        let mut reg = StageRegistry::new();
        let t = classify_pokemon("EX", "Ampharos ex", Some("Flaaffy"), &mut reg);
        assert_eq!(t, tags(&[SubType::Evolution, SubType::Ex, SubType::Stage1]));
    }

    #[test]
    fn mega_break_and_level_up() {
        let mut reg = StageRegistry::new();
        assert_eq!(
            classify_pokemon("MEGA", "M Gardevoir-EX", Some("Gardevoir-EX"), &mut reg),
            tags(&[SubType::Evolution, SubType::MegaPokemon, SubType::PokemonEx])
        );
        assert_eq!(
            classify_pokemon("BREAK", "Greninja BREAK", Some("Greninja"), &mut reg),
            tags(&[SubType::Break, SubType::Evolution])
        );
        assert_eq!(
            classify_pokemon("Level Up", "Dialga LV.X", None, &mut reg),
            tags(&[SubType::Evolution, SubType::LevelUp])
        );
    }

    #[test]
    fn pokemon_tool_is_also_item() {
        let mut reg = StageRegistry::new();
        let t = classify(
            SuperType::Trainer,
            "Pok\u{e9}mon Tool",
            "Muscle Band",
            None,
            true,
            &mut reg,
        )
        .unwrap();
        assert_eq!(t, tags(&[SubType::Item, SubType::PokemonTool]));
    }

    #[test]
    fn blank_trainer_has_no_tags() {
        let mut reg = StageRegistry::new();
        let t = classify(SuperType::Trainer, "", "Bill", None, true, &mut reg).unwrap();
        assert!(t.is_empty());
    }

    #[test]
    fn energy_splits_on_text() {
        let mut reg = StageRegistry::new();
        let plain = classify(SuperType::Energy, "", "Fire Energy", None, false, &mut reg).unwrap();
        assert_eq!(plain, tags(&[SubType::BasicEnergy]));
        let special =
            classify(SuperType::Energy, "", "Double Colorless Energy", None, true, &mut reg)
                .unwrap();
        assert_eq!(special, tags(&[SubType::SpecialEnergy]));
    }

    #[test]
    fn pokemon_and_energy_tag_sets_are_never_empty() {
        let pokemon_subtypes = [
            "LEGEND", "Basic", "Stage 1", "Stage 2", "GX", "EX", "MEGA", "BREAK", "Level Up",
            "Restored",
        ];
        for subtype in pokemon_subtypes {
            let mut reg = StageRegistry::new();
            let t = classify_pokemon(subtype, "Specimen", None, &mut reg);
            assert!(!t.is_empty(), "{} produced an empty tag set", subtype);
            // BTreeSet is sorted and duplicate-free by construction; check
            // the rendered tags agree.
            let rendered: Vec<&str> = t.iter().map(|s| s.as_str()).collect();
            let mut sorted = rendered.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(rendered, sorted);
        }
        for has_text in [false, true] {
            let mut reg = StageRegistry::new();
            let t = classify(SuperType::Energy, "", "Energy", None, has_text, &mut reg).unwrap();
            assert!(!t.is_empty());
        }
    }

    #[test]
    fn unmapped_subtype_is_a_fatal_error() {
        let mut reg = StageRegistry::new();
        let err = classify(
            SuperType::Pokemon,
            "V-UNION",
            "Greninja V-UNION",
            None,
            false,
            &mut reg,
        )
        .unwrap_err();
        assert!(err.to_string().contains("V-UNION"));
    }

    #[test]
    fn unmapped_supertype_is_a_fatal_error() {
        let err = parse_supertype("Hero").unwrap_err();
        assert!(err.to_string().contains("Hero"));
    }

    #[test]
    fn registries_do_not_leak_between_runs() {
        let mut first = StageRegistry::new();
        classify_pokemon("Stage 1", "Charmeleon", Some("Charmander"), &mut first);

        let mut second = StageRegistry::new();
        let t = classify_pokemon("EX", "Charizard EX", Some("Charmeleon"), &mut second);
        assert!(t.contains(&SubType::Stage1));
        assert!(second.is_empty());
    }
}
