//! Core data models for the card-database import pipeline.
//!
//! Two families live here: the loosely-typed `RawCard` shape as it arrives
//! from pio JSON exports, and the strictly-typed canonical shape
//! (`CanonicalCard`, `CardSet`, `SetFile`) that the rest of the pipeline
//! produces and persists.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Raw (pio) Models
// ============================================================================

/// One record as exported in the pio JSON schema. Fields may be absent,
/// blank, or inconsistently cased; nothing here is validated yet.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCard {
    pub id: Option<String>,
    pub name: String,
    pub number: String,
    pub supertype: String,
    pub subtype: Option<String>,
    pub rarity: Option<String>,
    pub types: Option<Vec<String>>,
    /// Numeric string in healthy records; one side of LEGEND cards has none.
    pub hp: Option<String>,
    pub converted_retreat_cost: Option<i32>,
    pub weaknesses: Option<Vec<RawWeakness>>,
    pub resistances: Option<Vec<RawWeakness>>,
    pub attacks: Option<Vec<RawAttack>>,
    pub ability: Option<RawAbility>,
    pub ancient_trait: Option<RawAbility>,
    pub evolves_from: Option<String>,
    /// The feed sometimes encodes a single evolution as a bare string.
    #[serde(deserialize_with = "scalar_or_list")]
    pub evolves_to: Option<Vec<String>>,
    pub artist: Option<String>,
    #[serde(deserialize_with = "scalar_or_list")]
    pub text: Option<Vec<String>>,
    pub national_pokedex_number: Option<i32>,
    pub set_code: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawWeakness {
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawAttack {
    pub cost: Option<Vec<String>>,
    pub damage: Option<String>,
    pub text: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawAbility {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub text: Option<String>,
}

/// Accept either `"Pikachu"` or `["Pikachu"]` for list-valued fields,
/// matching the upstream reader's lenient deserialization.
fn scalar_or_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ScalarOrList {
        Scalar(String),
        List(Vec<String>),
    }

    Ok(match Option::<ScalarOrList>::deserialize(deserializer)? {
        None => None,
        Some(ScalarOrList::Scalar(s)) => Some(vec![s]),
        Some(ScalarOrList::List(v)) => Some(v),
    })
}

// ============================================================================
// Canonical Vocabularies
// ============================================================================

/// Top-level card category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuperType {
    Pokemon,
    Trainer,
    Energy,
}

impl SuperType {
    pub fn as_str(self) -> &'static str {
        match self {
            SuperType::Pokemon => "POKEMON",
            SuperType::Trainer => "TRAINER",
            SuperType::Energy => "ENERGY",
        }
    }
}

impl fmt::Display for SuperType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical classification tag vocabulary.
///
/// Variants are declared in lexicographic order of their tag strings, so
/// the derived `Ord` sorts a `BTreeSet<SubType>` exactly like the original
/// database sorts its tag lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubType {
    Basic,
    BasicEnergy,
    Break,
    Evolution,
    Ex,
    Item,
    Legend,
    LevelUp,
    MegaPokemon,
    PokemonEx,
    PokemonGx,
    PokemonTool,
    Restored,
    RocketsSecretMachine,
    SpecialEnergy,
    Stadium,
    Stage1,
    Stage2,
    Supporter,
    TechnicalMachine,
}

impl SubType {
    pub fn as_str(self) -> &'static str {
        match self {
            SubType::Basic => "BASIC",
            SubType::BasicEnergy => "BASIC_ENERGY",
            SubType::Break => "BREAK",
            SubType::Evolution => "EVOLUTION",
            SubType::Ex => "EX",
            SubType::Item => "ITEM",
            SubType::Legend => "LEGEND",
            SubType::LevelUp => "LEVEL_UP",
            SubType::MegaPokemon => "MEGA_POKEMON",
            SubType::PokemonEx => "POKEMON_EX",
            SubType::PokemonGx => "POKEMON_GX",
            SubType::PokemonTool => "POKEMON_TOOL",
            SubType::Restored => "RESTORED",
            SubType::RocketsSecretMachine => "ROCKETS_SECRET_MACHINE",
            SubType::SpecialEnergy => "SPECIAL_ENERGY",
            SubType::Stadium => "STADIUM",
            SubType::Stage1 => "STAGE1",
            SubType::Stage2 => "STAGE2",
            SubType::Supporter => "SUPPORTER",
            SubType::TechnicalMachine => "TECHNICAL_MACHINE",
        }
    }
}

impl fmt::Display for SubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed canonical rarity set. Anything outside this set is rejected at
/// normalization time so new source spellings surface as table updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    #[serde(rename = "Ultra Rare")]
    UltraRare,
    #[serde(rename = "Rare Holo")]
    RareHolo,
    Secret,
    Promo,
}

impl Rarity {
    pub const ALL: [Rarity; 7] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::UltraRare,
        Rarity::RareHolo,
        Rarity::Secret,
        Rarity::Promo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::UltraRare => "Ultra Rare",
            Rarity::RareHolo => "Rare Holo",
            Rarity::Secret => "Secret",
            Rarity::Promo => "Promo",
        }
    }

    /// Parse an already-canonicalized label back into the closed set.
    pub fn from_canonical(label: &str) -> Option<Rarity> {
        Rarity::ALL.iter().copied().find(|r| r.as_str() == label)
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Canonical Models
// ============================================================================

/// Canonical descriptor of an owning set, created once per distinct pio
/// set code and shared by every card in that set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSet {
    /// Stable numeric id as a string, unique per source code for the run.
    pub id: String,
    pub name: String,
    pub abbr: String,
    pub enum_id: String,
    /// Source set code this descriptor was resolved from.
    pub pio_id: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaknessResistance {
    /// Single-letter canonical type code.
    #[serde(rename = "type")]
    pub type_code: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cost: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    /// Source ability kind, e.g. "Ability", "Poke-Power", or an ancient
    /// trait label.
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Strictly-typed canonical record.
///
/// ## Invariants
///
/// 1. `sub_types` is sorted and duplicate-free (by construction), and is
///    never empty for `POKEMON` or `ENERGY` supertypes.
/// 2. `rarity` is a member of the closed canonical set.
/// 3. Every `types` entry is a valid single-letter code.
/// 4. `id == "{set.id}-{number}"` and `enum_id` ends with `_{number}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalCard {
    pub id: String,
    pub enum_id: String,
    pub name: String,
    pub number: String,
    /// Source record id, kept for traceability back to the pio feed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pio_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    pub rarity: Rarity,
    pub super_type: SuperType,
    pub sub_types: BTreeSet<SubType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hp: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retreat_cost: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weaknesses: Option<Vec<WeaknessResistance>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resistances: Option<Vec<WeaknessResistance>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moves: Option<Vec<Move>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abilities: Option<Vec<Ability>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_pokedex_number: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolves_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolves_to: Option<Vec<String>>,
    /// Normalized free-text lines, in source order, blanks dropped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    /// Owning set, shared across all cards of the set. Not serialized per
    /// card; the set is written once per `SetFile` and re-linked on load.
    #[serde(skip)]
    pub set: Option<Arc<CardSet>>,
}

/// Persisted shape of one set: the descriptor plus its cards. This is the
/// interface boundary for YAML export, scan downloading, and template
/// generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetFile {
    pub set: CardSet,
    pub cards: Vec<CanonicalCard>,
}

// ============================================================================
// Tests
// ============================================================================
