//! Static canonical vocabularies: rarity rewrites, energy-type codes,
//! in-text short forms, and the source-set-code table.
//!
//! These tables are the single place new source spellings get added.
//! Lookups never guess: an unknown value is returned as `None` and the
//! caller turns it into a fatal configuration error naming the value.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

// ============================================================================
// Rarity Rewrites
// ============================================================================

/// Ordered substring rewrites applied to a lower-cased source rarity before
/// title-casing. Each historical spelling maps onto one canonical label.
/// Order matters: longer spellings must rewrite before their prefixes.
pub static RARITY_REWRITES: &[(&str, &str)] = &[
    ("rare secret", "Secret"),
    ("rare ace", "Rare"),
    ("rare holo lv.x", "Rare Holo"),
    ("rare ultra", "Ultra Rare"),
    ("rareultra", "Ultra Rare"),
    ("rare prime", "Rare"),
    ("rare break", "Ultra Rare"),
    ("rare holo ex", "Ultra Rare"),
    ("rare holo gx", "Ultra Rare"),
    ("legend", "Ultra Rare"),
];

// ============================================================================
// Energy Type Codes
// ============================================================================

/// Energy-type display name → single-letter canonical code.
pub static TYPE_CODES: Lazy<FxHashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = FxHashMap::default();
    m.insert("Fire", "R");
    m.insert("Grass", "G");
    m.insert("Water", "W");
    m.insert("Fighting", "F");
    m.insert("Colorless", "C");
    m.insert("Lightning", "L");
    m.insert("Psychic", "P");
    m.insert("Darkness", "D");
    m.insert("Metal", "M");
    m.insert("Dragon", "N");
    m.insert("Fairy", "Y");
    m
});

/// Resolve an energy-type display name to its single-letter code.
pub fn type_code(display_name: &str) -> Option<&'static str> {
    TYPE_CODES.get(display_name).copied()
}

// ============================================================================
// In-Text Short Forms
// ============================================================================

/// Ordered replacements turning display names and symbol markers inside
/// card text into bracketed short codes, plus punctuation fixups.
///
/// The accent fixup (`Pokemon` → `Pokémon`) runs before the
/// `<Type> Pokémon` rules so a second pass over already-normalized text is
/// a no-op.
pub static SHORT_FORMS: &[(&str, &str)] = &[
    ("`", "'"),
    ("\u{2013}", "-"),
    ("Pokemon", "Pok\u{e9}mon"),
    ("{F}", "[F]"),
    ("{L}", "[L]"),
    ("{R}", "[R]"),
    ("{G}", "[G]"),
    ("{W}", "[W]"),
    ("{P}", "[P]"),
    ("{C}", "[C]"),
    ("{D}", "[D]"),
    ("{M}", "[M]"),
    ("{Y}", "[Y]"),
    ("{N}", "[N]"),
    ("Fighting Energy", "[F] Energy"),
    ("Lightning Energy", "[L] Energy"),
    ("Fire Energy", "[R] Energy"),
    ("Grass Energy", "[G] Energy"),
    ("Water Energy", "[W] Energy"),
    ("Psychic Energy", "[P] Energy"),
    ("Colorless Energy", "[C] Energy"),
    ("Darkness Energy", "[D] Energy"),
    ("Metal Energy", "[M] Energy"),
    ("Fairy Energy", "[Y] Energy"),
    ("Dragon Energy", "[N] Energy"),
    ("Fighting Pok\u{e9}mon", "[F] Pok\u{e9}mon"),
    ("Lightning Pok\u{e9}mon", "[L] Pok\u{e9}mon"),
    ("Fire Pok\u{e9}mon", "[R] Pok\u{e9}mon"),
    ("Grass Pok\u{e9}mon", "[G] Pok\u{e9}mon"),
    ("Water Pok\u{e9}mon", "[W] Pok\u{e9}mon"),
    ("Psychic Pok\u{e9}mon", "[P] Pok\u{e9}mon"),
    ("Colorless Pok\u{e9}mon", "[C] Pok\u{e9}mon"),
    ("Darkness Pok\u{e9}mon", "[D] Pok\u{e9}mon"),
    ("Metal Pok\u{e9}mon", "[M] Pok\u{e9}mon"),
    ("Fairy Pok\u{e9}mon", "[Y] Pok\u{e9}mon"),
    ("Dragon Pok\u{e9}mon", "[N] Pok\u{e9}mon"),
    ("Colorless", "[C]"),
];

// ============================================================================
// Set Codes
// ============================================================================

/// Canonical descriptor data for one source set code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub abbr: &'static str,
    pub enum_id: &'static str,
}

const fn set(
    id: &'static str,
    name: &'static str,
    abbr: &'static str,
    enum_id: &'static str,
) -> SetInfo {
    SetInfo { id, name, abbr, enum_id }
}

/// Look up the canonical set descriptor for a pio set code.
///
/// Returns `None` for codes not yet in the table; the import aborts on
/// those so the table gets extended instead of guessing.
pub fn set_by_code(code: &str) -> Option<SetInfo> {
    match code {
        "base1" => Some(set("101", "Base Set", "BS", "BASE_SET")),
        "base2" => Some(set("102", "Jungle", "JU", "JUNGLE")),
        "basep" => Some(set("103", "Wizards Black Star Promos", "PR", "WIZARDS_BLACK_STAR_PROMOS")),
        "base3" => Some(set("104", "Fossil", "FO", "FOSSIL")),
        "base4" => Some(set("105", "Base Set 2", "B2", "BASE_SET_2")),
        "base5" => Some(set("106", "Team Rocket", "TR", "TEAM_ROCKET")),
        "gym1" => Some(set("107", "Gym Heroes", "G1", "GYM_HEROES")),
        "gym2" => Some(set("108", "Gym Challenge", "G2", "GYM_CHALLENGE")),
        "neo1" => Some(set("109", "Neo Genesis", "N1", "NEO_GENESIS")),
        "neo2" => Some(set("110", "Neo Discovery", "N2", "NEO_DISCOVERY")),
        "neo3" => Some(set("111", "Neo Revelation", "N3", "NEO_REVELATION")),
        "neo4" => Some(set("112", "Neo Destiny", "N4", "NEO_DESTINY")),
        "base6" => Some(set("113", "Legendary Collection", "LC", "LEGENDARY_COLLECTION")),
        "ecard1" => Some(set("114", "Expedition Base Set", "EXP", "EXPEDITION_BASE_SET")),
        "ecard2" => Some(set("115", "Aquapolis", "AQ", "AQUAPOLIS")),
        "ecard3" => Some(set("116", "Skyridge", "SK", "SKYRIDGE")),
        "ex1" => Some(set("117", "Ruby & Sapphire", "RS", "RUBY_SAPPHIRE")),
        "ex2" => Some(set("118", "Sandstorm", "SS", "SANDSTORM")),
        "ex3" => Some(set("119", "Dragon", "DR", "DRAGON")),
        "ex4" => Some(set("120", "Team Magma vs Team Aqua", "MA", "TEAM_MAGMA_VS_TEAM_AQUA")),
        "ex5" => Some(set("121", "Hidden Legends", "HL", "HIDDEN_LEGENDS")),
        "ex6" => Some(set("122", "FireRed & LeafGreen", "RG", "FIRERED_LEAFGREEN")),
        "ex7" => Some(set("123", "Team Rocket Returns", "RR", "TEAM_ROCKET_RETURNS")),
        "ex8" => Some(set("124", "Deoxys", "DX", "DEOXYS")),
        "ex9" => Some(set("125", "Emerald", "EM", "EMERALD")),
        "ex10" => Some(set("126", "Unseen Forces", "UF", "UNSEEN_FORCES")),
        "ex11" => Some(set("127", "Delta Species", "DS", "DELTA_SPECIES")),
        "ex12" => Some(set("128", "Legend Maker", "LM", "LEGEND_MAKER")),
        "ex13" => Some(set("129", "Holon Phantoms", "HO", "HOLON_PHANTOMS")),
        "ex14" => Some(set("130", "Crystal Guardians", "CG", "CRYSTAL_GUARDIANS")),
        "ex15" => Some(set("131", "Dragon Frontiers", "DF", "DRAGON_FRONTIERS")),
        "ex16" => Some(set("132", "Power Keepers", "PK", "POWER_KEEPERS")),
        "dp1" => Some(set("133", "Diamond & Pearl", "DP", "DIAMOND_PEARL")),
        "dp2" => Some(set("134", "Mysterious Treasures", "MT", "MYSTERIOUS_TREASURES")),
        "dp3" => Some(set("135", "Secret Wonders", "SW", "SECRET_WONDERS")),
        "dp4" => Some(set("136", "Great Encounters", "GE", "GREAT_ENCOUNTERS")),
        "dp5" => Some(set("137", "Majestic Dawn", "MD", "MAJESTIC_DAWN")),
        "dp6" => Some(set("138", "Legends Awakened", "LA", "LEGENDS_AWAKENED")),
        "dp7" => Some(set("139", "Stormfront", "SF", "STORMFRONT")),
        "hgss1" => Some(set("140", "HeartGold & SoulSilver", "HS", "HEARTGOLD_SOULSILVER")),
        "hgss2" => Some(set("141", "Unleashed", "UL", "UNLEASHED")),
        "hgss3" => Some(set("142", "Undaunted", "UD", "UNDAUNTED")),
        "hgss4" => Some(set("143", "Triumphant", "TM", "TRIUMPHANT")),
        "col1" => Some(set("144", "Call of Legends", "CL", "CALL_OF_LEGENDS")),
        "bw1" => Some(set("145", "Black & White", "BLW", "BLACK_WHITE")),
        "bw2" => Some(set("146", "Emerging Powers", "EPO", "EMERGING_POWERS")),
        "bw3" => Some(set("147", "Noble Victories", "NVI", "NOBLE_VICTORIES")),
        "xy1" => Some(set("150", "XY", "XY", "XY")),
        "xy5" => Some(set("151", "Primal Clash", "PRC", "PRIMAL_CLASH")),
        "xy8" => Some(set("152", "BREAKthrough", "BKT", "BREAKTHROUGH")),
        "xy9" => Some(set("153", "BREAKpoint", "BKP", "BREAKPOINT")),
        "xy12" => Some(set("154", "Evolutions", "EVO", "EVOLUTIONS")),
        "sm1" => Some(set("155", "Sun & Moon", "SUM", "SUN_MOON")),
        "sm9" => Some(set("160", "Team Up", "TEU", "TEAM_UP")),
        "sm115" => Some(set("161", "Hidden Fates", "HIF", "HIDDEN_FATES")),
        "sm12" => Some(set("162", "Cosmic Eclipse", "CEC", "COSMIC_ECLIPSE")),
        "det1" => Some(set("163", "Detective Pikachu", "DET", "DETECTIVE_PIKACHU")),
        "swsh1" => Some(set("165", "Sword & Shield", "SSH", "SWORD_SHIELD")),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
