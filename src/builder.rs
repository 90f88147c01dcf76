//! Record building: orchestrates normalization, identifier assignment,
//! and classification into one canonical card per raw record.
//!
//! The builder owns the run-scoped caches (set descriptors and the stage
//! registry), so records MUST flow through a single builder in input
//! order; reordering changes how later "EX" records are classified.
//! Merging two builds of the same identity is the caller's concern, not
//! the builder's.

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, warn};

use crate::classify::{classify, parse_supertype, StageRegistry};
use crate::ident::{card_id, enum_id, SetCache};
use crate::models::{
    Ability, CanonicalCard, Move, RawAbility, RawCard, SuperType, WeaknessResistance,
};
use crate::normalize::{
    normalize_rarity, replace_short_forms, sanitize_cross, split_text_lines, trim_to_null,
};
use crate::tables::type_code;

// ============================================================================
// Field Helpers
// ============================================================================

/// Map energy-type display names to short codes, failing on any entry the
/// table does not know.
fn map_types(types: &[String], name: &str) -> Result<Vec<String>> {
    types
        .iter()
        .map(|t| {
            type_code(t).map(str::to_string).ok_or_else(|| {
                anyhow!(
                    "{:?} cannot be accepted as an energy type for {:?}, please extend the type table",
                    t,
                    name
                )
            })
        })
        .collect()
}

/// Map an attack cost list. A lone entry the table does not know (the
/// exporter's spelling for a zero-cost attack) collapses to an empty list.
fn map_cost(cost: &[String], name: &str) -> Result<Vec<String>> {
    if cost.len() == 1 && type_code(&cost[0]).is_none() {
        return Ok(Vec::new());
    }
    map_types(cost, name)
}

fn map_ability(raw: &RawAbility) -> Ability {
    Ability {
        kind: raw.kind.clone(),
        name: raw.name.clone(),
        text: raw
            .text
            .as_deref()
            .map(replace_short_forms)
            .and_then(|t| trim_to_null(&t)),
    }
}

// ============================================================================
// Card Builder
// ============================================================================

/// Builds canonical cards from raw records, one at a time, threading the
/// run-scoped set cache and stage registry through every build.
#[derive(Default)]
pub struct CardBuilder {
    sets: SetCache,
    stages: StageRegistry,
}

impl CardBuilder {
    pub fn new() -> Self {
        Self {
            sets: SetCache::new(),
            stages: StageRegistry::new(),
        }
    }

    /// Build one canonical card. Configuration errors (unmapped rarity,
    /// type, set code, or subtype) abort with the offending value named;
    /// known-malformed input (missing Pokémon types, unparseable hp) is
    /// logged and the field left absent.
    pub fn build(&mut self, raw: &RawCard) -> Result<CanonicalCard> {
        let rarity_raw = raw
            .rarity
            .as_deref()
            .ok_or_else(|| anyhow!("rarity cannot be absent"))?;
        let rarity = normalize_rarity(rarity_raw)?;
        let super_type = parse_supertype(&raw.supertype)?;
        let set = self.sets.resolve(&raw.set_code)?;

        let text = raw
            .text
            .as_ref()
            .map(|lines| split_text_lines(lines))
            .filter(|lines| !lines.is_empty());

        let mut hp = None;
        let mut retreat_cost = None;
        let mut types = None;
        let mut weaknesses = None;
        let mut resistances = None;
        let mut moves = None;
        let mut abilities: Option<Vec<Ability>> = None;
        let mut national_pokedex_number = None;
        let mut evolves_from = None;
        let mut evolves_to = None;

        if super_type == SuperType::Pokemon {
            if raw.types.is_none() {
                warn!("NULL TYPES for {:?}, {:?}", raw.id, raw.name);
            }
            types = raw
                .types
                .as_deref()
                .map(|t| map_types(t, &raw.name))
                .transpose()?;

            // One side of LEGEND cards has no hp at all; a handful of old
            // records carry a non-numeric placeholder.
            hp = raw.hp.as_deref().and_then(|h| match h.trim().parse::<i32>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("unparseable hp {:?} for {:?} {:?}", h, raw.name, raw.number);
                    None
                }
            });
            retreat_cost = raw.converted_retreat_cost;

            weaknesses = raw
                .weaknesses
                .as_deref()
                .filter(|w| !w.is_empty())
                .map(|list| {
                    list.iter()
                        .map(|wr| {
                            Ok(WeaknessResistance {
                                type_code: type_code(&wr.type_name)
                                    .map(str::to_string)
                                    .ok_or_else(|| {
                                        anyhow!(
                                            "{:?} cannot be accepted as a weakness/resistance type, please extend the type table",
                                            wr.type_name
                                        )
                                    })?,
                                value: sanitize_cross(&wr.value),
                            })
                        })
                        .collect::<Result<Vec<_>>>()
                })
                .transpose()?;
            resistances = raw
                .resistances
                .as_deref()
                .filter(|r| !r.is_empty())
                .map(|list| {
                    list.iter()
                        .map(|wr| {
                            Ok(WeaknessResistance {
                                type_code: type_code(&wr.type_name)
                                    .map(str::to_string)
                                    .ok_or_else(|| {
                                        anyhow!(
                                            "{:?} cannot be accepted as a weakness/resistance type, please extend the type table",
                                            wr.type_name
                                        )
                                    })?,
                                value: sanitize_cross(&wr.value),
                            })
                        })
                        .collect::<Result<Vec<_>>>()
                })
                .transpose()?;

            moves = raw
                .attacks
                .as_deref()
                .filter(|a| !a.is_empty())
                .map(|attacks| {
                    attacks
                        .iter()
                        .map(|a| {
                            Ok(Move {
                                cost: a
                                    .cost
                                    .as_deref()
                                    .map(|c| map_cost(c, &raw.name))
                                    .transpose()?
                                    .unwrap_or_default(),
                                damage: a
                                    .damage
                                    .as_deref()
                                    .map(sanitize_cross)
                                    .and_then(|d| trim_to_null(&d)),
                                text: a
                                    .text
                                    .as_deref()
                                    .map(replace_short_forms)
                                    .and_then(|t| trim_to_null(&t)),
                            })
                        })
                        .collect::<Result<Vec<_>>>()
                })
                .transpose()?;

            let mut collected = Vec::new();
            if let Some(ability) = &raw.ability {
                collected.push(map_ability(ability));
            }
            if let Some(trait_) = &raw.ancient_trait {
                collected.push(map_ability(trait_));
            }
            if !collected.is_empty() {
                abilities = Some(collected);
            }

            national_pokedex_number = raw.national_pokedex_number;
            evolves_from = raw.evolves_from.as_deref().and_then(trim_to_null);
            evolves_to = raw.evolves_to.clone();
        }

        let sub_types = classify(
            super_type,
            raw.subtype.as_deref().unwrap_or(""),
            &raw.name,
            raw.evolves_from.as_deref(),
            text.is_some(),
            &mut self.stages,
        )?;
        if sub_types.is_empty() && super_type != SuperType::Trainer {
            bail!(
                "subtype {:?} leaves a {} card without classification tags",
                raw.subtype.as_deref().unwrap_or(""),
                super_type
            );
        }

        Ok(CanonicalCard {
            id: card_id(&set.id, &raw.number),
            enum_id: enum_id(&raw.name, &raw.number),
            name: raw.name.clone(),
            number: raw.number.clone(),
            pio_id: raw.id.clone(),
            artist: raw.artist.as_deref().and_then(trim_to_null),
            rarity,
            super_type,
            sub_types,
            types,
            hp,
            retreat_cost,
            weaknesses,
            resistances,
            moves,
            abilities,
            national_pokedex_number,
            evolves_from,
            evolves_to,
            text,
            set: Some(set),
        })
    }

    /// Build every record in input order. Any failure carries the card's
    /// name and number so the bad source record can be located.
    pub fn build_all(&mut self, raws: &[RawCard]) -> Result<Vec<CanonicalCard>> {
        let mut cards = Vec::with_capacity(raws.len());
        for raw in raws {
            debug!("reading {} {}", raw.name, raw.number);
            let card = self
                .build(raw)
                .with_context(|| format!("while importing {:?} #{}", raw.name, raw.number))?;
            cards.push(card);
        }
        Ok(cards)
    }
}

// ============================================================================
// Tests
// ============================================================================
