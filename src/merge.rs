//! Merge/diff resolution between two versions of the same logical record.
//!
//! The merge rules are deliberately asymmetric: text collapses blank to
//! absent and lets a lone non-blank side win, scalar fields take the
//! non-null shortcut, but containers always escalate. An empty list and
//! a missing list are different signals in the source data, and only an
//! operator can tell which one to trust. `evolvesTo` and `/text`
//! contexts are the exception and prefer whichever side is present.
//!
//! All escalation goes through the [`ConflictResolver`] capability. The
//! interactive console strategy is the only place in the engine that
//! performs I/O; swapping in a scripted strategy makes the whole pipeline
//! a pure function of its inputs.

use std::collections::VecDeque;
use std::fmt::{Debug, Display};
use std::io::{self, BufRead, Write};

use crate::models::CanonicalCard;
use crate::normalize::trim_to_null;

// ============================================================================
// Resolver Capability
// ============================================================================

/// Which of the two presented candidates to keep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    Existing,
    Incoming,
}

/// Outcome of a textual conflict: one of the candidates, or a freely
/// typed replacement that becomes the binding value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextChoice {
    Existing,
    Incoming,
    Replacement(String),
}

/// Pluggable adjudication of irreconcilable field differences.
///
/// Candidate 1 is always the existing value, candidate 2 the incoming
/// one. Implementations may block (interactive console) or answer from a
/// script (tests, unattended runs); they cannot fail.
pub trait ConflictResolver {
    /// Adjudicate a non-text conflict between two rendered candidates.
    fn pick(&mut self, context: &str, existing: &str, incoming: &str) -> Choice;

    /// Adjudicate a text conflict; the operator may enter a replacement.
    fn pick_text(&mut self, context: &str, existing: &str, incoming: &str) -> TextChoice;
}

/// Interactive strategy: a blocking prompt loop on the attached streams.
/// Invalid input re-prompts silently, with no retry limit.
pub struct ConsoleResolver<R, W> {
    input: R,
    output: W,
}

impl ConsoleResolver<io::BufReader<io::Stdin>, io::Stdout> {
    /// The production resolver, attached to stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> String {
        let mut line = String::new();
        let _ = self.input.read_line(&mut line);
        line.trim().to_string()
    }

    fn show(&mut self, context: &str, menu: &str, existing: &str, incoming: &str) {
        let _ = writeln!(self.output, "{}. Pick one ({})", context, menu);
        let _ = writeln!(self.output, "\t1. {}", existing);
        let _ = writeln!(self.output, "\t2. {}", incoming);
        let _ = self.output.flush();
    }
}

impl<R: BufRead, W: Write> ConflictResolver for ConsoleResolver<R, W> {
    fn pick(&mut self, context: &str, existing: &str, incoming: &str) -> Choice {
        loop {
            self.show(context, "1, 2", existing, incoming);
            match self.read_line().as_str() {
                "1" => return Choice::Existing,
                "2" => return Choice::Incoming,
                _ => {}
            }
        }
    }

    fn pick_text(&mut self, context: &str, existing: &str, incoming: &str) -> TextChoice {
        loop {
            self.show(context, "1, 2 or 3 to enter your own", existing, incoming);
            match self.read_line().as_str() {
                "1" => return TextChoice::Existing,
                "2" => return TextChoice::Incoming,
                "3" => {
                    let _ = writeln!(self.output, "Enter (blank to return back to selection)");
                    let _ = self.output.flush();
                    let line = self.read_line();
                    if !line.is_empty() {
                        return TextChoice::Replacement(line);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Non-interactive strategy for unattended runs: every conflict keeps the
/// incoming value. Opt-in; the interactive flow is the reference behavior.
#[derive(Debug, Default)]
pub struct PreferNew;

impl ConflictResolver for PreferNew {
    fn pick(&mut self, _context: &str, _existing: &str, _incoming: &str) -> Choice {
        Choice::Incoming
    }

    fn pick_text(&mut self, _context: &str, _existing: &str, _incoming: &str) -> TextChoice {
        TextChoice::Incoming
    }
}

/// Deterministic strategy answering with scripted selectors, repeating
/// the last one once the script is exhausted. `"1"` keeps the existing
/// value, `"2"` the incoming one; any other selector becomes a text
/// replacement (and keeps the incoming value for non-text fields).
#[derive(Debug)]
pub struct Scripted {
    answers: VecDeque<String>,
    last: String,
}

impl Scripted {
    /// Answer every conflict with the same selector.
    pub fn always(selector: &str) -> Self {
        Self {
            answers: VecDeque::new(),
            last: selector.to_string(),
        }
    }

    /// Answer conflicts with the given selectors in order.
    pub fn sequence<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let answers: VecDeque<String> = selectors.into_iter().map(Into::into).collect();
        let last = answers.back().cloned().unwrap_or_else(|| "1".to_string());
        Self { answers, last }
    }

    fn next_selector(&mut self) -> String {
        if let Some(s) = self.answers.pop_front() {
            self.last = s.clone();
            s
        } else {
            self.last.clone()
        }
    }
}

impl ConflictResolver for Scripted {
    fn pick(&mut self, _context: &str, _existing: &str, _incoming: &str) -> Choice {
        if self.next_selector() == "1" {
            Choice::Existing
        } else {
            Choice::Incoming
        }
    }

    fn pick_text(&mut self, _context: &str, _existing: &str, _incoming: &str) -> TextChoice {
        match self.next_selector().as_str() {
            "1" => TextChoice::Existing,
            "2" => TextChoice::Incoming,
            other => TextChoice::Replacement(other.to_string()),
        }
    }
}

// ============================================================================
// Field Merging
// ============================================================================

/// Merge two versions of a text field. Whitespace-only collapses to
/// absent, a lone present side wins, and two differing present values
/// escalate on their trimmed forms.
pub fn merge_text(
    context: &str,
    incoming: Option<String>,
    existing: Option<String>,
    resolver: &mut dyn ConflictResolver,
) -> Option<String> {
    if incoming == existing {
        return existing;
    }
    let incoming = incoming.as_deref().and_then(trim_to_null);
    let existing = existing.as_deref().and_then(trim_to_null);
    match (incoming, existing) {
        (None, None) => None,
        (Some(incoming), None) => Some(incoming),
        (None, Some(existing)) => Some(existing),
        (Some(incoming), Some(existing)) => {
            match resolver.pick_text(context, &existing, &incoming) {
                TextChoice::Existing => Some(existing),
                TextChoice::Incoming => Some(incoming),
                TextChoice::Replacement(value) => Some(value),
            }
        }
    }
}

/// Merge two versions of an optional scalar field: the non-null shortcut
/// applies, genuine disagreement escalates.
pub fn merge_scalar<T: PartialEq + Display>(
    context: &str,
    incoming: Option<T>,
    existing: Option<T>,
    resolver: &mut dyn ConflictResolver,
) -> Option<T> {
    if incoming == existing {
        return existing;
    }
    match (incoming, existing) {
        (None, None) => None,
        (Some(incoming), None) => Some(incoming),
        (None, Some(existing)) => Some(existing),
        (Some(incoming), Some(existing)) => {
            match resolver.pick(context, &existing.to_string(), &incoming.to_string()) {
                Choice::Existing => Some(existing),
                Choice::Incoming => Some(incoming),
            }
        }
    }
}

/// Merge two versions of a mandatory scalar field.
pub fn merge_required<T: PartialEq + Display>(
    context: &str,
    incoming: T,
    existing: T,
    resolver: &mut dyn ConflictResolver,
) -> T {
    if incoming == existing {
        return existing;
    }
    match resolver.pick(context, &existing.to_string(), &incoming.to_string()) {
        Choice::Existing => existing,
        Choice::Incoming => incoming,
    }
}

fn render<T: Debug>(value: &Option<T>) -> String {
    match value {
        Some(v) => format!("{:?}", v),
        None => "null".to_string(),
    }
}

/// Merge two versions of a container field.
///
/// `evolvesTo` and `/text` contexts prefer whichever side is present;
/// every other container disagreement escalates, even when one side is
/// absent or empty. Absence and emptiness are distinct signals here.
pub fn merge_container<T: PartialEq + Debug>(
    context: &str,
    incoming: Option<T>,
    existing: Option<T>,
    resolver: &mut dyn ConflictResolver,
) -> Option<T> {
    if incoming == existing {
        return existing;
    }
    if context.ends_with("evolvesTo") || context.ends_with("/text") {
        if existing.is_none() {
            return incoming;
        }
        if incoming.is_none() {
            return existing;
        }
    }
    match resolver.pick(context, &render(&existing), &render(&incoming)) {
        Choice::Existing => existing,
        Choice::Incoming => incoming,
    }
}

// ============================================================================
// Record Merging
// ============================================================================

/// Reconcile two canonical cards claiming the same identity, field by
/// field. The incoming card is typically a fresh import, the existing one
/// a previously canonicalized record.
pub fn merge_cards(
    incoming: CanonicalCard,
    existing: CanonicalCard,
    resolver: &mut dyn ConflictResolver,
) -> CanonicalCard {
    let ctx = |field: &str| format!("{}/{}", incoming.id, field);

    CanonicalCard {
        id: existing.id.clone(),
        enum_id: merge_required(&ctx("enumId"), incoming.enum_id, existing.enum_id, resolver),
        name: merge_required(&ctx("name"), incoming.name, existing.name, resolver),
        number: existing.number.clone(),
        pio_id: merge_text(&ctx("pioId"), incoming.pio_id, existing.pio_id, resolver),
        artist: merge_text(&ctx("artist"), incoming.artist, existing.artist, resolver),
        rarity: merge_required(&ctx("rarity"), incoming.rarity, existing.rarity, resolver),
        super_type: merge_required(
            &ctx("superType"),
            incoming.super_type,
            existing.super_type,
            resolver,
        ),
        sub_types: merge_container(
            &ctx("subTypes"),
            Some(incoming.sub_types),
            Some(existing.sub_types),
            resolver,
        )
        .unwrap_or_default(),
        types: merge_container(&ctx("types"), incoming.types, existing.types, resolver),
        hp: merge_scalar(&ctx("hp"), incoming.hp, existing.hp, resolver),
        retreat_cost: merge_scalar(
            &ctx("retreatCost"),
            incoming.retreat_cost,
            existing.retreat_cost,
            resolver,
        ),
        weaknesses: merge_container(
            &ctx("weaknesses"),
            incoming.weaknesses,
            existing.weaknesses,
            resolver,
        ),
        resistances: merge_container(
            &ctx("resistances"),
            incoming.resistances,
            existing.resistances,
            resolver,
        ),
        moves: merge_container(&ctx("moves"), incoming.moves, existing.moves, resolver),
        abilities: merge_container(
            &ctx("abilities"),
            incoming.abilities,
            existing.abilities,
            resolver,
        ),
        national_pokedex_number: merge_scalar(
            &ctx("nationalPokedexNumber"),
            incoming.national_pokedex_number,
            existing.national_pokedex_number,
            resolver,
        ),
        evolves_from: merge_text(
            &ctx("evolvesFrom"),
            incoming.evolves_from,
            existing.evolves_from,
            resolver,
        ),
        evolves_to: merge_container(
            &ctx("evolvesTo"),
            incoming.evolves_to,
            existing.evolves_to,
            resolver,
        ),
        text: merge_container(&ctx("text"), incoming.text, existing.text, resolver),
        set: incoming.set.or(existing.set),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Resolver that fails the test if any conflict escalates.
    struct NoEscalation;

    impl ConflictResolver for NoEscalation {
        fn pick(&mut self, context: &str, _existing: &str, _incoming: &str) -> Choice {
            panic!("unexpected escalation for {}", context);
        }

        fn pick_text(&mut self, context: &str, _existing: &str, _incoming: &str) -> TextChoice {
            panic!("unexpected escalation for {}", context);
        }
    }

    /// Resolver counting escalations while always keeping the existing side.
    #[derive(Default)]
    struct Counting {
        calls: usize,
    }

    impl ConflictResolver for Counting {
        fn pick(&mut self, _context: &str, _existing: &str, _incoming: &str) -> Choice {
            self.calls += 1;
            Choice::Existing
        }

        fn pick_text(&mut self, _context: &str, _existing: &str, _incoming: &str) -> TextChoice {
            self.calls += 1;
            TextChoice::Existing
        }
    }

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn equal_values_never_escalate() {
        let mut r = NoEscalation;
        assert_eq!(merge_text("c/name", s("Alakazam"), s("Alakazam"), &mut r), s("Alakazam"));
        assert_eq!(merge_scalar("c/hp", Some(60), Some(60), &mut r), Some(60));
        assert_eq!(
            merge_container("c/types", Some(vec!["P"]), Some(vec!["P"]), &mut r),
            Some(vec!["P"])
        );
        assert_eq!(merge_text("c/artist", None, None, &mut r), None);
    }

    #[test]
    fn text_blank_collapses_to_absent() {
        let mut r = NoEscalation;
        assert_eq!(merge_text("c/artist", s("  "), s(""), &mut r), None);
        assert_eq!(merge_text("c/artist", s(" Ken Sugimori "), None, &mut r), s("Ken Sugimori"));
        assert_eq!(merge_text("c/artist", s("   "), s("Mitsuhiro Arita"), &mut r), s("Mitsuhiro Arita"));
    }

    #[test]
    fn scalar_null_shortcut_both_directions() {
        let mut r = NoEscalation;
        assert_eq!(merge_scalar("c/hp", Some(120), None, &mut r), Some(120));
        assert_eq!(merge_scalar("c/hp", None, Some(120), &mut r), Some(120));
    }

    #[test]
    fn scalar_disagreement_escalates() {
        let mut r = Scripted::always("2");
        assert_eq!(merge_scalar("c/hp", Some(130), Some(120), &mut r), Some(130));
        let mut r = Scripted::always("1");
        assert_eq!(merge_scalar("c/hp", Some(130), Some(120), &mut r), Some(120));
    }

    #[test]
    fn scripted_pick_two_keeps_incoming_text() {
        // Old "Alice", new "Bob", always answer 2: the incoming value wins.
        let mut r = Scripted::always("2");
        assert_eq!(merge_text("c/artist", s("Bob"), s("Alice"), &mut r), s("Bob"));
    }

    #[test]
    fn scripted_replacement_becomes_binding() {
        let mut r = Scripted::always("Charlie");
        assert_eq!(merge_text("c/artist", s("Bob"), s("Alice"), &mut r), s("Charlie"));
    }

    #[test]
    fn containers_escalate_even_when_one_side_is_empty() {
        let mut r = Counting::default();
        let empty: Option<Vec<String>> = Some(vec![]);
        let full = Some(vec!["P".to_string()]);
        merge_container("c/types", full.clone(), empty.clone(), &mut r);
        assert_eq!(r.calls, 1);
        merge_container("c/types", full.clone(), None, &mut r);
        assert_eq!(r.calls, 2);
        merge_container("c/types", None, full, &mut r);
        assert_eq!(r.calls, 3);
    }

    #[test]
    fn evolves_to_and_text_contexts_prefer_the_present_side() {
        let mut r = NoEscalation;
        let lines = Some(vec!["Draw a card.".to_string()]);
        assert_eq!(
            merge_container("101-2/evolvesTo", lines.clone(), None, &mut r),
            lines
        );
        assert_eq!(
            merge_container("101-2/evolvesTo", None, lines.clone(), &mut r),
            lines
        );
        assert_eq!(merge_container("101-2/text", None, lines.clone(), &mut r), lines);
    }

    #[test]
    fn console_resolver_reprompts_on_invalid_input() {
        let input = Cursor::new(b"x\n\n2\n".to_vec());
        let mut out = Vec::new();
        let mut r = ConsoleResolver::new(input, &mut out);
        assert_eq!(r.pick("c/hp", "120", "130"), Choice::Incoming);
        let transcript = String::from_utf8(out).unwrap();
        // Three prompts: two invalid lines, then the accepted selector.
        assert_eq!(transcript.matches("Pick one").count(), 3);
    }

    #[test]
    fn console_resolver_replacement_flow() {
        // 3 then a blank line returns to selection; 3 then text binds it.
        let input = Cursor::new(b"3\n\n3\nMitsuhiro Arita\n".to_vec());
        let mut out = Vec::new();
        let mut r = ConsoleResolver::new(input, &mut out);
        assert_eq!(
            r.pick_text("c/artist", "Alice", "Bob"),
            TextChoice::Replacement("Mitsuhiro Arita".to_string())
        );
    }

    #[test]
    fn merge_cards_is_deterministic_with_scripted_answers() {
        use crate::builder::CardBuilder;
        use crate::models::RawCard;

        let make = |hp: &str, artist: &str| {
            let mut builder = CardBuilder::new();
            let raw = RawCard {
                name: "Pikachu".to_string(),
                number: "25".to_string(),
                supertype: "Pok\u{e9}mon".to_string(),
                subtype: Some("Basic".to_string()),
                rarity: Some("Common".to_string()),
                hp: Some(hp.to_string()),
                artist: Some(artist.to_string()),
                types: Some(vec!["Lightning".to_string()]),
                set_code: "base1".to_string(),
                ..RawCard::default()
            };
            builder.build(&raw).unwrap()
        };

        let run = || {
            let mut resolver = Scripted::sequence(["2", "1"]);
            merge_cards(make("60", "Bob"), make("50", "Alice"), &mut resolver)
        };
        let first = run();
        let second = run();
        assert_eq!(first, second);
        // Conflicts surface in field order: artist first (answered 2,
        // keeping the incoming side), then hp (answered 1).
        assert_eq!(first.artist, Some("Bob".to_string()));
        assert_eq!(first.hp, Some(50));
    }

    #[test]
    fn scripted_sequence_repeats_last_answer() {
        let mut r = Scripted::sequence(["1", "2"]);
        assert_eq!(r.pick("c", "a", "b"), Choice::Existing);
        assert_eq!(r.pick("c", "a", "b"), Choice::Incoming);
        assert_eq!(r.pick("c", "a", "b"), Choice::Incoming);
    }
}
