//! Property-based tests for template compilation and rendering.

use logtemplate::{Template, Value, ORIGINAL_FORMAT_KEY};
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

/// Literal text that contains no braces.
fn literal_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,:!?-]{0,12}"
}

/// A placeholder name: no braces, commas or colons.
fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,8}"
}

/// Alternating literal / placeholder segments.
fn segments_strategy() -> impl Strategy<Value = (Vec<(String, String)>, String)> {
    (
        prop::collection::vec((literal_strategy(), name_strategy()), 0..6),
        literal_strategy(),
    )
}

fn build(segments: &[(String, String)], tail: &str) -> (String, String) {
    let mut template = String::new();
    let mut positional = String::new();
    for (index, (literal, name)) in segments.iter().enumerate() {
        template.push_str(&format!("{}{{{}}}", literal, name));
        positional.push_str(&format!("{}{{{}}}", literal, index));
    }
    template.push_str(tail);
    positional.push_str(tail);
    (template, positional)
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Text without braces compiles to itself and renders unchanged.
    #[test]
    fn brace_free_text_round_trips(text in "[^{}]{0,40}") {
        let template = Template::compile(text.clone());
        prop_assert!(template.placeholder_names().is_empty());
        prop_assert_eq!(template.positional_format(), text.as_str());
        prop_assert_eq!(template.render(&[]).unwrap(), text.clone());

        let pairs = template.structured_values(&[]).unwrap();
        prop_assert_eq!(pairs, vec![(ORIGINAL_FORMAT_KEY, Value::String(text))]);
    }

    /// Every placeholder becomes the next ordinal, names kept in order.
    #[test]
    fn placeholders_become_ordinals((segments, tail) in segments_strategy()) {
        let (text, expected) = build(&segments, &tail);
        let template = Template::compile(text.as_str());

        let names: Vec<&str> = segments.iter().map(|(_, name)| name.as_str()).collect();
        prop_assert_eq!(template.placeholder_names(), names.as_slice());
        prop_assert_eq!(template.positional_format(), expected.as_str());
        prop_assert_eq!(template.original_format(), text.as_str());
    }

    /// Rendering substitutes each slot with its own value.
    #[test]
    fn render_substitutes_in_order(
        (segments, tail) in segments_strategy(),
        seed in any::<i64>(),
    ) {
        let (text, _) = build(&segments, &tail);
        let template = Template::compile(text);
        let values: Vec<Value> = (0..segments.len())
            .map(|i| Value::from(seed.wrapping_add(i as i64)))
            .collect();

        let mut expected = String::new();
        for (i, (literal, _)) in segments.iter().enumerate() {
            expected.push_str(literal);
            expected.push_str(&seed.wrapping_add(i as i64).to_string());
        }
        expected.push_str(&tail);

        prop_assert_eq!(template.render(&values).unwrap(), expected);
    }

    /// Structured output has one pair per placeholder plus the sentinel, last.
    #[test]
    fn structured_values_end_with_sentinel(
        (segments, tail) in segments_strategy(),
        extra in 0usize..3,
    ) {
        let (text, _) = build(&segments, &tail);
        let template = Template::compile(text.clone());
        let values: Vec<Value> = (0..segments.len() + extra).map(Value::from).collect();

        let pairs = template.structured_values(&values).unwrap();
        prop_assert_eq!(pairs.len(), segments.len() + 1);
        let last = pairs.last().unwrap();
        prop_assert_eq!(last.0, ORIGINAL_FORMAT_KEY);
        prop_assert_eq!(&last.1, &Value::String(text));
    }

    /// Too few values fail on both paths, never panic.
    #[test]
    fn under_supply_always_errors((segments, tail) in segments_strategy()) {
        prop_assume!(!segments.is_empty());
        let (text, _) = build(&segments, &tail);
        let template = Template::compile(text);
        let values: Vec<Value> = (0..segments.len() - 1).map(Value::from).collect();

        prop_assert!(template.render(&values).is_err());
        prop_assert!(template.structured_values(&values).is_err());
    }

    /// Compilation accepts anything, and the slot count matches the names.
    #[test]
    fn compile_never_panics(text in "[{}a-z,:0-9 ]{0,30}") {
        let template = Template::compile(text.clone());
        prop_assert_eq!(template.original_format(), text.as_str());

        let count = template.placeholder_names().len();
        let values: Vec<Value> = (0..count).map(Value::from).collect();
        let pairs = template.structured_values(&values).unwrap();
        prop_assert_eq!(pairs.len(), count + 1);
        // Rendering may fail on stray braces but must not panic.
        let _ = template.render(&values);
    }
}
