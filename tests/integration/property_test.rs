//! Property tests for substitution and scope parsing.

use proptest::prelude::*;
use rq_core::environment::parse_scope;
use rq_core::variables::Engine;
use std::collections::HashMap;
use std::path::Path;

fn engine() -> Engine {
    let mut env = HashMap::new();
    env.insert("NAME".to_string(), "value".to_string());
    Engine::new(env)
}

proptest! {
    #[test]
    fn text_without_placeholders_is_unchanged(text in "\\PC*") {
        prop_assume!(!text.contains("{{"));
        prop_assert_eq!(engine().resolve(&text).unwrap(), text);
    }

    #[test]
    fn text_around_placeholder_is_preserved(
        prefix in "[^{}]*",
        suffix in "[^{}]*",
    ) {
        let template = format!("{}{{{{ NAME }}}}{}", prefix, suffix);
        let resolved = engine().resolve(&template).unwrap();
        prop_assert_eq!(resolved, format!("{}value{}", prefix, suffix));
    }

    #[test]
    fn join_uses_last_argument_as_separator(
        parts in prop::collection::vec("[a-z0-9]{0,6}", 1..6),
        separator in "[-_:/|]{1,2}",
    ) {
        let mut args: Vec<String> = parts.iter().map(|p| format!("'{}'", p)).collect();
        args.push(format!("'{}'", separator));
        let template = format!("{{{{join({})}}}}", args.join(", "));

        prop_assert_eq!(engine().resolve(&template).unwrap(), parts.join(separator.as_str()));
    }

    #[test]
    fn scope_keys_and_values_are_trimmed(
        key in "[A-Za-z_][A-Za-z0-9_]{0,10}",
        value in "[a-z0-9=/:. ]{0,20}",
        pad in " {0,3}",
    ) {
        let content = format!("{pad}{key}{pad}={pad}{value}{pad}\n");
        let vars = parse_scope(&content, Path::new(".env")).unwrap();
        prop_assert_eq!(vars.get(&key).map(String::as_str), Some(value.trim()));
    }
}
