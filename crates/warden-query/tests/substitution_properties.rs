//! Property tests for the substitution engine and splitter

use proptest::prelude::*;
use warden_query::{split_statements, substitute, VariableMap};

fn variable_map() -> impl Strategy<Value = VariableMap> {
    prop::collection::vec(("[A-Za-z_][A-Za-z0-9_]{0,8}", "[a-z0-9]{0,6}"), 0..5)
        .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    /// Text without any sigil is never changed
    #[test]
    fn text_without_sigils_is_unchanged(text in "[^$:&]{0,80}", vars in variable_map()) {
        prop_assert_eq!(substitute(&text, &vars), text);
    }

    /// A sigil glued to a preceding word character is never rewritten
    #[test]
    fn embedded_sigils_survive(
        prefix in "[A-Za-z0-9_]{1,6}",
        sigil in prop::sample::select(vec!["$", ":", "&", "&&"]),
        name in "[A-Za-z_][A-Za-z0-9_]{0,6}",
    ) {
        let text = format!("{prefix}{sigil}{name}");
        let vars: VariableMap = [(name.clone(), "REPLACED")].into_iter().collect();
        prop_assert_eq!(substitute(&text, &vars), text);
    }

    /// Placeholders for missing names are left as written
    #[test]
    fn misses_are_untouched(name in "[A-Za-z_][A-Za-z0-9_]{0,6}") {
        let text = format!("SELECT :{name}, ${name}, &{name} FROM dual");
        prop_assert_eq!(substitute(&text, &VariableMap::new()), text);
    }

    /// N plain terminated statements always split into N statements
    #[test]
    fn splitter_counts_plain_statements(n in 1usize..12) {
        let script: String = (0..n).map(|i| format!("SELECT {i} FROM t{i};\n")).collect();
        prop_assert_eq!(split_statements(&script).len(), n);
    }
}
