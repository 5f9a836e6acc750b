//! Fuzz target for party file parsing
//!
//! Malformed party files must fail cleanly
//!
//! # Invariants
//!
//! - Parsing arbitrary text as JSON or YAML NEVER panics
//! - A parsed roster has unique, non-empty names
//! - Rendering a parsed roster's entries and parsing again keeps names,
//!   addresses and forbidden lists

#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use tinsel_cli::{
    parse_party,
    party::{PartyFormat, render_next_cycle},
};
use tinsel_core::NextCycleEntry;

fuzz_target!(|text: &str| {
    for file in ["fuzz.json", "fuzz.yaml"] {
        check(text, Path::new(file));
    }
});

fn check(text: &str, path: &Path) {
    let Ok(roster) = parse_party(text, path) else {
        return;
    };

    let mut names = std::collections::HashSet::new();
    for p in roster.iter() {
        assert!(!p.name().is_empty());
        assert!(names.insert(p.name()), "duplicate name {}", p.name());
    }

    let entries: Vec<NextCycleEntry> = roster
        .iter()
        .map(|p| NextCycleEntry {
            name: p.name().to_string(),
            address: p.address().to_string(),
            forbidden: p.forbidden().to_vec(),
        })
        .collect();
    let Ok(rendered) = render_next_cycle(&entries, PartyFormat::from_path(path)) else {
        panic!("rendering parsed entries failed");
    };
    let Ok(again) = parse_party(&rendered, path) else {
        panic!("re-parse failed:\n{rendered}");
    };

    assert_eq!(again.len(), roster.len());
    for (a, b) in roster.iter().zip(again.iter()) {
        assert_eq!(a.name(), b.name());
        assert_eq!(a.address(), b.address());
        assert_eq!(a.forbidden(), b.forbidden());
    }
}
