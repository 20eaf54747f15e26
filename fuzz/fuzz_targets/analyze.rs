#![no_main]

use kinship_core::analyze;
use kinship_core::relations::Relation;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let root = kinship_core::default_root(text).unwrap_or_default();

    // Cycles reachable from the root are a reported error, never a panic.
    let Ok(analysis) = analyze(text, &root) else {
        return;
    };

    for (_, matrix) in analysis.relations.iter() {
        assert!(!matrix.has_diagonal());
    }
    assert!(analysis.relations.get(Relation::Sibling).is_symmetric());

    let score = analysis.score();
    assert!(score.total.is_finite() && score.total >= 0.0);
    assert!(score.normalized.is_finite() && score.normalized >= 0.0);
});
