// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Randomized add/remove sequences: after every rebuild the table must match
// the size formula, removed methods must keep their rows as placeholders and
// every live method must sit at the row its external index names.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_panics_doc)]

use dynmeta::config::{
    header, CLASS_INFO_WORDS, HEADER_WORDS, METHOD_WORDS, PROPERTY_NOTIFY_WORDS, PROPERTY_WORDS,
};
use dynmeta::signature::{method_name, parameter_count};
use dynmeta::{CompilerConfig, DynamicMetaObject, MethodKind, PropertySpec};
use std::collections::HashMap;

const SEEDS: [u64; 4] = [0x5EED, 42, 0xDEAD_BEEF, 7];
const STEPS: usize = 300;

const PARAMS: [&str; 6] = [
    "",
    "int",
    "int,QString",
    "double,bool,Gadget*",
    "QList<int>",
    "QMap<QString,int>,uint",
];
const KINDS: [MethodKind; 3] = [MethodKind::Signal, MethodKind::Slot, MethodKind::Method];

/// Live methods as tracked outside the registry: external index -> entry.
type Model = HashMap<usize, (MethodKind, String)>;

fn random_signature(rng: &mut fastrand::Rng) -> String {
    format!("m{}({})", rng.usize(0..12), PARAMS[rng.usize(0..PARAMS.len())])
}

fn expected_size(model: &Model, rows: usize, properties: usize, class_info: usize) -> usize {
    let live_parameter_words: usize = model
        .values()
        .map(|(_, signature)| 1 + 2 * parameter_count(signature))
        .sum();
    // a placeholder row keeps one return-type word
    let placeholder_words = rows - model.len();
    HEADER_WORDS
        + CLASS_INFO_WORDS * class_info
        + METHOD_WORDS * rows
        + (PROPERTY_WORDS + PROPERTY_NOTIFY_WORDS) * properties
        + 1
        + live_parameter_words
        + placeholder_words
}

fn run(seed: u64) {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut meta = DynamicMetaObject::new("Fuzzed", 3, 2, CompilerConfig::default());
    let mut model = Model::new();
    let mut properties = 0;
    let mut class_info = 0;

    for step in 0..STEPS {
        match rng.u8(0..10) {
            0..=4 => {
                let kind = KINDS[rng.usize(0..KINDS.len())];
                let signature = random_signature(&mut rng);
                let index = meta.add_method(kind, &signature, "void");
                let normalized = dynmeta::signature::normalize_signature(&signature);
                if let Some((existing_kind, existing)) = model.get(&index) {
                    assert_eq!((*existing_kind, existing.as_str()), (kind, normalized.as_str()));
                }
                assert!(index > 3, "index {index} collides with inherited methods");
                model.insert(index, (kind, normalized));
            }
            5..=7 if !model.is_empty() => {
                let mut live: Vec<usize> = model.keys().copied().collect();
                live.sort_unstable();
                let index = live[rng.usize(0..live.len())];
                let kind = model[&index].0;
                assert!(meta.remove_method(kind, index));
                model.remove(&index);
            }
            8 => {
                let name = format!("p{}", rng.usize(0..6));
                let before = meta.registry().property_count();
                meta.add_property(&name, PropertySpec::new("int").notify("m1").into_handle());
                if meta.registry().property_count() > before {
                    properties += 1;
                }
            }
            _ => {
                let key = format!("k{}", rng.usize(0..4));
                if meta.registry().class_info(key.as_bytes()).is_none() {
                    class_info += 1;
                }
                meta.add_class_info(key, format!("v{step}"));
            }
        }

        if step % 7 == 0 {
            let snapshot = meta.rebuild_if_dirty().expect("rebuild");
            let registry = meta.registry();
            let rows = registry.method_slots().len();
            let table = snapshot.table();
            assert_eq!(
                table.len(),
                expected_size(&model, rows, properties, class_info),
                "seed {seed} step {step}"
            );

            let signals = model.values().filter(|(k, _)| *k == MethodKind::Signal).count();
            assert_eq!(registry.method_count(), model.len());
            assert_eq!(registry.signal_count(), signals);
            assert_eq!(table[header::METHOD_COUNT] as usize, rows);
            assert!(table[header::SIGNAL_COUNT] as usize >= signals);
            assert_eq!(table[header::PROPERTY_COUNT] as usize, properties);
            assert_eq!(table[header::CLASS_INFO_COUNT] as usize, class_info);

            let view = snapshot.view();
            let mut seen_slot = false;
            for i in 0..rows {
                let is_signal = view.method(i).expect("method").flags.kind() == MethodKind::Signal;
                assert!(!(seen_slot && is_signal), "signal after non-signal at {i}");
                seen_slot |= !is_signal;
            }
            assert_eq!(view.signal_count().expect("signals"), snapshot.signal_count());

            // the rebuild may have pulled appended signals forward
            model = model
                .into_values()
                .map(|(kind, signature)| {
                    let index = registry
                        .index_of_method(kind, &signature)
                        .expect("live method");
                    (index, (kind, signature))
                })
                .collect();
            for (index, (kind, signature)) in &model {
                let row = view.method(index - 3 - 1).expect("row");
                assert_eq!(row.name, method_name(signature).as_bytes(), "seed {seed} step {step}");
                assert_eq!(row.flags.kind(), *kind);
            }
        }
    }
}

#[test]
fn test_random_sequences_match_size_formula() {
    for seed in SEEDS {
        run(seed);
    }
}

#[test]
fn test_pool_strings_are_unique() {
    let mut rng = fastrand::Rng::with_seed(99);
    let mut meta = DynamicMetaObject::new("Pool", 0, 0, CompilerConfig::default());
    for _ in 0..80 {
        let signature = random_signature(&mut rng);
        meta.add_slot(&signature, "Gadget*");
    }
    let snapshot = meta.rebuild_if_dirty().expect("rebuild");

    // compact descriptors: the first string starts right after the last one
    let blob = snapshot.string_blob();
    let data_start = u32::from_le_bytes(blob[4..8].try_into().expect("descriptor")) as usize;
    let total = data_start / 8;
    let mut strings: Vec<Vec<u8>> = (0..total)
        .map(|i| snapshot.string(i).expect("pooled string").to_vec())
        .collect();
    strings.sort();
    strings.dedup();
    assert_eq!(strings.len(), total);
    assert!(total >= 2);
}
