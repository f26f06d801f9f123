// Criterion benchmarks for hfst-ol.
//
// Requires a compiled optimized-lookup transducer. Set HFST_OL_TRANSDUCER to
// its path. If it is not set the file-based benchmarks print a message and
// run no-op iterations; the synthetic benchmark always runs.
//
// Run:
//   HFST_OL_TRANSDUCER=/path/to/analyser.hfstol cargo bench -p hfst-ol

use criterion::{Criterion, criterion_group, criterion_main};
use hfst_ol::transition::{Transition, TransitionIndex};
use hfst_ol::{Engine, TRANSITION_TARGET_TABLE_START as T, TransducerHeader};

const WORDS: &[&str] = &[
    "koira", "kissa", "talo", "auto", "vesi", "metsä", "järvi", "puu", "kukka", "meri", "joki",
    "saari", "vuori", "lapsi", "nainen", "mies", "poika", "tyttö", "äiti", "isä", "koulu",
    "kauppa", "kirjasto", "sairaala", "ravintola", "museo", "teatteri", "musiikki", "talossa",
    "kirjastoon", "asdfxyz",
];

fn find_transducer() -> Option<std::path::PathBuf> {
    let path = std::path::PathBuf::from(std::env::var("HFST_OL_TRANSDUCER").ok()?);
    path.exists().then_some(path)
}

/// One final state with a self-loop per lowercase ASCII letter, entered
/// from the start index state; accepts and echoes any lowercase word.
fn synthetic_transducer() -> Vec<u8> {
    let mut symbols = vec![String::new()];
    symbols.extend(('a'..='z').map(String::from));

    let mut indices = vec![TransitionIndex::empty(), TransitionIndex::empty()];
    let mut transitions = vec![Transition::state(true)];
    for letter in 1..=26u16 {
        indices.push(TransitionIndex::new(letter, T + letter as u32));
        transitions.push(Transition::new(letter, letter, T));
    }

    let header = TransducerHeader {
        number_of_input_symbols: symbols.len() as u16,
        number_of_symbols: symbols.len() as u16,
        size_of_transition_index_table: indices.len() as u32,
        size_of_transition_target_table: transitions.len() as u32,
        ..TransducerHeader::default()
    };
    let mut data = header.to_bytes().to_vec();
    for s in &symbols {
        data.extend_from_slice(s.as_bytes());
        data.push(0);
    }
    for index in &indices {
        data.extend_from_slice(&index.to_bytes());
    }
    for transition in &transitions {
        data.extend_from_slice(&transition.to_bytes());
    }
    data
}

fn bench_load(c: &mut Criterion) {
    let Some(path) = find_transducer() else {
        eprintln!("[bench_load] HFST_OL_TRANSDUCER not set; skipping");
        c.bench_function("load (skipped)", |b| b.iter(|| {}));
        return;
    };
    let data = std::fs::read(&path).expect("failed to read transducer");

    c.bench_function("load", |b| {
        b.iter(|| std::hint::black_box(Engine::from_bytes(&data).expect("Engine")));
    });
}

fn bench_lookup_words(c: &mut Criterion) {
    let Some(path) = find_transducer() else {
        eprintln!("[bench_lookup_words] HFST_OL_TRANSDUCER not set; skipping");
        c.bench_function("lookup_words (skipped)", |b| b.iter(|| {}));
        return;
    };
    let engine = Engine::open(&path).expect("Engine");

    c.bench_function("lookup_words", |b| {
        b.iter(|| {
            for word in WORDS {
                std::hint::black_box(engine.lookup(word));
            }
        });
    });
}

fn bench_synthetic(c: &mut Criterion) {
    let engine = Engine::from_bytes(&synthetic_transducer()).expect("Engine");
    let word = "thequickbrownfoxjumpsoverthelazydog";
    assert_eq!(engine.lookup(word).len(), 1);

    c.bench_function("synthetic_lookup", |b| {
        b.iter(|| std::hint::black_box(engine.lookup(word)));
    });
    c.bench_function("synthetic_tokenize", |b| {
        b.iter(|| std::hint::black_box(engine.tokenize(word)));
    });
}

criterion_group!(benches, bench_load, bench_lookup_words, bench_synthetic);
criterion_main!(benches);
