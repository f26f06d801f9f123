// Look up words in an optimized-lookup transducer.
//
//   cargo run -p hfst-ol --example lookup_words -- analyser.hfstol talossa koira
//   HFST_OL_TRANSDUCER=analyser.hfstol cargo run -p hfst-ol --example lookup_words -- talossa
use hfst_ol::{Engine, LookupConfig};

fn main() {
    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let path = match transducer_path(&mut args, std::env::var("HFST_OL_TRANSDUCER").ok()) {
        Some(path) => path,
        None => {
            eprintln!("usage: lookup_words <transducer> <word>...");
            std::process::exit(2);
        }
    };

    let engine = Engine::open(&path)
        .expect("Failed to load transducer")
        .with_config(LookupConfig::from_env());
    println!("Loaded {path}: {engine:?}");

    for word in &args {
        let analyses = engine.lookup(word);
        if analyses.is_empty() {
            println!("{word}\t{word}\t+?");
        }
        for analysis in &analyses {
            match analysis.weight {
                Some(weight) => println!("{word}\t{}\t{weight}", analysis.output),
                None => println!("{word}\t{}", analysis.output),
            }
        }
        println!();
    }
}

/// The transducer path: the first argument when it names a file or when
/// `HFST_OL_TRANSDUCER` is unset, else the environment value. A consumed
/// argument is removed from `args`.
fn transducer_path(args: &mut Vec<String>, env_path: Option<String>) -> Option<String> {
    let first_is_file = args
        .first()
        .is_some_and(|arg| std::path::Path::new(arg).is_file());
    if first_is_file || (env_path.is_none() && !args.is_empty()) {
        return Some(args.remove(0));
    }
    env_path
}
