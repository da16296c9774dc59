// Classify every roll of three dice by its total and print the flat table.
//
// Run: cargo run -p flatdfa-build --example dice_totals
//      FLATDFA_LOG=debug cargo run -p flatdfa-build --example dice_totals

use flatdfa_build::{BuildOptions, DfaBuilder};
use flatdfa_core::{Sample, Shape};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("FLATDFA_LOG").unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    // Faces are symbols 0..6 for pips 1..=6; the value is the pip total.
    let shape = Shape::new(6, 3).expect("valid shape");
    let mut samples = Vec::new();
    for a in 0..6u32 {
        for b in 0..6u32 {
            for c in 0..6u32 {
                let total = (a + b + c + 3) as i32;
                samples.push(Sample::new([a, b, c], total));
            }
        }
    }

    let mut builder = DfaBuilder::new(shape, BuildOptions::default());
    builder.insert_all(&samples).expect("no conflicting rolls");
    println!("{}", builder.stats());

    let table = builder.finish().expect("table fits");
    table.check_samples(&samples).expect("every roll classifies");
    table.check_minimal().expect("no duplicate rows");

    for height in (1..=shape.word_length()).rev() {
        let states = table.states_at_height(height);
        println!("height {height}: states {states:?}");
        for state in states {
            let base = state * shape.alphabet_size();
            let row = &table.transitions()[base..base + shape.alphabet_size()];
            println!("  {state:>2} @ {base:>3}: {row:?}");
        }
    }

    for roll in [[0, 0, 0], [2, 3, 5], [5, 5, 5]] {
        let total = table.lookup(&roll).expect("valid roll");
        println!("{:?} -> {total:?}", roll.map(|face| face + 1));
    }
}
