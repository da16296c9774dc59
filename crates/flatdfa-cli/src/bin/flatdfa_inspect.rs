// flatdfa-inspect: Print the layout of a built table.
//
// Usage:
//   flatdfa-inspect TABLE [--verify]
//
// Options:
//   --verify                Also check that no two states at a height are equal
//   -h, --help              Print help

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if flatdfa_cli::wants_help(&args) {
        println!("flatdfa-inspect: Print the layout of a built table.");
        println!();
        println!("Usage: flatdfa-inspect TABLE [--verify]");
        println!();
        println!("Options:");
        println!("  --verify                Check the table is minimal");
        println!("  -h, --help              Print this help");
        return;
    }

    flatdfa_cli::init_logging();

    let (verify, args) = flatdfa_cli::take_flag(args, "--verify");
    let [path] = args.as_slice() else {
        flatdfa_cli::fatal("expected exactly one TABLE argument");
    };
    let table = flatdfa_cli::load_table(path).unwrap_or_else(|e| flatdfa_cli::fatal(&e.to_string()));

    println!("alphabet_size: {}", table.alphabet_size());
    println!("word_length:   {}", table.word_length());
    println!("states:        {}", table.state_count());
    println!("slots:         {}", table.slot_count());
    println!("result slots:  {}", table.result_count());
    let nulls = (0..table.slot_count()).filter(|&i| table.is_null(i)).count();
    println!("null slots:    {nulls}");
    match table.shape().word_count() {
        Some(words) => println!("word space:    {words}"),
        None => println!("word space:    > {}", usize::MAX),
    }
    println!("states per height:");
    for height in (1..=table.word_length()).rev() {
        let states = table.states_at_height(height);
        println!("  {height:>4}: {:>8}  (ids {}..{})", states.len(), states.start, states.end);
    }

    if verify {
        match table.check_minimal() {
            Ok(()) => println!("minimal: ok"),
            Err(e) => flatdfa_cli::fatal(&e.to_string()),
        }
    }
}
