use clap::Parser;
use probe_table::DEFAULT_CAPACITY;
use probe_table::ProbeTable;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity", default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,
}

fn main() {
    let args = Args::parse();

    println!("Creating ProbeTable with capacity: {}", args.capacity);
    let mut table: ProbeTable<char> = ProbeTable::with_capacity(args.capacity);

    let entries = [
        ("hje", 'c'),
        ("hej", 'w'),
        ("pje", 'd'),
        ("dge", 'g'),
        ("alkje", 't'),
        ("ploke", 'a'),
    ];
    for (key, value) in entries {
        match table.insert(key, value) {
            Ok(None) => println!("inserted {key:?} at home slot {}", table.home_index(key)),
            Ok(Some(previous)) => println!("updated {key:?} (was {previous:?})"),
            Err(full) => println!("skipping {key:?}: {full}"),
        }
    }

    println!("\n{} of {} slots occupied:", table.len(), table.capacity());
    for line in table.dump() {
        println!("{line}");
    }

    println!("\nRemoving \"hje\" (chain repair runs immediately):");
    table.remove("hje");
    for line in table.dump() {
        println!("{line}");
    }

    println!("\nEvery remaining key is still reachable:");
    for (key, value) in table.iter() {
        println!("  {key:?} -> {value:?}");
    }
}
