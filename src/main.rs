fn main() {
    if let Err(err) = mindease::cli::main() {
        eprintln!("❌ Error: {err}");
        std::process::exit(1);
    }
}
