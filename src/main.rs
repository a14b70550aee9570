fn main() {
    if let Err(err) = study_reconcile::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
