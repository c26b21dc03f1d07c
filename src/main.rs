fn main() {
    if let Err(err) = sheet_courier::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
