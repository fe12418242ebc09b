fn main() {
    if let Err(error) = iocane::cli::run(std::env::args_os()) {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}
