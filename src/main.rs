use colored::Colorize;

fn main() {
    let code = match benchsweep::run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e:?}", "ERROR".red());
            benchsweep::EXIT_FATAL
        }
    };
    std::process::exit(code);
}
