use locstack::core::output;

fn main() {
    if let Err(e) = locstack::run() {
        output::fatal(&e.to_string());
        std::process::exit(1);
    }
}
