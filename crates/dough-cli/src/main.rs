use std::process;

fn main() {
    match dough_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("dough error: {err}");
            process::exit(1);
        }
    }
}
