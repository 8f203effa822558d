//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = waybill_cli::run() {
        eprintln!("waybill: {err}");
        std::process::exit(1);
    }
}
