//! The `sprout` binary: run a SproutScript file, then report on any
//! `test(...)` assertions it recorded.

use sprout_eval::Interpreter;
use sprout_ir::SproutError;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut path: Option<String> = None;
    let mut log = false;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--log" => log = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other if !other.starts_with('-') && path.is_none() => {
                path = Some(other.to_string());
            }
            _ => {
                eprintln!("error: {}", SproutError::InvalidArguments);
                print_usage();
                std::process::exit(1);
            }
        }
    }

    let Some(path) = path else {
        print_usage();
        std::process::exit(1);
    };

    if log {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
            .with_writer(std::io::stderr)
            .init();
    }

    let source = match sproutc::load_source(&path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let mut interp = Interpreter::new();
    if let Err(e) = sproutc::run_source(&source, &mut interp) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    let report = sproutc::render_report(interp.ledger());
    if !report.is_empty() {
        print!("{report}");
    }
}

fn print_usage() {
    println!("SproutScript interpreter");
    println!();
    println!("Usage: sprout <file.sps> [options]");
    println!();
    println!("Options:");
    println!("  --log        Emit debug traces to stderr");
    println!("  -h, --help   Show this help message");
}
