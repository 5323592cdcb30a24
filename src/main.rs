//! with-env: run a command with layered `.env` files loaded
//!
//! Loads `.env`, `.env.<environment>`, `.env.local` and `.env.<environment>.local`
//! from the current directory and its ancestors, then executes the given command
//! with the merged environment and exits with the command's exit code.

use std::process;

fn main() {
    match with_env::cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = err
                .downcast_ref::<with_env::Error>()
                .map(with_env::Error::exit_code)
                .unwrap_or(1);
            process::exit(code);
        }
    }
}
