use std::env;
use std::process::ExitCode;
use vcg_compiler::{logging, pipeline};

fn main() -> ExitCode {
    if let Err(error) = vcg_compiler::init() {
        eprintln!("Initialization failed: {}", error);
        return ExitCode::FAILURE;
    }

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <file.vcg> [more files ...]", args[0]);
        eprintln!("       {} --help", args[0]);
        return ExitCode::FAILURE;
    }

    if args[1] == "--help" {
        print_help(&args[0]);
        return ExitCode::SUCCESS;
    }

    let mut failures = 0usize;
    for file_path in &args[1..] {
        if !compile_one(file_path) {
            failures += 1;
        }
    }

    logging::print_error_summary();

    if failures > 0 {
        eprintln!("{} file(s) failed to compile", failures);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn compile_one(file_path: &str) -> bool {
    println!("Compiling: {}", file_path);

    match pipeline::process_file(file_path) {
        Ok(result) => {
            println!("  {}", result.summary());

            for (package, entry) in &result.module.imports {
                let mut detail = String::new();
                if entry.is_static {
                    detail.push_str(" (static)");
                }
                if !entry.alias.is_empty() {
                    detail.push_str(&format!(" as {}", entry.alias));
                }
                println!("  import {}{}", package, detail);
            }

            for (name, root) in &result.module.rules {
                let callback = result
                    .module
                    .callback_for(name)
                    .map(|cb| format!(" @{}", cb))
                    .unwrap_or_default();
                println!("  ${}{} = {}", name, callback, root);
            }

            if let Some(companion) = &result.module.companion_path {
                println!("  companion: {}", companion.display());
            }
            true
        }
        Err(error) => {
            eprintln!("  FAILED ({}): {}", error.stage(), error);
            false
        }
    }
}

fn print_help(program_name: &str) {
    println!("VCG Compiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Compiles VCG voice-command grammar files to hierarchical rule trees");
    println!();
    println!("USAGE:");
    println!("    {} <file.vcg> [more files ...]", program_name);
    println!();
    println!("Each file is compiled independently, in order. A failing file does");
    println!("not stop the run; the exit code is nonzero if any file failed.");
    println!();
    println!("OUTPUT:");
    println!("    Per file: imports, compiled rules (re-rendered), companion script");
    println!("    After all files: grouped error summary");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_compile_one_success_and_failure() {
        let dir = tempdir().unwrap();

        let good = dir.path().join("good.vcg");
        fs::write(&good, "$r = hello;\n").unwrap();
        assert!(compile_one(good.to_str().unwrap()));

        let bad = dir.path().join("bad.vcg");
        fs::write(&bad, "$r = a{3,1};\n").unwrap();
        assert!(!compile_one(bad.to_str().unwrap()));
    }
}
