//! Generates bindings for `catalog.json` into `OUT_DIR`.

use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};

fn main() -> Result<(), Box<dyn Error>> {
    let catalog = Path::new("catalog.json");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}", catalog.display());

    let code = convexgen::codegen::generate_from_file(catalog)?;
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    std::fs::write(out_dir.join(convexgen::DEFAULT_FILE_NAME), code)?;
    Ok(())
}
