//! Compiles the clown68000 interpreter when the `clown68000` feature is on.
//!
//! The interpreter sources are looked up in `$CLOWN68000_DIR`, falling back
//! to a `clown68000/` checkout next to this manifest.

use std::env;
use std::path::{Path, PathBuf};

fn sources(root: &Path, dir: &str) -> Vec<PathBuf> {
    let pattern = format!("{}/{dir}/*.c", glob::Pattern::escape(&root.to_string_lossy()));
    glob::glob(&pattern)
        .expect("valid source pattern")
        .filter_map(Result::ok)
        .collect()
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=csrc/clown_shim.c");
    println!("cargo:rerun-if-env-changed=CLOWN68000_DIR");

    if env::var_os("CARGO_FEATURE_CLOWN68000").is_none() {
        return;
    }

    let manifest = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").expect("set by cargo"));
    let root = env::var_os("CLOWN68000_DIR").map_or_else(|| manifest.join("clown68000"), PathBuf::from);

    let mut files = sources(&root, "interpreter");
    assert!(
        !files.is_empty(),
        "no clown68000 sources under {}; set CLOWN68000_DIR",
        root.join("interpreter").display()
    );
    files.extend(sources(&root, "common"));
    println!("cargo:rerun-if-changed={}", root.display());

    cc::Build::new()
        .include(&root)
        .file(manifest.join("csrc/clown_shim.c"))
        .files(&files)
        .warnings(false)
        .compile("clown68000");
}
