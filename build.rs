use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=SHORE_LIB_DIR");
    println!("cargo:rerun-if-changed=shim/shore_c.h");

    // Without the `shore` feature the crate only exposes the native traits.
    if env::var_os("CARGO_FEATURE_SHORE").is_none() {
        return;
    }

    if let Some(dir) = env::var_os("SHORE_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
    }
    println!("cargo:rustc-link-lib=dylib=shore_c");
    println!("cargo:rustc-link-lib=dylib=Shore");
}
