//! Build script for the beacon firmware
//!
//! Supplies the ESP32 linker scripts when building for the Xtensa target.
//! Host builds (tests) need nothing.

use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    if arch == "xtensa" {
        println!("cargo:rustc-link-arg=-Tlinkall.x");
        println!("cargo:rustc-link-arg=-Tdefmt.x");
    }
}
