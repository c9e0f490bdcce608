// build.rs

//! Stamps the version and build profile reported by `socket-hooks --version`.

use std::env;

/// Release pipelines set this to override the manifest version.
const VERSION_OVERRIDE: &str = "SOCKET_HOOKS_VERSION";

fn main() {
    println!("cargo:rerun-if-env-changed={VERSION_OVERRIDE}");

    let version = match env::var(VERSION_OVERRIDE) {
        Ok(version) if !version.trim().is_empty() => version.trim().to_string(),
        _ => env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "dev".to_string()),
    };
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=CARGO_PKG_VERSION={version}");
    println!("cargo:rustc-env=SOCKET_HOOKS_BUILD_PROFILE={profile}");
}
