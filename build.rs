use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=BUILD_VERSION");

    // Docker builds have no .git, so an explicit BUILD_VERSION wins and an
    // empty string is the fallback.
    let version = std::env::var("BUILD_VERSION").unwrap_or_else(|_| {
        Command::new("git")
            .args(["rev-parse", "--short=8", "HEAD"])
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
            .unwrap_or_default()
    });

    println!("cargo:rustc-env=BUILD_VERSION={}", version);
}
