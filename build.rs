use std::{env, process::Command};

const SHA_ENV: &str = "STOREFRONT_AUTH_GIT_SHA";

/// Commit to stamp into `--version`. An explicit `STOREFRONT_AUTH_GIT_SHA`
/// wins so release builds from a source tarball can still carry one.
fn commit_sha() -> Option<String> {
    if let Ok(sha) = env::var(SHA_ENV) {
        return Some(sha);
    }

    let output = Command::new("git")
        .args(["rev-parse", "--short=12", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())?;

    String::from_utf8(output.stdout).ok()
}

fn main() {
    println!("cargo:rerun-if-env-changed={SHA_ENV}");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let sha = commit_sha()
        .map(|sha| sha.trim().to_string())
        .filter(|sha| !sha.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env={SHA_ENV}={sha}");
}
