// build.rs
use std::process::Command;

fn main() {
    let git_commit = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    // Shown by `awsgraph --version`
    println!("cargo:rustc-env=AWSGRAPH_GIT_COMMIT={}", git_commit);
    println!("cargo:rerun-if-changed=.git/HEAD");
}
