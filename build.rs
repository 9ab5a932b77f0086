//! Embeds the short git commit and build date so `--version` identifies
//! exactly which build the host bridge is talking to.

fn main() {
    let commit = commit_hash().unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=GIT_COMMIT={}", commit);
    println!(
        "cargo:rustc-env=BUILD_DATE={}",
        chrono::Utc::now().format("%Y-%m-%d")
    );

    println!("cargo:rerun-if-changed=.git/HEAD");
    if let Some(reference) = checked_out_ref() {
        println!("cargo:rerun-if-changed=.git/{}", reference);
    }
}

fn commit_hash() -> Option<String> {
    let output = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    Some(hash.trim().to_string())
}

fn checked_out_ref() -> Option<String> {
    let head = std::fs::read_to_string(".git/HEAD").ok()?;
    let reference = head.trim().strip_prefix("ref: ")?.trim();
    if reference.is_empty() {
        None
    } else {
        Some(reference.to_string())
    }
}
