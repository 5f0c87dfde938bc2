use std::process::Command;

/// Runs `git` with `args` and returns its trimmed stdout, if git succeeded.
fn git(args: &[&str]) -> Option<String> {
  let output = Command::new("git").args(args).output().ok()?;
  if !output.status.success() {
    return None;
  }
  let text = String::from_utf8(output.stdout).ok()?;
  let text = text.trim();
  (!text.is_empty()).then(|| text.to_string())
}

fn main() {
  // Shown by `check-license --version`; left unset outside a git checkout.
  if let Some(hash) = git(&["rev-parse", "--short", "HEAD"]) {
    println!("cargo:rustc-env=GIT_HASH={hash}");
  }
  if let Some(date) = git(&["log", "-1", "--format=%cs"]) {
    println!("cargo:rustc-env=GIT_DATE={date}");
  }

  println!("cargo:rerun-if-changed=build.rs");
  println!("cargo:rerun-if-changed=.git/HEAD");
}
