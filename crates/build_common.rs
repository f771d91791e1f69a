// Shared build script helper that turns a crate README into its rustdoc front page.
// Include this in build.rs files with: include!("../build_common.rs");
//
// Required imports in the including file:
//   use std::env;
//   use std::fs;
//   use std::path::Path;

/// Write `README_GENERATED.md` into `OUT_DIR` for `#![doc = include_str!(...)]`.
///
/// Links written for GitHub (`src/foo.rs`) are rewritten to rustdoc module
/// links (`foo`), and `../../README.md` links point at the workspace
/// repository URL. A crate without a README gets a one-line stub so the
/// `include_str!` in `lib.rs` always resolves.
fn render_readme_for_rustdoc(crate_dir: &str) {
    println!("cargo:rerun-if-changed=README.md");
    println!("cargo:rerun-if-changed=../../Cargo.toml");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("README_GENERATED.md");

    let readme_path = Path::new(crate_dir).join("README.md");
    let content = match fs::read_to_string(&readme_path) {
        Ok(content) => content,
        Err(_) => {
            let name = env::var("CARGO_PKG_NAME").unwrap_or_default();
            fs::write(dest_path, format!("# {name}\n")).unwrap();
            return;
        }
    };

    let mut rendered = content.replace("](src/", "](").replace(".rs)", ")");

    if let Some(url) = workspace_repository_url(crate_dir) {
        rendered = rendered.replace("](../../README.md", &format!("]({url}"));
    }

    fs::write(dest_path, rendered).unwrap();
}

/// Read `repository = "..."` from the workspace manifest two levels up.
fn workspace_repository_url(crate_dir: &str) -> Option<String> {
    let manifest = Path::new(crate_dir).parent()?.parent()?.join("Cargo.toml");
    let content = fs::read_to_string(manifest).ok()?;

    content
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("repository") && line.contains('='))
        .find_map(|line| {
            let start = line.find('"')?;
            let end = line.rfind('"')?;
            (start < end).then(|| line[start + 1..end].to_string())
        })
}
