use vergen::EmitBuilder;

fn main() {
    // Default for builds outside a git checkout; a later cargo:rustc-env line
    // from vergen overrides it when git metadata is available.
    println!("cargo:rustc-env=VERGEN_GIT_DESCRIBE=");
    let _ = EmitBuilder::builder()
        .git_describe(true, true, None)
        .emit();
}
