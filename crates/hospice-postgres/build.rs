#![forbid(unsafe_code)]

/// `embed_migrations!` is a procedural macro and cannot observe the migration
/// directory on its own, so adding or editing an SQL file would not trigger a
/// rebuild. Registering the directory here makes cargo rerun the build when
/// anything under it changes.
fn main() {
    println!("cargo:rerun-if-changed=./src/migrations");
}
