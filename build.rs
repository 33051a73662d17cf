// Build script for flutter_rust_bridge integration
//
// Dart bindings are generated out of band with the CLI tool:
//   flutter_rust_bridge_codegen generate
//
// The only job left here is to rebuild when the FFI surface changes.

fn main() {
    println!("cargo:rerun-if-changed=src/api.rs");
}
