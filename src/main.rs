// This binary crate is intentionally minimal.
// All engine logic lives in the library (src/lib.rs and its modules).
// Run the demos with:
//   cargo run --example xor
//   cargo run --example mnist --release
//   cargo run --bin draw --release
fn main() {
    println!("cinder-nn: a from-scratch feed-forward neural network engine in Rust.");
    println!("Run `cargo run --example xor` for a tiny demo,");
    println!("or `cargo run --bin draw --release` for the digit-drawing GUI.");
}
