fn main() {
    uniffi::generate_scaffolding("src/api.udl").expect("Failed to generate UniFFI scaffolding from src/api.udl");
}
