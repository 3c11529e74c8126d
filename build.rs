fn main() {
    // Build-time configuration override (JSON, see `SystemConfig::from_json`).
    println!("cargo:rerun-if-env-changed=SUNRAIL_CONFIG");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
