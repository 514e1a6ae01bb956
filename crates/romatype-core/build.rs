fn main() {
    // Validate embedded TOML files at compile time.
    validate_toml(
        "src/default_settings.toml",
        include_str!("src/default_settings.toml"),
    );
    validate_toml(
        "src/keyconfig/default_keyconfig.toml",
        include_str!("src/keyconfig/default_keyconfig.toml"),
    );
    validate_toml(
        "src/default_tendency.toml",
        include_str!("src/default_tendency.toml"),
    );
}

fn validate_toml(path: &str, content: &str) {
    if content.parse::<toml::Value>().is_err() {
        panic!("{path} contains invalid TOML");
    }
}
