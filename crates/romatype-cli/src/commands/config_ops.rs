use std::process;

use romatype_core::keyconfig::{self, KeyConfigTable};
use romatype_core::{settings, tendency};

use super::read_file;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn keyconfig_export() {
    print!("{}", keyconfig::default_toml());
}

pub fn keyconfig_validate(file: &str) {
    let content = die!(read_file(file), "{}");
    let entries = die!(keyconfig::parse_keyconfig_toml(&content), "Error: {}");
    let spellings: usize = entries.iter().map(|k| k.spellings.len()).sum();
    println!("OK: {} kana, {} spellings", entries.len(), spellings);
}

pub fn tendency_export() {
    print!("{}", tendency::default_toml());
}

pub fn tendency_validate(file: &str) {
    let content = die!(read_file(file), "{}");
    let t = die!(tendency::parse_tendency_toml(&content), "Error: {}");
    die!(t.validate_against(KeyConfigTable::global()), "Error: {}");
    println!("OK: {} preferences", t.len());
}

pub fn settings_export() {
    print!("{}", settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(read_file(file), "{}");
    let s = die!(settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: search.penalty_weight={}, search.max_visits={}",
        s.search.penalty_weight, s.search.max_visits
    );
}
