// src/banner.rs

/// Prints the startup banner shown before an interactive session.
pub fn print_banner() {
    let banner = r#"
 __      __
 \ \    / /_ _ ___ _ _
  \ \/\/ / _` |_ /| ' \
   \_/\_/\__,_/__||_||_|

    وزن · Arabic prosody analysis client
"#;
    println!("{}", banner);
}
