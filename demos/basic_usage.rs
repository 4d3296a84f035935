//! Basic usage example for configobj
//!
//! Parses a nested configuration, walks its sections, reads it into Rust
//! structs with serde, and writes a modified copy back out.

use configobj::{ConfigObj, ConfigObjError, ParserConfig, from_str};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct ServerConfig {
    name: String,
    port: u16,
    debug: bool,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    host: String,
    port: u16,
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct AppConfig {
    server: ServerConfig,
    database: DatabaseConfig,
}

fn main() -> Result<(), ConfigObjError> {
    let text = r#"
        # application settings
        [server]
            name = "my-app"
            port = 8080
            debug = yes
            [[motd]]
                text = """
Welcome to my-app.
Please behave.
"""

        [database]
            host = 'localhost'
            port = 5432
            username = admin
            password = "secret"
        this line is not valid configobj
    "#;

    let config: AppConfig = from_str(text)?;
    println!("Parsed configuration:");
    println!("Server: {} on port {}", config.server.name, config.server.port);
    println!("Database: {}:{}", config.database.host, config.database.port);
    println!("Database user: {}", config.database.username);
    println!("Database password length: {}", config.database.password.len());

    let parser_config = ParserConfig::new().with_collect_diagnostics(true);
    let mut document = ConfigObj::parse_str_with_config(text, parser_config);

    for (name, section) in document.all_sections() {
        println!("[{}] depth {} with {} keys", name, section.depth(), section.all_values().len());
    }
    if let Some(motd) = document.section("server").and_then(|s| s.section("motd")) {
        print!("motd:{}", motd.value("text"));
    }
    for diagnostic in document.diagnostics() {
        println!("warning: {}", diagnostic);
    }

    document.set_value("generated_by", "basic_usage");
    println!("\nRewritten configuration:\n{}", document.to_config_string()?);

    Ok(())
}
