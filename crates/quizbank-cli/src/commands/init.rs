//! The `quizbank init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizbank.toml").exists() {
        println!("quizbank.toml already exists, skipping.");
    } else {
        std::fs::write("quizbank.toml", SAMPLE_CONFIG)?;
        println!("Created quizbank.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point [extractor].endpoint at your text extraction service");
    println!("  2. Run: quizbank extract --input exam.pdf --output bank.json");
    println!("  3. Run: quizbank practice --bank bank.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizbank configuration

[extractor]
# PDFs are POSTed here as base64 JSON; QUIZBANK_EXTRACT_URL overrides it.
endpoint = "http://localhost:9000/default/extract"
timeout_secs = 120
max_file_size_mb = 10

[practice]
shuffle = false
# limit = 20
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses() {
        let config = quizbank_extract::config::parse_config_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config, quizbank_extract::QuizbankConfig::default());
    }
}
