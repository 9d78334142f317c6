use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "moodring")]
#[command(author, version, about = "Feedback sentiment analysis service")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    Serve(ServeArgs),

    /// Analyze texts once each and print one JSON result per line
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Configuration file path
    #[arg(short, long, env = "MOODRING_CONFIG", default_value = "moodring.yaml")]
    pub config: String,

    /// Listen address
    #[arg(short, long, env = "MOODRING_LISTEN")]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long, env = "MOODRING_PORT")]
    pub port: Option<u16>,

    /// Backend used when a request does not name one
    #[arg(short, long, env = "MOODRING_BACKEND")]
    pub backend: Option<String>,

    /// Load the pretrained model at startup
    #[arg(long, env = "MOODRING_PRETRAINED")]
    pub pretrained: bool,

    /// Load the pretrained model from a local directory (implies --pretrained)
    #[arg(long, env = "MOODRING_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, env = "MOODRING_LOG_JSON")]
    pub log_json: bool,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Texts to analyze
    #[arg(required = true)]
    pub texts: Vec<String>,

    /// Backend to use (lexicon or pretrained)
    #[arg(short, long, default_value = "lexicon")]
    pub backend: String,

    /// Load the pretrained model from a local directory
    #[arg(long)]
    pub model_path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from([
            "moodring",
            "serve",
            "--port",
            "8080",
            "--backend",
            "transformers",
            "--model-path",
            "./models/sst2",
        ])
        .unwrap();

        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.backend.as_deref(), Some("transformers"));
        assert_eq!(args.model_path, Some(PathBuf::from("./models/sst2")));
    }

    #[test]
    fn test_parse_analyze_texts() {
        let cli = Cli::try_parse_from(["moodring", "analyze", "great", "awful"]).unwrap();

        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.texts, vec!["great", "awful"]);
        assert_eq!(args.backend, "lexicon");
    }

    #[test]
    fn test_analyze_requires_text() {
        assert!(Cli::try_parse_from(["moodring", "analyze"]).is_err());
    }
}
