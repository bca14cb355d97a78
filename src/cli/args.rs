use clap::Parser;

/// Generate a semantic git commit message from staged changes.
#[derive(Parser, Debug, Default)]
#[command(
    name = "smart-commit",
    version,
    about = "Generate a semantic git commit message from staged changes"
)]
pub struct Args {
    /// OpenAI-compatible base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// API key
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Model name
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Request timeout in seconds
    #[arg(long = "timeout-s", value_name = "SECONDS")]
    pub timeout_s: Option<f64>,

    /// Max output tokens
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    #[arg(long, value_name = "T")]
    pub temperature: Option<f32>,

    /// Max staged diff characters to send
    #[arg(long, value_name = "N", default_value_t = 8000)]
    pub max_diff_chars: usize,

    /// Print a ready-to-copy git commit command after the message
    #[arg(long, default_value_t = false)]
    pub print_git_command: bool,
}
