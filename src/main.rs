use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use smart_commit::cli::args::Args;
use smart_commit::config::LlmConfig;
use smart_commit::core::ai::client::ChatCompletionsClient;
use smart_commit::core::git::context::collect_context;
use smart_commit::core::git::repository::GitCli;
use smart_commit::core::pipeline;
use smart_commit::infrastructure::error::Error;
use smart_commit::infrastructure::logging;

async fn run(args: &Args, cfg: &LlmConfig) -> Result<String, Error> {
    info!("collecting git context");
    let repo = GitCli::new();
    let context = collect_context(&repo, args.max_diff_chars).await?;
    if context.diff_truncated {
        info!(
            original_chars = context.original_diff_chars,
            budget = args.max_diff_chars,
            "staged diff truncated"
        );
    }

    info!(model = %cfg.model, "generating commit message");
    // The client owns the connection for this invocation; drop releases it on
    // every exit path, including cancellation.
    let client = ChatCompletionsClient::from_config(cfg)?;
    pipeline::generate_commit_message(&client, &context, cfg).await
}

fn print_error(error: &Error) {
    match error {
        Error::NotAGitRepository(_) => eprintln!(
            "Error: Not inside a Git repository. Run this command inside a git worktree \
             (git init / git clone)."
        ),
        Error::NoStagedChanges(_) => eprintln!(
            "Error: No staged changes found. Stage your changes first (e.g., git add -p) \
             and try again."
        ),
        Error::Canceled => eprintln!("Error: Canceled."),
        other => eprintln!("Error: {other}"),
    }
}

fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::setup_logging();

    let args = Args::parse();
    let mut cfg = LlmConfig::new();
    cfg.update_from_args(&args);
    if let Err(e) = cfg.validate() {
        eprintln!("Error: {e}");
        return ExitCode::from(2);
    }

    let result = tokio::select! {
        result = run(&args, &cfg) => result,
        _ = tokio::signal::ctrl_c() => Err(Error::Canceled),
    };

    match result {
        Ok(message) => {
            // Stdout carries only the message so it can be captured.
            println!("{message}");
            if args.print_git_command {
                println!("git commit -m {}", shell_quote(&message));
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            print_error(&error);
            ExitCode::from(error.exit_code())
        }
    }
}
