//! Command-line arguments. Every option can also come from the environment.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};
use lexbrief_agent::StylePreference;
use lexbrief_llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use lexbrief_store::DEFAULT_FEEDBACK_PATH;

#[derive(Parser)]
#[command(name = "lexbrief")]
#[command(about = "Grounded legal briefs from a precedent corpus", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Precedent corpus (JSON array of documents)
    #[arg(long, global = true, env = "LEXBRIEF_CORPUS", default_value = "data/corpus.json")]
    pub corpus: PathBuf,

    /// Feedback state file
    #[arg(long, global = true, env = "FEEDBACK_PATH", default_value = DEFAULT_FEEDBACK_PATH)]
    pub feedback_path: PathBuf,

    /// Directory holding all-MiniLM-L6-v2 `model.onnx` and `tokenizer.json`
    #[arg(long, global = true, env = "LEXBRIEF_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Reference year for recency decay (defaults to this year)
    #[arg(long, global = true, env = "LEXBRIEF_CURRENT_YEAR")]
    pub current_year: Option<i32>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Draft a brief for a case
    Run(RunArgs),

    /// Rank precedents for a query
    Rank {
        query: String,
        #[arg(short, default_value_t = 5)]
        k: usize,
    },

    /// Show detected issues and the analysis plan for some text
    Issues { text: String },

    /// Rate the documents a previous brief used
    #[command(group(ArgGroup::new("vote").required(true).args(["up", "down"])))]
    Feedback {
        #[arg(long)]
        up: bool,
        #[arg(long)]
        down: bool,
        /// Document ids, e.g. from `used_doc_ids`
        #[arg(long = "doc", required = true)]
        docs: Vec<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Show style flags and document boosts
    Boosts,
}

#[derive(Args)]
pub struct RunArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub facts: String,

    /// Question to keep in mind (repeatable; informational only)
    #[arg(long = "issue")]
    pub issues_hint: Vec<String>,

    #[arg(long, env = "LIA_TEMP", default_value_t = 0.35)]
    pub temperature: f32,

    #[arg(long, env = "LIA_MAX_TOKENS", default_value_t = 1700)]
    pub max_tokens: u32,

    /// `bullets` or `prose`
    #[arg(long, env = "LIA_STYLE")]
    pub style: Option<StylePreference>,

    /// Where `result_<timestamp>.json` and `.txt` are written
    #[arg(long, default_value = "outputs")]
    pub out_dir: PathBuf,

    /// Print the response as JSON instead of the console view
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub chat: ChatArgs,
}

#[derive(Args)]
pub struct ChatArgs {
    #[arg(long, env = "NVIDIA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "NVIDIA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = "NVIDIA_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,
}
