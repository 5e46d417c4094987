mod cli;
mod display;
mod snapshot;

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use lexbrief_agent::{Agent, AgentRequest, AgentResponse, DraftParams};
use lexbrief_ai::{EmbeddingIndex, Encoder, HashEncoder, PrecedentRanker, RankerConfig};
use lexbrief_core::CaseFile;
use lexbrief_llm::{ChatClient, ChatConfig};
use lexbrief_store::{FeedbackStore, JsonFeedbackStore};
use tracing::{Level, info};

use crate::cli::{Cli, Commands, RunArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();
    tracing::debug!("lexbrief v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn FeedbackStore> = Arc::new(JsonFeedbackStore::new(&cli.feedback_path));

    match cli.command {
        Commands::Run(ref args) => cmd_run(&cli, args, store).await,
        Commands::Rank { ref query, k } => {
            let ranker = build_ranker(&cli, store)?;
            let ranked = ranker.rank(query, k)?;
            display::write_ranking(&mut io::stdout().lock(), &ranked)?;
            Ok(())
        }
        Commands::Issues { ref text } => {
            let tags = lexbrief_core::tag(text);
            let names: Vec<&str> = tags.iter().map(|t| t.as_str()).collect();
            display::write_issues(
                &mut io::stdout().lock(),
                &names,
                &lexbrief_core::issue_labels(&tags),
                &lexbrief_core::plan_steps(&tags),
            )?;
            Ok(())
        }
        Commands::Feedback {
            up,
            ref docs,
            ref notes,
            ..
        } => {
            let state = store.record(up, docs, notes);
            println!("{}", serde_json::to_string_pretty(&state)?);
            Ok(())
        }
        Commands::Boosts => {
            display::write_boosts(&mut io::stdout().lock(), &store.load())?;
            Ok(())
        }
    }
}

async fn cmd_run(cli: &Cli, args: &RunArgs, store: Arc<dyn FeedbackStore>) -> anyhow::Result<()> {
    // Credentials are checked before the corpus is touched.
    let client = ChatClient::new(ChatConfig {
        api_key: args.chat.api_key.clone(),
        base_url: args.chat.base_url.clone(),
        model: args.chat.model.clone(),
        ..Default::default()
    })
    .context("configuring drafting client")?;
    info!(model = client.model(), "drafting client ready");

    let ranker = build_ranker(cli, store)?;
    let agent = Agent::new(ranker, Arc::new(client)).with_defaults(DraftParams {
        temperature: args.temperature,
        max_tokens: args.max_tokens,
    });

    let request = AgentRequest {
        case: CaseFile {
            title: args.title.clone(),
            facts: args.facts.clone(),
            issues_hint: args.issues_hint.clone(),
        },
        temperature: Some(args.temperature),
        max_tokens: Some(args.max_tokens),
        style_preference: args.style,
    };
    let resp = agent.run(&request).await?;

    let shown = if args.json {
        writeln!(io::stdout().lock(), "{}", serde_json::to_string_pretty(&resp)?)
    } else {
        display::write_response(&mut io::stdout().lock(), &resp)
    };
    // A closed pipe still leaves the snapshot to write.
    if let Err(e) = shown
        && e.kind() != io::ErrorKind::BrokenPipe
    {
        return Err(e.into());
    }

    let snap = snapshot::write_snapshot(&args.out_dir, &resp, chrono::Utc::now())?;
    info!(json = %snap.json.display(), text = %snap.text.display(), "saved result");

    if !args.json && io::stdin().is_terminal() {
        ask_feedback(&agent, &resp)?;
    }
    Ok(())
}

fn build_ranker(cli: &Cli, store: Arc<dyn FeedbackStore>) -> anyhow::Result<PrecedentRanker> {
    let documents = lexbrief_core::load_corpus(&cli.corpus)
        .with_context(|| format!("loading corpus {}", cli.corpus.display()))?;
    let encoder = build_encoder(cli.model_dir.as_deref())?;
    let index = EmbeddingIndex::build(documents, encoder).context("building embedding index")?;

    let mut config = RankerConfig::default();
    if let Some(year) = cli.current_year {
        config.current_year = year;
    }
    Ok(PrecedentRanker::new(index, store, config))
}

#[cfg(feature = "onnx")]
fn build_encoder(model_dir: Option<&Path>) -> anyhow::Result<Arc<dyn Encoder>> {
    match model_dir {
        Some(dir) => Ok(Arc::new(lexbrief_ai::OnnxEncoder::load(dir)?)),
        None => {
            info!("no model directory given; using hashing encoder");
            Ok(Arc::new(HashEncoder::default()))
        }
    }
}

#[cfg(not(feature = "onnx"))]
fn build_encoder(model_dir: Option<&Path>) -> anyhow::Result<Arc<dyn Encoder>> {
    if let Some(dir) = model_dir {
        tracing::warn!(
            model_dir = %dir.display(),
            "built without the onnx feature; using hashing encoder"
        );
    }
    Ok(Arc::new(HashEncoder::default()))
}

fn ask_feedback(agent: &Agent, resp: &AgentResponse) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    print!("\nWas this helpful? [Y/n] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let thumbs_up = is_yes(&answer);

    let mut notes = String::new();
    if thumbs_up {
        print!("Any brief notes to keep improving? (Enter to skip): ");
        io::stdout().flush()?;
        input.read_line(&mut notes)?;
    }

    agent.submit_feedback(thumbs_up, &resp.used_doc_ids, notes.trim());
    println!("Feedback recorded.");
    Ok(())
}

/// Empty input counts as yes.
fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer.is_empty() || answer.starts_with('y')
}
