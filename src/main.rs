use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use interview_capture::audio::{
    mime_type_for_path, AudioTranscoder, RecordingExporter, SymphoniaContextFactory,
};
use interview_capture::http::{create_router, AppState, BridgeViewport, HostOwnedDevice};
use interview_capture::interview::{InterviewConfig, InterviewSession};
use interview_capture::llm::{GeminiClient, TextGenerator};
use interview_capture::questions::{
    fallback, AnswerEvaluator, ExperienceLevel, QuestionGenerator, Round, RoundType,
};
use interview_capture::recording::ReplayDevice;
use interview_capture::voice::VoiceAnalysisClient;
use interview_capture::{CompressedAudio, Config, InterviewStats};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "interview-capture")]
#[command(about = "Capture, transcode and score mock interview answers")]
struct Cli {
    /// Configuration file, extension optional
    #[arg(short, long, default_value = "config/interview-capture", global = true)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the host bridge for one HR interview
    Serve {
        #[arg(long, default_value = "the company")]
        company: String,

        #[arg(long, default_value = "Software Engineer")]
        role: String,

        #[arg(long, value_enum, default_value = "fresher")]
        level: ExperienceLevel,
    },

    /// Convert a recorded answer to 16-bit mono WAV
    Transcode {
        /// Compressed recording (webm, ogg, m4a, mp3, wav)
        input: PathBuf,

        /// Output file; defaults to the recordings directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Question index the answer belongs to (0-indexed)
        #[arg(short, long, default_value = "0")]
        question: usize,

        /// Replay through the recorder pipeline in slices of this many bytes
        #[arg(long)]
        replay_chunk: Option<usize>,
    },

    /// Probe the voice-analysis service
    Health,

    /// Print the questions for one round as JSON
    Questions {
        #[arg(long, default_value = "the company")]
        company: String,

        #[arg(long, value_enum)]
        round_type: RoundType,

        #[arg(long, value_enum, default_value = "fresher")]
        level: ExperienceLevel,

        /// Round topics, comma separated
        #[arg(long, value_delimiter = ',')]
        topics: Vec<String>,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,interview_capture=debug,tower_http=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Serve {
            company,
            role,
            level,
        } => serve(cfg, InterviewConfig { company, role, level }).await,
        Command::Transcode {
            input,
            out,
            question,
            replay_chunk,
        } => transcode(cfg, input, out, question, replay_chunk).await,
        Command::Health => health(cfg).await,
        Command::Questions {
            company,
            round_type,
            level,
            topics,
        } => questions(cfg, company, round_type, level, topics).await,
    }
}

async fn serve(cfg: Config, interview: InterviewConfig) -> Result<()> {
    let viewport = Arc::new(BridgeViewport::new());
    let decoders = Arc::new(SymphoniaContextFactory::new(cfg.audio.max_decoding_contexts));
    let text: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(&cfg.text_generation));

    let mut session = InterviewSession::new(
        cfg.clone(),
        interview.clone(),
        Arc::new(HostOwnedDevice),
        viewport.clone(),
        decoders,
    );

    if cfg.voice_analysis.enabled {
        let voice = VoiceAnalysisClient::new(&cfg.voice_analysis);
        info!("Voice analysis service: {:?}", voice.check_health().await);
        session = session.with_voice(Arc::new(voice));
    }

    let has_api_key = !cfg.text_generation.api_key.is_empty();
    if has_api_key {
        session = session.with_evaluator(AnswerEvaluator::new(Arc::clone(&text)));
    } else {
        warn!("No text-generation API key; answers will not be scored");
    }

    let session = Arc::new(session);

    if has_api_key {
        let outcome = session.load_questions(&QuestionGenerator::new(text)).await;
        if let Some(reason) = outcome.reason() {
            warn!("Using default HR questions: {}", reason);
        }
    } else {
        session
            .set_questions(fallback::hr_questions(&interview.company))
            .await;
    }

    let state = AppState::new(Arc::clone(&session), viewport);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    info!("Shutting down");
    let tab_switch_warnings = session
        .exit()
        .await
        .map(|last| last.guard.tab_switch_warnings)
        .unwrap_or_default();
    session.settle().await;

    let exporter = RecordingExporter::new(&cfg.audio.recordings_path)?;
    let saved = session.export(&exporter).await?;
    log_summary(&session.stats().await, tab_switch_warnings, saved.len());

    Ok(())
}

fn log_summary(stats: &InterviewStats, tab_switch_warnings: u32, exported: usize) {
    info!(
        recordings = stats.recordings,
        evaluations = stats.evaluations,
        tab_switch_warnings,
        exported,
        "Interview finished"
    );
}

async fn transcode(
    cfg: Config,
    input: PathBuf,
    out: Option<PathBuf>,
    question: usize,
    replay_chunk: Option<usize>,
) -> Result<()> {
    let decoders = Arc::new(SymphoniaContextFactory::new(cfg.audio.max_decoding_contexts));

    let blob = match replay_chunk {
        Some(chunk_size) => {
            let chunk_size = chunk_size.max(1);
            // Full capture path: device, recorder slices, background transcode
            let device = Arc::new(ReplayDevice::from_file(&input, chunk_size)?);
            let session = InterviewSession::new(
                cfg.clone(),
                InterviewConfig::default(),
                device,
                Arc::new(BridgeViewport::new()),
                decoders,
            );

            session.start_recording(question).await?;
            // Slices flow once per timeslice; wait for the whole file
            let slices = tokio::fs::metadata(&input).await?.len() as usize / chunk_size + 1;
            tokio::time::sleep(cfg.audio.timeslice() * slices as u32).await;
            session.stop_recording().await;
            session.settle().await;

            session
                .recording(question)
                .await
                .context("Recording produced no audio")?
        }
        None => {
            let data = tokio::fs::read(&input)
                .await
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let mime_type = mime_type_for_path(&input);
            let transcoder = AudioTranscoder::new(decoders);
            let outcome = transcoder
                .to_wav(&CompressedAudio::new(data, mime_type))
                .await;
            if let Some(reason) = outcome.reason() {
                warn!("Kept original container: {}", reason);
            }
            outcome.into_value().context("Transcoder produced nothing")?
        }
    };

    match out {
        Some(path) => {
            tokio::fs::write(&path, blob.bytes())
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {} ({} bytes)", path.display(), blob.bytes().len());
        }
        None => {
            let exporter = RecordingExporter::new(&cfg.audio.recordings_path)?;
            exporter.save(question, &blob)?;
        }
    }

    Ok(())
}

async fn health(cfg: Config) -> Result<()> {
    let client = VoiceAnalysisClient::new(&cfg.voice_analysis);
    let availability = client.check_health().await;
    println!(
        "{}",
        serde_json::json!({
            "url": cfg.voice_analysis.base_url,
            "availability": availability,
        })
    );
    Ok(())
}

async fn questions(
    cfg: Config,
    company: String,
    round_type: RoundType,
    level: ExperienceLevel,
    topics: Vec<String>,
) -> Result<()> {
    let generator = QuestionGenerator::new(Arc::new(GeminiClient::new(&cfg.text_generation)));
    let round = Round {
        name: format!("{:?} Round", round_type),
        kind: round_type,
        topics,
    };

    let outcome = generator.questions_for_round(&company, &round, level).await;
    if let Some(reason) = outcome.reason() {
        warn!("Serving fallback questions: {}", reason);
    }

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
