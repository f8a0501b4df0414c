use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::config::InterviewConfig;
use super::stats::{InterviewStats, QuestionSlot, StoredRecording};
use crate::audio::{
    AudioBlob, AudioTranscoder, CompressedAudio, DecodingContextFactory, ExportMetadata,
    RecordingExporter, WavBlob,
};
use crate::config::Config;
use crate::guard::{MediaBusyGuard, Page, SessionGuard, Viewport};
use crate::outcome::Outcome;
use crate::questions::{AnswerEvaluator, Evaluation, QuestionGenerator};
use crate::recording::{
    CaptureDevice, DeviceConstraints, DeviceError, DeviceStream, RecordingSession,
};
use crate::timer::{QuestionTimer, TimerTick};
use crate::voice::{VoiceAnalysis, VoiceAnalyzer};

type Slots = Arc<Mutex<BTreeMap<usize, QuestionSlot>>>;

const DEFAULT_QUESTION: &str = "Interview question";
const VOICE_ONLY_ANSWER: &str = "Candidate answered via voice.";

/// One HR interview, from the first navigation onto the interview page to
/// `exit`.
///
/// Owns every long-lived resource of the interview: the guard, the question
/// timer, the camera preview, the active recording and the shared decoding
/// context. Background work (transcoding, voice analysis, evaluation)
/// captures its question index when it is launched and writes its result
/// into that index's slot, so late completions never land on the wrong
/// question.
pub struct InterviewSession {
    config: Config,
    interview: InterviewConfig,
    started_at: DateTime<Utc>,

    busy: MediaBusyGuard,
    guard: SessionGuard,
    device: Arc<dyn CaptureDevice>,
    transcoder: Arc<AudioTranscoder>,
    voice: Option<Arc<dyn VoiceAnalyzer>>,
    evaluator: Option<AnswerEvaluator>,

    questions: Mutex<Vec<String>>,
    timer: Mutex<QuestionTimer>,
    /// Keeps the countdown alive until it is cleared or replaced
    timer_display: Mutex<Option<watch::Receiver<TimerTick>>>,

    /// Camera preview, acquired once and reused across questions
    camera: Mutex<Option<Box<dyn DeviceStream>>>,
    recording: Mutex<Option<RecordingSession>>,

    slots: Slots,
    background: Mutex<Vec<JoinHandle<()>>>,
    exited: AtomicBool,
}

impl InterviewSession {
    pub fn new(
        config: Config,
        interview: InterviewConfig,
        device: Arc<dyn CaptureDevice>,
        viewport: Arc<dyn Viewport>,
        decoders: Arc<dyn DecodingContextFactory>,
    ) -> Self {
        let busy = MediaBusyGuard::new(config.guard.media_busy_grace());
        let guard = SessionGuard::new(config.guard.clone(), busy.clone(), viewport);
        let timer = QuestionTimer::new(config.timer.clone());

        info!(
            "Interview session created: {} at {} ({})",
            interview.role,
            interview.company,
            interview.level.as_str()
        );

        Self {
            config,
            interview,
            started_at: Utc::now(),
            busy,
            guard,
            device,
            transcoder: Arc::new(AudioTranscoder::new(decoders)),
            voice: None,
            evaluator: None,
            questions: Mutex::new(Vec::new()),
            timer: Mutex::new(timer),
            timer_display: Mutex::new(None),
            camera: Mutex::new(None),
            recording: Mutex::new(None),
            slots: Arc::new(Mutex::new(BTreeMap::new())),
            background: Mutex::new(Vec::new()),
            exited: AtomicBool::new(false),
        }
    }

    /// Ship every WAV answer to a voice-analysis service
    pub fn with_voice(mut self, voice: Arc<dyn VoiceAnalyzer>) -> Self {
        self.voice = Some(voice);
        self
    }

    /// Score submitted answers in the background
    pub fn with_evaluator(mut self, evaluator: AnswerEvaluator) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn interview(&self) -> &InterviewConfig {
        &self.interview
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    pub fn media_busy(&self) -> &MediaBusyGuard {
        &self.busy
    }

    pub fn transcoder(&self) -> &AudioTranscoder {
        &self.transcoder
    }

    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::SeqCst)
    }

    pub async fn enter_page(&self, page: Page) {
        self.guard.on_navigate(page).await;
    }

    /// Fetch the HR questions for this interview and keep them for the
    /// voice-analysis uploads
    pub async fn load_questions(&self, generator: &QuestionGenerator) -> Outcome<Vec<String>> {
        let outcome = generator
            .hr_questions(
                &self.interview.company,
                &self.interview.role,
                self.interview.level,
            )
            .await;
        if let Some(questions) = outcome.value() {
            *self.questions.lock().await = questions.clone();
        }
        outcome
    }

    pub async fn set_questions(&self, questions: Vec<String>) {
        *self.questions.lock().await = questions;
    }

    pub async fn question(&self, q_index: usize) -> String {
        self.questions
            .lock()
            .await
            .get(q_index)
            .cloned()
            .unwrap_or_else(|| DEFAULT_QUESTION.to_string())
    }

    /// Start the countdown for a question. When it runs out, the answer
    /// being recorded for that question is stopped and kept.
    pub async fn start_question_timer(
        self: &Arc<Self>,
        q_index: usize,
        seconds: u32,
    ) -> watch::Receiver<TimerTick> {
        let session = Arc::downgrade(self);
        let rx = self.timer.lock().await.start(seconds, move || {
            if let Some(session) = session.upgrade() {
                tokio::spawn(async move { session.on_time_up(q_index).await });
            }
        });
        *self.timer_display.lock().await = Some(rx.clone());
        rx
    }

    async fn on_time_up(&self, q_index: usize) {
        let recording_this = self
            .recording
            .lock()
            .await
            .as_ref()
            .is_some_and(|r| r.question_index() == q_index);

        if recording_this {
            warn!("Time up on question {}; stopping recording", q_index + 1);
            self.stop_recording().await;
        } else {
            info!("Time up on question {}", q_index + 1);
        }
    }

    pub async fn clear_timer(&self) {
        self.timer.lock().await.clear();
        self.timer_display.lock().await.take();
    }

    /// Open the camera preview if it isn't already. The stream is kept for
    /// the rest of the interview.
    pub async fn ensure_camera(&self) -> Result<(), DeviceError> {
        let mut camera = self.camera.lock().await;
        // Checked under the lock so a completed `exit` is always seen
        if self.has_exited() {
            return Err(DeviceError::SessionEnded);
        }
        if camera.is_some() {
            debug!("Camera already active");
            return Ok(());
        }

        let stream = self
            .busy
            .guard_request(self.device.open(&DeviceConstraints::camera()))
            .await
            .inspect_err(|e| warn!("Camera unavailable: {}", e))?;

        *camera = Some(stream);
        info!("Camera acquired");
        Ok(())
    }

    pub async fn camera_active(&self) -> bool {
        self.camera.lock().await.is_some()
    }

    /// Begin recording the answer to `q_index`
    pub async fn start_recording(&self, q_index: usize) -> Result<(), DeviceError> {
        let mut active = self.recording.lock().await;
        if self.has_exited() {
            return Err(DeviceError::SessionEnded);
        }
        if let Some(current) = active.as_ref() {
            warn!(
                "Recording already active for question {}",
                current.question_index() + 1
            );
            return Ok(());
        }

        let recording = RecordingSession::start(
            self.device.as_ref(),
            &DeviceConstraints::microphone(),
            &self.busy,
            q_index,
            self.config.audio.timeslice(),
        )
        .await?;

        *active = Some(recording);
        Ok(())
    }

    pub async fn is_recording(&self) -> bool {
        self.recording.lock().await.is_some()
    }

    /// Stop the active recording and hand it to background processing.
    ///
    /// Returns the question index the recording belonged to.
    pub async fn stop_recording(&self) -> Option<usize> {
        let recording = self.recording.lock().await.take();
        let Some(recording) = recording else {
            debug!("No active recording to stop");
            return None;
        };

        let q_index = recording.question_index();
        let audio = recording.stop().await;
        let question = self.question(q_index).await;

        let transcoder = Arc::clone(&self.transcoder);
        let slots = Arc::clone(&self.slots);
        let voice = self.voice.clone();

        self.track(tokio::spawn(async move {
            let (_, wav) = transcode_into_slot(&transcoder, &slots, q_index, &audio).await;
            if let (Some(voice), Some(wav)) = (voice, wav) {
                analyze_into_slot(voice.as_ref(), &slots, &wav, &question, q_index).await;
            }
        }))
        .await;

        Some(q_index)
    }

    /// Store a recording produced outside this session (uploaded by the
    /// host). Transcoding happens before returning; voice analysis runs in
    /// the background.
    pub async fn store_upload(&self, q_index: usize, audio: CompressedAudio) -> StoredRecording {
        let (stored, wav) = transcode_into_slot(&self.transcoder, &self.slots, q_index, &audio).await;

        if let (Some(voice), Some(wav)) = (self.voice.clone(), wav) {
            let question = self.question(q_index).await;
            let slots = Arc::clone(&self.slots);
            self.track(tokio::spawn(async move {
                analyze_into_slot(voice.as_ref(), &slots, &wav, &question, q_index).await;
            }))
            .await;
        }

        stored
    }

    /// Record the typed answer for `q_index` and evaluate it in the
    /// background. An empty answer falls back to the voice transcript.
    pub async fn submit_answer(&self, q_index: usize, question: &str, answer: &str) {
        let answer = {
            let mut slots = self.slots.lock().await;
            let slot = slots.entry(q_index).or_default();
            slot.answer = Some(answer.to_string());

            if !answer.trim().is_empty() {
                answer.to_string()
            } else {
                slot.voice
                    .as_ref()
                    .map(|v| v.transcript.clone())
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| VOICE_ONLY_ANSWER.to_string())
            }
        };

        let Some(evaluator) = self.evaluator.clone() else {
            debug!("No evaluator configured; answer {} stored unscored", q_index + 1);
            return;
        };

        let slots = Arc::clone(&self.slots);
        let question = question.to_string();
        let company = self.interview.company.clone();
        let level = self.interview.level;

        self.track(tokio::spawn(async move {
            let outcome = evaluator.evaluate_hr(&question, &answer, &company, level).await;
            debug!(q_index, fallback = outcome.is_fallback(), "Answer evaluated");
            slots.lock().await.entry(q_index).or_default().evaluation = Some(outcome);
        }))
        .await;
    }

    async fn track(&self, handle: JoinHandle<()>) {
        let mut background = self.background.lock().await;
        background.retain(|h| !h.is_finished());
        background.push(handle);
    }

    /// Wait for all background work launched so far (and anything it
    /// launches in turn)
    pub async fn settle(&self) {
        loop {
            let pending: Vec<JoinHandle<()>> = self.background.lock().await.drain(..).collect();
            if pending.is_empty() {
                return;
            }
            for result in futures::future::join_all(pending).await {
                if let Err(e) = result {
                    error!("Background task failed: {}", e);
                }
            }
        }
    }

    pub async fn slot(&self, q_index: usize) -> Option<QuestionSlot> {
        self.slots.lock().await.get(&q_index).cloned()
    }

    pub async fn recording(&self, q_index: usize) -> Option<AudioBlob> {
        self.slots.lock().await.get(&q_index)?.recording.clone()
    }

    pub async fn evaluation(&self, q_index: usize) -> Option<Outcome<Evaluation>> {
        self.slots.lock().await.get(&q_index)?.evaluation.clone()
    }

    pub async fn voice_analysis(&self, q_index: usize) -> Option<VoiceAnalysis> {
        self.slots.lock().await.get(&q_index)?.voice.clone()
    }

    /// Write every stored recording to disk in question order
    pub async fn export(&self, exporter: &RecordingExporter) -> Result<Vec<ExportMetadata>> {
        let slots = self.slots.lock().await;
        exporter.save_all(
            slots
                .iter()
                .filter_map(|(idx, slot)| slot.recording.as_ref().map(|blob| (*idx, blob))),
        )
    }

    pub async fn stats(&self) -> InterviewStats {
        let (recording_question, recording_elapsed_secs) = match &*self.recording.lock().await {
            Some(r) => (Some(r.question_index()), r.elapsed_seconds()),
            None => (None, 0),
        };
        let (recordings, evaluations) = {
            let slots = self.slots.lock().await;
            (
                slots.values().filter(|s| s.recording.is_some()).count(),
                slots.values().filter(|s| s.evaluation.is_some()).count(),
            )
        };

        InterviewStats {
            started_at: self.started_at,
            is_recording: recording_question.is_some(),
            recording_question,
            recording_elapsed_secs,
            camera_active: self.camera_active().await,
            recordings,
            evaluations,
            guard: self.guard.status().await,
            exited: self.has_exited(),
        }
    }

    /// Tear the interview down: timer, recording, camera, then the guard.
    ///
    /// A recording in progress is stopped normally, so its answer is kept.
    /// Returns the stats as they stood just before teardown, while the guard
    /// still holds its warning count. Calling this more than once does
    /// nothing and returns `None`.
    pub async fn exit(&self) -> Option<InterviewStats> {
        if self.exited.swap(true, Ordering::SeqCst) {
            debug!("Interview already exited");
            return None;
        }

        let last = self.stats().await;
        info!("Exiting interview");

        self.clear_timer().await;

        if let Some(q_index) = self.stop_recording().await {
            info!("Kept partial answer for question {}", q_index + 1);
        }

        if let Some(mut camera) = self.camera.lock().await.take() {
            camera.release();
            info!("Camera released");
        }

        self.guard.leave().await;
        Some(last)
    }
}

impl Drop for InterviewSession {
    fn drop(&mut self) {
        if let Some(mut camera) = self.camera.get_mut().take() {
            warn!("Interview dropped without exit; releasing camera");
            camera.release();
        }
    }
}

async fn transcode_into_slot(
    transcoder: &AudioTranscoder,
    slots: &Slots,
    q_index: usize,
    audio: &CompressedAudio,
) -> (StoredRecording, Option<WavBlob>) {
    let outcome = transcoder.to_wav(audio).await;
    let degraded = !outcome.is_ok();

    // `to_wav` always carries a blob; Failed cannot happen here
    let blob = outcome
        .into_value()
        .unwrap_or_else(|| AudioBlob::Compressed(audio.clone()));

    let stored = StoredRecording {
        q_index,
        format: blob.format(),
        degraded,
        bytes: blob.bytes().len(),
    };
    let wav = blob.as_wav().cloned();

    {
        let mut slots = slots.lock().await;
        let slot = slots.entry(q_index).or_default();
        slot.recording = Some(blob);
        slot.degraded = degraded;
    }

    info!(
        "Stored answer for question {} ({:?}, {} bytes)",
        q_index + 1,
        stored.format,
        stored.bytes
    );

    (stored, wav)
}

async fn analyze_into_slot(
    voice: &dyn VoiceAnalyzer,
    slots: &Slots,
    wav: &WavBlob,
    question: &str,
    q_index: usize,
) {
    // The client logs failures and marks itself offline; the answer stays usable
    if let Ok(analysis) = voice.analyze(wav, question, q_index).await {
        slots.lock().await.entry(q_index).or_default().voice = Some(analysis);
    }
}
