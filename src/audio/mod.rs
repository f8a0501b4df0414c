pub mod blob;
pub mod context;
pub mod export;
pub mod opus;
pub mod transcoder;
pub mod wav;

pub use blob::{mime_type_for_path, AudioBlob, AudioFormat, CompressedAudio, WavBlob};
pub use context::{
    ContextState, DecodeError, DecodedAudio, DecodingContext, DecodingContextFactory,
    SharedDecodingContext, SymphoniaContext, SymphoniaContextFactory,
};
pub use export::{download_filename, ExportMetadata, RecordingExporter};
pub use transcoder::AudioTranscoder;
pub use wav::{encode_wav, f32_to_pcm16, WavInfo};
