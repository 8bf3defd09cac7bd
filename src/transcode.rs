// External audio encoder invocation
//
// The encoder is a black box: we build the command line, run it, and
// interpret nothing but the exit status. Audio goes through untouched by
// this crate; tag translation happens separately after the encode.

use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::error::{Result, TagError};

/// Default encoder binary
pub const ENCODER: &str = "ffmpeg";
/// Default audio codec for `.m4a` output
pub const DEFAULT_CODEC: &str = "aac";

/// Encode the input file's audio stream into the output path
pub fn encode(input: &Path, output: &Path, codec: &str) -> Result<()> {
    let mut command = Command::new(ENCODER);
    command
        .arg("-i")
        .arg(input)
        .args(["-acodec", codec, "-map", "0:a"])
        .arg(output);

    info!(
        "running: {ENCODER} -i '{}' -acodec {codec} -map 0:a '{}'",
        input.display(),
        output.display()
    );

    let status = command.status()?;
    if !status.success() {
        return Err(TagError::EncoderFailed {
            path: input.to_path_buf(),
            status: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}
