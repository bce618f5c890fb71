use anyhow::{Context, Result};
use opencv::core::{Mat, Size};
use opencv::prelude::*;
use opencv::videoio::VideoWriter;

use crate::config::RecordingConfig;

/// HUD 合成済みフレームを動画ファイルに書き出す
pub struct SessionRecorder {
    writer: VideoWriter,
    path: String,
    frames: u64,
}

impl SessionRecorder {
    pub fn new(config: &RecordingConfig, width: u32, height: u32) -> Result<Self> {
        let fourcc = fourcc_code(&config.fourcc)?;
        let writer = VideoWriter::new(
            &config.output_path,
            fourcc,
            config.fps,
            Size::new(width as i32, height as i32),
            true,
        )
        .with_context(|| format!("Failed to create video writer for {}", config.output_path))?;

        if !writer.is_opened()? {
            anyhow::bail!("Video writer for {} could not be opened", config.output_path);
        }

        Ok(Self {
            writer,
            path: config.output_path.clone(),
            frames: 0,
        })
    }

    pub fn write(&mut self, frame: &Mat) -> Result<()> {
        self.writer.write(frame).context("Failed to write frame")?;
        self.frames += 1;
        Ok(())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// 書き出しを確定してファイルを閉じる
    pub fn finish(mut self) -> Result<u64> {
        self.writer.release().context("Failed to finalize video")?;
        Ok(self.frames)
    }
}

/// "mp4v" のような4文字を FourCC コードに変換
fn fourcc_code(code: &str) -> Result<i32> {
    let chars: Vec<char> = code.chars().collect();
    match chars.as_slice() {
        &[c1, c2, c3, c4] => Ok(VideoWriter::fourcc(c1, c2, c3, c4)?),
        _ => anyhow::bail!("FourCC must be 4 characters: {:?}", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourcc_code() {
        let expected = i32::from_le_bytes(*b"mp4v");
        assert_eq!(fourcc_code("mp4v").unwrap(), expected);
        assert!(fourcc_code("mp4").is_err());
    }
}
