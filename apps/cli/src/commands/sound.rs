//! 声音命令

use crate::config::CliConfig;
use anyhow::Result;
use clap::{Args, ValueEnum};
use kobuki_sdk::SoundSequence;

/// 预设音效名称
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceName {
    On,
    Off,
    Recharge,
    Button,
    Error,
    CleaningStart,
    CleaningEnd,
}

impl From<SequenceName> for SoundSequence {
    fn from(name: SequenceName) -> Self {
        match name {
            SequenceName::On => SoundSequence::On,
            SequenceName::Off => SoundSequence::Off,
            SequenceName::Recharge => SoundSequence::Recharge,
            SequenceName::Button => SoundSequence::Button,
            SequenceName::Error => SoundSequence::Error,
            SequenceName::CleaningStart => SoundSequence::CleaningStart,
            SequenceName::CleaningEnd => SoundSequence::CleaningEnd,
        }
    }
}

/// 播放预设音效，或按频率播放单音
#[derive(Args, Debug)]
pub struct SoundCommand {
    /// 预设音效
    #[arg(value_enum, required_unless_present = "frequency")]
    pub sequence: Option<SequenceName>,

    /// 单音频率（Hz）
    #[arg(short, long, conflicts_with = "sequence")]
    pub frequency: Option<f64>,

    /// 单音时长（毫秒）
    #[arg(short, long, default_value_t = 200)]
    pub duration_ms: u8,
}

impl SoundCommand {
    pub fn execute(&self, config: &CliConfig, port: Option<&str>) -> Result<()> {
        let mut kobuki = super::connect(config, port)?;
        if let Some(name) = self.sequence {
            let sequence = SoundSequence::from(name);
            kobuki.play_sound_sequence(sequence)?;
            println!("🔊 播放音效 {:?}", sequence);
            return Ok(());
        }

        let hz = self.frequency.ok_or_else(|| anyhow::anyhow!("需要指定音效或频率"))?;
        kobuki.play_sound(hz, self.duration_ms)?;
        println!("🔊 播放 {} Hz，{} ms", hz, self.duration_ms);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(flatten)]
        sound: SoundCommand,
    }

    #[test]
    fn test_sequence_names() {
        let h = Harness::try_parse_from(["test", "cleaning-start"]).unwrap();
        assert_eq!(h.sound.sequence, Some(SequenceName::CleaningStart));
        assert_eq!(
            SoundSequence::from(SequenceName::CleaningStart),
            SoundSequence::CleaningStart
        );
    }

    #[test]
    fn test_frequency_mode() {
        let h = Harness::try_parse_from(["test", "--frequency", "440"]).unwrap();
        assert_eq!(h.sound.sequence, None);
        assert_eq!(h.sound.frequency, Some(440.0));
    }

    #[test]
    fn test_requires_sequence_or_frequency() {
        assert!(Harness::try_parse_from(["test"]).is_err());
        assert!(Harness::try_parse_from(["test", "beep"]).is_err());
    }
}
