/// Frames between automatic ticks when none is configured.
pub const DEFAULT_AUTO_INTERVAL: u32 = 30;

/// Periodic odometer trigger driven by the frame counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoIncrement {
    pub enabled: bool,
    interval: u32,
}

impl Default for AutoIncrement {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_INTERVAL)
    }
}

impl AutoIncrement {
    /// Disabled trigger firing every `interval` frames once enabled.
    /// An interval of zero is treated as one.
    pub fn new(interval: u32) -> Self {
        Self {
            enabled: false,
            interval: interval.max(1),
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Whether the odometer should tick on `frame`. Frame zero never fires.
    pub fn fires(&self, frame: u64) -> bool {
        self.enabled && frame != 0 && frame % u64::from(self.interval) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_never_fires() {
        let auto = AutoIncrement::default();
        assert!((0..200).all(|f| !auto.fires(f)));
    }

    #[test]
    fn fires_every_interval_except_frame_zero() {
        let auto = AutoIncrement {
            enabled: true,
            ..AutoIncrement::default()
        };
        let fired: Vec<u64> = (0..100).filter(|f| auto.fires(*f)).collect();
        assert_eq!(fired, vec![30, 60, 90]);
    }

    #[test]
    fn zero_interval_fires_each_frame() {
        let mut auto = AutoIncrement::new(0);
        auto.enabled = true;
        assert_eq!(auto.interval(), 1);
        assert!(!auto.fires(0));
        assert!(auto.fires(1));
        assert!(auto.fires(2));
    }
}
