/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    /// 0-based position of the current question.
    pub index: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Share of the bar to fill: `index / total`, 1.0 once complete.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.is_complete {
            return 1.0;
        }
        if self.total == 0 {
            return 0.0;
        }
        self.index as f64 / self.total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_tracks_position_until_complete() {
        let mut progress = SessionProgress {
            total: 40,
            answered: 10,
            index: 10,
            is_complete: false,
        };
        assert!((progress.fraction() - 0.25).abs() < f64::EPSILON);
        progress.is_complete = true;
        assert!((progress.fraction() - 1.0).abs() < f64::EPSILON);
    }
}
