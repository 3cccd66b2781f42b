/// Outcome of a single answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    Correct,
    Wrong,
}

impl Verdict {
    pub fn of(selected: &str, correct: &str) -> Verdict {
        if selected == correct {
            Verdict::Correct
        } else {
            Verdict::Wrong
        }
    }

    /// CSS class shared by the feedback line and the marked option
    pub fn class(self) -> &'static str {
        match self {
            Verdict::Correct => "correct",
            Verdict::Wrong => "wrong",
        }
    }
}

/// Running tally for the session. Only ever grows; a reload starts a new one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Score {
    correct: u32,
    wrong: u32,
}

impl Score {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Correct => self.correct = self.correct.saturating_add(1),
            Verdict::Wrong => self.wrong = self.wrong.saturating_add(1),
        }
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn wrong(&self) -> u32 {
        self.wrong
    }

    /// Number of questions answered this session
    pub fn answered(&self) -> u32 {
        self.correct + self.wrong
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_counts_each_verdict() {
        let mut score = Score::default();
        score.record(Verdict::Correct);
        score.record(Verdict::Wrong);
        score.record(Verdict::Wrong);
        assert_eq!(score.correct(), 1);
        assert_eq!(score.wrong(), 2);
        assert_eq!(score.answered(), 3);
    }

    #[test]
    fn verdict_is_exact_match() {
        assert_eq!(Verdict::of("pikachu", "pikachu"), Verdict::Correct);
        assert_eq!(Verdict::of("raichu", "pikachu"), Verdict::Wrong);
        // labels are compared as given, case included
        assert_eq!(Verdict::of("Pikachu", "pikachu"), Verdict::Wrong);
    }
}
