use std::fmt::Write as _;
use std::io::{self, Write};

use civique_core::model::{Level, OptionIndex, QuizMode, Theme};
use civique_core::scoring::AnswerOutcome;
use services::{
    DisplaySurface, FlashcardFace, FlashcardView, QuestionScreen, QuizResults, SelectionFeedback,
    SessionEnd, SessionError, StartScreen, TimerView,
};

/// Line-oriented display surface writing French text to any writer.
///
/// Write failures do not interrupt the engine; the first one is kept and
/// surfaced through [`TerminalSurface::take_error`].
pub struct TerminalSurface<W> {
    out: W,
    last_timer: Option<TimerView>,
    error: Option<io::Error>,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_timer: None,
            error: None,
        }
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn emit(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        let written = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(err) = written {
            self.error = Some(err);
        }
    }

    pub fn render_deck_header(&mut self, level: Level, theme: Theme) {
        self.emit(&format!(
            "\n=== {} {} · {} ===\n",
            theme.icon(),
            theme.label(),
            level.label()
        ));
    }

    pub fn render_flashcard(&mut self, view: &FlashcardView) {
        let mut text = String::new();
        let Some(card) = &view.card else {
            text.push_str("Aucune carte disponible.\n");
            self.emit(&text);
            return;
        };

        let _ = writeln!(text, "\n{}  [{}]", view.progress_label(), card.theme);
        match view.face {
            FlashcardFace::Question => {
                let _ = writeln!(text, "Q : {}", card.question);
                text.push_str("(Entrée pour retourner la carte)\n");
            }
            FlashcardFace::Answer => {
                let _ = writeln!(text, "R : {}", card.answer);
            }
        }
        let mut keys = Vec::new();
        if view.has_prev {
            keys.push("p = précédente");
        }
        if view.has_next {
            keys.push("n = suivante");
        }
        keys.push("m = mélanger");
        keys.push("q = quitter");
        let _ = writeln!(text, "{}", keys.join(" · "));
        self.emit(&text);
    }

    pub fn render_help(&mut self) {
        self.emit(
            "Commandes : A-D (ou 1-4) répondre, Entrée valider, r recommencer, q quitter\n",
        );
    }
}

fn option_line(index: OptionIndex, text: &str, marker: &str) -> String {
    format!("  {}. {text}{marker}\n", index.letter())
}

/// Shown only at minute boundaries, and every 10 s once the warning is on.
fn timer_is_notable(timer: &TimerView) -> bool {
    if timer.warning {
        timer.remaining_secs % 10 == 0
    } else {
        timer.remaining_secs % 60 == 0
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn render_start(&mut self, screen: &StartScreen) {
        self.last_timer = None;
        let mut text = String::new();
        let _ = writeln!(
            text,
            "\n=== {} · {} ({}) ===",
            screen.mode.title(),
            screen.level.label(),
            screen.level.full_label()
        );
        let _ = writeln!(text, "{}", screen.description);
        let _ = writeln!(text, "Banque de {} questions", screen.bank_size);
        let _ = writeln!(text, "Thèmes : {}", screen.theme_labels);
        let _ = writeln!(text, "• {} questions", screen.question_count);
        if let Some(minutes) = screen.time_minutes {
            let _ = writeln!(text, "• {minutes} minutes");
        }
        if let Some((pass_score, total)) = screen.pass_rule {
            let _ = writeln!(text, "• {pass_score}/{total} bonnes réponses pour réussir");
        }
        text.push_str("• 4 réponses possibles, 1 seule correcte\n");
        if matches!(screen.mode, QuizMode::Simulation) || !screen.show_feedback {
            text.push_str("• Les résultats sont affichés à la fin\n");
        }
        text.push_str("Appuyez sur Entrée pour commencer.\n");
        self.emit(&text);
    }

    fn render_question(&mut self, screen: &QuestionScreen) {
        let mut text = String::new();
        let _ = write!(text, "\nQuestion {}/{} · {}", screen.number(), screen.total(), screen.theme);
        if let Some(timer) = &self.last_timer {
            let _ = write!(text, " · ⏱ {}", timer.display());
        }
        let _ = writeln!(text, "\n{}", screen.question);
        for index in OptionIndex::all() {
            let marker = match screen.feedback {
                Some(feedback) => selection_marker(&feedback, index),
                None => "",
            };
            text.push_str(&option_line(index, &screen.options[index.value()], marker));
        }
        if screen.can_advance() {
            text.push_str(advance_hint(screen.is_last));
        }
        self.emit(&text);
    }

    fn render_selection(&mut self, feedback: &SelectionFeedback) {
        let text = match feedback.is_correct() {
            Some(true) => "✓ Bonne réponse !".to_string(),
            Some(false) => match feedback {
                SelectionFeedback::Revealed { correct, .. } => {
                    format!("✗ Mauvaise réponse. La bonne réponse était {}.", correct.letter())
                }
                SelectionFeedback::Selected { .. } => "✗ Mauvaise réponse.".to_string(),
            },
            None => format!("Réponse {} enregistrée.", feedback.selected().letter()),
        };
        self.emit(&format!("{text}\n"));
    }

    fn render_timer(&mut self, timer: &TimerView) {
        let first = self.last_timer.is_none();
        self.last_timer = Some(*timer);
        if first || !timer_is_notable(timer) {
            return;
        }
        let prefix = if timer.warning { "⚠ Temps restant" } else { "Temps restant" };
        self.emit(&format!("{prefix} : {}\n", timer.display()));
    }

    fn render_results(&mut self, results: &QuizResults) {
        self.last_timer = None;
        let report = &results.report;
        let mut text = String::new();
        text.push_str("\n=== Résultats ===\n");
        if results.ended_by == SessionEnd::TimeExpired {
            text.push_str("Temps écoulé !\n");
        }
        if report.passed {
            text.push_str("Félicitations !\n");
        } else {
            text.push_str("Dommage...\n");
        }
        let _ = writeln!(
            text,
            "Score : {}/{} ({} %)",
            report.score, report.total, report.percentage
        );
        if !report.passed {
            let _ = writeln!(
                text,
                "Il vous manque {} bonne(s) réponse(s) pour réussir.",
                report.missing
            );
        }
        if let Some(taken) = results.time_taken_display() {
            let _ = writeln!(text, "Temps : {taken}");
        }

        text.push_str("\nDétail :\n");
        for review in &results.breakdown {
            let mark = match review.outcome {
                AnswerOutcome::Correct => "✓",
                AnswerOutcome::Incorrect => "✗",
                AnswerOutcome::Unanswered => "–",
            };
            let _ = writeln!(text, "{mark} {}. {}", review.number, review.question);
            match &review.selected {
                Some(chosen) => {
                    let _ = writeln!(
                        text,
                        "    Votre réponse : {}. {}",
                        chosen.index.letter(),
                        chosen.text
                    );
                }
                None => text.push_str("    Pas de réponse\n"),
            }
            if !review.outcome.is_correct() {
                let _ = writeln!(
                    text,
                    "    Bonne réponse : {}. {}",
                    review.correct.index.letter(),
                    review.correct.text
                );
            }
        }
        text.push_str("\nr = recommencer · q = quitter\n");
        self.emit(&text);
    }

    fn render_error(&mut self, error: &SessionError) {
        self.emit(&format!("⚠ {}\n", error.user_message()));
    }
}

fn selection_marker(feedback: &SelectionFeedback, index: OptionIndex) -> &'static str {
    match feedback {
        SelectionFeedback::Revealed { selected, correct } => {
            if index == *correct {
                "  ✓"
            } else if index == *selected {
                "  ✗"
            } else {
                ""
            }
        }
        SelectionFeedback::Selected { selected } => {
            if index == *selected {
                "  ●"
            } else {
                ""
            }
        }
    }
}

fn advance_hint(is_last: bool) -> &'static str {
    if is_last {
        "Entrée : Voir les résultats\n"
    } else {
        "Entrée : Question suivante\n"
    }
}
