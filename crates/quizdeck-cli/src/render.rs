//! Plain-text rendering of controller render models.

use std::fmt::Write;

use quizdeck_core::quiz::{
    format_duration, ExitSummary, QuestionView, QuizReport, QuizSummary, ReviewStatus,
};
use quizdeck_core::{QuizProgress, TimerDisplay, View};

pub fn print_view(view: &View) {
    println!("{}", view_text(view));
}

pub fn view_text(view: &View) -> String {
    match view {
        View::Start => "== quizdeck ==\nEnter your name and email to begin.".to_string(),
        View::Quiz(question) => question_text(question),
        View::End(summary) => end_text(summary),
        View::Exit(summary) => exit_text(summary),
        View::Report(report) => report_text(report),
    }
}

fn question_text(view: &QuestionView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{} <{}>", view.user_name, view.user_email);
    let timer = view
        .timer
        .as_ref()
        .map(timer_text)
        .unwrap_or_default();
    let _ = writeln!(out, "Question {}/{}  {}", view.number, view.total, timer);
    let _ = writeln!(out, "{}", view.text);
    for option in &view.options {
        let mark = if option.selected { "(*)" } else { "( )" };
        let _ = writeln!(out, "  {} {}. {}", mark, option.label, option.text);
    }
    let next = if view.can_advance { "[n] next" } else { "[n] skip" };
    let _ = write!(out, "[a-d] select  {next}  [t] time  [x] exit");
    out
}

pub fn timer_text(display: &TimerDisplay) -> String {
    const WIDTH: usize = 20;
    let filled = ((display.percent / 100.0) * WIDTH as f64).round() as usize;
    let bar: String = "#".repeat(filled.min(WIDTH)) + &"-".repeat(WIDTH - filled.min(WIDTH));
    let flag = if display.warning { " !" } else { "" };
    format!("[{bar}] {}{flag}", display.label)
}

fn summary_lines(out: &mut String, summary: &QuizSummary) {
    let verdict = if summary.passed { "Passed" } else { "Failed" };
    let _ = writeln!(out, "Score: {}  ({verdict})", summary.score_label());
    let _ = writeln!(out, "You answered {}% correctly.", summary.percentage);
    let _ = writeln!(out, "Average time per question: {}s", summary.average_secs);
    let _ = writeln!(out, "Total time: {}", format_duration(summary.total_secs));
}

fn end_text(summary: &QuizSummary) -> String {
    let mut out = String::from("\n== Quiz complete ==\n");
    summary_lines(&mut out, summary);
    out.push_str("[r] report  [h] home  [q] quit");
    out
}

fn exit_text(summary: &ExitSummary) -> String {
    format!("\n== Quiz exited ==\nScore: {summary}\n[h] home  [q] quit")
}

fn report_text(report: &QuizReport) -> String {
    let mut out = String::from("\n== Report ==\n");
    summary_lines(&mut out, &report.summary);
    for item in &report.items {
        let _ = writeln!(out, "\nQuestion {}: {}", item.number, item.text);
        for option in &item.options {
            let badge = match option.status {
                ReviewStatus::Correct => "  [Correct]",
                ReviewStatus::YourAnswer => "  [Your answer]",
                ReviewStatus::Incorrect => "  [Incorrect]",
                ReviewStatus::Unmarked => "",
            };
            let _ = writeln!(out, "  {}. {}{badge}", option.label, option.text);
        }
    }
    out.push_str("[h] home  [q] quit");
    out
}

pub fn feedback_text(correct: bool) -> &'static str {
    if correct {
        "  -> correct!"
    } else {
        "  -> not quite"
    }
}

pub fn resume_prompt(progress: &QuizProgress, total: usize) -> String {
    format!(
        "You have a saved quiz in progress ({}, question {}/{}). Would you like to resume? [y/N]",
        progress.user_name,
        progress.current_index + 1,
        total
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizdeck_core::quiz::OptionView;

    fn display(remaining: u64) -> TimerDisplay {
        TimerDisplay {
            remaining_secs: remaining,
            duration_secs: 50,
            percent: remaining as f64 / 50.0 * 100.0,
            warning: remaining <= 10,
            label: format!("{remaining}s"),
        }
    }

    #[test]
    fn timer_bar_tracks_remaining_share() {
        assert_eq!(timer_text(&display(50)), "[####################] 50s");
        assert_eq!(timer_text(&display(25)), "[##########----------] 25s");
        assert_eq!(timer_text(&display(5)), "[##------------------] 5s !");
    }

    #[test]
    fn question_marks_selection() {
        let view = View::Quiz(QuestionView {
            number: 2,
            total: 15,
            text: "Pick one".into(),
            user_name: "Ada".into(),
            user_email: "ada@example.com".into(),
            options: ["w", "x", "y", "z"]
                .iter()
                .enumerate()
                .map(|(i, text)| OptionView {
                    label: quizdeck_core::quiz::option_label(i),
                    text: text.to_string(),
                    selected: i == 1,
                    feedback: None,
                })
                .collect(),
            can_advance: true,
            timer: Some(display(50)),
        });
        let text = view_text(&view);
        assert!(text.contains("Question 2/15"));
        assert!(text.contains("(*) B. x"));
        assert!(text.contains("( ) A. w"));
        assert!(text.contains("[n] next"));
    }

    #[test]
    fn exit_shows_partial_score() {
        let text = view_text(&View::Exit(ExitSummary { score: 1, answered: 2 }));
        assert!(text.contains("Score: 1/2"));
    }

    #[test]
    fn end_shows_verdict_and_analytics() {
        let text = view_text(&View::End(QuizSummary {
            score: 8,
            total: 15,
            passed: true,
            percentage: 53,
            average_secs: 15,
            total_secs: 225,
        }));
        assert!(text.contains("Score: 8/15  (Passed)"));
        assert!(text.contains("53%"));
        assert!(text.contains("Average time per question: 15s"));
        assert!(text.contains("Total time: 3m 45s"));
    }
}
