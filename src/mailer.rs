//! Vote confirmation messages. Rendering lives here; the transport is an
//! external concern behind the `Mailer` trait.

use std::fmt::Write;

use tracing::info;

/// One line of a confirmation message, one per criterion answered.
#[derive(Clone, Debug)]
pub struct VoteLine {
    pub criteria_name: String,
    pub score: i64,
    pub comments: String,
}

#[derive(Clone, Debug)]
pub struct VoteConfirmation {
    pub judge_name: String,
    pub judge_email: String,
    pub team_name: String,
    pub lines: Vec<VoteLine>,
}

impl VoteConfirmation {
    /// Renders the plain-text body of the confirmation message.
    pub fn render(&self) -> String {
        let mut body = String::new();
        let _ = writeln!(body, "Hi {},", self.judge_name);
        let _ = writeln!(body);
        let _ = writeln!(
            body,
            "Your votes for team \"{}\" have been recorded:",
            self.team_name
        );
        let _ = writeln!(body);

        for line in &self.lines {
            let mark = if line.score == 1 { "Yes" } else { "No" };
            let _ = write!(body, "  [{mark}] {}", line.criteria_name);
            if !line.comments.is_empty() {
                let _ = write!(body, " ({})", line.comments);
            }
            let _ = writeln!(body);
        }

        let yes = self.lines.iter().filter(|l| l.score == 1).count();
        let _ = writeln!(body);
        let _ = writeln!(body, "Total: {yes} yes of {}.", self.lines.len());

        body
    }
}

pub trait Mailer: Send + Sync {
    /// Returns true when the message was handed off to the transport.
    fn send_vote_confirmation(&self, confirmation: &VoteConfirmation) -> bool;
}

/// Mailer used when no real transport is configured: the rendered message is
/// written to the log and reported as sent.
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send_vote_confirmation(&self, confirmation: &VoteConfirmation) -> bool {
        info!(
            recipient = %confirmation.judge_email,
            "vote confirmation:\n{}",
            confirmation.render()
        );
        true
    }
}
