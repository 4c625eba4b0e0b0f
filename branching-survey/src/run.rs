use tracing::debug;

use crate::{Clock, EndScreen, Respondent, Session, SessionError, SessionOutcome};

/// Error type for running a session against a respondent.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The respondent failed or gave up (I/O, UI crash, cancelled, ...).
    #[error("Respondent error: {0}")]
    Respondent(anyhow::Error),

    /// The session hit a non-recoverable error.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl RunError {
    /// Create a respondent error from any error type.
    pub fn respondent(err: impl Into<anyhow::Error>) -> Self {
        Self::Respondent(err.into())
    }
}

impl<'g, C: Clock> Session<'g, C> {
    /// Ask `respondent` every question on the way to an end screen.
    ///
    /// Rejected answers are reported back with [`Respondent::rejected`] and the same
    /// question is asked again. Returns the end screen that was reached; the accepted
    /// answers are in [`Session::history`].
    pub fn run<R: Respondent>(&mut self, respondent: &mut R) -> Result<&'g EndScreen, RunError> {
        loop {
            let (id, question) = match self.view()? {
                SessionOutcome::Question { id, question } => (id, question),
                SessionOutcome::Completed { screen, .. } => return Ok(screen),
            };

            let answer = respondent
                .answer(&id, question)
                .map_err(RunError::respondent)?;

            match self.submit(answer) {
                Ok(_) => {}
                Err(SessionError::Validation { source, .. }) if source.is_recoverable() => {
                    debug!(step = %id, error = %source, "asking again");
                    respondent.rejected(&id, &source);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
