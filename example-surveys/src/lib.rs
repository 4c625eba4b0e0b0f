pub mod event_signup;
pub mod workplace_feedback;
